//! Consumption charts
//!
//!  - hourly consumption time series with its 24h rolling trend
//!  - hour of the day by day of the week usage heatmap

use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

use chrono::Duration;
use plotters::prelude::*;

use crate::{stats, ConsumptionTable};

const DAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(thiserror::Error, Debug)]
pub enum PlotError {
    #[error("failed to draw {0:?}: {1}")]
    Drawing(PathBuf, String),
    #[error("the consumption table is empty")]
    Empty,
}
type Result<T> = std::result::Result<T, PlotError>;

fn drawing<E: Display>(path: &Path) -> impl Fn(E) -> PlotError + '_ {
    move |e| PlotError::Drawing(path.to_path_buf(), e.to_string())
}

/// Hourly consumption and 24h rolling mean vs time
pub fn plot_consumption<P: AsRef<Path>>(
    table: &ConsumptionTable,
    path: P,
    title: &str,
) -> Result<()> {
    let path = path.as_ref();
    let (start, _) = table.time_range().ok_or(PlotError::Empty)?;
    let consumption = table.consumption();
    let (min_value, max_value) = stats::minmax(&consumption).ok_or(PlotError::Empty)?;
    let y_min = min_value.min(0.);
    let y_max = y_min + (max_value - y_min).max(1e-3) * 1.1;
    let xrange = (table.len() - 1).max(1) as f64;

    let plot = SVGBackend::new(path, (1500, 600)).into_drawing_area();
    plot.fill(&WHITE).map_err(drawing(path))?;

    let mut chart = ChartBuilder::on(&plot)
        .caption(title, ("sans-serif", 24))
        .set_label_area_size(LabelAreaPosition::Left, 60)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .margin(10)
        .build_cartesian_2d(-xrange * 1e-2..xrange * (1. + 1e-2), y_min..y_max)
        .map_err(drawing(path))?;
    let time_label = |x: &f64| {
        (start + Duration::minutes((x * 60.).round() as i64))
            .format("%Y-%m-%d %Hh")
            .to_string()
    };
    chart
        .configure_mesh()
        .x_labels(8)
        .x_label_formatter(&time_label)
        .y_desc("Consumption [kWh]")
        .draw()
        .map_err(drawing(path))?;

    let color = colorous::TABLEAU10[0];
    let hourly = RGBColor(color.r, color.g, color.b).mix(0.5);
    chart
        .draw_series(LineSeries::new(
            consumption.iter().enumerate().map(|(k, &y)| (k as f64, y)),
            hourly,
        ))
        .map_err(drawing(path))?
        .label("Hourly Consumption")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], hourly));
    chart
        .draw_series(LineSeries::new(
            table
                .records()
                .iter()
                .enumerate()
                .filter_map(|(k, r)| r.rolling_24h.map(|y| (k as f64, y))),
            &RED,
        ))
        .map_err(drawing(path))?
        .label("24h Trend")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));
    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.8))
        .position(SeriesLabelPosition::UpperRight)
        .draw()
        .map_err(drawing(path))?;
    plot.present().map_err(drawing(path))?;
    log::info!("consumption time series written to {:?}", path);
    Ok(())
}

/// Day name at the centre of a weekday segment
fn weekday_label(d: &SegmentValue<i32>) -> String {
    match d {
        SegmentValue::CenterOf(d) => DAYS
            .get(*d as usize)
            .map_or_else(String::new, |d| d.to_string()),
        _ => String::new(),
    }
}

/// `n` contiguous colour bar bins over `[vmin, vmin + span]`
fn colorbar_bins(vmin: f64, span: f64, n: usize) -> Vec<(f64, f64)> {
    (0..n)
        .map(|k| {
            (
                vmin + span * k as f64 / n as f64,
                vmin + span * (k + 1) as f64 / n as f64,
            )
        })
        .collect()
}

/// Mean consumption heatmap, hour of the day vs day of the week
///
/// Empty cells are left blank; the colour bar on the right maps the
/// colours back to kWh.
pub fn plot_heatmap<P: AsRef<Path>>(table: &ConsumptionTable, path: P) -> Result<()> {
    let path = path.as_ref();
    let grid = table.hour_by_weekday();
    let cells: Vec<f64> = grid.iter().flatten().flatten().cloned().collect();
    let (vmin, vmax) = stats::minmax(&cells).ok_or(PlotError::Empty)?;
    let span = if vmax > vmin { vmax - vmin } else { 1. };
    let cmap = colorous::YELLOW_ORANGE_RED;
    let color = |v: f64| {
        let c = cmap.eval_continuous(((v - vmin) / span).clamp(0., 1.));
        RGBColor(c.r, c.g, c.b)
    };

    let plot = SVGBackend::new(path, (1000, 600)).into_drawing_area();
    plot.fill(&WHITE).map_err(drawing(path))?;
    let plot = plot
        .titled("Usage Intensity Heatmap", ("sans-serif", 24))
        .map_err(drawing(path))?;
    let (map, bar) = plot.split_horizontally(880);

    let mut chart = ChartBuilder::on(&map)
        .margin(10)
        .set_label_area_size(LabelAreaPosition::Left, 50)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d((0i32..7i32).into_segmented(), 24i32..0i32)
        .map_err(drawing(path))?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .y_labels(24)
        .x_label_formatter(&weekday_label)
        .x_desc("DayOfWeek")
        .y_desc("Hour")
        .draw()
        .map_err(drawing(path))?;
    chart
        .draw_series(grid.iter().enumerate().flat_map(|(h, row)| {
            row.iter().enumerate().filter_map(move |(d, v)| {
                v.map(|v| {
                    let (x, y) = (d as i32, h as i32);
                    Rectangle::new(
                        [(SegmentValue::Exact(x), y), (SegmentValue::Exact(x + 1), y + 1)],
                        color(v).filled(),
                    )
                })
            })
        }))
        .map_err(drawing(path))?;

    let mut colorbar = ChartBuilder::on(&bar)
        .margin_top(10)
        .margin_bottom(50)
        .set_label_area_size(LabelAreaPosition::Right, 60)
        .build_cartesian_2d(0f64..1f64, vmin..vmin + span)
        .map_err(drawing(path))?;
    colorbar
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_desc("kWh")
        .draw()
        .map_err(drawing(path))?;
    colorbar
        .draw_series(
            colorbar_bins(vmin, span, 64)
                .into_iter()
                .map(|(y0, y1)| Rectangle::new([(0., y0), (1., y1)], color(y0).filled())),
        )
        .map_err(drawing(path))?;

    plot.present().map_err(drawing(path))?;
    log::info!("usage heatmap written to {:?}", path);
    Ok(())
}

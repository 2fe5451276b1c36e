//! Monthly class attendance analytics
//!
//! Attendance is recorded per business day and per student, the report
//! gives the presence rate of each student and the daily head count.

use std::{
    fmt::Display,
    path::{Path, PathBuf},
};

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use energy_monitors::stats;
use plotters::prelude::*;
use rand::Rng;

pub const STUDENTS: [&str; 5] = ["Ansh", "Bobby", "Chandra", "Prem", "Aman"];
/// Presence rate every student should reach [%]
pub const GOAL: f64 = 75.;

#[derive(thiserror::Error, Debug)]
pub enum AttendanceError {
    #[error("failed to draw {0:?}: {1}")]
    Drawing(PathBuf, String),
}
type Result<T> = std::result::Result<T, AttendanceError>;

fn drawing<E: Display>(path: &Path) -> impl Fn(E) -> AttendanceError + '_ {
    move |e| AttendanceError::Drawing(path.to_path_buf(), e.to_string())
}

/// `n` consecutive business days (Monday to Friday) from `start` onward
pub fn business_days(start: NaiveDate, n: usize) -> Vec<NaiveDate> {
    let mut days = Vec::with_capacity(n);
    let mut day = start;
    while days.len() < n {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            days.push(day);
        }
        day += Duration::days(1);
    }
    days
}

/// Attendance sheet: one row per day, one column per student
#[derive(Debug, Clone)]
pub struct Attendance {
    students: Vec<String>,
    days: Vec<NaiveDate>,
    present: Vec<Vec<bool>>,
}
impl Attendance {
    /// Builds the sheet from the daily records
    ///
    /// Returns `None` if a row does not have one entry per student.
    pub fn new<S: ToString>(
        students: &[S],
        days: Vec<NaiveDate>,
        present: Vec<Vec<bool>>,
    ) -> Option<Self> {
        if present.len() != days.len() || present.iter().any(|row| row.len() != students.len()) {
            return None;
        }
        Some(Self {
            students: students.iter().map(|s| s.to_string()).collect(),
            days,
            present,
        })
    }
    /// Draws each student presence with probability `p_present`
    pub fn simulate<S: ToString, R: Rng>(
        students: &[S],
        days: Vec<NaiveDate>,
        p_present: f64,
        rng: &mut R,
    ) -> Self {
        let present = days
            .iter()
            .map(|_| students.iter().map(|_| rng.gen_bool(p_present)).collect())
            .collect();
        Self {
            students: students.iter().map(|s| s.to_string()).collect(),
            days,
            present,
        }
    }
    pub fn students(&self) -> &[String] {
        &self.students
    }
    pub fn days(&self) -> &[NaiveDate] {
        &self.days
    }
    /// Percentage of days each student was present
    pub fn presence_rate(&self) -> Vec<f64> {
        let n_days = self.days.len().max(1) as f64;
        (0..self.students.len())
            .map(|k| {
                let n = self.present.iter().filter(|row| row[k]).count();
                100. * n as f64 / n_days
            })
            .collect()
    }
    /// Percentage of days each student was absent
    pub fn absence_rate(&self) -> Vec<f64> {
        self.presence_rate().into_iter().map(|p| 100. - p).collect()
    }
    /// Number of students present each day
    pub fn daily_total(&self) -> Vec<usize> {
        self.present
            .iter()
            .map(|row| row.iter().filter(|&&p| p).count())
            .collect()
    }
    /// Mean of the students presence rates [%]
    pub fn average_attendance(&self) -> Option<f64> {
        stats::mean(&self.presence_rate())
    }
    /// Returns the monthly analytics report
    pub fn report(&self) -> String {
        let mut report = String::from("--- Monthly Analytics Report ---\n");
        if let Some(average) = self.average_attendance() {
            report.push_str(&format!("Average Class Attendance: {:.2}%\n", average));
        }
        report.push_str("\nIndividual Percentages:\n");
        for (name, (presence, absence)) in self
            .students
            .iter()
            .zip(self.presence_rate().into_iter().zip(self.absence_rate()))
        {
            report.push_str(&format!(
                "{:<10} {:>6.1}  (absent {:>5.1})\n",
                name, presence, absence
            ));
        }
        report
    }
    /// Plots the presence rates against the goal and the daily head count
    pub fn plot<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let root = SVGBackend::new(path, (1200, 600)).into_drawing_area();
        root.fill(&WHITE).map_err(drawing(path))?;
        let (left, right) = root.split_horizontally(600);

        let n = self.students.len() as i32;
        let mut chart = ChartBuilder::on(&left)
            .caption("Monthly Attendance Percentage", ("sans-serif", 20))
            .set_label_area_size(LabelAreaPosition::Left, 50)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .margin(10)
            .build_cartesian_2d((0..n).into_segmented(), 0f64..100f64)
            .map_err(drawing(path))?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_label_formatter(&|x| match x {
                SegmentValue::CenterOf(k) => self
                    .students
                    .get(*k as usize)
                    .cloned()
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .y_desc("Rate (%)")
            .draw()
            .map_err(drawing(path))?;
        let sky = colorous::BLUES.eval_continuous(0.4);
        let sky = RGBColor(sky.r, sky.g, sky.b);
        chart
            .draw_series(self.presence_rate().into_iter().enumerate().map(|(k, p)| {
                let k = k as i32;
                let mut bar = Rectangle::new(
                    [(SegmentValue::Exact(k), 0.), (SegmentValue::Exact(k + 1), p)],
                    sky.filled(),
                );
                bar.set_margin(0, 0, 8, 8);
                bar
            }))
            .map_err(drawing(path))?;
        chart
            .draw_series(DashedLineSeries::new(
                vec![
                    (SegmentValue::Exact(0), GOAL),
                    (SegmentValue::Exact(n), GOAL),
                ],
                10,
                6,
                RED.stroke_width(2),
            ))
            .map_err(drawing(path))?
            .label(format!("{GOAL:.0}% Goal"))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));
        chart
            .configure_series_labels()
            .border_style(&BLACK)
            .background_style(&WHITE.mix(0.8))
            .position(SeriesLabelPosition::LowerRight)
            .draw()
            .map_err(drawing(path))?;

        let totals = self.daily_total();
        let n_days = totals.len() as i32;
        let mut chart = ChartBuilder::on(&right)
            .caption("Monthly Attendance Trend (Daily)", ("sans-serif", 20))
            .set_label_area_size(LabelAreaPosition::Left, 50)
            .set_label_area_size(LabelAreaPosition::Bottom, 60)
            .margin(10)
            .build_cartesian_2d(-1i32..n_days, 0i32..self.students.len() as i32 + 1)
            .map_err(drawing(path))?;
        chart
            .configure_mesh()
            .x_labels(totals.len())
            .x_label_formatter(&|x| {
                self.days
                    .get(*x as usize)
                    .map_or_else(String::new, |d| d.format("%d-%b").to_string())
            })
            .x_label_style(
                ("sans-serif", 12)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .y_desc("Students Present")
            .draw()
            .map_err(drawing(path))?;
        let points: Vec<(i32, i32)> = totals
            .iter()
            .enumerate()
            .map(|(k, &t)| (k as i32, t as i32))
            .collect();
        chart
            .draw_series(LineSeries::new(points.clone(), &GREEN))
            .map_err(drawing(path))?;
        chart
            .draw_series(points.into_iter().map(|p| Circle::new(p, 4, GREEN.filled())))
            .map_err(drawing(path))?;

        root.present().map_err(drawing(path))?;
        log::info!("attendance charts written to {:?}", path);
        Ok(())
    }
}

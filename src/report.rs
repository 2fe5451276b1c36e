//! End-to-end consumption report
//!
//! load → resample → features & anomalies → charts → summary → CSV export

use std::{path::PathBuf, time::Instant};

use crate::{AnomalyFlagger, ConsumptionLoader, ConsumptionTable, HourlySeries, Result};

pub const DEFAULT_OUTPUT: &str = "processed_results.csv";
pub const DEFAULT_TITLE: &str = "Blower 78 Energy Consumption";

/// Report outputs
#[derive(Debug, Clone)]
pub struct ReportOptions {
    output: PathBuf,
    plot_dir: Option<PathBuf>,
    title: String,
}
impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            plot_dir: Some(PathBuf::from(".")),
            title: DEFAULT_TITLE.to_string(),
        }
    }
}
impl ReportOptions {
    /// Path of the exported table
    pub fn output<P: Into<PathBuf>>(self, output: P) -> Self {
        Self {
            output: output.into(),
            ..self
        }
    }
    /// Folder the charts are written to
    pub fn plot_dir<P: Into<PathBuf>>(self, plot_dir: P) -> Self {
        Self {
            plot_dir: Some(plot_dir.into()),
            ..self
        }
    }
    /// Skips the charts
    pub fn no_plot(self) -> Self {
        Self {
            plot_dir: None,
            ..self
        }
    }
    pub fn title<S: Into<String>>(self, title: S) -> Self {
        Self {
            title: title.into(),
            ..self
        }
    }
    pub fn output_path(&self) -> &PathBuf {
        &self.output
    }
    #[cfg(feature = "plot")]
    fn plot(&self, table: &ConsumptionTable) -> Result<()> {
        if let Some(dir) = &self.plot_dir {
            crate::plot::plot_consumption(table, dir.join("consumption.svg"), &self.title)?;
            crate::plot::plot_heatmap(table, dir.join("heatmap.svg"))?;
        }
        Ok(())
    }
    #[cfg(not(feature = "plot"))]
    fn plot(&self, _table: &ConsumptionTable) -> Result<()> {
        if self.plot_dir.is_some() {
            log::warn!("built without the `plot` feature, skipping the charts");
        }
        Ok(())
    }
}

/// Runs the whole report
///
/// Nothing is written if the loader fails, missing input files included.
pub fn run(
    loader: ConsumptionLoader,
    flagger: &AnomalyFlagger,
    options: &ReportOptions,
) -> Result<ConsumptionTable> {
    let now = Instant::now();
    let readings = loader.load()?;
    let series = HourlySeries::resample(&readings)?;
    let table = ConsumptionTable::new(&series, flagger);
    options.plot(&table)?;
    table.summary();
    table.to_csv(&options.output)?;
    println!("\nResults saved to '{}'", options.output.display());
    log::info!("report completed in {}ms", now.elapsed().as_millis());
    Ok(table)
}

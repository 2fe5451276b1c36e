//! # Energy monitors
//!
//! Parser and reporter for smart-meter kWh exports.
//!
//! The readings of one or more CSV files are merged into a gap-free hourly
//! series, enriched with calendar features and a 24h rolling mean, and
//! checked against a global `mean + 3σ` anomaly threshold:
//! ```no_run
//! use energy_monitors::{AnomalyFlagger, ConsumptionLoader, ConsumptionTable, HourlySeries};
//!
//! let readings = ConsumptionLoader::default().data_path("data").load()?;
//! let series = HourlySeries::resample(&readings)?;
//! let table = ConsumptionTable::new(&series, &AnomalyFlagger::default());
//! table.summary();
//! table.to_csv("processed_results.csv")?;
//! # Ok::<(), energy_monitors::ConsumptionError>(())
//! ```

pub mod anomaly;
mod error;
pub mod features;
pub mod hourly;
pub mod loader;
#[cfg(feature = "plot")]
pub mod plot;
pub mod report;
pub mod stats;
pub mod table;
pub mod timestamp;

pub use anomaly::AnomalyFlagger;
pub use error::ConsumptionError;
pub use features::{HourlyRecord, Period};
pub use hourly::HourlySeries;
pub use loader::{ConsumptionLoader, LoaderError, Reading};
pub use report::ReportOptions;
pub use table::ConsumptionTable;
pub use timestamp::{parse_timestamp, TimestampError};

/// Width of the trailing rolling mean window, in hourly buckets
pub const ROLLING_WINDOW: usize = 24;

pub type Result<T> = std::result::Result<T, ConsumptionError>;

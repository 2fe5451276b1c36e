use std::time::Instant;

use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use itertools::Itertools;

use crate::{loader::Reading, ConsumptionError, Result};

/// Truncates a timestamp to the start of its hour
pub fn floor_hour(timestamp: NaiveDateTime) -> NaiveDateTime {
    timestamp.date().and_time(NaiveTime::MIN) + Duration::hours(timestamp.hour() as i64)
}

/// Consumption resampled into contiguous hourly buckets
///
/// Buckets without any reading hold a zero consumption,
/// [HourlySeries::samples] tells them apart from measured zeros.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlySeries {
    start: NaiveDateTime,
    consumption: Vec<f64>,
    samples: Vec<usize>,
}
impl HourlySeries {
    /// Sorts, de-duplicates and sums the readings into hourly buckets
    ///
    /// When several readings share a timestamp, only the first one
    /// encountered is kept.
    pub fn resample(readings: &[Reading]) -> Result<Self> {
        let now = Instant::now();
        let mut sorted = readings.to_vec();
        sorted.sort_by_key(|r| r.timestamp);
        let unique: Vec<_> = sorted.into_iter().unique_by(|r| r.timestamp).collect();
        let n_duplicates = readings.len() - unique.len();
        if n_duplicates > 0 {
            log::warn!("dropped {} readings with duplicated timestamps", n_duplicates);
        }

        let (first, last) = match (unique.first(), unique.last()) {
            (Some(first), Some(last)) => (floor_hour(first.timestamp), floor_hour(last.timestamp)),
            _ => return Err(ConsumptionError::NoRecords),
        };
        let n = (last - first).num_hours() as usize + 1;
        let mut consumption = vec![0f64; n];
        let mut samples = vec![0usize; n];
        for reading in &unique {
            let k = (floor_hour(reading.timestamp) - first).num_hours() as usize;
            consumption[k] += reading.consumption;
            samples[k] += 1;
        }
        let this = Self {
            start: first,
            consumption,
            samples,
        };
        log::info!(
            "resampled {} readings into {} hourly buckets ({} empty) in {}ms",
            unique.len(),
            this.len(),
            this.gaps(),
            now.elapsed().as_millis()
        );
        Ok(this)
    }
    pub fn len(&self) -> usize {
        self.consumption.len()
    }
    pub fn is_empty(&self) -> bool {
        self.consumption.is_empty()
    }
    /// First bucket
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }
    /// Last bucket
    pub fn end(&self) -> NaiveDateTime {
        self.start + Duration::hours(self.len().saturating_sub(1) as i64)
    }
    /// Hourly consumption [kWh]
    pub fn consumption(&self) -> &[f64] {
        &self.consumption
    }
    /// Number of readings summed in each bucket
    pub fn samples(&self) -> &[usize] {
        &self.samples
    }
    /// Number of buckets that did not receive any reading
    pub fn gaps(&self) -> usize {
        self.samples.iter().filter(|&&n| n == 0).count()
    }
    pub fn timestamps(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        (0..self.len()).map(move |k| self.start + Duration::hours(k as i64))
    }
    /// Iterator over the (bucket, consumption) pairs
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDateTime, f64)> + '_ {
        self.timestamps().zip(self.consumption.iter().cloned())
    }
}

use std::path::Path;

use chrono::NaiveDateTime;
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::{
    anomaly::AnomalyFlagger,
    features::{rolling_mean, HourlyRecord, Period},
    hourly::HourlySeries,
    stats, ROLLING_WINDOW,
};

const DAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Mean consumption per (hour of the day, day of the week)
///
/// Cells without any bucket are `None`.
pub type HourByWeekday = [[Option<f64>; 7]; 24];

fn python_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

#[derive(Serialize)]
struct Row {
    #[serde(rename = "Timestamp")]
    timestamp: String,
    #[serde(rename = "Consumption")]
    consumption: f64,
    #[serde(rename = "Hour")]
    hour: u32,
    #[serde(rename = "DayOfWeek")]
    day_of_week: u32,
    #[serde(rename = "Is_Weekend")]
    is_weekend: &'static str,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Rolling_24h")]
    rolling_24h: Option<f64>,
    #[serde(rename = "Period")]
    period: String,
    #[serde(rename = "Is_Anomaly")]
    is_anomaly: &'static str,
}
impl From<&HourlyRecord> for Row {
    fn from(r: &HourlyRecord) -> Self {
        Self {
            timestamp: r.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            consumption: r.consumption,
            hour: r.hour,
            day_of_week: r.day_of_week,
            is_weekend: python_bool(r.is_weekend),
            date: r.date.format("%Y-%m-%d").to_string(),
            rolling_24h: r.rolling_24h,
            period: r.period.to_string(),
            is_anomaly: python_bool(r.is_anomaly),
        }
    }
}

/// The enriched hourly consumption table
#[derive(Debug, Clone)]
pub struct ConsumptionTable {
    records: Vec<HourlyRecord>,
    threshold: f64,
    gaps: usize,
}
impl ConsumptionTable {
    /// Derives the features and the anomaly flags of an hourly series
    pub fn new(series: &HourlySeries, flagger: &AnomalyFlagger) -> Self {
        let consumption = series.consumption();
        let threshold = flagger.threshold(consumption);
        let records = series
            .iter()
            .zip(rolling_mean(consumption, ROLLING_WINDOW))
            .map(|((timestamp, value), rolling_24h)| HourlyRecord {
                rolling_24h,
                is_anomaly: value > threshold,
                ..HourlyRecord::new(timestamp, value)
            })
            .collect();
        Self {
            records,
            threshold,
            gaps: series.gaps(),
        }
    }
    pub fn records(&self) -> &[HourlyRecord] {
        &self.records
    }
    pub fn len(&self) -> usize {
        self.records.len()
    }
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
    /// Anomaly threshold [kWh]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }
    /// Number of zero-filled buckets
    pub fn gaps(&self) -> usize {
        self.gaps
    }
    pub fn consumption(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.consumption).collect()
    }
    /// Mean hourly consumption [kWh], zero-filled buckets included
    pub fn average_consumption(&self) -> f64 {
        stats::mean(&self.consumption()).unwrap_or(f64::NAN)
    }
    pub fn anomaly_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_anomaly).count()
    }
    pub fn time_range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        Some((self.records.first()?.timestamp, self.records.last()?.timestamp))
    }
    /// Mean hourly consumption within a tariff period
    pub fn period_average(&self, period: Period) -> Option<f64> {
        let values: Vec<f64> = self
            .records
            .iter()
            .filter(|r| r.period == period)
            .map(|r| r.consumption)
            .collect();
        stats::mean(&values)
    }
    /// Pivots the mean consumption by hour of the day and day of the week
    pub fn hour_by_weekday(&self) -> HourByWeekday {
        let mut sums = [[(0f64, 0usize); 7]; 24];
        for r in &self.records {
            let cell = &mut sums[r.hour as usize][r.day_of_week as usize];
            cell.0 += r.consumption;
            cell.1 += 1;
        }
        sums.map(|row| row.map(|(sum, n)| if n > 0 { Some(sum / n as f64) } else { None }))
    }
    /// Returns the results block of the report
    pub fn results(&self) -> String {
        format!(
            "--- PROJECT RESULTS ---\nAvg Consumption: {:.2} kWh\nAnomalies Found: {}",
            self.average_consumption(),
            self.anomaly_count()
        )
    }
    /// Prints out the table summary
    pub fn summary(&self) {
        println!("SUMMARY:");
        println!(" - # of hourly buckets: {}", self.len());
        if let Some((start, end)) = self.time_range() {
            println!(" - time range: [{} - {}]", start, end);
        }
        println!(" - # of empty buckets (zero-filled): {}", self.gaps());
        if let Some((min, max)) = stats::minmax(&self.consumption()) {
            println!(" - consumption range: [{:.3} - {:.3}] kWh", min, max);
        }
        println!(" - anomaly threshold: {:.3} kWh", self.threshold());
        for period in Period::iter() {
            if let Some(mean) = self.period_average(period) {
                println!("  - {:8}: {:>10.3} kWh", period.to_string(), mean);
            }
        }
        let busiest = self
            .hour_by_weekday()
            .iter()
            .enumerate()
            .flat_map(|(h, row)| {
                row.iter()
                    .enumerate()
                    .filter_map(move |(d, v)| v.map(|v| (h, d, v)))
            })
            .max_by(|a, b| a.2.total_cmp(&b.2));
        if let Some((h, d, v)) = busiest {
            println!(" - busiest slot: {} {:02}:00 ({:.3} kWh)", DAYS[d], h, v);
        }
        println!();
        println!("{}", self.results());
    }
    /// Writes the table to a CSV file, overwriting it
    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_path(path)?;
        for record in &self.records {
            wtr.serialize(Row::from(record))?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Reading;
    use chrono::{Duration, NaiveDate};

    fn t0() -> NaiveDateTime {
        // a Monday
        NaiveDate::from_ymd_opt(2022, 1, 3)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn series(values: &[f64]) -> HourlySeries {
        let readings: Vec<_> = values
            .iter()
            .enumerate()
            .map(|(k, &consumption)| Reading {
                timestamp: t0() + Duration::hours(k as i64),
                consumption,
                source: 0,
            })
            .collect();
        HourlySeries::resample(&readings).unwrap()
    }

    #[test]
    fn features_and_flags() {
        let mut values = vec![1f64; 48];
        values[40] = 30.;
        let table = ConsumptionTable::new(&series(&values), &AnomalyFlagger::default());
        assert_eq!(table.len(), 48);
        assert_eq!(table.anomaly_count(), 1);
        assert!(table.records()[40].is_anomaly);
        assert!(table.records()[..23].iter().all(|r| r.rolling_24h.is_none()));
        assert_eq!(table.records()[23].rolling_24h, Some(1.));
        let r = &table.records()[40];
        assert_eq!(r.rolling_24h, Some((23. + 30.) / 24.));
        assert_eq!(r.hour, 16);
        assert_eq!(r.day_of_week, 1);
        assert_eq!(r.period, Period::Peak);
        assert_eq!(table.average_consumption(), (47. + 30.) / 48.);
    }

    #[test]
    fn pivot() {
        let values: Vec<f64> = (0..(24 * 8)).map(|k| k as f64).collect();
        let table = ConsumptionTable::new(&series(&values), &AnomalyFlagger::default());
        let grid = table.hour_by_weekday();
        // Mondays at 02:00 are buckets 2 and 170
        assert_eq!(grid[2][0], Some(86.));
        assert_eq!(grid[5][1], Some(29.));
        assert!(grid.iter().flatten().all(Option::is_some));

        let short = ConsumptionTable::new(&series(&[1., 2.]), &AnomalyFlagger::default());
        let grid = short.hour_by_weekday();
        assert_eq!(grid[1][0], Some(2.));
        assert_eq!(grid[2][0], None);
        assert_eq!(grid.iter().flatten().flatten().count(), 2);
    }

    #[test]
    fn results_block() {
        let table = ConsumptionTable::new(&series(&[1., 2., 2.]), &AnomalyFlagger::default());
        assert_eq!(
            table.results(),
            "--- PROJECT RESULTS ---\nAvg Consumption: 1.67 kWh\nAnomalies Found: 0"
        );
    }

    #[test]
    fn csv_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "stale").unwrap();
        let mut values = vec![0.5f64; 25];
        values[24] = 2.;
        let table = ConsumptionTable::new(&series(&values), &AnomalyFlagger::default());
        table.to_csv(&path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 26);
        assert_eq!(
            lines[0],
            "Timestamp,Consumption,Hour,DayOfWeek,Is_Weekend,Date,Rolling_24h,Period,Is_Anomaly"
        );
        assert_eq!(lines[1], "2022-01-03 00:00:00,0.5,0,0,False,2022-01-03,,Off-Peak,False");
        assert_eq!(lines[24], "2022-01-03 23:00:00,0.5,23,0,False,2022-01-03,0.5,Off-Peak,False");
        assert_eq!(lines[25], "2022-01-04 00:00:00,2.0,0,1,False,2022-01-04,0.5625,Off-Peak,True");
    }
}

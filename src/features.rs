use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use strum_macros::{Display, EnumIter};

/// Tariff period of an hour of the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Period {
    #[strum(serialize = "Peak")]
    Peak,
    #[strum(serialize = "Off-Peak")]
    OffPeak,
}
impl Period {
    /// Peak from 9:00 to 18:00, both inclusive
    pub fn from_hour(hour: u32) -> Self {
        if (9..=18).contains(&hour) {
            Period::Peak
        } else {
            Period::OffPeak
        }
    }
}

/// Day of the week, Monday is 0
pub fn day_of_week(timestamp: &NaiveDateTime) -> u32 {
    timestamp.weekday().num_days_from_monday()
}

/// Trailing mean over `window` samples
///
/// The window ends at, and includes, the current sample.
/// Positions without a full window are `None`.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }
    let head = (window - 1).min(values.len());
    std::iter::repeat(None)
        .take(head)
        .chain(
            values
                .windows(window)
                .map(|w| Some(w.iter().sum::<f64>() / window as f64)),
        )
        .collect()
}

/// One hourly bucket and its derived features
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRecord {
    pub timestamp: NaiveDateTime,
    /// [kWh]
    pub consumption: f64,
    pub hour: u32,
    pub day_of_week: u32,
    pub is_weekend: bool,
    pub date: NaiveDate,
    /// Mean of the last 24 buckets
    pub rolling_24h: Option<f64>,
    pub period: Period,
    pub is_anomaly: bool,
}
impl HourlyRecord {
    /// Builds the calendar features of a bucket
    pub fn new(timestamp: NaiveDateTime, consumption: f64) -> Self {
        let hour = timestamp.hour();
        let day_of_week = day_of_week(&timestamp);
        Self {
            timestamp,
            consumption,
            hour,
            day_of_week,
            is_weekend: day_of_week >= 5,
            date: timestamp.date(),
            rolling_24h: None,
            period: Period::from_hour(hour),
            is_anomaly: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peak_hours() {
        let peak: Vec<u32> = (0..24)
            .filter(|&h| Period::from_hour(h) == Period::Peak)
            .collect();
        assert_eq!(peak, (9..=18).collect::<Vec<u32>>());
        assert_eq!(Period::Peak.to_string(), "Peak");
        assert_eq!(Period::OffPeak.to_string(), "Off-Peak");
    }

    #[test]
    fn calendar() {
        // 2022-01-01 is a Saturday
        let ts = NaiveDate::from_ymd_opt(2022, 1, 1)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap();
        let record = HourlyRecord::new(ts, 2.5);
        assert_eq!(record.hour, 18);
        assert_eq!(record.day_of_week, 5);
        assert!(record.is_weekend);
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2022, 1, 1).unwrap());
        assert_eq!(record.period, Period::Peak);

        let monday = HourlyRecord::new(ts + chrono::Duration::days(2), 0.);
        assert_eq!(monday.day_of_week, 0);
        assert!(!monday.is_weekend);
    }

    #[test]
    fn rolling_window() {
        let values: Vec<f64> = (0..30).map(|k| k as f64).collect();
        let rolling = rolling_mean(&values, 24);
        assert_eq!(rolling.len(), 30);
        assert!(rolling[..23].iter().all(Option::is_none));
        assert_eq!(rolling[23], Some(11.5));
        assert_eq!(rolling[29], Some(17.5));
    }

    #[test]
    fn short_series_has_no_rolling_mean() {
        let rolling = rolling_mean(&[1., 2., 3.], 24);
        assert_eq!(rolling, vec![None, None, None]);
        assert_eq!(rolling_mean(&[1., 2.], 0), vec![None, None]);
    }
}

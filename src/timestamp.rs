use chrono::NaiveDateTime;

/// Layouts tried, in order, on the `"<date> <time>"` text
///
/// Slash dates are read month first.
pub const TIMESTAMP_FORMATS: [&str; 9] = [
    "%d %B %Y %H:%M:%S%.f",
    "%d %B %Y %H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S%.f",
    "%d-%B-%Y %H:%M:%S%.f",
];

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("unrecognized date and time: {0:?}")]
pub struct TimestampError(pub String);

/// Combines a date field and a time field into a single timestamp
pub fn parse_timestamp(date: &str, time: &str) -> Result<NaiveDateTime, TimestampError> {
    let text = format!("{} {}", date.trim(), time.trim());
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&text, format).ok())
        .ok_or(TimestampError(text))
}

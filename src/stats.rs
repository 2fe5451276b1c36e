//! Descriptive statistics over consumption samples

use itertools::{Itertools, MinMaxResult};

/// Arithmetic mean, `None` for an empty sample
pub fn mean(x: &[f64]) -> Option<f64> {
    if x.is_empty() {
        None
    } else {
        Some(x.iter().sum::<f64>() / x.len() as f64)
    }
}

/// Variance with `ddof` delta degrees of freedom
///
/// `ddof = 0` gives the population variance, `ddof = 1` the sample
/// variance. Returns `None` when the sample holds `ddof` values or less.
pub fn variance(x: &[f64], ddof: usize) -> Option<f64> {
    let n = x.len();
    if n <= ddof {
        return None;
    }
    let mean = mean(x)?;
    Some(x.iter().map(|x| x - mean).fold(0f64, |s, x| s + x * x) / (n - ddof) as f64)
}

/// Standard deviation with `ddof` delta degrees of freedom
pub fn std(x: &[f64], ddof: usize) -> Option<f64> {
    variance(x, ddof).map(f64::sqrt)
}

pub fn minmax(x: &[f64]) -> Option<(f64, f64)> {
    match x.iter().cloned().minmax_by(|a, b| a.total_cmp(b)) {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(v) => Some((v, v)),
        MinMaxResult::MinMax(min, max) => Some((min, max)),
    }
}

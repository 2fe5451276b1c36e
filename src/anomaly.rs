use crate::stats;

/// Static outlier cutoff at `mean + n_sigma · std`
///
/// The threshold is computed once over the whole series, zero-filled
/// buckets included; a bucket is anomalous if it is strictly above it.
///
/// The default standard deviation is the sample estimator (`ddof = 1`),
/// the one pandas `Series.std()` uses, so thresholds agree with pandas
/// based analyses; `ddof(0)` gives the population estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnomalyFlagger {
    n_sigma: f64,
    ddof: usize,
}
impl Default for AnomalyFlagger {
    fn default() -> Self {
        Self {
            n_sigma: 3.,
            ddof: 1,
        }
    }
}
impl AnomalyFlagger {
    pub fn n_sigma(self, n_sigma: f64) -> Self {
        Self { n_sigma, ..self }
    }
    /// Delta degrees of freedom of the standard deviation (1: sample, 0: population)
    pub fn ddof(self, ddof: usize) -> Self {
        Self { ddof, ..self }
    }
    /// Returns the anomaly threshold, NaN if the series is too short
    pub fn threshold(&self, values: &[f64]) -> f64 {
        match (stats::mean(values), stats::std(values, self.ddof)) {
            (Some(mean), Some(std)) => mean + self.n_sigma * std,
            _ => f64::NAN,
        }
    }
    /// Flags the values above the threshold of the series
    pub fn flag(&self, values: &[f64]) -> Vec<bool> {
        let threshold = self.threshold(values);
        values.iter().map(|&v| v > threshold).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn spiky() -> Vec<f64> {
        let mut values: Vec<f64> = (0..48).map(|k| 1. + (k % 3) as f64 * 0.1).collect();
        values[30] = 25.;
        values
    }

    #[test]
    fn single_spike() {
        let flags = AnomalyFlagger::default().flag(&spiky());
        let flagged: Vec<_> = flags.iter().positions(|&f| f).collect();
        assert_eq!(flagged, vec![30]);
    }

    #[test]
    fn threshold_is_global() {
        let values = spiky();
        let flagger = AnomalyFlagger::default();
        let threshold = flagger.threshold(&values);
        let mean = stats::mean(&values).unwrap();
        let std = stats::std(&values, 1).unwrap();
        assert!((threshold - (mean + 3. * std)).abs() < 1e-12);

        // nudging an ordinary value leaves every other flag untouched
        let mut nudged = values.clone();
        nudged[5] += 0.05;
        let before = flagger.flag(&values);
        let after = flagger.flag(&nudged);
        assert_eq!(before, after);
    }

    #[test]
    fn strictly_above() {
        // two samples: mean 1, population std 1, threshold 1 + 1·1 = 2
        let flagger = AnomalyFlagger::default().n_sigma(1.).ddof(0);
        assert_eq!(flagger.threshold(&[0., 2.]), 2.);
        assert_eq!(flagger.flag(&[0., 2.]), vec![false, false]);
    }

    #[test]
    fn too_short_for_a_threshold() {
        let flagger = AnomalyFlagger::default();
        assert!(flagger.threshold(&[4.]).is_nan());
        assert_eq!(flagger.flag(&[4.]), vec![false]);
    }
}

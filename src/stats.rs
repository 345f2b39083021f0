//! Small-sample statistics over monthly hour figures.

use serde::Serialize;

const MIN_RELIABLE_SAMPLE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Summary {
    pub mean: f64,
    pub std_dev: f64,
    pub count: usize,
}

/// Average of the finite, non-negative entries. Returns 0 when none qualify.
pub fn mean(values: &[f64]) -> f64 {
    let (sum, count) = values
        .iter()
        .filter(|v| v.is_finite() && **v >= 0.0)
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Mean, population standard deviation and count over the positive finite entries.
pub fn stats(values: &[f64]) -> Summary {
    let positive: Vec<f64> = values
        .iter()
        .copied()
        .filter(|v| v.is_finite() && *v > 0.0)
        .collect();

    if positive.is_empty() {
        return Summary::default();
    }

    let count = positive.len();
    if count < MIN_RELIABLE_SAMPLE {
        log::debug!("stats: only {count} positive values, statistics are unreliable");
    }

    let n = count as f64;
    let mean = positive.iter().sum::<f64>() / n;
    let variance = positive.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

    Summary {
        mean,
        std_dev: variance.sqrt(),
        count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_is_zero() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[f64::NAN, -3.0]), 0.0);
    }

    #[test]
    fn mean_excludes_invalid_entries_but_keeps_zeros() {
        let value = mean(&[10.0, f64::NAN, 0.0, -5.0, 20.0]);
        assert!((value - 10.0).abs() < 1e-9);
    }

    #[test]
    fn stats_use_population_deviation_over_positive_values() {
        let summary = stats(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0, 0.0]);
        assert_eq!(summary.count, 8);
        assert!((summary.mean - 5.0).abs() < 1e-9);
        assert!((summary.std_dev - 2.0).abs() < 1e-9);
    }

    #[test]
    fn stats_of_nothing_positive_is_zeroed() {
        assert_eq!(stats(&[0.0, 0.0]), Summary::default());
    }

    #[test]
    fn stats_still_computes_small_samples() {
        let summary = stats(&[3.0, 5.0]);
        assert_eq!(summary.count, 2);
        assert!((summary.mean - 4.0).abs() < 1e-9);
        assert!((summary.std_dev - 1.0).abs() < 1e-9);
    }
}

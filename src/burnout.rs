//! Sustained high load measured against the clinician's own history.

use crate::config::BurnoutConfig;
use crate::stats;
use crate::tiers::{BurnoutTier, Detection, BURNOUT_LADDER};
use crate::window::{self, ReferenceMonth};

/// `min(baseline × multiplier, cap)` where the baseline is the mean of the
/// positive months up to and including the current one. `None` without a baseline.
pub fn high_load_threshold(series: &[f64], current: usize, config: &BurnoutConfig) -> Option<f64> {
    let elapsed = window::MonthWindow { start: 0, end: current }.values(series);
    let baseline = stats::stats(elapsed).mean;
    if baseline <= 0.0 {
        return None;
    }
    Some((baseline * config.threshold_multiplier).min(config.threshold_cap_hours))
}

pub fn detect(
    series: &[f64],
    reference: &ReferenceMonth,
    config: &BurnoutConfig,
) -> Detection<BurnoutTier> {
    let current = reference.month_index;
    if current + 1 < config.min_months {
        return Detection::none(BURNOUT_LADDER);
    }

    let Some(threshold) = high_load_threshold(series, current, config) else {
        return Detection::none(BURNOUT_LADDER);
    };

    let run = (0..=current)
        .rev()
        .take_while(|&month| window::value_at(series, month) >= threshold)
        .count() as u32;

    Detection::classify(BURNOUT_LADDER, run)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(month_index: usize) -> ReferenceMonth {
        ReferenceMonth::new(2025, month_index)
    }

    #[test]
    fn steady_load_never_flags() {
        let detection = detect(&[10.0, 10.0, 10.0, 10.0], &at(3), &BurnoutConfig::default());
        assert_eq!(detection.tier, BurnoutTier::None);
        assert_eq!(detection.penalty_points, 0);
    }

    #[test]
    fn two_high_months_is_caution() {
        let hours = [10.0, 10.0, 10.0, 20.0, 20.0];
        let threshold = high_load_threshold(&hours, 4, &BurnoutConfig::default()).unwrap();
        assert!((threshold - 17.5).abs() < 1e-9);

        let detection = detect(&hours, &at(4), &BurnoutConfig::default());
        assert_eq!(detection.consecutive_months, 2);
        assert_eq!(detection.tier, BurnoutTier::Caution);
        assert_eq!(detection.penalty_points, 3);
    }

    #[test]
    fn threshold_is_capped_for_very_busy_clinicians() {
        let hours = [50.0; 6];
        let threshold = high_load_threshold(&hours, 5, &BurnoutConfig::default()).unwrap();
        assert_eq!(threshold, 45.0);

        let detection = detect(&hours, &at(5), &BurnoutConfig::default());
        assert_eq!(detection.consecutive_months, 6);
        assert_eq!(detection.tier, BurnoutTier::Severe);
        assert_eq!(detection.penalty_points, 15);
    }

    #[test]
    fn scan_stops_at_first_quiet_month() {
        let hours = [50.0, 50.0, 10.0, 50.0, 50.0, 50.0];
        let detection = detect(&hours, &at(5), &BurnoutConfig::default());
        assert_eq!(detection.consecutive_months, 3);
        assert_eq!(detection.tier, BurnoutTier::Warning);
    }

    #[test]
    fn baseline_ignores_empty_months() {
        // Baseline is mean(8, 8, 20, 20) = 14, threshold 17.5.
        let hours = [0.0, 8.0, 8.0, 20.0, 20.0];
        let detection = detect(&hours, &at(4), &BurnoutConfig::default());
        assert_eq!(detection.consecutive_months, 2);
    }

    #[test]
    fn needs_three_months_of_data() {
        let detection = detect(&[40.0, 60.0], &at(1), &BurnoutConfig::default());
        assert_eq!(detection.tier, BurnoutTier::None);
        assert_eq!(detection.consecutive_months, 0);
    }

    #[test]
    fn all_zero_history_is_none() {
        let detection = detect(&[0.0; 5], &at(4), &BurnoutConfig::default());
        assert_eq!(detection.tier, BurnoutTier::None);
    }
}

//! Cohort-relative outlier detection: months where a clinician carried far
//! more hours than the rest of the active roster.

use crate::config::LoadBalanceConfig;
use crate::stats::{self, Summary};
use crate::tiers::{Detection, LoadTier, LOAD_LADDER};
use crate::window::{self, ReferenceMonth};

/// Per-month cohort statistics for months `0..=current`, computed once per pass.
#[derive(Debug, Clone, PartialEq)]
pub struct CohortMonths {
    summaries: Vec<Summary>,
}

impl CohortMonths {
    pub fn compute<'a, I>(cohort: I, reference: &ReferenceMonth) -> Self
    where
        I: IntoIterator<Item = &'a [f64]>,
    {
        let series: Vec<&[f64]> = cohort.into_iter().collect();
        let summaries = (0..=reference.month_index)
            .map(|month| {
                let hours: Vec<f64> = series
                    .iter()
                    .map(|s| window::value_at(s, month))
                    .collect();
                stats::stats(&hours)
            })
            .collect();

        Self { summaries }
    }

    pub fn month(&self, month: usize) -> Option<&Summary> {
        self.summaries.get(month)
    }

    /// `mean + k·σ` for the month, or `None` when the cohort is too small or flat to judge.
    pub fn outlier_threshold(&self, month: usize, config: &LoadBalanceConfig) -> Option<f64> {
        let summary = self.month(month)?;
        if summary.count < config.min_cohort || summary.std_dev == 0.0 {
            return None;
        }
        Some(summary.mean + config.sigma_multiplier * summary.std_dev)
    }
}

pub fn detect(
    series: &[f64],
    cohort: &CohortMonths,
    reference: &ReferenceMonth,
    config: &LoadBalanceConfig,
) -> Detection<LoadTier> {
    let current = reference.month_index;
    if current + 1 < config.min_months {
        return Detection::none(LOAD_LADDER);
    }

    let mut run = 0u32;
    for month in (0..=current).rev() {
        let Some(threshold) = cohort.outlier_threshold(month, config) else {
            break;
        };
        let hours = window::value_at(series, month);
        if hours > 0.0 && hours >= threshold {
            run += 1;
        } else {
            break;
        }
    }

    Detection::classify(LOAD_LADDER, run)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect_all(roster: &[Vec<f64>], month_index: usize) -> Vec<Detection<LoadTier>> {
        let reference = ReferenceMonth::new(2025, month_index);
        let cohort = CohortMonths::compute(roster.iter().map(Vec::as_slice), &reference);
        roster
            .iter()
            .map(|s| detect(s, &cohort, &reference, &LoadBalanceConfig::default()))
            .collect()
    }

    // Eight steady clinicians plus one carrying roughly triple the load.
    fn roster_with_outlier(outlier: Vec<f64>) -> Vec<Vec<f64>> {
        let mut roster = vec![vec![10.0; outlier.len()]; 8];
        roster[0] = vec![12.0; outlier.len()];
        roster.push(outlier);
        roster
    }

    #[test]
    fn sustained_outlier_is_flagged() {
        let roster = roster_with_outlier(vec![30.0; 4]);
        let detections = detect_all(&roster, 3);
        let outlier = detections.last().unwrap();
        assert_eq!(outlier.consecutive_months, 4);
        assert_eq!(outlier.tier, LoadTier::High);
        assert_eq!(outlier.penalty_points, 10);
        assert!(detections[..8].iter().all(|d| d.tier == LoadTier::None));
    }

    #[test]
    fn run_breaks_at_a_normal_month() {
        let roster = roster_with_outlier(vec![30.0, 10.0, 30.0, 30.0, 30.0]);
        let outlier = *detect_all(&roster, 4).last().unwrap();
        assert_eq!(outlier.consecutive_months, 3);
        assert_eq!(outlier.tier, LoadTier::Moderate);
        assert_eq!(outlier.penalty_points, 6);
    }

    #[test]
    fn two_positive_clinicians_are_too_few_to_judge() {
        let roster = vec![vec![5.0, 5.0, 5.0], vec![40.0, 40.0, 40.0], vec![0.0, 0.0, 0.0]];
        let detections = detect_all(&roster, 2);
        assert!(detections.iter().all(|d| d.tier == LoadTier::None && d.consecutive_months == 0));
    }

    #[test]
    fn flat_month_stops_the_scan() {
        let mut roster = roster_with_outlier(vec![30.0, 30.0, 30.0]);
        // Month 1 has no variance at all.
        for series in roster.iter_mut() {
            series[1] = 10.0;
        }
        let reference = ReferenceMonth::new(2025, 2);
        let cohort = CohortMonths::compute(roster.iter().map(Vec::as_slice), &reference);
        assert_eq!(cohort.outlier_threshold(1, &LoadBalanceConfig::default()), None);

        let outlier = *detect_all(&roster, 2).last().unwrap();
        assert_eq!(outlier.consecutive_months, 1);
        assert_eq!(outlier.tier, LoadTier::None);
    }

    #[test]
    fn january_alone_is_never_flagged() {
        let roster = roster_with_outlier(vec![30.0]);
        assert!(detect_all(&roster, 0).iter().all(|d| d.consecutive_months == 0));
    }

    #[test]
    fn cohort_excludes_empty_clinicians() {
        let roster = vec![vec![0.0], vec![10.0], vec![20.0], vec![30.0]];
        let cohort = CohortMonths::compute(roster.iter().map(Vec::as_slice), &ReferenceMonth::new(2025, 0));
        let summary = cohort.month(0).unwrap();
        assert_eq!(summary.count, 3);
        assert!((summary.mean - 20.0).abs() < 1e-9);
    }
}

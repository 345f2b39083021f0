//! Cohort-normalized assignment score.
//!
//! Each feature is min–max scaled against the whole cohort passed in, so a
//! score only means something relative to the roster it was computed with.
//! Higher scores mean a heavier current load and a weaker assignment fit.

use serde::Serialize;

use crate::config::ScoringConfig;
use crate::models::EnrichedClinician;

pub const MAX_SCORE: f64 = 100.0;

/// Cohort extremes used to scale every clinician's features.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Normalization {
    pub max_active_cases: f64,
    pub max_current_month: f64,
    pub max_six_month_average: f64,
    pub min_growth: f64,
    pub max_growth: f64,
}

impl Normalization {
    /// `baseline_max_active_cases` replaces the cohort's own maximum, keeping
    /// the scale fixed when active cases have been rescaled for a time window.
    pub fn from_cohort<'a, I>(cohort: I, baseline_max_active_cases: Option<u32>) -> Self
    where
        I: IntoIterator<Item = &'a EnrichedClinician>,
    {
        let cohort: Vec<&EnrichedClinician> = cohort.into_iter().collect();
        let max_active_cases = match baseline_max_active_cases {
            Some(baseline) => f64::from(baseline).max(1.0),
            None => max_floored(&cohort, |c| f64::from(c.scored_active_cases)),
        };

        let growth = cohort.iter().map(|c| c.features.growth_rate_percent);
        let (min_growth, max_growth) = if cohort.is_empty() {
            (0.0, 0.0)
        } else {
            growth.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), g| {
                (lo.min(g), hi.max(g))
            })
        };

        Self {
            max_active_cases,
            max_current_month: max_floored(&cohort, |c| c.features.current_month_hours),
            max_six_month_average: max_floored(&cohort, |c| c.features.six_month_average),
            min_growth,
            max_growth,
        }
    }

    pub fn growth(&self, growth_rate_percent: f64) -> f64 {
        let range = self.max_growth - self.min_growth;
        if range == 0.0 {
            return 0.0;
        }
        (growth_rate_percent - self.min_growth) / range
    }
}

fn max_floored(cohort: &[&EnrichedClinician], value: impl Fn(&EnrichedClinician) -> f64) -> f64 {
    cohort.iter().map(|c| value(c)).fold(1.0, f64::max)
}

/// The four scaled terms before weighting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Components {
    pub active_cases: f64,
    pub current_month: f64,
    pub six_month_average: f64,
    pub growth: f64,
}

impl Components {
    pub fn of(record: &EnrichedClinician, norm: &Normalization) -> Self {
        Self {
            active_cases: f64::from(record.scored_active_cases) / norm.max_active_cases,
            current_month: record.features.current_month_hours / norm.max_current_month,
            six_month_average: record.features.six_month_average / norm.max_six_month_average,
            growth: norm.growth(record.features.growth_rate_percent),
        }
    }
}

/// Weighted base score on a 0–100 scale, before penalties.
pub fn base_score(components: &Components, config: &ScoringConfig) -> f64 {
    let w = &config.weights;
    (w.active_cases * components.active_cases
        + w.current_month * components.current_month
        + w.six_month_average * components.six_month_average
        + w.growth * components.growth)
        * 100.0
}

pub fn final_score(base: f64, penalty_points: u32, config: &ScoringConfig) -> u32 {
    let cap = config.score_cap.min(MAX_SCORE);
    let total = (base + f64::from(penalty_points)).min(cap);
    total.max(0.0).round() as u32
}

/// `round(raw × sqrt(window / 2))`; two months is the unscaled baseline.
pub fn adjust_active_cases(raw: u32, window_months: u32) -> u32 {
    let factor = (f64::from(window_months) / 2.0).sqrt();
    (f64::from(raw) * factor).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Clinician, Features, Level};

    fn enriched(active_cases: u32, current: f64, average: f64, growth: f64) -> EnrichedClinician {
        EnrichedClinician {
            clinician: Clinician {
                identity: "Sam Okafor".to_string(),
                level: Level::Junior,
                monthly_hours: vec![current],
                active_cases,
            },
            scored_active_cases: active_cases,
            features: Features {
                current_month_hours: current,
                six_month_average: average,
                growth_rate_percent: growth,
                using_fallback: false,
            },
        }
    }

    #[test]
    fn maxima_are_floored_at_one() {
        let cohort = vec![enriched(0, 0.0, 0.0, 0.0), enriched(0, 0.5, 0.2, 0.0)];
        let norm = Normalization::from_cohort(&cohort, None);
        assert_eq!(norm.max_active_cases, 1.0);
        assert_eq!(norm.max_current_month, 1.0);
        assert_eq!(norm.max_six_month_average, 1.0);
        for record in &cohort {
            assert_eq!(Components::of(record, &norm).active_cases, 0.0);
        }
    }

    #[test]
    fn identical_growth_normalizes_to_zero() {
        let cohort = vec![enriched(3, 10.0, 10.0, 25.0), enriched(5, 20.0, 20.0, 25.0)];
        let norm = Normalization::from_cohort(&cohort, None);
        assert_eq!(norm.growth(25.0), 0.0);
    }

    #[test]
    fn growth_spans_cohort_range() {
        let cohort = vec![enriched(1, 1.0, 1.0, -50.0), enriched(1, 1.0, 1.0, 150.0)];
        let norm = Normalization::from_cohort(&cohort, None);
        assert_eq!(norm.growth(-50.0), 0.0);
        assert_eq!(norm.growth(150.0), 1.0);
        assert!((norm.growth(50.0) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn baseline_override_replaces_cohort_max() {
        let cohort = vec![enriched(24, 10.0, 10.0, 0.0), enriched(12, 10.0, 10.0, 0.0)];
        let norm = Normalization::from_cohort(&cohort, Some(20));
        assert_eq!(norm.max_active_cases, 20.0);
        assert_eq!(Normalization::from_cohort(&cohort, Some(0)).max_active_cases, 1.0);
    }

    #[test]
    fn top_clinician_without_penalties_scores_ninety() {
        let cohort = vec![enriched(20, 40.0, 40.0, 10.0), enriched(10, 20.0, 20.0, 10.0)];
        let norm = Normalization::from_cohort(&cohort, None);
        let base = base_score(&Components::of(&cohort[0], &norm), &ScoringConfig::default());
        assert!((base - 90.0).abs() < 1e-9);

        let base = base_score(&Components::of(&cohort[1], &norm), &ScoringConfig::default());
        assert!((base - 45.0).abs() < 1e-9);
    }

    #[test]
    fn final_score_is_capped_and_rounded() {
        let config = ScoringConfig::default();
        assert_eq!(final_score(90.0, 15, &config), 100);
        assert_eq!(final_score(44.5, 0, &config), 45);
        assert_eq!(final_score(44.49, 0, &config), 44);
        assert_eq!(final_score(0.0, 0, &config), 0);

        let loose = ScoringConfig {
            score_cap: 150.0,
            ..ScoringConfig::default()
        };
        assert_eq!(final_score(90.0, 15, &loose), 100);
    }

    #[test]
    fn window_rescales_active_cases() {
        assert_eq!(adjust_active_cases(10, 2), 10);
        assert_eq!(adjust_active_cases(10, 1), 7);
        assert_eq!(adjust_active_cases(10, 3), 12);
        assert_eq!(adjust_active_cases(0, 3), 0);
    }
}

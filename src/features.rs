//! Per-clinician features derived from their own monthly series.

use thiserror::Error;

use crate::config::{FallbackPolicy, ScoringConfig};
use crate::models::{Clinician, Features};
use crate::stats;
use crate::window::{self, ReferenceMonth};

const MONTHS_PER_YEAR: usize = 12;
const GROWTH_BASELINE_MONTHS: usize = 6;

#[derive(Error, Debug, PartialEq)]
pub enum FeatureError {
    #[error("{identity}: series has {len} months, more than one year")]
    MultiYearSeries { identity: String, len: usize },
}

/// Month treated as "current": the reference month, or the one before it
/// when the reference month looks unpopulated early in the calendar month.
pub fn effective_month(series: &[f64], reference: &ReferenceMonth, policy: &FallbackPolicy) -> (usize, bool) {
    let current = reference.month_index;
    let early = reference
        .day_of_month
        .is_some_and(|day| day <= policy.day_threshold);

    if early && current > 0 && window::value_at(series, current) < policy.min_hours {
        (current - 1, true)
    } else {
        (current, false)
    }
}

/// Percent change of `month` against the mean of up to six months before it.
pub fn growth_rate_percent(series: &[f64], month: usize) -> f64 {
    let value = window::value_at(series, month);
    let baseline = window::months_before(month, GROWTH_BASELINE_MONTHS)
        .map(|w| stats::mean(w.values(series)))
        .unwrap_or(0.0);

    if baseline == 0.0 {
        return if value > 0.0 { 100.0 } else { 0.0 };
    }
    (value - baseline) / baseline * 100.0
}

pub fn extract(
    clinician: &Clinician,
    reference: &ReferenceMonth,
    config: &ScoringConfig,
) -> Result<Features, FeatureError> {
    let series = &clinician.monthly_hours;
    if series.len() > MONTHS_PER_YEAR {
        return Err(FeatureError::MultiYearSeries {
            identity: clinician.identity.clone(),
            len: series.len(),
        });
    }

    let (month, using_fallback) = effective_month(series, reference, &config.fallback);
    if using_fallback {
        log::debug!(
            "features: {} month {} not populated yet, using month {}",
            clinician.identity,
            reference.month_index,
            month
        );
    }

    // Anchored at the true current month even when the fallback applies.
    let six_month_average =
        stats::mean(reference.last_n_months(config.trailing_months).values(series));

    Ok(Features {
        current_month_hours: window::value_at(series, month),
        six_month_average,
        growth_rate_percent: growth_rate_percent(series, month),
        using_fallback,
    })
}

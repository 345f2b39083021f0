use std::fmt::Write;

use crate::models::{Level, ScoredClinician};
use crate::ranking;
use crate::stats;
use crate::tiers::{BurnoutTier, LoadTier, TierLabel};
use crate::window::ReferenceMonth;

const TREND_MONTHS: usize = 3;

/// Cohort hours over the latest `months` against the block just before it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CohortTrend {
    pub recent_average: f64,
    pub previous_average: Option<f64>,
}

impl CohortTrend {
    pub fn change_percent(&self) -> Option<f64> {
        match self.previous_average {
            Some(previous) if previous > 0.0 => {
                Some((self.recent_average - previous) / previous * 100.0)
            }
            _ => None,
        }
    }
}

/// Average monthly cohort hours for the two comparison windows.
pub fn cohort_trend(scored: &[ScoredClinician], reference: &ReferenceMonth, months: usize) -> CohortTrend {
    let totals: Vec<f64> = (0..=reference.month_index)
        .map(|month| {
            scored
                .iter()
                .filter_map(|s| s.monthly_hours.get(month))
                .filter(|v| v.is_finite() && **v >= 0.0)
                .sum()
        })
        .collect();

    let (previous, recent) = reference.growth_comparison_windows(months);
    CohortTrend {
        recent_average: stats::mean(recent.values(&totals)),
        previous_average: previous.map(|w| stats::mean(w.values(&totals))),
    }
}

pub fn build_report(
    level: Option<Level>,
    reference: &ReferenceMonth,
    window_months: Option<u32>,
    scored: &[ScoredClinician],
) -> String {
    let recommended = ranking::recommend(scored, level);

    let mut output = String::new();
    let level_label = level.map_or("all levels", |l| l.as_str());

    let _ = writeln!(output, "# Clinician Assignment Report");
    let _ = writeln!(
        output,
        "Generated for {} ({}-{:02}, active-case window {})",
        level_label,
        reference.year,
        reference.month_index + 1,
        window_months.map_or("unscaled".to_string(), |m| format!("{m} months"))
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Recommended Assignments");

    if recommended.is_empty() {
        let _ = writeln!(output, "No clinicians at this level.");
    } else {
        for s in &recommended {
            let _ = writeln!(
                output,
                "- {} ({}) score {} [{} / {}], {} active cases, {:.1}h this month, {:.1}h six-month avg, growth {:+.0}%",
                s.identity,
                s.level,
                s.final_score,
                s.recommendation.label(),
                s.recommendation.color(),
                s.active_cases,
                s.features.current_month_hours,
                s.features.six_month_average,
                s.features.growth_rate_percent
            );
        }
    }

    let burnout: Vec<&ScoredClinician> = recommended
        .iter()
        .filter(|s| s.burnout.tier != BurnoutTier::None)
        .collect();
    let _ = writeln!(output);
    let _ = writeln!(output, "## Burnout Flags");
    if burnout.is_empty() {
        let _ = writeln!(output, "No sustained high-load runs.");
    } else {
        for s in burnout {
            let _ = writeln!(
                output,
                "- {}: {} ({} consecutive months, +{} points)",
                s.identity,
                s.burnout.tier.label(),
                s.burnout.consecutive_months,
                s.burnout.penalty_points
            );
        }
    }

    let outliers: Vec<&ScoredClinician> = recommended
        .iter()
        .filter(|s| s.load_balancing.tier != LoadTier::None)
        .collect();
    let _ = writeln!(output);
    let _ = writeln!(output, "## Load Balancing Flags");
    if outliers.is_empty() {
        let _ = writeln!(output, "No clinicians above the cohort spread.");
    } else {
        for s in outliers {
            let _ = writeln!(
                output,
                "- {}: {} ({} consecutive months, +{} points)",
                s.identity,
                s.load_balancing.tier.label(),
                s.load_balancing.consecutive_months,
                s.load_balancing.penalty_points
            );
        }
    }

    let fallbacks: Vec<&str> = recommended
        .iter()
        .filter(|s| s.features.using_fallback)
        .map(|s| s.identity.as_str())
        .collect();
    if !fallbacks.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(
            output,
            "Current month not populated yet for {}; previous month used.",
            fallbacks.join(", ")
        );
    }

    // Trend covers the whole roster, not just the filtered level.
    let trend = cohort_trend(scored, reference, TREND_MONTHS);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Cohort Trend");
    match trend.change_percent() {
        Some(change) => {
            let _ = writeln!(
                output,
                "Last {TREND_MONTHS} months averaged {:.1}h per month across the roster ({:+.1}% vs the {TREND_MONTHS} months before).",
                trend.recent_average, change
            );
        }
        None => {
            let _ = writeln!(
                output,
                "Last {TREND_MONTHS} months averaged {:.1}h per month across the roster; not enough history to compare.",
                trend.recent_average
            );
        }
    }

    output
}

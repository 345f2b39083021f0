//! One full scoring pass over a roster.
//!
//! Cohort figures (per-month load statistics, normalization extremes) are
//! gathered first, then every clinician is scored against them. Nothing is
//! cached between passes.

use serde::Serialize;

use crate::burnout;
use crate::config::ScoringConfig;
use crate::features;
use crate::load_balance::{self, CohortMonths};
use crate::models::{Clinician, EnrichedClinician, Features, Recommendation, ScoredClinician};
use crate::score::{self, Components, Normalization};
use crate::tiers::{Detection, BURNOUT_LADDER, LOAD_LADDER};
use crate::window::ReferenceMonth;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringContext {
    pub reference: ReferenceMonth,
    /// Active-case window in months (1–3). `None` scores raw counts.
    pub window_months: Option<u32>,
}

impl ScoringContext {
    pub fn new(reference: ReferenceMonth) -> Self {
        Self {
            reference,
            window_months: None,
        }
    }

    pub fn with_window(mut self, months: u32) -> Self {
        self.window_months = Some(months.clamp(1, 3));
        self
    }
}

/// Scores every clinician against the full roster. Output keeps input order.
pub fn score_roster(
    roster: &[Clinician],
    context: &ScoringContext,
    config: &ScoringConfig,
) -> Vec<ScoredClinician> {
    let reference = &context.reference;

    let prepared: Vec<(EnrichedClinician, bool)> = roster
        .iter()
        .map(|clinician| {
            let (features, healthy) = match features::extract(clinician, reference, config) {
                Ok(features) => (features, true),
                Err(err) => {
                    log::warn!("pipeline: {err}; scoring with neutral features");
                    (Features::default(), false)
                }
            };
            let scored_active_cases = match context.window_months {
                Some(window) => score::adjust_active_cases(clinician.active_cases, window),
                None => clinician.active_cases,
            };
            let record = EnrichedClinician {
                clinician: clinician.clone(),
                scored_active_cases,
                features,
            };
            (record, healthy)
        })
        .collect();

    // Failed records are scored but never shape the cohort figures.
    let cohort_records: Vec<&EnrichedClinician> = prepared
        .iter()
        .filter(|(_, healthy)| *healthy)
        .map(|(record, _)| record)
        .collect();

    // Captured before rescaling so the window shifts relative standing.
    let baseline_max_active_cases = context.window_months.map(|_| {
        cohort_records
            .iter()
            .map(|r| r.clinician.active_cases)
            .max()
            .unwrap_or(0)
    });

    let cohort = CohortMonths::compute(
        cohort_records
            .iter()
            .map(|r| r.clinician.monthly_hours.as_slice()),
        reference,
    );
    let norm =
        Normalization::from_cohort(cohort_records.iter().copied(), baseline_max_active_cases);

    let scored: Vec<ScoredClinician> = prepared
        .iter()
        .map(|(record, healthy)| {
            let series = record.clinician.monthly_hours.as_slice();
            let (burnout, load_balancing) = if *healthy {
                (
                    burnout::detect(series, reference, &config.burnout),
                    load_balance::detect(series, &cohort, reference, &config.load_balance),
                )
            } else {
                (Detection::none(BURNOUT_LADDER), Detection::none(LOAD_LADDER))
            };

            let base = score::base_score(&Components::of(record, &norm), config);
            let final_score = score::final_score(
                base,
                burnout.penalty_points + load_balancing.penalty_points,
                config,
            );

            ScoredClinician {
                identity: record.clinician.identity.clone(),
                level: record.clinician.level,
                active_cases: record.scored_active_cases,
                monthly_hours: record.clinician.monthly_hours.clone(),
                features: record.features,
                burnout,
                load_balancing,
                final_score,
                recommendation: Recommendation::from_score(final_score),
            }
        })
        .collect();

    log::debug!(
        "pipeline: scored {} clinicians for {}-{:02} (window {:?})",
        scored.len(),
        reference.year,
        reference.month_index + 1,
        context.window_months
    );

    scored
}

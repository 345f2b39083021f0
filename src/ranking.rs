use crate::models::{Level, ScoredClinician};

/// Lowest score first. Ties keep their roster order.
pub fn rank(scored: &[ScoredClinician]) -> Vec<ScoredClinician> {
    let mut ranked = scored.to_vec();
    ranked.sort_by_key(|s| s.final_score);
    ranked
}

/// View over an already-scored roster. Never filter before scoring: scores
/// are relative to the whole cohort.
pub fn filter_by_level(scored: &[ScoredClinician], level: Option<Level>) -> Vec<ScoredClinician> {
    scored
        .iter()
        .filter(|s| level.map_or(true, |wanted| s.level == wanted))
        .cloned()
        .collect()
}

pub fn recommend(scored: &[ScoredClinician], level: Option<Level>) -> Vec<ScoredClinician> {
    rank(&filter_by_level(scored, level))
}

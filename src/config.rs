use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::score::MAX_SCORE;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scoring: ScoringConfig,
    pub aggregation: AggregationConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.scoring.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: ScoreWeights,
    pub fallback: FallbackPolicy,
    pub burnout: BurnoutConfig,
    pub load_balance: LoadBalanceConfig,
    pub trailing_months: usize,
    pub score_cap: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            fallback: FallbackPolicy::default(),
            burnout: BurnoutConfig::default(),
            load_balance: LoadBalanceConfig::default(),
            trailing_months: 6,
            score_cap: 100.0,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights.validate()?;
        if !(1..=31).contains(&self.fallback.day_threshold) {
            return Err(ConfigError::FallbackDay(self.fallback.day_threshold));
        }
        let positives = [
            ("burnout.threshold_multiplier", self.burnout.threshold_multiplier),
            ("burnout.threshold_cap_hours", self.burnout.threshold_cap_hours),
            ("load_balance.sigma_multiplier", self.load_balance.sigma_multiplier),
            ("trailing_months", self.trailing_months as f64),
        ];
        for (name, value) in positives {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        if !(self.score_cap > 0.0 && self.score_cap <= MAX_SCORE) {
            return Err(ConfigError::ScoreCap(self.score_cap));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub active_cases: f64,
    pub current_month: f64,
    pub six_month_average: f64,
    pub growth: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            active_cases: 0.30,
            current_month: 0.30,
            six_month_average: 0.30,
            growth: 0.10,
        }
    }
}

impl ScoreWeights {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let named = [
            ("active_cases", self.active_cases),
            ("current_month", self.current_month),
            ("six_month_average", self.six_month_average),
            ("growth", self.growth),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }
        let sum: f64 = named.iter().map(|(_, v)| v).sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ConfigError::WeightSum(sum));
        }
        Ok(())
    }
}

/// When to treat the current month as not yet populated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackPolicy {
    pub day_threshold: u32,
    pub min_hours: f64,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            day_threshold: 7,
            min_hours: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurnoutConfig {
    /// Months of data required before detection runs.
    pub min_months: usize,
    pub threshold_multiplier: f64,
    pub threshold_cap_hours: f64,
}

impl Default for BurnoutConfig {
    fn default() -> Self {
        Self {
            min_months: 3,
            threshold_multiplier: 1.25,
            threshold_cap_hours: 45.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadBalanceConfig {
    pub min_months: usize,
    pub sigma_multiplier: f64,
    pub min_cohort: usize,
}

impl Default for LoadBalanceConfig {
    fn default() -> Self {
        Self {
            min_months: 2,
            sigma_multiplier: 1.5,
            min_cohort: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Clinicians to keep. Empty keeps everyone in the export.
    pub current_clinicians: Vec<String>,
    pub clinical_types: Vec<String>,
    pub active_case_days: i64,
    pub active_clinician_days: i64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            current_clinicians: Vec::new(),
            clinical_types: DEFAULT_CLINICAL_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            active_case_days: 60,
            active_clinician_days: 90,
        }
    }
}

const DEFAULT_CLINICAL_TYPES: &[&str] = &[
    "Wellbeing Individual Check-In",
    "Wellbeing Individual Counselling Session",
    "Couples Counselling",
    "Crisis",
    "Groupwork",
    "Client Contact",
    "Communication (External)",
    "Communication (Internal)",
    "Communication (Respondent)",
    "Accompaniment (Faculty/HRP)",
    "Accompaniment (Medical)",
    "Accompaniment (NUS Adjudication)",
    "Accompaniment (NUS Investigation)",
    "Accompaniment (Other)",
    "Accompaniment (Police)",
    "MHRTW-Accompaniment",
    "MHRTW-Communication",
];

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::LoadError;
use crate::tiers::{BurnoutTier, Detection, LoadTier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Junior,
    Senior,
    Lead,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Junior => "junior",
            Level::Senior => "senior",
            Level::Lead => "lead",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "junior" => Ok(Level::Junior),
            "senior" => Ok(Level::Senior),
            "lead" => Ok(Level::Lead),
            _ => Err(LoadError::UnknownLevel(s.to_string())),
        }
    }
}

/// One roster row as handed over by the data loader.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Clinician {
    pub identity: String,
    pub level: Level,
    /// Index 0 is January of the reference year.
    pub monthly_hours: Vec<f64>,
    pub active_cases: u32,
}

/// Per-clinician features derived from the monthly series.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Features {
    pub current_month_hours: f64,
    pub six_month_average: f64,
    pub growth_rate_percent: f64,
    pub using_fallback: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedClinician {
    pub clinician: Clinician,
    /// Active cases after the optional window rescale; this is what gets scored.
    pub scored_active_cases: u32,
    pub features: Features,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    High,
    Medium,
    Low,
}

impl Recommendation {
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=40 => Recommendation::High,
            41..=70 => Recommendation::Medium,
            _ => Recommendation::Low,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Recommendation::High => "green",
            Recommendation::Medium => "yellow",
            Recommendation::Low => "red",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::High => "high",
            Recommendation::Medium => "medium",
            Recommendation::Low => "low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredClinician {
    pub identity: String,
    pub level: Level,
    pub active_cases: u32,
    pub monthly_hours: Vec<f64>,
    #[serde(flatten)]
    pub features: Features,
    pub burnout: Detection<BurnoutTier>,
    pub load_balancing: Detection<LoadTier>,
    pub final_score: u32,
    pub recommendation: Recommendation,
}

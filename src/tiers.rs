//! Run-length → tier → penalty ladders shared by the two detectors.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BurnoutTier {
    None,
    Caution,
    Warning,
    Severe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadTier {
    None,
    Low,
    Moderate,
    High,
}

pub trait TierLabel {
    fn label(&self) -> &'static str;
}

impl TierLabel for BurnoutTier {
    fn label(&self) -> &'static str {
        match self {
            BurnoutTier::None => "none",
            BurnoutTier::Caution => "caution",
            BurnoutTier::Warning => "warning",
            BurnoutTier::Severe => "severe",
        }
    }
}

impl TierLabel for LoadTier {
    fn label(&self) -> &'static str {
        match self {
            LoadTier::None => "none",
            LoadTier::Low => "low",
            LoadTier::Moderate => "moderate",
            LoadTier::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Rung<T> {
    pub min_months: u32,
    pub tier: T,
    pub penalty: u32,
}

/// Ordered by `min_months`, ascending. The first rung must start at 0.
pub const BURNOUT_LADDER: &[Rung<BurnoutTier>] = &[
    Rung { min_months: 0, tier: BurnoutTier::None, penalty: 0 },
    Rung { min_months: 2, tier: BurnoutTier::Caution, penalty: 3 },
    Rung { min_months: 3, tier: BurnoutTier::Warning, penalty: 10 },
    Rung { min_months: 4, tier: BurnoutTier::Severe, penalty: 15 },
];

pub const LOAD_LADDER: &[Rung<LoadTier>] = &[
    Rung { min_months: 0, tier: LoadTier::None, penalty: 0 },
    Rung { min_months: 2, tier: LoadTier::Low, penalty: 3 },
    Rung { min_months: 3, tier: LoadTier::Moderate, penalty: 6 },
    Rung { min_months: 4, tier: LoadTier::High, penalty: 10 },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Detection<T> {
    pub consecutive_months: u32,
    pub tier: T,
    pub penalty_points: u32,
}

impl<T: Copy> Detection<T> {
    /// Tier and penalty of the highest rung the run reaches.
    pub fn classify(ladder: &[Rung<T>], consecutive_months: u32) -> Self {
        let rung = ladder
            .iter()
            .rev()
            .find(|rung| consecutive_months >= rung.min_months)
            .unwrap_or(&ladder[0]);

        Self {
            consecutive_months,
            tier: rung.tier,
            penalty_points: rung.penalty,
        }
    }

    pub fn none(ladder: &[Rung<T>]) -> Self {
        Self::classify(ladder, 0)
    }
}

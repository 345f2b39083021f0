use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Required column '{0}' not found")]
    MissingColumn(String),

    #[error("Unknown clinician level '{0}' (expected junior, senior or lead)")]
    UnknownLevel(String),
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Score weights must sum to 1.0, got {0}")]
    WeightSum(f64),

    #[error("Weight '{name}' must be finite and non-negative, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("Fallback day threshold must be between 1 and 31, got {0}")]
    FallbackDay(u32),

    #[error("'{name}' must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("Score cap must be above 0 and at most 100, got {0}")]
    ScoreCap(f64),
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Structural problems found in a time series
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    #[error("Row {step} was never written")]
    Gap { step: usize },

    #[error("Row {step} is out of order (holds t = {found})")]
    OutOfOrder { step: usize, found: usize },

    #[error("Non-finite value in column `{column}` at row {step}")]
    NotFinite { column: &'static str, step: usize },

    #[error("Crossed quote at row {step}: bid {bid} >= ask {ask}")]
    Crossed { step: usize, bid: f64, ask: f64 },

    #[error("Row {step} is outside a series of length {len}")]
    OutOfRange { step: usize, len: usize },

    #[error("Optional column `{column}` is missing at row {step}")]
    MissingColumn { column: &'static str, step: usize },
}

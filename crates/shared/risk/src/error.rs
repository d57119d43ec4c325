use thiserror::Error;

/// Errors raised while evaluating a finished run
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KpiError {
    #[error("Invalid horizon: {horizon_seconds} s at dt = {dt_seconds} s is less than one step")]
    InvalidHorizon {
        horizon_seconds: f64,
        dt_seconds: f64,
    },

    #[error("Insufficient data: need more than {required} rows, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid confidence level {0}: must be in (0, 1)")]
    InvalidLevel(f64),
}

pub type Result<T> = std::result::Result<T, KpiError>;

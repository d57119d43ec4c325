use std::path::PathBuf;

use mmsim_core::{ConfigError, SeriesError};
use mmsim_risk::KpiError;
use thiserror::Error;

/// Errors raised while running, evaluating or persisting a simulation
#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("KPI evaluation failed: {0}")]
    Kpi(#[from] KpiError),

    #[error("Time series invariant violated: {0}")]
    Series(#[from] SeriesError),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error in {path}: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl SimulationError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SimulationError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn serialization(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        SimulationError::Serialization {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;

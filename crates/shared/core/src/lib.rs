//! Market-Making Simulator Core Domain
//!
//! Pure domain types shared by every other crate.
//! This crate contains no randomness, no async, and only the I/O needed to
//! read a configuration file.

pub mod config;
pub mod entities;
pub mod error;
pub mod timeseries;
pub mod values;

// Re-export commonly used types at crate root
pub use config::{
    FillProbability, HeuristicParams, PolicyKind, PriceModel, SimulationConfig, TauMode,
    load_config, load_config_from_str,
};
pub use entities::{Side, Trade};
pub use error::{ConfigError, SeriesError};
pub use timeseries::{TimeSeries, TimeSeriesRow};
pub use values::{Price, Quantity, Step};

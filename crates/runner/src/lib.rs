//! Market-Making Simulation Runner
//!
//! Drives the simulator end to end:
//!
//! - **Engine**: one seeded run of price path → quotes → fills → state
//! - **Evaluation**: trade KPIs and horizon VaR of a finished run
//! - **Persistence**: run directories (config, time series, trades, summary)
//! - **Scenarios**: market regime × risk-aversion grid run in parallel
//!
//! ## Architecture
//!
//! ```text
//!   SimulationConfig
//!          │
//!          ▼
//! ┌──────────────────────────────────────────────┐
//! │               SimulationEngine               │
//! │                                              │
//! │  PriceProcessGenerator ──► QuotingPolicy     │
//! │                                 │            │
//! │                                 ▼            │
//! │              RunState ◄──── FillModel        │
//! └─────────────────┬────────────────────────────┘
//!                   │ SimulationOutput
//!                   ▼
//!            KPI evaluation ──► RunStore
//! ```

pub mod engine;
pub mod error;
pub mod persistence;
pub mod scenarios;

pub use engine::{SimulationEngine, SimulationOutput, evaluate, run_simulation};
pub use error::{Result, SimulationError};
pub use persistence::{Manifest, RunStore, StoredRun};
pub use scenarios::{
    EXPERIMENT_SUMMARY_FILE, GridResult, GridRun, Scenario, ScenarioGrid, run_grid, sub_seed,
};

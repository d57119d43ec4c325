//! Run Evaluation
//!
//! Consumes a finished time series and trade log:
//!
//! - adverse-selection rate and markout at a step horizon
//! - horizon Value-at-Risk from interpolated quantiles
//! - [`KpiSummary`], the flat per-run report

pub mod adverse;
pub mod error;
pub mod quantile;
pub mod summary;
pub mod var;

pub use adverse::{adverse_selection_rate, compute_markouts, mean_markout};
pub use error::{KpiError, Result};
pub use quantile::{quantile_sorted, sorted_finite};
pub use summary::{KpiSummary, compute_kpis};
pub use var::{HorizonVar, VarEstimate, compute_var, horizon_steps, horizon_var, var_key};

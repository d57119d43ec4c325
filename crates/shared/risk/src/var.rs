//! Horizon Value-at-Risk
//!
//! Historical VaR of holding the recorded inventory for `h` steps:
//!
//! shock(t) = inventory(t) × (mid(t + h) − mid(t))
//! VaR_L    = −quantile(shock, 1 − L)
//!
//! Positive VaR is a loss. Quantiles are linearly interpolated.

use std::collections::BTreeMap;

use mmsim_core::{Price, Quantity, TimeSeries};
use serde::{Deserialize, Serialize};

use crate::error::{KpiError, Result};
use crate::quantile::{quantile_sorted, sorted_finite};

/// VaR at one confidence level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VarEstimate {
    pub level: f64,
    pub value: f64,
}

impl VarEstimate {
    /// Summary key for this level: `var_95`, `var_99`, `var_97.5`
    pub fn key(&self) -> String {
        var_key(self.level)
    }
}

/// VaR estimates for one holding horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorizonVar {
    pub horizon_steps: usize,
    pub estimates: Vec<VarEstimate>,
}

impl HorizonVar {
    /// VaR at `level`, if it was requested
    pub fn get(&self, level: f64) -> Option<f64> {
        self.estimates
            .iter()
            .find(|e| (e.level - level).abs() < 1e-12)
            .map(|e| e.value)
    }

    /// Estimates keyed by [`var_key`]
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.estimates.iter().map(|e| (e.key(), e.value)).collect()
    }
}

/// Format a confidence level as a summary key
pub fn var_key(level: f64) -> String {
    // strip float noise such as 0.95 * 100 = 95.00000000000001
    let percent = (level * 100.0 * 1e6).round() / 1e6;
    format!("var_{percent}")
}

/// Convert a horizon in seconds to whole steps
pub fn horizon_steps(horizon_seconds: f64, dt_seconds: f64) -> Result<usize> {
    let invalid = KpiError::InvalidHorizon {
        horizon_seconds,
        dt_seconds,
    };
    if !(dt_seconds.is_finite() && dt_seconds > 0.0) {
        return Err(invalid);
    }
    let steps = (horizon_seconds / dt_seconds).round();
    if !steps.is_finite() || steps < 1.0 {
        return Err(invalid);
    }
    Ok(steps as usize)
}

/// Horizon VaR over `(mid, inventory)` columns
pub fn horizon_var(
    mids: &[Price],
    inventory: &[Quantity],
    horizon_steps: usize,
    levels: &[f64],
) -> Result<HorizonVar> {
    if horizon_steps < 1 {
        return Err(KpiError::InvalidHorizon {
            horizon_seconds: 0.0,
            dt_seconds: 0.0,
        });
    }
    let available = mids.len().min(inventory.len());
    if available <= horizon_steps {
        return Err(KpiError::InsufficientData {
            required: horizon_steps,
            available,
        });
    }
    if let Some(bad) = levels.iter().find(|l| !(**l > 0.0 && **l < 1.0)) {
        return Err(KpiError::InvalidLevel(*bad));
    }

    let shocks: Vec<f64> = (0..available - horizon_steps)
        .map(|t| inventory[t] * (mids[t + horizon_steps] - mids[t]))
        .collect();
    let sorted = sorted_finite(&shocks);

    let estimates = levels
        .iter()
        .map(|&level| VarEstimate {
            level,
            value: -quantile_sorted(&sorted, 1.0 - level),
        })
        .collect();

    Ok(HorizonVar {
        horizon_steps,
        estimates,
    })
}

/// Horizon VaR of a finished run
///
/// Fails if the horizon rounds to less than one step or the series is not
/// longer than the horizon.
pub fn compute_var(
    timeseries: &TimeSeries,
    horizon_seconds: f64,
    dt_seconds: f64,
    levels: &[f64],
) -> Result<HorizonVar> {
    let steps = horizon_steps(horizon_seconds, dt_seconds)?;
    horizon_var(timeseries.mid(), timeseries.inventory(), steps, levels)
}

//! Run summary

use std::collections::BTreeMap;

use mmsim_core::{Quantity, Side, TimeSeries, Trade};
use serde::{Deserialize, Serialize};

use crate::adverse::{adverse_selection_rate, mean_markout};
use crate::var::HorizonVar;

/// Key performance indicators of one finished run
///
/// Serializes to a flat object; VaR entries appear as `var_95`, `var_99`, ...
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub final_pnl: f64,
    pub final_inventory: Quantity,
    pub n_trades: usize,
    /// `None` when no trade has a future mid inside the series
    pub adverse_selection_rate: Option<f64>,
    pub n_buys: usize,
    pub n_sells: usize,
    pub max_abs_inventory: Quantity,
    pub mean_markout: Option<f64>,
    /// Steps where the policy quote was crossed and replaced
    #[serde(default)]
    pub fallback_quotes: usize,
    #[serde(flatten)]
    pub var: BTreeMap<String, f64>,
}

impl KpiSummary {
    /// Attach horizon VaR estimates
    pub fn with_var(mut self, var: &HorizonVar) -> Self {
        self.var.extend(var.to_map());
        self
    }

    /// Set the fallback quote count
    pub fn with_fallback_quotes(mut self, count: usize) -> Self {
        self.fallback_quotes = count;
        self
    }

    /// VaR at a confidence level, if it was computed
    pub fn var_at(&self, level: f64) -> Option<f64> {
        self.var.get(&crate::var::var_key(level)).copied()
    }
}

/// Trade-level KPIs of a finished run
///
/// `horizon_steps` is the adverse-selection / markout horizon. VaR is added
/// separately with [`KpiSummary::with_var`].
pub fn compute_kpis(
    timeseries: &TimeSeries,
    trades: &[Trade],
    final_pnl: f64,
    final_inventory: Quantity,
    horizon_steps: usize,
) -> KpiSummary {
    let mids = timeseries.mid();
    let n_buys = trades.iter().filter(|t| t.side == Side::Buy).count();

    let summary = KpiSummary {
        final_pnl,
        final_inventory,
        n_trades: trades.len(),
        adverse_selection_rate: adverse_selection_rate(mids, trades, horizon_steps),
        n_buys,
        n_sells: trades.len() - n_buys,
        max_abs_inventory: timeseries.max_abs_inventory(),
        mean_markout: mean_markout(mids, trades, horizon_steps),
        fallback_quotes: 0,
        var: BTreeMap::new(),
    };
    log::debug!(
        "kpis: pnl={:.4}, inventory={}, trades={} ({} buys / {} sells), adverse={:?}",
        summary.final_pnl,
        summary.final_inventory,
        summary.n_trades,
        summary.n_buys,
        summary.n_sells,
        summary.adverse_selection_rate
    );
    summary
}

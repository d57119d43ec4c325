//! Post-trade price moves
//!
//! Every fill is compared with the mid `h` steps later. Fills whose future
//! mid falls past the end of the series are left out.
//!
//! - buy is adverse when the mid ends below the fill price
//! - sell is adverse when the mid ends above it

use mmsim_core::{Price, Trade};

/// Mid price `horizon_steps` after the trade, if still inside the series
fn future_mid(mids: &[Price], trade: &Trade, horizon_steps: usize) -> Option<Price> {
    let step = trade.t.checked_add(horizon_steps)?;
    mids.get(step).copied()
}

/// Share of evaluable trades that were adverse, in [0, 1]
///
/// `None` when no trade has a future mid in range.
pub fn adverse_selection_rate(
    mids: &[Price],
    trades: &[Trade],
    horizon_steps: usize,
) -> Option<f64> {
    let (adverse, total) = trades
        .iter()
        .filter_map(|trade| future_mid(mids, trade, horizon_steps).map(|f| trade.is_adverse(f)))
        .fold((0usize, 0usize), |(adverse, total), is_adverse| {
            (adverse + usize::from(is_adverse), total + 1)
        });
    if total == 0 {
        None
    } else {
        Some(adverse as f64 / total as f64)
    }
}

/// Per-trade markout at the horizon, evaluable trades only, in trade order
pub fn compute_markouts(mids: &[Price], trades: &[Trade], horizon_steps: usize) -> Vec<f64> {
    trades
        .iter()
        .filter_map(|trade| future_mid(mids, trade, horizon_steps).map(|f| trade.markout(f)))
        .collect()
}

/// Mean markout, `None` when no trade is evaluable
pub fn mean_markout(mids: &[Price], trades: &[Trade], horizon_steps: usize) -> Option<f64> {
    let markouts = compute_markouts(mids, trades, horizon_steps);
    if markouts.is_empty() {
        None
    } else {
        Some(markouts.iter().sum::<f64>() / markouts.len() as f64)
    }
}

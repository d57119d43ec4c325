//! Heuristic Spread/Skew Model
//!
//! Volatility-widened spread, shifted by inventory.
//!
//! Long inventory  → Quotes shift DOWN → Encourage selling
//! Short inventory → Quotes shift UP → Encourage buying

use crate::protocol::{QuoteContext, QuotingModel};
use crate::quote::Quote;
use mmsim_core::{ConfigError, HeuristicParams, SimulationConfig};

/// Spread and skew model driven by a volatility estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicQuoter {
    params: HeuristicParams,
}

impl HeuristicQuoter {
    pub fn new(params: HeuristicParams) -> Result<Self, ConfigError> {
        let checks = [
            ("heuristic.base_half_spread_bps", params.base_half_spread_bps),
            ("heuristic.vol_widening_bps", params.vol_widening_bps),
        ];
        for (field, value) in checks {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::invalid(field, format!("must be >= 0, got {value}")));
            }
        }
        // negative skew is allowed: quotes then lean with the inventory
        if !params.inventory_skew_bps.is_finite() {
            return Err(ConfigError::invalid(
                "heuristic.inventory_skew_bps",
                "must be finite",
            ));
        }
        if !(params.seconds_per_year.is_finite() && params.seconds_per_year > 0.0) {
            return Err(ConfigError::invalid(
                "heuristic.seconds_per_year",
                format!("must be > 0, got {}", params.seconds_per_year),
            ));
        }
        Ok(Self { params })
    }

    pub fn from_config(config: &SimulationConfig) -> Result<Self, ConfigError> {
        Self::new(config.heuristic)
    }

    pub fn params(&self) -> &HeuristicParams {
        &self.params
    }

    /// Half-spread in price units
    ///
    /// (base + widening × vol) / 10_000 × mid
    pub fn half_spread(&self, mid: f64, volatility: f64) -> f64 {
        (self.params.base_half_spread_bps + self.params.vol_widening_bps * volatility) / 10_000.0
            * mid
    }

    /// Inventory skew in price units, positive when long
    pub fn skew(&self, mid: f64, inventory: f64) -> f64 {
        self.params.inventory_skew_bps / 10_000.0 * inventory * mid
    }
}

impl QuotingModel for HeuristicQuoter {
    fn compute_quote(&self, ctx: &QuoteContext) -> Quote {
        let half_spread = self.half_spread(ctx.mid, ctx.volatility);
        let skew = self.skew(ctx.mid, ctx.inventory);
        Quote::new(ctx.mid - half_spread - skew, ctx.mid + half_spread - skew)
    }

    fn name(&self) -> &str {
        "heuristic"
    }
}

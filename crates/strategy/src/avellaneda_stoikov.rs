//! Avellaneda-Stoikov Optimal Market Making
//!
//! From Avellaneda & Stoikov (2008):
//!
//! **Reservation Price** (where you'd be indifferent to trading):
//! r = mid − q × γ × σ² × τ
//!
//! Where:
//! - γ = risk aversion parameter
//! - q = current inventory (positive = long)
//! - σ = volatility of the mid price
//! - τ = time remaining to horizon
//!
//! **Optimal Total Spread**:
//! Δ = γσ²τ + (2/γ) × ln(1 + γ/k)
//!
//! Components:
//! - Volatility term (γσ²τ): Wider spreads in volatile markets
//! - Order-flow term: Compensation set by the arrival decay k
//!
//! Quotes are placed at r ± Δ/2.

use crate::protocol::{QuoteContext, QuotingModel};
use crate::quote::Quote;
use mmsim_core::{ConfigError, Price, Quantity, SimulationConfig};

/// Avellaneda-Stoikov configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ASConfig {
    /// Risk aversion parameter γ
    /// Higher = more conservative quotes
    pub gamma: f64,
    /// Arrival intensity decay k
    pub k: f64,
    /// Mid-price volatility σ, same units as the price process
    pub sigma: f64,
}

impl Default for ASConfig {
    fn default() -> Self {
        Self {
            gamma: 0.1,
            k: 1.5,
            sigma: 2.0,
        }
    }
}

/// Avellaneda-Stoikov optimal market making model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvellanedaStoikov {
    config: ASConfig,
}

impl AvellanedaStoikov {
    pub fn new(config: ASConfig) -> Result<Self, ConfigError> {
        if !(config.gamma.is_finite() && config.gamma > 0.0) {
            return Err(ConfigError::invalid(
                "gamma",
                format!("must be > 0, got {}", config.gamma),
            ));
        }
        if !(config.k.is_finite() && config.k > 0.0) {
            return Err(ConfigError::invalid(
                "k",
                format!("must be > 0, got {}", config.k),
            ));
        }
        if !(config.sigma.is_finite() && config.sigma >= 0.0) {
            return Err(ConfigError::invalid(
                "sigma",
                format!("must be >= 0, got {}", config.sigma),
            ));
        }
        Ok(Self { config })
    }

    pub fn from_config(config: &SimulationConfig) -> Result<Self, ConfigError> {
        Self::new(ASConfig {
            gamma: config.gamma,
            k: config.arrival_decay,
            sigma: config.sigma,
        })
    }

    pub fn config(&self) -> &ASConfig {
        &self.config
    }

    /// Calculate reservation price
    ///
    /// r = mid - q × γ × σ² × τ
    pub fn reservation_price(&self, mid: Price, inventory: Quantity, tau: f64) -> Price {
        let sigma_sq = self.config.sigma * self.config.sigma;
        mid - inventory * self.config.gamma * sigma_sq * tau
    }

    /// Calculate optimal total spread
    ///
    /// Δ = γσ²τ + (2/γ) ln(1 + γ/k)
    pub fn total_spread(&self, tau: f64) -> f64 {
        let gamma = self.config.gamma;
        let sigma_sq = self.config.sigma * self.config.sigma;
        gamma * sigma_sq * tau + (2.0 / gamma) * (1.0 + gamma / self.config.k).ln()
    }
}

impl QuotingModel for AvellanedaStoikov {
    fn compute_quote(&self, ctx: &QuoteContext) -> Quote {
        let reservation = self.reservation_price(ctx.mid, ctx.inventory, ctx.tau);
        let half_spread = self.total_spread(ctx.tau) / 2.0;
        Quote::around(reservation, half_spread)
    }

    fn name(&self) -> &str {
        "risk_aware"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn model(gamma: f64, k: f64, sigma: f64) -> AvellanedaStoikov {
        AvellanedaStoikov::new(ASConfig { gamma, k, sigma }).unwrap()
    }

    fn ctx(inventory: f64, tau: f64) -> QuoteContext {
        QuoteContext {
            step: 0,
            mid: 100.0,
            volatility: 0.0,
            inventory,
            tau,
        }
    }

    #[test]
    fn test_reservation_price_long() {
        let m = model(0.1, 1.5, 2.0);
        // 100 - 10 · 0.1 · 4 · 0.5
        assert_relative_eq!(m.reservation_price(100.0, 10.0, 0.5), 98.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reservation_price_short() {
        let m = model(0.1, 1.5, 2.0);
        assert_relative_eq!(m.reservation_price(100.0, -10.0, 0.5), 102.0, epsilon = 1e-12);
    }

    #[test]
    fn test_total_spread_formula() {
        let m = model(0.1, 1.5, 2.0);
        let expected = 0.1 * 4.0 * 0.5 + 20.0 * (1.0 + 0.1 / 1.5_f64).ln();
        assert_relative_eq!(m.total_spread(0.5), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_spread_shrinks_as_tau_decays() {
        let m = model(0.1, 1.5, 2.0);
        assert!(m.total_spread(1.0) > m.total_spread(0.5));
        assert!(m.total_spread(0.5) > m.total_spread(0.0));
        assert!(m.total_spread(0.0) > 0.0);
    }

    #[test]
    fn test_flat_inventory_quotes_symmetric() {
        let m = model(0.1, 80.0, 0.0);
        let quote = m.quote(&ctx(0.0, 1.0));
        assert!(!quote.fallback);
        assert_relative_eq!(quote.mid_price(), 100.0, epsilon = 1e-12);
        assert_relative_eq!(100.0 - quote.bid, quote.ask - 100.0, epsilon = 1e-12);
        assert_eq!(quote.reservation_price, Some(100.0));
    }

    #[test]
    fn test_long_inventory_skews_down() {
        let m = model(0.1, 1.5, 2.0);
        let flat = m.quote(&ctx(0.0, 1.0));
        let long = m.quote(&ctx(5.0, 1.0));
        assert!(long.bid < flat.bid);
        assert!(long.ask < flat.ask);
        assert_relative_eq!(long.spread(), flat.spread(), epsilon = 1e-9);
    }

    #[test]
    fn test_higher_gamma_tightens_order_flow_term() {
        // (2/γ)·ln(1 + γ/k) is decreasing in γ
        let low = model(0.01, 1.5, 0.0);
        let high = model(0.3, 1.5, 0.0);
        assert!(low.total_spread(1.0) > high.total_spread(1.0));
    }

    #[test]
    fn test_rejects_invalid_params() {
        assert!(AvellanedaStoikov::new(ASConfig { gamma: 0.0, ..Default::default() }).is_err());
        assert!(AvellanedaStoikov::new(ASConfig { k: -1.0, ..Default::default() }).is_err());
        assert!(AvellanedaStoikov::new(ASConfig { sigma: f64::NAN, ..Default::default() }).is_err());
    }
}

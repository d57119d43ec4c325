use serde::{Deserialize, Serialize};

use super::Side;
use crate::values::{Price, Quantity, Step};

/// A single fill of one of our quotes
///
/// Trades are appended to the run's trade log in execution order and never
/// modified afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Step at which the fill happened
    pub t: Step,
    pub side: Side,
    /// Execution price (our quote)
    pub price: Price,
    pub size: Quantity,
    /// Mid price at the time of the fill
    #[serde(rename = "mid")]
    pub mid_at_fill: Price,
    /// Fee paid on this fill
    #[serde(default)]
    pub fee: f64,
}

impl Trade {
    pub fn new(t: Step, side: Side, price: Price, size: Quantity, mid_at_fill: Price) -> Self {
        Self {
            t,
            side,
            price,
            size,
            mid_at_fill,
            fee: 0.0,
        }
    }

    /// Set the fee paid on this fill
    pub fn with_fee(mut self, fee: f64) -> Self {
        self.fee = fee;
        self
    }

    /// Returns the notional value of the trade (price * size)
    pub fn notional(&self) -> f64 {
        self.price * self.size
    }

    /// Inventory change caused by this fill
    pub fn signed_size(&self) -> Quantity {
        self.side.sign() * self.size
    }

    /// Cash change caused by this fill, fees included
    pub fn cash_flow(&self) -> f64 {
        -self.side.sign() * self.notional() - self.fee
    }

    /// Signed post-trade price move, negative when the fill was adverse
    pub fn markout(&self, future_mid: Price) -> f64 {
        match self.side {
            Side::Buy => future_mid - self.price,
            Side::Sell => self.price - future_mid,
        }
    }

    /// Whether the price moved against this fill by `future_mid`
    pub fn is_adverse(&self, future_mid: Price) -> bool {
        match self.side {
            Side::Buy => future_mid < self.price,
            Side::Sell => future_mid > self.price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cash_flow_includes_fee() {
        let buy = Trade::new(3, Side::Buy, 99.9, 2.0, 100.0).with_fee(0.01);
        assert_relative_eq!(buy.cash_flow(), -199.8 - 0.01, epsilon = 1e-12);
        assert_eq!(buy.signed_size(), 2.0);

        let sell = Trade::new(4, Side::Sell, 100.1, 2.0, 100.0);
        assert_relative_eq!(sell.cash_flow(), 200.2, epsilon = 1e-12);
        assert_eq!(sell.signed_size(), -2.0);
    }

    #[test]
    fn test_markout_and_adverse() {
        let buy = Trade::new(0, Side::Buy, 99.9, 1.0, 100.0);
        assert!(buy.is_adverse(99.8));
        assert!(!buy.is_adverse(100.0));
        assert_relative_eq!(buy.markout(100.0), 0.1, epsilon = 1e-12);

        let sell = Trade::new(0, Side::Sell, 100.1, 1.0, 100.0);
        assert!(sell.is_adverse(100.2));
        assert!(!sell.is_adverse(100.1));
        assert_relative_eq!(sell.markout(100.2), -0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_serialized_columns() {
        let trade = Trade::new(7, Side::Sell, 100.1, 1.0, 100.0);
        let value = serde_json::to_value(trade).unwrap();
        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, ["fee", "mid", "price", "side", "size", "t"]);
    }
}

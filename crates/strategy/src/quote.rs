//! Quote Types
//!
//! Two-sided market maker quotes.

use mmsim_core::Price;
use serde::{Deserialize, Serialize};

/// Relative offset of the fallback quote around mid
pub const FALLBACK_EPSILON: f64 = 1e-6;

/// Two-sided market maker quote
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub bid: Price,
    pub ask: Price,
    /// Inventory-adjusted fair value, if the policy computes one
    pub reservation_price: Option<Price>,
    /// Half of the quoted spread, if the policy reports one
    pub half_spread: Option<f64>,
    /// Set when the policy output was crossed and replaced by the fallback
    pub fallback: bool,
}

impl Quote {
    pub fn new(bid: Price, ask: Price) -> Self {
        Self {
            bid,
            ask,
            reservation_price: None,
            half_spread: None,
            fallback: false,
        }
    }

    /// Create a symmetric quote around a reservation price
    pub fn around(reservation_price: Price, half_spread: f64) -> Self {
        Self {
            bid: reservation_price - half_spread,
            ask: reservation_price + half_spread,
            reservation_price: Some(reservation_price),
            half_spread: Some(half_spread),
            fallback: false,
        }
    }

    /// Get the midpoint of bid and ask
    pub fn mid_price(&self) -> Price {
        (self.bid + self.ask) / 2.0
    }

    /// Get the spread
    pub fn spread(&self) -> f64 {
        self.ask - self.bid
    }

    /// Get spread in basis points of the quote midpoint
    pub fn spread_bps(&self) -> f64 {
        let mid = self.mid_price();
        if mid == 0.0 {
            return 0.0;
        }
        self.spread() / mid * 10_000.0
    }

    /// Check if quote is crossed or otherwise unusable
    pub fn is_crossed(&self) -> bool {
        !(self.bid.is_finite() && self.ask.is_finite()) || self.bid >= self.ask
    }

    /// Distance of the bid below `mid`, clamped at zero
    pub fn bid_distance(&self, mid: Price) -> f64 {
        (mid - self.bid).max(0.0)
    }

    /// Distance of the ask above `mid`, clamped at zero
    pub fn ask_distance(&self, mid: Price) -> f64 {
        (self.ask - mid).max(0.0)
    }

    /// Replace a crossed quote with a minimal symmetric one around `mid`
    ///
    /// Valid quotes are returned unchanged. Policy columns present on the
    /// crossed quote are reset to `mid` and the epsilon offset.
    pub fn enforce_uncrossed(self, mid: Price) -> Self {
        if !self.is_crossed() {
            return self;
        }
        let offset = (mid.abs() * FALLBACK_EPSILON).max(FALLBACK_EPSILON);
        Self {
            bid: mid - offset,
            ask: mid + offset,
            reservation_price: self.reservation_price.map(|_| mid),
            half_spread: self.half_spread.map(|_| offset),
            fallback: true,
        }
    }
}

//! Quoting Model Protocol
//!
//! Core trait for market making quote generation

use crate::quote::Quote;
use mmsim_core::{Price, Quantity, Step};

/// State visible to a quoting model at one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuoteContext {
    pub step: Step,
    /// Current mid price
    pub mid: Price,
    /// Current volatility estimate (annualized)
    pub volatility: f64,
    /// Current inventory (positive = long)
    pub inventory: Quantity,
    /// Remaining time to horizon in seconds
    pub tau: f64,
}

/// Quoting model interface
///
/// Implementations compute two-sided quotes.
/// All implementations must be thread-safe (Send + Sync).
pub trait QuotingModel: Send + Sync {
    /// Compute the raw quote for the given state
    ///
    /// The result may be crossed for degenerate inputs; use [`QuotingModel::quote`]
    /// to get a quote that is always usable.
    fn compute_quote(&self, ctx: &QuoteContext) -> Quote;

    /// Get the model name for logging/debugging
    fn name(&self) -> &str;

    /// Compute a quote with `bid < ask` guaranteed
    fn quote(&self, ctx: &QuoteContext) -> Quote {
        let quote = self.compute_quote(ctx).enforce_uncrossed(ctx.mid);
        if quote.fallback {
            log::debug!(
                "{}: crossed quote at step {} (mid={}, inventory={}, tau={}), using fallback",
                self.name(),
                ctx.step,
                ctx.mid,
                ctx.inventory,
                ctx.tau
            );
        }
        quote
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestQuoter;

    impl QuotingModel for TestQuoter {
        fn compute_quote(&self, ctx: &QuoteContext) -> Quote {
            // deliberately crossed
            Quote::new(ctx.mid + 1.0, ctx.mid - 1.0)
        }

        fn name(&self) -> &str {
            "test"
        }
    }

    #[test]
    fn test_trait_object_enforces_uncrossed() {
        let quoter: Box<dyn QuotingModel> = Box::new(TestQuoter);
        let ctx = QuoteContext {
            step: 0,
            mid: 100.0,
            volatility: 0.2,
            inventory: 0.0,
            tau: 1.0,
        };

        assert!(quoter.compute_quote(&ctx).is_crossed());
        let quote = quoter.quote(&ctx);
        assert!(!quote.is_crossed());
        assert!(quote.fallback);
        assert!((quote.mid_price() - 100.0).abs() < 1e-9);
    }
}

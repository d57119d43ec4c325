//! Quoting Policies
//!
//! Maps (mid, volatility, inventory, time to horizon) to a two-sided quote.
//!
//! - [`HeuristicQuoter`]: volatility-widened spread with inventory skew
//! - [`AvellanedaStoikov`]: closed-form reservation price and optimal spread
//!
//! Both implement [`QuotingModel`]; [`QuotingPolicy`] selects one from config.
//! [`QuotingModel::quote`] never returns a crossed quote.

pub mod avellaneda_stoikov;
pub mod heuristic;
pub mod policy;
pub mod protocol;
pub mod quote;

pub use avellaneda_stoikov::{ASConfig, AvellanedaStoikov};
pub use heuristic::HeuristicQuoter;
pub use policy::QuotingPolicy;
pub use protocol::{QuoteContext, QuotingModel};
pub use quote::{FALLBACK_EPSILON, Quote};

//! Stylized Market
//!
//! The simulated counterparty side of the market maker's world:
//!
//! - [`PriceProcessGenerator`]: mid-price path (random walk or log-normal diffusion)
//! - [`FillModel`]: exponential arrival intensity turning quote distance into
//!   a per-step fill probability
//!
//! Neither component owns randomness: callers pass the run's generator in.

pub mod fill_model;
pub mod price_process;

pub use fill_model::FillModel;
pub use price_process::{
    ArithmeticRandomWalk, LogNormalDiffusion, PricePath, PriceProcess, PriceProcessGenerator,
};

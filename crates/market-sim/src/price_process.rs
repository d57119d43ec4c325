//! Mid-Price Processes
//!
//! **Arithmetic random walk** (additive, price units):
//! s(t) = s(t−1) + μ·dt ± σ·√dt
//!
//! **Log-normal diffusion** (geometric Brownian motion):
//! ln s(t) = ln s(t−1) + (μ − σ²/2)·dt + σ·√dt·z,  z ~ N(0, 1)
//!
//! Both start at s(0) = s0 and consume one draw per step after the first,
//! in step order, from the generator passed in by the caller.

use mmsim_core::{ConfigError, Price, PriceModel, SimulationConfig, Step};
use rand::Rng;
use rand_distr::StandardNormal;

type Result<T> = std::result::Result<T, ConfigError>;

/// Read-only mid-price path, index = step
#[derive(Debug, Clone, PartialEq)]
pub struct PricePath {
    prices: Vec<Price>,
}

impl PricePath {
    pub fn new(prices: Vec<Price>) -> Self {
        Self { prices }
    }

    pub fn prices(&self) -> &[Price] {
        &self.prices
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn get(&self, step: Step) -> Option<Price> {
        self.prices.get(step).copied()
    }

    pub fn last(&self) -> Option<Price> {
        self.prices.last().copied()
    }

    /// |ln(s(t) / s(t−1))|, zero at the first step
    pub fn abs_log_return(&self, step: Step) -> f64 {
        if step == 0 || step >= self.prices.len() {
            return 0.0;
        }
        let r = (self.prices[step] / self.prices[step - 1]).ln().abs();
        // non-positive prices (random walk can cross zero) have no log return
        if r.is_finite() { r } else { 0.0 }
    }

    /// Annualized absolute log-return at every step
    ///
    /// vol(t) = |ln(s(t)/s(t−1))| · √(seconds_per_year / dt)
    pub fn volatility_proxy(&self, seconds_per_year: f64, dt_seconds: f64) -> Vec<f64> {
        let scale = (seconds_per_year / dt_seconds).sqrt();
        (0..self.prices.len())
            .map(|step| self.abs_log_return(step) * scale)
            .collect()
    }
}

/// A mid-price model
pub trait PriceProcess {
    /// Generate `n_steps` prices, drawing from `rng`
    fn generate<R: Rng + ?Sized>(&self, n_steps: usize, rng: &mut R) -> Result<PricePath>;

    /// Model name for logging
    fn name(&self) -> &str;
}

fn check_grid(dt_seconds: f64, n_steps: usize) -> Result<()> {
    if !(dt_seconds.is_finite() && dt_seconds > 0.0) {
        return Err(ConfigError::invalid(
            "dt_seconds",
            format!("must be > 0, got {dt_seconds}"),
        ));
    }
    if n_steps <= 1 {
        return Err(ConfigError::invalid(
            "n_steps",
            format!("must be > 1, got {n_steps}"),
        ));
    }
    Ok(())
}

/// Additive random walk with drift and fixed step size σ√dt
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArithmeticRandomWalk {
    pub s0: Price,
    /// Drift in price units per second
    pub mu: f64,
    /// Step scale in price units per √second
    pub sigma: f64,
    pub dt_seconds: f64,
}

impl PriceProcess for ArithmeticRandomWalk {
    fn generate<R: Rng + ?Sized>(&self, n_steps: usize, rng: &mut R) -> Result<PricePath> {
        check_grid(self.dt_seconds, n_steps)?;

        let drift = self.mu * self.dt_seconds;
        let step = self.sigma * self.dt_seconds.sqrt();

        let mut prices = Vec::with_capacity(n_steps);
        prices.push(self.s0);
        for t in 1..n_steps {
            let sign = if rng.r#gen::<f64>() < 0.5 { 1.0 } else { -1.0 };
            prices.push(prices[t - 1] + drift + sign * step);
        }
        Ok(PricePath::new(prices))
    }

    fn name(&self) -> &str {
        "random_walk"
    }
}

/// Geometric Brownian motion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogNormalDiffusion {
    pub s0: Price,
    /// Drift per second (log units)
    pub mu: f64,
    /// Volatility per √second (log units)
    pub sigma: f64,
    pub dt_seconds: f64,
}

impl PriceProcess for LogNormalDiffusion {
    fn generate<R: Rng + ?Sized>(&self, n_steps: usize, rng: &mut R) -> Result<PricePath> {
        check_grid(self.dt_seconds, n_steps)?;

        let drift = (self.mu - 0.5 * self.sigma * self.sigma) * self.dt_seconds;
        let diffusion = self.sigma * self.dt_seconds.sqrt();

        let mut log_price = self.s0.ln();
        let mut prices = Vec::with_capacity(n_steps);
        prices.push(self.s0);
        for t in 1..n_steps {
            let z: f64 = rng.sample(StandardNormal);
            log_price += drift + diffusion * z;
            let price = log_price.exp();
            // exp over- or underflows when sigma·√dt is extreme for the run length
            if !(price.is_finite() && price > 0.0) {
                return Err(ConfigError::invalid(
                    "sigma",
                    format!(
                        "diffusion left the representable range at step {t} \
                         (sigma={}, dt={})",
                        self.sigma, self.dt_seconds
                    ),
                ));
            }
            prices.push(price);
        }
        Ok(PricePath::new(prices))
    }

    fn name(&self) -> &str {
        "diffusion"
    }
}

/// The configured price model
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PriceProcessGenerator {
    RandomWalk(ArithmeticRandomWalk),
    Diffusion(LogNormalDiffusion),
}

impl PriceProcessGenerator {
    pub fn from_config(config: &SimulationConfig) -> Self {
        match config.price_model {
            PriceModel::RandomWalk => Self::RandomWalk(ArithmeticRandomWalk {
                s0: config.s0,
                mu: config.mu,
                sigma: config.sigma,
                dt_seconds: config.dt_seconds,
            }),
            PriceModel::Diffusion => Self::Diffusion(LogNormalDiffusion {
                s0: config.s0,
                mu: config.mu,
                sigma: config.sigma,
                dt_seconds: config.dt_seconds,
            }),
        }
    }
}

impl PriceProcess for PriceProcessGenerator {
    fn generate<R: Rng + ?Sized>(&self, n_steps: usize, rng: &mut R) -> Result<PricePath> {
        let path = match self {
            Self::RandomWalk(model) => model.generate(n_steps, rng)?,
            Self::Diffusion(model) => model.generate(n_steps, rng)?,
        };
        log::debug!(
            "{}: generated {} prices, last = {:?}",
            self.name(),
            path.len(),
            path.last()
        );
        Ok(path)
    }

    fn name(&self) -> &str {
        match self {
            Self::RandomWalk(model) => model.name(),
            Self::Diffusion(model) => model.name(),
        }
    }
}

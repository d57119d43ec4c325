//! Simulation Configuration
//!
//! One immutable [`SimulationConfig`] describes a complete run: time grid,
//! price process, quoting policy, order-flow model and KPI horizons.
//! Configs are loaded from JSON and validated before anything is simulated;
//! invalid values are rejected, never clamped.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::values::{Price, Quantity, Step};

/// Mid-price process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceModel {
    /// Arithmetic random walk with drift: ±σ√dt steps
    #[default]
    RandomWalk,
    /// Log-normal (geometric Brownian) diffusion
    Diffusion,
}

/// Quoting policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Fixed spread widened by volatility, skewed by inventory
    Heuristic,
    /// Closed-form Avellaneda-Stoikov reservation price and spread
    #[default]
    RiskAware,
}

/// How the remaining time to horizon evolves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TauMode {
    /// tau = max(T - t·dt, 0), decays to zero once
    #[default]
    Session,
    /// tau = T - (t·dt mod T), restarts every T seconds
    Cyclic,
}

/// Per-step fill probability formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillProbability {
    /// P = 1 - exp(-λ·dt)
    #[default]
    Survival,
    /// P = min(λ·dt, 1)
    Linear,
}

/// Parameters of the heuristic quoting policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicParams {
    /// Base half-spread in basis points
    pub base_half_spread_bps: f64,
    /// Extra half-spread (bps) per unit of annualized volatility
    pub vol_widening_bps: f64,
    /// Quote shift (bps) per unit of inventory
    pub inventory_skew_bps: f64,
    /// Annualization factor for the volatility proxy
    pub seconds_per_year: f64,
}

impl Default for HeuristicParams {
    fn default() -> Self {
        Self {
            base_half_spread_bps: 5.0,
            vol_widening_bps: 30.0,
            inventory_skew_bps: 8.0,
            seconds_per_year: 31_536_000.0,
        }
    }
}

/// Configuration for one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for the run's single random generator
    pub seed: u64,

    /// Step size in seconds
    pub dt_seconds: f64,
    /// Number of steps (rows in the time series)
    pub n_steps: usize,
    /// Risk horizon T in seconds
    pub horizon_seconds: f64,
    pub tau_mode: TauMode,

    pub price_model: PriceModel,
    /// Initial mid price
    pub s0: Price,
    /// Drift per second (price units for the random walk, log units for diffusion)
    pub mu: f64,
    /// Volatility per √second
    pub sigma: f64,

    pub policy: PolicyKind,
    /// Risk aversion γ
    pub gamma: f64,
    pub heuristic: HeuristicParams,

    /// Base arrival intensity A in λ(δ) = A·exp(-k·δ)
    #[serde(rename = "A", alias = "arrival_intensity")]
    pub arrival_intensity: f64,
    /// Intensity decay k in λ(δ) = A·exp(-k·δ)
    #[serde(rename = "k", alias = "arrival_decay")]
    pub arrival_decay: f64,
    pub fill_probability: FillProbability,

    /// Fee rate in basis points of notional
    pub fee_rate_bps: f64,
    /// Size of every fill
    pub trade_size: Quantity,
    /// Inventory cap; a side stops quoting once |inventory| reaches it
    pub max_inventory: Quantity,

    /// Markout / adverse-selection horizon in steps
    pub adverse_horizon_steps: usize,
    /// VaR holding horizon in seconds
    pub var_horizon_seconds: f64,
    /// VaR confidence levels, each in (0, 1)
    pub var_levels: Vec<f64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            dt_seconds: 0.005,
            n_steps: 200,
            horizon_seconds: 1.0,
            tau_mode: TauMode::Session,
            price_model: PriceModel::RandomWalk,
            s0: 100.0,
            mu: 0.0,
            sigma: 2.0,
            policy: PolicyKind::RiskAware,
            gamma: 0.1,
            heuristic: HeuristicParams::default(),
            arrival_intensity: 140.0,
            arrival_decay: 1.5,
            fill_probability: FillProbability::Survival,
            fee_rate_bps: 0.0,
            trade_size: 1.0,
            max_inventory: 50.0,
            adverse_horizon_steps: 10,
            var_horizon_seconds: 0.05,
            var_levels: vec![0.95, 0.99],
        }
    }
}

impl SimulationConfig {
    /// Set seed (builder pattern)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set time grid (builder pattern)
    pub fn with_steps(mut self, n_steps: usize, dt_seconds: f64) -> Self {
        self.n_steps = n_steps;
        self.dt_seconds = dt_seconds;
        self
    }

    /// Set drift and volatility (builder pattern)
    pub fn with_market(mut self, mu: f64, sigma: f64) -> Self {
        self.mu = mu;
        self.sigma = sigma;
        self
    }

    /// Set gamma (builder pattern)
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Set quoting policy (builder pattern)
    pub fn with_policy(mut self, policy: PolicyKind) -> Self {
        self.policy = policy;
        self
    }

    /// Set price model (builder pattern)
    pub fn with_price_model(mut self, price_model: PriceModel) -> Self {
        self.price_model = price_model;
        self
    }

    /// Set order-flow parameters (builder pattern)
    pub fn with_arrivals(mut self, arrival_intensity: f64, arrival_decay: f64) -> Self {
        self.arrival_intensity = arrival_intensity;
        self.arrival_decay = arrival_decay;
        self
    }

    /// Set max inventory (builder pattern)
    pub fn with_max_inventory(mut self, max: Quantity) -> Self {
        self.max_inventory = max;
        self
    }

    /// Fee as a fraction of notional
    pub fn fee_rate(&self) -> f64 {
        self.fee_rate_bps / 10_000.0
    }

    /// VaR horizon converted to whole steps
    pub fn var_horizon_steps(&self) -> usize {
        let steps = (self.var_horizon_seconds / self.dt_seconds).round();
        if steps.is_finite() && steps > 0.0 {
            steps as usize
        } else {
            0
        }
    }

    /// Remaining time to horizon at `step`
    ///
    /// In cyclic mode a step landing within rounding error of a cycle
    /// boundary starts a new cycle with the full horizon.
    pub fn tau_at(&self, step: Step) -> f64 {
        let elapsed = step as f64 * self.dt_seconds;
        match self.tau_mode {
            TauMode::Session => (self.horizon_seconds - elapsed).max(0.0),
            TauMode::Cyclic => {
                let horizon = self.horizon_seconds;
                let tolerance = self.dt_seconds * 1e-9;
                let into_cycle = elapsed.rem_euclid(horizon);
                if into_cycle < tolerance || horizon - into_cycle < tolerance {
                    horizon
                } else {
                    horizon - into_cycle
                }
            }
        }
    }

    /// Validate the configuration
    ///
    /// Every range violation is fatal; nothing is clamped or defaulted.
    pub fn validate(&self) -> Result<()> {
        if !(self.dt_seconds.is_finite() && self.dt_seconds > 0.0) {
            return Err(ConfigError::invalid(
                "dt_seconds",
                format!("must be > 0, got {}", self.dt_seconds),
            ));
        }
        if self.n_steps <= 1 {
            return Err(ConfigError::invalid(
                "n_steps",
                format!("must be > 1, got {}", self.n_steps),
            ));
        }
        if !(self.horizon_seconds.is_finite() && self.horizon_seconds >= self.dt_seconds) {
            return Err(ConfigError::invalid(
                "horizon_seconds",
                format!(
                    "must cover at least one step (dt = {}), got {}",
                    self.dt_seconds, self.horizon_seconds
                ),
            ));
        }
        if !(self.s0.is_finite() && self.s0 > 0.0) {
            return Err(ConfigError::invalid("s0", format!("must be > 0, got {}", self.s0)));
        }
        if !self.mu.is_finite() {
            return Err(ConfigError::invalid("mu", "must be finite"));
        }
        if !(self.sigma.is_finite() && self.sigma >= 0.0) {
            return Err(ConfigError::invalid(
                "sigma",
                format!("must be >= 0, got {}", self.sigma),
            ));
        }
        if !(self.gamma.is_finite() && self.gamma > 0.0) {
            return Err(ConfigError::invalid(
                "gamma",
                format!("must be > 0, got {}", self.gamma),
            ));
        }
        if !(self.arrival_intensity.is_finite() && self.arrival_intensity > 0.0) {
            return Err(ConfigError::invalid(
                "A",
                format!("must be > 0, got {}", self.arrival_intensity),
            ));
        }
        if !(self.arrival_decay.is_finite() && self.arrival_decay > 0.0) {
            return Err(ConfigError::invalid(
                "k",
                format!("must be > 0, got {}", self.arrival_decay),
            ));
        }
        if !(self.fee_rate_bps.is_finite() && self.fee_rate_bps >= 0.0) {
            return Err(ConfigError::invalid(
                "fee_rate_bps",
                format!("must be >= 0, got {}", self.fee_rate_bps),
            ));
        }
        if !(self.trade_size.is_finite() && self.trade_size > 0.0) {
            return Err(ConfigError::invalid(
                "trade_size",
                format!("must be > 0, got {}", self.trade_size),
            ));
        }
        if !(self.max_inventory.is_finite() && self.max_inventory >= 0.0) {
            return Err(ConfigError::invalid(
                "max_inventory",
                format!("must be >= 0, got {}", self.max_inventory),
            ));
        }
        if self.adverse_horizon_steps < 1 {
            return Err(ConfigError::invalid("adverse_horizon_steps", "must be >= 1"));
        }
        if !(self.var_horizon_seconds.is_finite() && self.var_horizon_seconds > 0.0) {
            return Err(ConfigError::invalid(
                "var_horizon_seconds",
                format!("must be > 0, got {}", self.var_horizon_seconds),
            ));
        }
        if self.var_horizon_steps() < 1 {
            return Err(ConfigError::invalid(
                "var_horizon_seconds",
                format!(
                    "{} s is shorter than one step of {} s",
                    self.var_horizon_seconds, self.dt_seconds
                ),
            ));
        }
        if self.var_levels.is_empty() {
            return Err(ConfigError::invalid("var_levels", "at least one level required"));
        }
        if let Some(level) = self
            .var_levels
            .iter()
            .find(|&&l| !(l > 0.0 && l < 1.0))
        {
            return Err(ConfigError::invalid(
                "var_levels",
                format!("levels must lie in (0, 1), got {level}"),
            ));
        }
        self.validate_heuristic()
    }

    fn validate_heuristic(&self) -> Result<()> {
        let h = &self.heuristic;
        let non_negative = [
            ("heuristic.base_half_spread_bps", h.base_half_spread_bps),
            ("heuristic.vol_widening_bps", h.vol_widening_bps),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::invalid(field, format!("must be >= 0, got {value}")));
            }
        }
        if !h.inventory_skew_bps.is_finite() {
            return Err(ConfigError::invalid(
                "heuristic.inventory_skew_bps",
                "must be finite",
            ));
        }
        if !(h.seconds_per_year.is_finite() && h.seconds_per_year > 0.0) {
            return Err(ConfigError::invalid(
                "heuristic.seconds_per_year",
                format!("must be > 0, got {}", h.seconds_per_year),
            ));
        }
        Ok(())
    }

    /// Serialize to pretty JSON
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Load and validate a configuration from a JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SimulationConfig> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Load and validate a configuration from a JSON string
///
/// Missing fields take their default values.
pub fn load_config_from_str(json: &str) -> Result<SimulationConfig> {
    let config: SimulationConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn field_of(err: ConfigError) -> &'static str {
        match err {
            ConfigError::Invalid { field, .. } => field,
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_default_is_valid() {
        SimulationConfig::default().validate().unwrap();
    }

    #[test]
    fn test_rejects_bad_time_grid() {
        let cfg = SimulationConfig::default().with_steps(100, 0.0);
        assert_eq!(field_of(cfg.validate().unwrap_err()), "dt_seconds");

        let cfg = SimulationConfig::default().with_steps(1, 0.01);
        assert_eq!(field_of(cfg.validate().unwrap_err()), "n_steps");

        let cfg = SimulationConfig {
            horizon_seconds: 0.001,
            ..SimulationConfig::default()
        };
        assert_eq!(field_of(cfg.validate().unwrap_err()), "horizon_seconds");
    }

    #[test]
    fn test_rejects_bad_model_params() {
        let cfg = SimulationConfig::default().with_market(0.0, -1.0);
        assert_eq!(field_of(cfg.validate().unwrap_err()), "sigma");

        let cfg = SimulationConfig::default().with_gamma(0.0);
        assert_eq!(field_of(cfg.validate().unwrap_err()), "gamma");

        let cfg = SimulationConfig::default().with_arrivals(0.0, 1.5);
        assert_eq!(field_of(cfg.validate().unwrap_err()), "A");

        let cfg = SimulationConfig::default().with_arrivals(140.0, -1.0);
        assert_eq!(field_of(cfg.validate().unwrap_err()), "k");
    }

    #[test]
    fn test_rejects_var_horizon_below_one_step() {
        let cfg = SimulationConfig {
            var_horizon_seconds: 0.001,
            ..SimulationConfig::default()
        };
        assert_eq!(cfg.var_horizon_steps(), 0);
        assert_eq!(field_of(cfg.validate().unwrap_err()), "var_horizon_seconds");
    }

    #[test]
    fn test_rejects_bad_var_levels() {
        let cfg = SimulationConfig {
            var_levels: vec![0.95, 1.0],
            ..SimulationConfig::default()
        };
        assert_eq!(field_of(cfg.validate().unwrap_err()), "var_levels");

        let cfg = SimulationConfig {
            var_levels: vec![],
            ..SimulationConfig::default()
        };
        assert_eq!(field_of(cfg.validate().unwrap_err()), "var_levels");
    }

    #[test]
    fn test_zero_cap_is_allowed() {
        SimulationConfig::default()
            .with_max_inventory(0.0)
            .validate()
            .unwrap();
    }

    #[test]
    fn test_var_horizon_steps_rounds() {
        let cfg = SimulationConfig::default();
        assert_eq!(cfg.var_horizon_steps(), 10);
    }

    #[test]
    fn test_tau_session_decays_to_zero() {
        let cfg = SimulationConfig::default();
        assert_relative_eq!(cfg.tau_at(0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(cfg.tau_at(100), 0.5, epsilon = 1e-12);
        assert_eq!(cfg.tau_at(400), 0.0);
    }

    #[test]
    fn test_tau_cyclic_wraps() {
        let cfg = SimulationConfig {
            tau_mode: TauMode::Cyclic,
            horizon_seconds: 0.5,
            ..SimulationConfig::default()
        };
        assert_eq!(cfg.tau_at(0), 0.5);
        assert_relative_eq!(cfg.tau_at(50), 0.25, epsilon = 1e-9);
        assert_eq!(cfg.tau_at(100), 0.5);
        assert_relative_eq!(cfg.tau_at(150), 0.25, epsilon = 1e-9);
    }

    #[test]
    fn test_tau_cyclic_full_horizon_at_every_cycle_start() {
        // 0.05 / 0.005 = 10 steps per cycle; several multiples of
        // step·dt fall a hair below a multiple of the horizon
        let cfg = SimulationConfig {
            tau_mode: TauMode::Cyclic,
            horizon_seconds: 0.05,
            ..SimulationConfig::default()
        };
        for cycle in 0..200 {
            let start = cycle * 10;
            assert_eq!(cfg.tau_at(start), 0.05, "cycle start t={start}");
            for offset in 1..10 {
                let expected = 0.05 - offset as f64 * 0.005;
                assert_relative_eq!(cfg.tau_at(start + offset), expected, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_load_from_str_fills_defaults() {
        let cfg = load_config_from_str(
            r#"{ "seed": 7, "A": 1.5, "k": 80.0, "policy": "heuristic", "price_model": "diffusion" }"#,
        )
        .unwrap();
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.arrival_intensity, 1.5);
        assert_eq!(cfg.arrival_decay, 80.0);
        assert_eq!(cfg.policy, PolicyKind::Heuristic);
        assert_eq!(cfg.price_model, PriceModel::Diffusion);
        assert_eq!(cfg.n_steps, SimulationConfig::default().n_steps);
    }

    #[test]
    fn test_load_from_str_validates() {
        let err = load_config_from_str(r#"{ "gamma": -0.5 }"#).unwrap_err();
        assert_eq!(field_of(err), "gamma");

        let err = load_config_from_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("base.json");
        let cfg = SimulationConfig::default().with_seed(123).with_gamma(0.3);
        std::fs::write(&path, cfg.to_json_pretty().unwrap()).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}

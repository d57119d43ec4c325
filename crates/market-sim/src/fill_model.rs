//! Exponential Arrival Fill Model
//!
//! Market orders arrive at a quote resting δ away from mid with intensity
//!
//! λ(δ) = A · exp(−k · max(δ, 0))
//!
//! Over one step of length dt the quote fills with probability
//! P = 1 − exp(−λ·dt) (survival) or P = min(λ·dt, 1) (linear).
//! Quotes through the mid (δ < 0) get the maximal intensity A.

use mmsim_core::{ConfigError, FillProbability, SimulationConfig};
use rand::Rng;

/// Poisson arrival model for passive fills
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillModel {
    /// Base intensity A (arrivals per second at δ = 0)
    arrival_intensity: f64,
    /// Decay k per unit of price distance
    arrival_decay: f64,
    dt_seconds: f64,
    mode: FillProbability,
}

impl FillModel {
    pub fn new(
        arrival_intensity: f64,
        arrival_decay: f64,
        dt_seconds: f64,
        mode: FillProbability,
    ) -> Result<Self, ConfigError> {
        if !(arrival_intensity.is_finite() && arrival_intensity > 0.0) {
            return Err(ConfigError::invalid(
                "A",
                format!("must be > 0, got {arrival_intensity}"),
            ));
        }
        if !(arrival_decay.is_finite() && arrival_decay > 0.0) {
            return Err(ConfigError::invalid(
                "k",
                format!("must be > 0, got {arrival_decay}"),
            ));
        }
        if !(dt_seconds.is_finite() && dt_seconds > 0.0) {
            return Err(ConfigError::invalid(
                "dt_seconds",
                format!("must be > 0, got {dt_seconds}"),
            ));
        }
        Ok(Self {
            arrival_intensity,
            arrival_decay,
            dt_seconds,
            mode,
        })
    }

    pub fn from_config(config: &SimulationConfig) -> Result<Self, ConfigError> {
        Self::new(
            config.arrival_intensity,
            config.arrival_decay,
            config.dt_seconds,
            config.fill_probability,
        )
    }

    /// Arrival intensity λ(δ)
    pub fn intensity(&self, delta: f64) -> f64 {
        self.arrival_intensity * (-self.arrival_decay * delta.max(0.0)).exp()
    }

    /// Probability that a quote δ away from mid fills within one step
    pub fn fill_probability(&self, delta: f64) -> f64 {
        let lambda_dt = self.intensity(delta) * self.dt_seconds;
        match self.mode {
            FillProbability::Survival => 1.0 - (-lambda_dt).exp(),
            FillProbability::Linear => lambda_dt.min(1.0),
        }
    }

    /// Draw one uniform and report whether the quote filled
    ///
    /// Consumes exactly one draw from `rng` regardless of the outcome.
    pub fn try_fill<R: Rng + ?Sized>(&self, delta: f64, rng: &mut R) -> bool {
        let u: f64 = rng.r#gen();
        u < self.fill_probability(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn model(mode: FillProbability) -> FillModel {
        FillModel::new(1.5, 80.0, 1.0, mode).unwrap()
    }

    #[test]
    fn test_intensity_decays_with_distance() {
        let m = model(FillProbability::Survival);
        assert_relative_eq!(m.intensity(0.0), 1.5);
        assert_relative_eq!(m.intensity(0.0125), 1.5 * (-1.0_f64).exp(), epsilon = 1e-12);
        assert!(m.intensity(0.05) < m.intensity(0.01));
    }

    #[test]
    fn test_crossing_quote_gets_max_intensity() {
        let m = model(FillProbability::Survival);
        assert_eq!(m.intensity(-0.3), m.intensity(0.0));
        assert_eq!(m.fill_probability(-0.3), m.fill_probability(0.0));
    }

    #[test]
    fn test_survival_probability() {
        let m = model(FillProbability::Survival);
        assert_relative_eq!(m.fill_probability(0.0), 1.0 - (-1.5_f64).exp(), epsilon = 1e-12);
        let p = m.fill_probability(0.02);
        assert!(p > 0.0 && p < 1.0);
    }

    #[test]
    fn test_linear_probability_is_capped() {
        let m = model(FillProbability::Linear);
        assert_eq!(m.fill_probability(0.0), 1.0);
        let far = m.fill_probability(0.05);
        assert_relative_eq!(far, 1.5 * (-4.0_f64).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_linear_upper_bounds_survival() {
        let s = model(FillProbability::Survival);
        let l = model(FillProbability::Linear);
        for delta in [0.0, 0.005, 0.01, 0.02, 0.05, 0.1] {
            assert!(l.fill_probability(delta) >= s.fill_probability(delta));
        }
    }

    #[test]
    fn test_empirical_fill_rate() {
        let m = model(FillProbability::Survival);
        let mut rng = StdRng::seed_from_u64(42);
        let n = 20_000;
        let fills = (0..n).filter(|_| m.try_fill(0.0125, &mut rng)).count();
        let rate = fills as f64 / n as f64;
        assert!((rate - m.fill_probability(0.0125)).abs() < 0.02, "rate {rate}");
    }

    #[test]
    fn test_rejects_invalid_params() {
        assert!(FillModel::new(0.0, 1.0, 1.0, FillProbability::Survival).is_err());
        assert!(FillModel::new(1.0, 0.0, 1.0, FillProbability::Survival).is_err());
        assert!(FillModel::new(1.0, 1.0, -1.0, FillProbability::Survival).is_err());
    }
}

//! Statistical validation of the stylized market
//!
//! Checks that generated paths and fill draws match their closed-form
//! moments over many seeded samples.

use approx::assert_relative_eq;
use mmsim_core::{FillProbability, PriceModel, SimulationConfig};
use mmsim_market::{FillModel, PriceProcess, PriceProcessGenerator};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Terminal log-price of GBM has mean ln(s0) + (μ − σ²/2)·T
#[test]
fn test_diffusion_terminal_log_mean() {
    let config = SimulationConfig::default()
        .with_price_model(PriceModel::Diffusion)
        .with_market(0.02, 0.3)
        .with_steps(101, 0.01);
    let generator = PriceProcessGenerator::from_config(&config);

    let mut rng = StdRng::seed_from_u64(2024);
    let n_paths = 2_000;
    let terminal: Vec<f64> = (0..n_paths)
        .map(|_| {
            let path = generator.generate(config.n_steps, &mut rng).unwrap();
            path.last().unwrap().ln()
        })
        .collect();

    let horizon = (config.n_steps - 1) as f64 * config.dt_seconds;
    let mean = terminal.iter().sum::<f64>() / n_paths as f64;
    let expected = config.s0.ln() + (0.02 - 0.5 * 0.09) * horizon;
    // std of the mean = σ√T / √n ≈ 0.0067
    assert!((mean - expected).abs() < 0.03, "mean {mean}, expected {expected}");

    let var = terminal.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n_paths - 1) as f64;
    assert_relative_eq!(var, 0.09 * horizon, max_relative = 0.1);
}

/// Random walk drift accumulates as μ·dt per step
#[test]
fn test_random_walk_mean_drift() {
    let config = SimulationConfig::default()
        .with_market(5.0, 1.0)
        .with_steps(201, 0.01);
    let generator = PriceProcessGenerator::from_config(&config);

    let mut rng = StdRng::seed_from_u64(77);
    let n_paths = 1_000;
    let mean_move = (0..n_paths)
        .map(|_| {
            let path = generator.generate(config.n_steps, &mut rng).unwrap();
            path.last().unwrap() - config.s0
        })
        .sum::<f64>()
        / n_paths as f64;

    // 200 steps × 0.05 drift; noise std of the mean = 0.1·√200/√1000 ≈ 0.045
    assert!((mean_move - 10.0).abs() < 0.2, "mean move {mean_move}");
}

/// Empirical fill frequency tracks 1 − exp(−A·e^(−kδ)·dt) across distances
#[test]
fn test_fill_frequency_matches_survival_probability() {
    let model = FillModel::new(140.0, 1.5, 0.005, FillProbability::Survival).unwrap();
    let mut rng = StdRng::seed_from_u64(9);
    let n = 40_000;

    for delta in [0.0_f64, 0.5, 1.0, 2.0] {
        let expected = 1.0 - (-140.0 * (-1.5 * delta).exp() * 0.005).exp();
        let fills = (0..n).filter(|_| model.try_fill(delta, &mut rng)).count();
        let rate = fills as f64 / n as f64;
        let tolerance = 4.0 * (expected * (1.0 - expected) / n as f64).sqrt() + 1e-3;
        assert!(
            (rate - expected).abs() < tolerance,
            "delta {delta}: rate {rate}, expected {expected}"
        );
    }
}

/// Fill probability is monotone non-increasing in distance
#[test]
fn test_fill_probability_monotone() {
    for mode in [FillProbability::Survival, FillProbability::Linear] {
        let model = FillModel::new(140.0, 1.5, 0.005, mode).unwrap();
        let probs: Vec<f64> = (0..50)
            .map(|i| model.fill_probability(i as f64 * 0.1))
            .collect();
        assert!(probs.windows(2).all(|w| w[1] <= w[0]));
        assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
    }
}

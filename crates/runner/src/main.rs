//! mmsim - market-making simulation driver
//!
//! Usage:
//!   mmsim run --config config/base.json --outdir results/run
//!   mmsim grid --base-config config/base.json --outdir results/experiment

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mmsim_core::load_config;
use mmsim_runner::{RunStore, ScenarioGrid, evaluate, run_grid, run_simulation};

/// Market-making simulation sandbox
#[derive(Parser, Debug)]
#[command(name = "mmsim")]
#[command(about = "Simulate a market maker against a stochastic mid price and report risk KPIs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one simulation, write its run directory and print the summary
    Run {
        /// Path to the JSON config
        #[arg(short, long)]
        config: PathBuf,

        /// Run output directory
        #[arg(short, long, default_value = "results/run")]
        outdir: PathBuf,

        /// Override the config seed
        #[arg(long, env = "MMSIM_SEED")]
        seed: Option<u64>,
    },

    /// Run the scenario × gamma grid over a base config
    Grid {
        /// Path to the base JSON config
        #[arg(short, long)]
        base_config: PathBuf,

        /// Output root for run directories and the experiment summary
        #[arg(short, long, default_value = "results/experiment")]
        outdir: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            config,
            outdir,
            seed,
        } => run_one(config, outdir, seed),
        Commands::Grid {
            base_config,
            outdir,
        } => run_experiment(base_config, outdir),
    }
}

fn run_one(config_path: PathBuf, outdir: PathBuf, seed: Option<u64>) -> Result<()> {
    let mut config = load_config(&config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }

    let output = run_simulation(&config)?;
    let summary = evaluate(&config, &output)?;
    RunStore::write(&outdir, &config, &output, &summary)?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    log::info!("Run written to {}", outdir.display());
    Ok(())
}

fn run_experiment(base_config: PathBuf, outdir: PathBuf) -> Result<()> {
    let config = load_config(&base_config)
        .with_context(|| format!("Failed to load config {}", base_config.display()))?;

    let results = run_grid(&config, &ScenarioGrid::default(), &outdir)?;

    println!(
        "{:<10} {:>7} {:>12} {:>7} {:>10} {:>10}",
        "scenario", "gamma", "pnl", "trades", "var_95", "var_99"
    );
    for row in &results {
        println!(
            "{:<10} {:>7} {:>12.4} {:>7} {:>10.4} {:>10.4}",
            row.scenario,
            row.gamma,
            row.summary.final_pnl,
            row.summary.n_trades,
            row.summary.var_at(0.95).unwrap_or(f64::NAN),
            row.summary.var_at(0.99).unwrap_or(f64::NAN),
        );
    }
    log::info!("Experiment summary written to {}", outdir.display());
    Ok(())
}

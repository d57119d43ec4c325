//! Simulation Engine
//!
//! Steps one market maker through a precomputed mid-price path:
//!
//! ```text
//! price path ─► quote ─► side activity ─► fill draws ─► state update ─► row t
//! ```
//!
//! A single seeded generator drives the whole run: it first produces the
//! price path, then every fill draw in fixed order (bid side, then ask side).
//! Sides blocked by the inventory cap consume no draw.

use mmsim_core::{Quantity, Side, SimulationConfig, TimeSeries, TimeSeriesRow, Trade};
use mmsim_market::{FillModel, PriceProcess, PriceProcessGenerator};
use mmsim_risk::{KpiError, KpiSummary, compute_kpis, compute_var};
use mmsim_strategy::{QuoteContext, QuotingModel, QuotingPolicy};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::error::Result;

/// Everything a finished run produced
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutput {
    pub timeseries: TimeSeries,
    pub trades: Vec<Trade>,
    pub final_inventory: Quantity,
    pub final_cash: f64,
    /// cash + inventory × last mid
    pub final_pnl: f64,
    /// Steps where the policy quote was crossed and replaced
    pub fallback_quotes: usize,
}

/// Mutable state of a run, owned by the engine loop
#[derive(Debug, Default)]
struct RunState {
    inventory: Quantity,
    cash: f64,
    trades: Vec<Trade>,
}

impl RunState {
    fn execute(&mut self, trade: Trade) {
        self.inventory += trade.signed_size();
        self.cash += trade.cash_flow();
        self.trades.push(trade);
    }

    fn mark_to_market(&self, mid: f64) -> f64 {
        self.cash + self.inventory * mid
    }
}

/// Single-run market-making simulator
///
/// Built from a validated config; [`SimulationEngine::run`] consumes it so a
/// generator is never reused across runs.
pub struct SimulationEngine {
    config: SimulationConfig,
    prices: PriceProcessGenerator,
    policy: QuotingPolicy,
    fills: FillModel,
    rng: StdRng,
}

impl SimulationEngine {
    /// Validate `config` and build every component
    ///
    /// All configuration errors surface here, before anything is drawn.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let prices = PriceProcessGenerator::from_config(&config);
        let policy = QuotingPolicy::from_config(&config)?;
        let fills = FillModel::from_config(&config)?;
        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self {
            config,
            prices,
            policy,
            fills,
            rng,
        })
    }

    /// Run the full simulation
    pub fn run(mut self) -> Result<SimulationOutput> {
        let config = &self.config;
        log::info!(
            "Starting run: seed={}, steps={}, dt={}s, prices={}, policy={}",
            config.seed,
            config.n_steps,
            config.dt_seconds,
            self.prices.name(),
            self.policy.name()
        );

        let path = self.prices.generate(config.n_steps, &mut self.rng)?;
        let volatility = if self.policy.needs_volatility() {
            path.volatility_proxy(config.heuristic.seconds_per_year, config.dt_seconds)
        } else {
            vec![0.0; path.len()]
        };

        let cap = config.max_inventory;
        let size = config.trade_size;
        let fee_rate = config.fee_rate();

        let mut state = RunState::default();
        let mut series = TimeSeries::with_len(path.len(), self.policy.records_reservation());
        let mut fallback_quotes = 0;

        for (t, &mid) in path.prices().iter().enumerate() {
            let quote = self.policy.quote(&QuoteContext {
                step: t,
                mid,
                volatility: volatility[t],
                inventory: state.inventory,
                tau: config.tau_at(t),
            });
            if quote.fallback {
                fallback_quotes += 1;
            }

            // both sides decided before any fill of this step
            let bid_active = state.inventory < cap;
            let ask_active = state.inventory > -cap;

            if bid_active && self.fills.try_fill(quote.bid_distance(mid), &mut self.rng) {
                let fee = quote.bid * size * fee_rate;
                state.execute(Trade::new(t, Side::Buy, quote.bid, size, mid).with_fee(fee));
            }
            if ask_active && self.fills.try_fill(quote.ask_distance(mid), &mut self.rng) {
                let fee = quote.ask * size * fee_rate;
                state.execute(Trade::new(t, Side::Sell, quote.ask, size, mid).with_fee(fee));
            }

            series.set_row(
                t,
                &TimeSeriesRow {
                    t,
                    mid,
                    bid: quote.bid,
                    ask: quote.ask,
                    inventory: state.inventory,
                    pnl: state.mark_to_market(mid),
                    reservation_price: quote.reservation_price,
                    half_spread: quote.half_spread,
                },
            )?;
        }

        if let Err(e) = series.validate() {
            log::warn!("Time series failed validation: {e}");
            return Err(e.into());
        }

        let last_mid = path.last().unwrap_or(config.s0);
        let final_pnl = state.mark_to_market(last_mid);
        log::info!(
            "Run finished: pnl={:.4}, inventory={}, trades={}, fallback quotes={}",
            final_pnl,
            state.inventory,
            state.trades.len(),
            fallback_quotes
        );

        Ok(SimulationOutput {
            timeseries: series,
            trades: state.trades,
            final_inventory: state.inventory,
            final_cash: state.cash,
            final_pnl,
            fallback_quotes,
        })
    }
}

/// Run one simulation for `config`
pub fn run_simulation(config: &SimulationConfig) -> Result<SimulationOutput> {
    SimulationEngine::new(config.clone())?.run()
}

/// Trade KPIs plus horizon VaR for a finished run
pub fn evaluate(
    config: &SimulationConfig,
    output: &SimulationOutput,
) -> std::result::Result<KpiSummary, KpiError> {
    let var = compute_var(
        &output.timeseries,
        config.var_horizon_seconds,
        config.dt_seconds,
        &config.var_levels,
    )?;
    Ok(compute_kpis(
        &output.timeseries,
        &output.trades,
        output.final_pnl,
        output.final_inventory,
        config.adverse_horizon_steps,
    )
    .with_var(&var)
    .with_fallback_quotes(output.fallback_quotes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mmsim_core::PolicyKind;

    #[test]
    fn test_run_state_accounting() {
        let mut state = RunState::default();
        state.execute(Trade::new(0, Side::Buy, 99.0, 2.0, 100.0).with_fee(0.5));
        state.execute(Trade::new(1, Side::Sell, 101.0, 1.0, 100.0));
        assert_eq!(state.inventory, 1.0);
        assert_relative_eq!(state.cash, -198.0 - 0.5 + 101.0, epsilon = 1e-12);
        assert_relative_eq!(state.mark_to_market(100.0), 2.5, epsilon = 1e-12);
        assert_eq!(state.trades.len(), 2);
    }

    #[test]
    fn test_invalid_config_fails_before_running() {
        let config = SimulationConfig::default().with_steps(1, 0.005);
        assert!(SimulationEngine::new(config).is_err());

        let config = SimulationConfig::default().with_steps(100, 0.0);
        assert!(run_simulation(&config).is_err());
    }

    #[test]
    fn test_output_shape() {
        let config = SimulationConfig::default();
        let output = run_simulation(&config).unwrap();
        assert_eq!(output.timeseries.len(), config.n_steps);
        assert!(output.timeseries.has_policy_columns());
        assert_eq!(
            output.timeseries.inventory().last().copied(),
            Some(output.final_inventory)
        );

        let config = config.with_policy(PolicyKind::Heuristic);
        let output = run_simulation(&config).unwrap();
        assert!(!output.timeseries.has_policy_columns());
    }

    #[test]
    fn test_evaluate_adds_var_and_fallbacks() {
        let config = SimulationConfig::default();
        let output = run_simulation(&config).unwrap();
        let summary = evaluate(&config, &output).unwrap();
        assert!(summary.var_at(0.95).is_some());
        assert!(summary.var_at(0.99).is_some());
        assert_eq!(summary.n_trades, output.trades.len());
        assert_eq!(summary.fallback_quotes, output.fallback_quotes);
    }
}

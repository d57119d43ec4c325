//! Configured quoting policy

use crate::avellaneda_stoikov::AvellanedaStoikov;
use crate::heuristic::HeuristicQuoter;
use crate::protocol::{QuoteContext, QuotingModel};
use crate::quote::Quote;
use mmsim_core::{ConfigError, PolicyKind, SimulationConfig};

/// Closed set of quoting policies selectable from config
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuotingPolicy {
    Heuristic(HeuristicQuoter),
    RiskAware(AvellanedaStoikov),
}

impl QuotingPolicy {
    pub fn from_config(config: &SimulationConfig) -> Result<Self, ConfigError> {
        Ok(match config.policy {
            PolicyKind::Heuristic => Self::Heuristic(HeuristicQuoter::from_config(config)?),
            PolicyKind::RiskAware => Self::RiskAware(AvellanedaStoikov::from_config(config)?),
        })
    }

    pub fn kind(&self) -> PolicyKind {
        match self {
            Self::Heuristic(_) => PolicyKind::Heuristic,
            Self::RiskAware(_) => PolicyKind::RiskAware,
        }
    }

    /// Whether quotes depend on the realized volatility estimate
    pub fn needs_volatility(&self) -> bool {
        matches!(self, Self::Heuristic(_))
    }

    /// Whether quotes carry reservation price and half-spread columns
    pub fn records_reservation(&self) -> bool {
        matches!(self, Self::RiskAware(_))
    }
}

impl QuotingModel for QuotingPolicy {
    fn compute_quote(&self, ctx: &QuoteContext) -> Quote {
        match self {
            Self::Heuristic(model) => model.compute_quote(ctx),
            Self::RiskAware(model) => model.compute_quote(ctx),
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::Heuristic(model) => model.name(),
            Self::RiskAware(model) => model.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_selects_policy() {
        let config = SimulationConfig::default();
        let policy = QuotingPolicy::from_config(&config).unwrap();
        assert_eq!(policy.kind(), PolicyKind::RiskAware);
        assert_eq!(policy.name(), "risk_aware");
        assert!(policy.records_reservation());
        assert!(!policy.needs_volatility());

        let config = config.with_policy(PolicyKind::Heuristic);
        let policy = QuotingPolicy::from_config(&config).unwrap();
        assert_eq!(policy.kind(), PolicyKind::Heuristic);
        assert_eq!(policy.name(), "heuristic");
        assert!(policy.needs_volatility());
        assert!(!policy.records_reservation());
    }

    #[test]
    fn test_invalid_gamma_rejected() {
        let config = SimulationConfig::default().with_gamma(-0.1);
        assert!(QuotingPolicy::from_config(&config).is_err());
    }

    #[test]
    fn test_quotes_always_uncrossed() {
        let config = SimulationConfig::default();
        let policy = QuotingPolicy::from_config(&config).unwrap();
        for inventory in [-50.0, -5.0, 0.0, 5.0, 50.0] {
            for tau in [0.0, 0.5, 1.0] {
                let quote = policy.quote(&QuoteContext {
                    step: 0,
                    mid: 100.0,
                    volatility: 0.0,
                    inventory,
                    tau,
                });
                assert!(quote.bid < quote.ask);
            }
        }
    }
}

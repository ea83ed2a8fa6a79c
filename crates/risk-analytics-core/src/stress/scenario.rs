use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RiskAnalyticsError;
use crate::types::Rate;
use crate::RiskAnalyticsResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioSeverity {
    Base,
    Moderate,
    Severe,
    Extreme,
}

/// Shock vector applied to every position in a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioShocks {
    /// Parallel rate move in basis points (+200 = rates up 2%)
    pub interest_rate_delta: Decimal,
    /// Credit spread move in basis points
    pub credit_spread_delta: Decimal,
    /// Fractional market value move (-0.15 = down 15%)
    pub market_value_shock: Rate,
    /// Fractional haircut on illiquid positions
    pub liquidity_shock: Rate,
    /// Fractional FX move. Carried for policy consumers; the collateral
    /// book is single-currency so it does not move stressed values.
    pub fx_shock: Rate,
    /// Change in recovery assumption, sets the face-value floor
    pub recovery_rate_shock: Rate,
}

impl ScenarioShocks {
    pub fn none() -> Self {
        Self {
            interest_rate_delta: Decimal::ZERO,
            credit_spread_delta: Decimal::ZERO,
            market_value_shock: Decimal::ZERO,
            liquidity_shock: Decimal::ZERO,
            fx_shock: Decimal::ZERO,
            recovery_rate_shock: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressScenario {
    pub id: String,
    pub name: String,
    pub severity: ScenarioSeverity,
    pub description: String,
    pub shocks: ScenarioShocks,
    /// Estimated probability of the scenario (0–1)
    pub probability: Rate,
}

impl StressScenario {
    pub fn validate(&self) -> RiskAnalyticsResult<()> {
        if self.id.trim().is_empty() {
            return Err(RiskAnalyticsError::InvalidInput {
                field: "scenario.id".into(),
                reason: "Scenario id must not be empty".into(),
            });
        }
        if self.probability < Decimal::ZERO || self.probability > Decimal::ONE {
            return Err(RiskAnalyticsError::InvalidInput {
                field: format!("scenarios.{}.probability", self.id),
                reason: "Probability must be between 0 and 1".into(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Default catalog
// ---------------------------------------------------------------------------

/// The five standard collateral stress scenarios, base case through
/// issuer default.
pub fn default_scenarios() -> Vec<StressScenario> {
    vec![
        StressScenario {
            id: "BASE".into(),
            name: "Base Case".into(),
            severity: ScenarioSeverity::Base,
            description: "Current market conditions, no incremental stress".into(),
            shocks: ScenarioShocks::none(),
            probability: dec!(0.70),
        },
        StressScenario {
            id: "MOD-RATE".into(),
            name: "Moderate Rate Rise".into(),
            severity: ScenarioSeverity::Moderate,
            description: "Rates +100bp, credit spreads +75bp, 5% market decline".into(),
            shocks: ScenarioShocks {
                interest_rate_delta: dec!(100),
                credit_spread_delta: dec!(75),
                market_value_shock: dec!(-0.05),
                liquidity_shock: dec!(-0.10),
                fx_shock: dec!(-0.02),
                recovery_rate_shock: dec!(-0.05),
            },
            probability: dec!(0.15),
        },
        StressScenario {
            id: "SEVERE-CREDIT".into(),
            name: "Severe Credit Event".into(),
            severity: ScenarioSeverity::Severe,
            description: "Spreads +300bp, 15% market decline, liquidity freeze".into(),
            shocks: ScenarioShocks {
                interest_rate_delta: dec!(50),
                credit_spread_delta: dec!(300),
                market_value_shock: dec!(-0.15),
                liquidity_shock: dec!(-0.30),
                fx_shock: dec!(-0.05),
                recovery_rate_shock: dec!(-0.15),
            },
            probability: dec!(0.10),
        },
        StressScenario {
            id: "EXTREME-2008".into(),
            name: "2008-Style Meltdown".into(),
            severity: ScenarioSeverity::Extreme,
            description: "Spreads +500bp, 30% decline, 50% liquidity freeze, counterparty stress".into(),
            shocks: ScenarioShocks {
                interest_rate_delta: dec!(-200),
                credit_spread_delta: dec!(500),
                market_value_shock: dec!(-0.30),
                liquidity_shock: dec!(-0.50),
                fx_shock: dec!(-0.10),
                recovery_rate_shock: dec!(-0.30),
            },
            probability: dec!(0.04),
        },
        StressScenario {
            id: "EXTREME-ISSUER".into(),
            name: "Issuer Default".into(),
            severity: ScenarioSeverity::Extreme,
            description: "Note issuer defaults, full collateral impairment".into(),
            shocks: ScenarioShocks {
                interest_rate_delta: Decimal::ZERO,
                credit_spread_delta: dec!(1000),
                market_value_shock: dec!(-0.60),
                liquidity_shock: dec!(-0.80),
                fx_shock: Decimal::ZERO,
                recovery_rate_shock: dec!(-0.60),
            },
            probability: dec!(0.01),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_catalog_shape() {
        let scenarios = default_scenarios();
        assert_eq!(scenarios.len(), 5);
        assert_eq!(scenarios[0].severity, ScenarioSeverity::Base);
        assert_eq!(scenarios[4].id, "EXTREME-ISSUER");
        let ids: HashSet<_> = scenarios.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), 5);
        assert!(scenarios.iter().all(|s| s.validate().is_ok()));
    }

    #[test]
    fn test_catalog_probabilities_sum_to_one() {
        let total: Decimal = default_scenarios().iter().map(|s| s.probability).sum();
        assert_eq!(total, Decimal::ONE);
    }

    #[test]
    fn test_probability_out_of_range_rejected() {
        let mut s = default_scenarios().remove(1);
        s.probability = dec!(1.5);
        assert!(s.validate().is_err());
    }
}

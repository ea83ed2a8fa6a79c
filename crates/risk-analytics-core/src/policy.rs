//! Risk policy and facility configuration.
//!
//! Every heuristic constant used by the analytics lives here. The policy
//! version is recorded on each report.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RiskAnalyticsError;
use crate::stress::ScenarioSeverity;
use crate::types::{Money, Rate, Years};
use crate::RiskAnalyticsResult;

// ---------------------------------------------------------------------------
// Facility
// ---------------------------------------------------------------------------

/// Credit facility secured by the collateral book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacilityConfig {
    /// Borrowing entity named on the report
    pub entity: String,
    /// Committed facility size
    pub facility_size: Money,
    /// Currently drawn amount
    pub outstanding_debt: Money,
    /// Collateral coverage covenant (e.g. 1.5 = 150%)
    pub minimum_coverage_ratio: Decimal,
}

impl Default for FacilityConfig {
    fn default() -> Self {
        Self {
            entity: String::new(),
            facility_size: Decimal::ZERO,
            outstanding_debt: Decimal::ZERO,
            minimum_coverage_ratio: dec!(1.5),
        }
    }
}

impl FacilityConfig {
    pub fn validate(&self) -> RiskAnalyticsResult<()> {
        if self.facility_size < Decimal::ZERO {
            return Err(RiskAnalyticsError::InvalidInput {
                field: "facility.facility_size".into(),
                reason: "Facility size cannot be negative".into(),
            });
        }
        if self.outstanding_debt < Decimal::ZERO {
            return Err(RiskAnalyticsError::InvalidInput {
                field: "facility.outstanding_debt".into(),
                reason: "Outstanding debt cannot be negative".into(),
            });
        }
        if self.minimum_coverage_ratio <= Decimal::ZERO {
            return Err(RiskAnalyticsError::InvalidInput {
                field: "facility.minimum_coverage_ratio".into(),
                reason: "Minimum coverage ratio must be positive".into(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Post-stress LTV thresholds above which each liquidation tier applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiquidationTiers {
    pub critical: Rate,
    pub high: Rate,
    pub moderate: Rate,
    pub low: Rate,
}

impl Default for LiquidationTiers {
    fn default() -> Self {
        Self {
            critical: dec!(0.80),
            high: dec!(0.65),
            moderate: dec!(0.50),
            low: dec!(0.40),
        }
    }
}

/// Estimated days to recover from a scenario, by severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryDays {
    pub base: u32,
    pub moderate: u32,
    pub severe: u32,
    pub extreme: u32,
}

impl Default for RecoveryDays {
    fn default() -> Self {
        Self {
            base: 0,
            moderate: 30,
            severe: 90,
            extreme: 365,
        }
    }
}

impl RecoveryDays {
    pub fn for_severity(&self, severity: ScenarioSeverity) -> u32 {
        match severity {
            ScenarioSeverity::Base => self.base,
            ScenarioSeverity::Moderate => self.moderate,
            ScenarioSeverity::Severe => self.severe,
            ScenarioSeverity::Extreme => self.extreme,
        }
    }
}

/// Versioned set of heuristic risk parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskPolicy {
    pub version: String,
    /// Correlation between positions sharing a correlation bucket
    pub same_bucket_correlation: f64,
    /// Correlation between positions in different buckets
    pub cross_bucket_correlation: f64,
    /// Trading days per year for volatility scaling
    pub trading_days_per_year: u32,
    /// Maximum single-name share of total market value
    pub single_name_limit: Rate,
    /// Post-stress LTV covenant
    pub max_ltv: Rate,
    pub liquidation_tiers: LiquidationTiers,
    /// Positions scoring below this take the stress liquidity penalty
    pub liquidity_penalty_threshold: u8,
    /// Positions scoring at or above this count as HQLA
    pub hqla_liquidity_threshold: u8,
    /// Lowest recovery fraction of face value a stressed position can fall to
    pub recovery_floor: Rate,
    /// Coupon assumed when a bond-like position carries none
    pub default_coupon_rate: Rate,
    /// Duration assumed when a position has no maturity date
    pub default_duration: Years,
    pub days_per_year: Decimal,
    /// Monthly operating outflow as a fraction of facility size
    pub monthly_operating_cost_rate: Rate,
    /// LCR below this is `Critical`
    pub lcr_critical_threshold: Decimal,
    /// LCR below this is `Warning`
    pub lcr_warning_threshold: Decimal,
    pub recovery_days: RecoveryDays,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            version: "2024.1".into(),
            same_bucket_correlation: 0.8,
            cross_bucket_correlation: 0.3,
            trading_days_per_year: 252,
            single_name_limit: dec!(0.35),
            max_ltv: dec!(0.65),
            liquidation_tiers: LiquidationTiers::default(),
            liquidity_penalty_threshold: 7,
            hqla_liquidity_threshold: 7,
            recovery_floor: dec!(0.10),
            default_coupon_rate: dec!(0.05),
            default_duration: dec!(3.0),
            days_per_year: dec!(365.25),
            monthly_operating_cost_rate: dec!(0.005),
            lcr_critical_threshold: dec!(1.0),
            lcr_warning_threshold: dec!(1.5),
            recovery_days: RecoveryDays::default(),
        }
    }
}

impl RiskPolicy {
    pub fn validate(&self) -> RiskAnalyticsResult<()> {
        for (field, rho) in [
            ("same_bucket_correlation", self.same_bucket_correlation),
            ("cross_bucket_correlation", self.cross_bucket_correlation),
        ] {
            if !(-1.0..=1.0).contains(&rho) {
                return Err(RiskAnalyticsError::InvalidInput {
                    field: format!("policy.{field}"),
                    reason: "Correlation must be between -1 and 1".into(),
                });
            }
        }
        if self.trading_days_per_year == 0 {
            return Err(RiskAnalyticsError::InvalidInput {
                field: "policy.trading_days_per_year".into(),
                reason: "Must be at least 1".into(),
            });
        }
        if self.days_per_year <= Decimal::ZERO {
            return Err(RiskAnalyticsError::InvalidInput {
                field: "policy.days_per_year".into(),
                reason: "Must be positive".into(),
            });
        }
        if self.single_name_limit <= Decimal::ZERO || self.single_name_limit > Decimal::ONE {
            return Err(RiskAnalyticsError::InvalidInput {
                field: "policy.single_name_limit".into(),
                reason: "Single-name limit must be in (0, 1]".into(),
            });
        }
        if self.recovery_floor < Decimal::ZERO || self.recovery_floor > Decimal::ONE {
            return Err(RiskAnalyticsError::InvalidInput {
                field: "policy.recovery_floor".into(),
                reason: "Recovery floor must be between 0 and 1".into(),
            });
        }
        if self.lcr_critical_threshold > self.lcr_warning_threshold {
            return Err(RiskAnalyticsError::InvalidInput {
                field: "policy.lcr_critical_threshold".into(),
                reason: "Critical LCR threshold cannot exceed the warning threshold".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_policy_json_fills_defaults() {
        let policy: RiskPolicy =
            serde_json::from_str(r#"{"version":"test","single_name_limit":"0.25"}"#).unwrap();
        assert_eq!(policy.version, "test");
        assert_eq!(policy.single_name_limit, dec!(0.25));
        assert_eq!(policy.max_ltv, dec!(0.65));
        assert_eq!(policy.recovery_days.extreme, 365);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_facility_defaults_minimum_coverage() {
        let facility: FacilityConfig = serde_json::from_str(r#"{"outstanding_debt":"100"}"#).unwrap();
        assert_eq!(facility.minimum_coverage_ratio, dec!(1.5));
        assert_eq!(facility.outstanding_debt, dec!(100));
    }

    #[test]
    fn test_invalid_correlation_rejected() {
        let policy = RiskPolicy {
            same_bucket_correlation: 1.5,
            ..RiskPolicy::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_negative_debt_rejected() {
        let facility = FacilityConfig {
            outstanding_debt: dec!(-1),
            ..FacilityConfig::default()
        };
        assert!(facility.validate().is_err());
    }

    #[test]
    fn test_recovery_days_lookup() {
        let days = RecoveryDays::default();
        assert_eq!(days.for_severity(ScenarioSeverity::Base), 0);
        assert_eq!(days.for_severity(ScenarioSeverity::Severe), 90);
    }
}

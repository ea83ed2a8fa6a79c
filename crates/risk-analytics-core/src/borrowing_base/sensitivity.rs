use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::policy::{FacilityConfig, RiskPolicy};
use crate::positions::CollateralPosition;
use crate::types::{Money, Rate, Ratio};

use super::calculator::compute_borrowing_base;

/// Borrowing base outcome under one uniform market-value shock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    /// Fractional market value move (-0.10 = down 10%)
    pub shock: Rate,
    pub net_borrowing_base: Money,
    pub coverage_ratio: Ratio,
    pub ltv: Rate,
    /// Count of coverage and LTV covenants breached
    pub covenant_breaches: u32,
}

/// Shock grid used when the caller does not supply one.
pub fn default_sensitivity_shocks() -> Vec<Rate> {
    vec![
        dec!(-0.30),
        dec!(-0.20),
        dec!(-0.15),
        dec!(-0.10),
        dec!(-0.05),
        Decimal::ZERO,
        dec!(0.05),
        dec!(0.10),
    ]
}

/// Recompute the borrowing base with every market value scaled by each
/// shock in turn. Works on a private copy of the positions.
pub fn run_sensitivity(
    positions: &[CollateralPosition],
    shocks: &[Rate],
    facility: &FacilityConfig,
    policy: &RiskPolicy,
    timestamp: DateTime<Utc>,
) -> Vec<SensitivityPoint> {
    shocks
        .iter()
        .map(|&shock| {
            let shocked: Vec<CollateralPosition> = positions
                .iter()
                .map(|p| CollateralPosition {
                    market_value: (p.market_value * (Decimal::ONE + shock)).max(Decimal::ZERO),
                    ..p.clone()
                })
                .collect();

            let bb = compute_borrowing_base(&shocked, facility, policy, timestamp);

            let mut covenant_breaches = 0;
            if bb.coverage_ratio.is_below(facility.minimum_coverage_ratio) {
                covenant_breaches += 1;
            }
            if bb.ltv > policy.max_ltv {
                covenant_breaches += 1;
            }

            SensitivityPoint {
                shock,
                net_borrowing_base: bb.total_net_eligible,
                coverage_ratio: bb.coverage_ratio,
                ltv: bb.ltv,
                covenant_breaches,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::positions::CollateralType;
    use chrono::TimeZone;

    fn pos(id: &str, mv: Decimal) -> CollateralPosition {
        CollateralPosition {
            id: id.into(),
            name: id.into(),
            collateral_type: CollateralType::Stablecoin,
            face_value: mv,
            market_value: mv,
            custodian: "C".into(),
            cusip: None,
            coupon_rate: None,
            maturity_date: None,
            advance_rate: dec!(0.9),
            haircut: dec!(0.1),
            volatility: dec!(0.01),
            correlation_bucket: "cash".into(),
            liquidity_score: 10,
        }
    }

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_sweep_does_not_touch_inputs() {
        let positions = vec![pos("A", dec!(300)), pos("B", dec!(300)), pos("C", dec!(400))];
        let before = positions.clone();
        let facility = FacilityConfig {
            outstanding_debt: dec!(500),
            ..FacilityConfig::default()
        };
        let points = run_sensitivity(&positions, &default_sensitivity_shocks(), &facility, &RiskPolicy::default(), ts());
        assert_eq!(points.len(), 8);
        assert_eq!(positions, before);
    }

    #[test]
    fn test_breaches_appear_as_values_fall() {
        // NAV 1000, debt 600: coverage 1.667 at 0%, 1.167 at -30%
        let positions = vec![pos("A", dec!(300)), pos("B", dec!(300)), pos("C", dec!(400))];
        let facility = FacilityConfig {
            outstanding_debt: dec!(600),
            ..FacilityConfig::default()
        };
        let points = run_sensitivity(&positions, &[dec!(-0.30), Decimal::ZERO], &facility, &RiskPolicy::default(), ts());

        let stressed = &points[0];
        assert_eq!(stressed.coverage_ratio, Ratio::Finite(dec!(1.1667)));
        assert_eq!(stressed.ltv, dec!(0.8571));
        assert_eq!(stressed.covenant_breaches, 2);

        let flat = &points[1];
        assert_eq!(flat.covenant_breaches, 0);
        assert!(flat.net_borrowing_base > stressed.net_borrowing_base);
    }
}

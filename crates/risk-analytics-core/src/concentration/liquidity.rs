use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::policy::{FacilityConfig, RiskPolicy};
use crate::positions::CollateralPosition;
use crate::types::{round_currency, Money, Ratio, RATIO_DP};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiquidityStatus {
    Adequate,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiquidityCoverage {
    pub lcr: Ratio,
    pub high_quality_liquid_assets: Money,
    /// Projected outflows over the next 30 days
    pub net_cash_outflows_30d: Money,
    pub status: LiquidityStatus,
}

/// Liquidity coverage ratio of the collateral book against one month of
/// coupon service and facility operating cost.
pub fn compute_liquidity_coverage(
    positions: &[CollateralPosition],
    facility: &FacilityConfig,
    policy: &RiskPolicy,
) -> LiquidityCoverage {
    let hqla: Money = positions
        .iter()
        .filter(|p| p.liquidity_score >= policy.hqla_liquidity_threshold)
        .map(|p| p.market_value)
        .sum();

    let annual_coupon: Money = positions
        .iter()
        .filter(|p| p.collateral_type.is_bond_like())
        .map(|p| p.face_value * p.coupon_rate.unwrap_or(policy.default_coupon_rate))
        .sum();

    let monthly_outflow =
        annual_coupon / dec!(12) + facility.facility_size * policy.monthly_operating_cost_rate;

    let lcr = Ratio::of(hqla, monthly_outflow);

    LiquidityCoverage {
        lcr: lcr.round_dp(RATIO_DP),
        high_quality_liquid_assets: round_currency(hqla),
        net_cash_outflows_30d: round_currency(monthly_outflow),
        status: classify_lcr(lcr, policy),
    }
}

/// Below the critical threshold is `Critical`, below the warning threshold
/// is `Warning`; a ratio exactly at a threshold takes the better status.
pub fn classify_lcr(lcr: Ratio, policy: &RiskPolicy) -> LiquidityStatus {
    if lcr.is_below(policy.lcr_critical_threshold) {
        LiquidityStatus::Critical
    } else if lcr.is_below(policy.lcr_warning_threshold) {
        LiquidityStatus::Warning
    } else {
        LiquidityStatus::Adequate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::positions::CollateralType;

    fn pos(ctype: CollateralType, face: Decimal, mv: Decimal, coupon: Option<Decimal>, liquidity: u8) -> CollateralPosition {
        CollateralPosition {
            id: format!("{ctype:?}-{liquidity}"),
            name: "P".into(),
            collateral_type: ctype,
            face_value: face,
            market_value: mv,
            custodian: "C".into(),
            cusip: None,
            coupon_rate: coupon,
            maturity_date: None,
            advance_rate: dec!(0.5),
            haircut: dec!(0.5),
            volatility: dec!(0.1),
            correlation_bucket: "b".into(),
            liquidity_score: liquidity,
        }
    }

    #[test]
    fn test_boundary_ratio_is_adequate() {
        // HQLA 150, outflow = 20,000 * 0.005 = 100
        let positions = vec![pos(CollateralType::Stablecoin, dec!(150), dec!(150), None, 8)];
        let facility = FacilityConfig {
            facility_size: dec!(20000),
            ..FacilityConfig::default()
        };
        let lc = compute_liquidity_coverage(&positions, &facility, &RiskPolicy::default());
        assert_eq!(lc.high_quality_liquid_assets, dec!(150));
        assert_eq!(lc.net_cash_outflows_30d, dec!(100));
        assert_eq!(lc.lcr, Ratio::Finite(dec!(1.5)));
        assert_eq!(lc.status, LiquidityStatus::Adequate);
    }

    #[test]
    fn test_classification_thresholds() {
        let policy = RiskPolicy::default();
        assert_eq!(classify_lcr(Ratio::Finite(dec!(0.99)), &policy), LiquidityStatus::Critical);
        assert_eq!(classify_lcr(Ratio::Finite(dec!(1.0)), &policy), LiquidityStatus::Warning);
        assert_eq!(classify_lcr(Ratio::Finite(dec!(1.49)), &policy), LiquidityStatus::Warning);
        assert_eq!(classify_lcr(Ratio::Finite(dec!(1.5)), &policy), LiquidityStatus::Adequate);
        assert_eq!(classify_lcr(Ratio::Infinite, &policy), LiquidityStatus::Adequate);
    }

    #[test]
    fn test_coupon_outflows_from_bond_like_positions() {
        // MTN face 1,200,000 @ 6% -> 6,000/month; bond with default 5% on 240,000 -> 1,000/month
        let positions = vec![
            pos(CollateralType::MediumTermNote, dec!(1200000), dec!(1000000), Some(dec!(0.06)), 4),
            pos(CollateralType::Bond, dec!(240000), dec!(240000), None, 5),
            pos(CollateralType::Stablecoin, dec!(14000), dec!(14000), Some(dec!(0.10)), 10),
        ];
        let lc = compute_liquidity_coverage(&positions, &FacilityConfig::default(), &RiskPolicy::default());
        assert_eq!(lc.net_cash_outflows_30d, dec!(7000));
        assert_eq!(lc.high_quality_liquid_assets, dec!(14000));
        assert_eq!(lc.lcr, Ratio::Finite(dec!(2)));
        assert_eq!(lc.status, LiquidityStatus::Adequate);
    }

    #[test]
    fn test_no_outflows_is_infinite() {
        let positions = vec![pos(CollateralType::Token, dec!(10), dec!(10), None, 9)];
        let lc = compute_liquidity_coverage(&positions, &FacilityConfig::default(), &RiskPolicy::default());
        assert_eq!(lc.lcr, Ratio::Infinite);
        assert_eq!(lc.status, LiquidityStatus::Adequate);
    }

    #[test]
    fn test_illiquid_book_is_critical() {
        let positions = vec![pos(CollateralType::RealEstate, dec!(1000), dec!(1000), None, 2)];
        let facility = FacilityConfig {
            facility_size: dec!(1000),
            ..FacilityConfig::default()
        };
        let lc = compute_liquidity_coverage(&positions, &facility, &RiskPolicy::default());
        assert_eq!(lc.lcr, Ratio::Finite(Decimal::ZERO));
        assert_eq!(lc.status, LiquidityStatus::Critical);
    }
}

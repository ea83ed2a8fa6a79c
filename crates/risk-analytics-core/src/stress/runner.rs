use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::math::estimate_duration;
use crate::policy::{FacilityConfig, RiskPolicy};
use crate::positions::{total_market_value, CollateralPosition};
use crate::types::{
    ratio_or_zero, round_currency, round_ratio, saturating_mul, to_percent, Money, Ratio, RATIO_DP,
};

use super::scenario::{ScenarioShocks, StressScenario};

const BPS: Decimal = dec!(10000);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Liquidation risk tier derived from post-stress LTV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiquidationRisk {
    None,
    Low,
    Moderate,
    High,
    Critical,
}

/// One position's value before and after a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressedPosition {
    pub id: String,
    pub market_value: Money,
    pub stressed_value: Money,
    /// Face-value recovery floor for this scenario
    pub recovery_floor: Money,
    /// True when the floor, not the shock, set the stressed value
    pub floor_applied: bool,
}

/// Outcome of one scenario against the whole book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressTestResult {
    pub scenario: StressScenario,
    pub pre_stress_nav: Money,
    pub post_stress_nav: Money,
    pub nav_impact: Money,
    pub nav_impact_percent: Decimal,
    pub pre_stress_coverage: Ratio,
    pub post_stress_coverage: Ratio,
    pub pre_stress_ltv: Decimal,
    pub post_stress_ltv: Decimal,
    pub covenant_breaches: Vec<String>,
    pub margin_call_triggered: bool,
    pub liquidation_risk: LiquidationRisk,
    pub recovery_days: u32,
    pub positions: Vec<StressedPosition>,
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run every scenario against the book, in catalog order.
pub fn run_stress_tests(
    positions: &[CollateralPosition],
    scenarios: &[StressScenario],
    facility: &FacilityConfig,
    policy: &RiskPolicy,
    timestamp: DateTime<Utc>,
) -> Vec<StressTestResult> {
    scenarios
        .iter()
        .map(|s| run_stress_test(positions, s, facility, policy, timestamp))
        .collect()
}

/// Apply one scenario to every position and derive covenant outcomes.
///
/// Pure: the result depends only on the inputs and the positions are not
/// modified.
pub fn run_stress_test(
    positions: &[CollateralPosition],
    scenario: &StressScenario,
    facility: &FacilityConfig,
    policy: &RiskPolicy,
    timestamp: DateTime<Utc>,
) -> StressTestResult {
    let as_of = timestamp.date_naive();
    let debt = facility.outstanding_debt;
    let minimum = facility.minimum_coverage_ratio;

    let pre_nav = total_market_value(positions);
    let pre_coverage = Ratio::of(pre_nav, debt);
    let pre_ltv = ratio_or_zero(debt, pre_nav);

    let stressed: Vec<StressedPosition> = positions
        .iter()
        .map(|p| stress_position(p, &scenario.shocks, as_of, policy))
        .collect();
    let post_nav: Money = stressed.iter().map(|s| s.stressed_value).sum();

    let post_coverage = Ratio::of(post_nav, debt);
    // Saturates at Decimal::MAX when debt dwarfs the stressed book
    let post_ltv = if post_nav.is_zero() {
        Decimal::ONE
    } else {
        ratio_or_zero(debt, post_nav)
    };

    let mut covenant_breaches = Vec::new();
    let margin_call_triggered = post_coverage.is_below(minimum);
    if margin_call_triggered {
        covenant_breaches.push(format!(
            "Coverage ratio {}x < {}x minimum",
            post_coverage.round_dp(2),
            minimum.normalize()
        ));
    }
    if post_ltv > policy.max_ltv {
        covenant_breaches.push(format!(
            "LTV {}% > {}% maximum",
            saturating_mul(post_ltv, Decimal::ONE_HUNDRED).round_dp(1),
            (policy.max_ltv * Decimal::ONE_HUNDRED).normalize()
        ));
    }

    let liquidation_risk = liquidation_tier(post_ltv, policy);
    let nav_impact = post_nav - pre_nav;

    let result = StressTestResult {
        scenario: scenario.clone(),
        pre_stress_nav: round_currency(pre_nav),
        post_stress_nav: round_currency(post_nav),
        nav_impact: round_currency(nav_impact),
        nav_impact_percent: to_percent(ratio_or_zero(nav_impact, pre_nav)),
        pre_stress_coverage: pre_coverage.round_dp(RATIO_DP),
        post_stress_coverage: post_coverage.round_dp(RATIO_DP),
        pre_stress_ltv: round_ratio(pre_ltv),
        post_stress_ltv: round_ratio(post_ltv),
        covenant_breaches,
        margin_call_triggered,
        liquidation_risk,
        recovery_days: policy.recovery_days.for_severity(scenario.severity),
        positions: stressed
            .into_iter()
            .map(|s| StressedPosition {
                stressed_value: round_currency(s.stressed_value),
                recovery_floor: round_currency(s.recovery_floor),
                ..s
            })
            .collect(),
        timestamp,
    };

    debug!(
        scenario = %scenario.id,
        post_nav = %result.post_stress_nav,
        post_ltv = %result.post_stress_ltv,
        risk = ?result.liquidation_risk,
        "stress scenario evaluated"
    );

    result
}

/// Stressed value of one position under a shock vector.
///
/// Market shock first; bond-like positions then take rate and spread
/// impacts off the same post-market-shock base; illiquid positions take a
/// liquidity penalty; the result never falls below the recovery floor.
pub fn stress_position(
    position: &CollateralPosition,
    shocks: &ScenarioShocks,
    as_of: chrono::NaiveDate,
    policy: &RiskPolicy,
) -> StressedPosition {
    let mut value = position.market_value * (Decimal::ONE + shocks.market_value_shock);

    if position.collateral_type.is_bond_like() {
        let duration = estimate_duration(position, as_of, policy);
        let base = value;
        let spread_impact = -(shocks.credit_spread_delta / BPS) * duration * base;
        let rate_impact = -(shocks.interest_rate_delta / BPS) * duration * base;
        value = base + spread_impact + rate_impact;
    }

    if position.liquidity_score < policy.liquidity_penalty_threshold {
        let illiquidity = Decimal::ONE - Decimal::from(position.liquidity_score) / dec!(10);
        value *= Decimal::ONE + shocks.liquidity_shock * illiquidity;
    }

    let floor_rate = policy
        .recovery_floor
        .max(Decimal::ONE + shocks.recovery_rate_shock);
    let recovery_floor = position.face_value * floor_rate;
    let floor_applied = value < recovery_floor;

    StressedPosition {
        id: position.id.clone(),
        market_value: position.market_value,
        stressed_value: value.max(recovery_floor),
        recovery_floor,
        floor_applied,
    }
}

fn liquidation_tier(ltv: Decimal, policy: &RiskPolicy) -> LiquidationRisk {
    let tiers = &policy.liquidation_tiers;
    if ltv > tiers.critical {
        LiquidationRisk::Critical
    } else if ltv > tiers.high {
        LiquidationRisk::High
    } else if ltv > tiers.moderate {
        LiquidationRisk::Moderate
    } else if ltv > tiers.low {
        LiquidationRisk::Low
    } else {
        LiquidationRisk::None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

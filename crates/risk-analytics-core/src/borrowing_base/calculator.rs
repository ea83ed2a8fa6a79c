use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::policy::{FacilityConfig, RiskPolicy};
use crate::positions::{total_market_value, CollateralPosition};
use crate::types::{ratio_or_zero, round_currency, round_ratio, Money, Rate, Ratio, RATIO_DP};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Borrowing base contribution of one position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowingBaseLine {
    pub id: String,
    pub name: String,
    pub market_value: Money,
    pub advance_rate: Rate,
    /// market_value * advance_rate
    pub eligible_amount: Money,
    /// Single-name limit as a share of total market value
    pub concentration_limit: Rate,
    /// Market value held above the single-name limit
    pub concentration_excess: Money,
    /// max(0, eligible - excess)
    pub net_eligible: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowingBaseCalc {
    pub date: NaiveDate,
    pub positions: Vec<BorrowingBaseLine>,
    pub total_market_value: Money,
    pub total_eligible: Money,
    pub total_net_eligible: Money,
    pub outstanding_debt: Money,
    pub available_capacity: Money,
    pub utilization_rate: Rate,
    pub coverage_ratio: Ratio,
    pub ltv: Rate,
    pub minimum_coverage_required: Decimal,
    /// Collateral value above the coverage covenant
    pub headroom: Money,
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the borrowing base schedule.
///
/// Totals are sums of the rounded per-position lines so the schedule
/// foots exactly.
pub fn compute_borrowing_base(
    positions: &[CollateralPosition],
    facility: &FacilityConfig,
    policy: &RiskPolicy,
    timestamp: DateTime<Utc>,
) -> BorrowingBaseCalc {
    let total_mv = total_market_value(positions);
    let limit = policy.single_name_limit;
    let debt = facility.outstanding_debt;

    let lines: Vec<BorrowingBaseLine> = positions
        .iter()
        .map(|p| {
            let weight = ratio_or_zero(p.market_value, total_mv);
            let excess = (weight - limit).max(Decimal::ZERO) * p.market_value;
            let eligible = p.market_value * p.advance_rate;
            let net = (eligible - excess).max(Decimal::ZERO);
            BorrowingBaseLine {
                id: p.id.clone(),
                name: p.name.clone(),
                market_value: round_currency(p.market_value),
                advance_rate: p.advance_rate,
                eligible_amount: round_currency(eligible),
                concentration_limit: limit,
                concentration_excess: round_currency(excess),
                net_eligible: round_currency(net),
            }
        })
        .collect();

    let total_eligible: Money = lines.iter().map(|l| l.eligible_amount).sum();
    let total_net_eligible: Money = lines.iter().map(|l| l.net_eligible).sum();

    let coverage_ratio = Ratio::of(total_mv, debt);
    let headroom = total_mv - facility.minimum_coverage_ratio * debt;

    let calc = BorrowingBaseCalc {
        date: timestamp.date_naive(),
        positions: lines,
        total_market_value: round_currency(total_mv),
        total_eligible,
        total_net_eligible,
        outstanding_debt: round_currency(debt),
        available_capacity: round_currency(total_net_eligible - debt),
        utilization_rate: round_ratio(ratio_or_zero(debt, total_net_eligible)),
        coverage_ratio: coverage_ratio.round_dp(RATIO_DP),
        ltv: round_ratio(ratio_or_zero(debt, total_mv)),
        minimum_coverage_required: facility.minimum_coverage_ratio,
        headroom: round_currency(headroom),
        timestamp,
    };

    debug!(
        net_eligible = %calc.total_net_eligible,
        available = %calc.available_capacity,
        coverage = %calc.coverage_ratio,
        "computed borrowing base"
    );

    calc
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

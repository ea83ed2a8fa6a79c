use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::policy::RiskPolicy;
use crate::positions::{total_market_value, CollateralPosition};
use crate::types::{ratio_or_zero, round_ratio, to_percent, Rate, RATIO_DP};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopHolding {
    pub name: String,
    /// Share of total market value, in percent
    pub percent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationRisk {
    /// Sum of squared weights; 1/N for an equal-weight book, 1 for a single name
    pub herfindahl_index: Decimal,
    /// Largest holding; absent for an empty book
    pub top_holding: Option<TopHolding>,
    pub single_name_limit: Rate,
    pub breaches: Vec<String>,
}

/// Herfindahl index, top holding, and single-name limit breaches.
pub fn compute_concentration_risk(positions: &[CollateralPosition], policy: &RiskPolicy) -> ConcentrationRisk {
    let total = total_market_value(positions);
    let limit = policy.single_name_limit;

    let weights: Vec<Decimal> = positions
        .iter()
        .map(|p| ratio_or_zero(p.market_value, total))
        .collect();

    let hhi: Decimal = weights.iter().map(|w| w * w).sum();

    // First position wins ties.
    let top_holding = positions
        .iter()
        .zip(&weights)
        .fold(None::<(&CollateralPosition, Decimal)>, |best, (p, &w)| match best {
            Some((_, bw)) if bw >= w => best,
            _ => Some((p, w)),
        })
        .map(|(p, w)| TopHolding {
            name: p.name.clone(),
            percent: to_percent(w),
        });

    let breaches = positions
        .iter()
        .zip(&weights)
        .filter(|(_, w)| **w > limit)
        .map(|(p, &w)| {
            format!(
                "{}: {}% exceeds {}% limit",
                p.name,
                to_percent(w).normalize(),
                (limit * Decimal::ONE_HUNDRED).normalize()
            )
        })
        .collect();

    ConcentrationRisk {
        herfindahl_index: reported_hhi(hhi),
        top_holding,
        single_name_limit: limit,
        breaches,
    }
}

/// HHI at reporting precision. A non-empty book never reports zero, so very
/// diffuse books show the smallest positive value instead.
fn reported_hhi(hhi: Decimal) -> Decimal {
    let rounded = round_ratio(hhi);
    if hhi > Decimal::ZERO && rounded.is_zero() {
        Decimal::new(1, RATIO_DP)
    } else {
        rounded
    }
}

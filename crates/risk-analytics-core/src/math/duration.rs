use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::policy::RiskPolicy;
use crate::positions::CollateralPosition;
use crate::types::Years;

/// Approximate modified duration of a position, in years.
///
/// Without a maturity date the policy default applies. Otherwise
/// `years_to_maturity * (1 - c / (1 + c))`, where `c` is the coupon rate
/// (policy default when unset). Matured paper has zero duration.
pub fn estimate_duration(position: &CollateralPosition, as_of: NaiveDate, policy: &RiskPolicy) -> Years {
    let Some(maturity) = position.maturity_date else {
        return policy.default_duration;
    };

    let days = (maturity - as_of).num_days();
    let years = (Decimal::from(days) / policy.days_per_year).max(Decimal::ZERO);
    let coupon = position.coupon_rate.unwrap_or(policy.default_coupon_rate);

    years * (Decimal::ONE - coupon / (Decimal::ONE + coupon))
}

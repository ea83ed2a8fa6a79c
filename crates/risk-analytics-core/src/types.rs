use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Year fractions or counts
pub type Years = Decimal;

/// Decimal places for currency amounts.
pub const CURRENCY_DP: u32 = 2;

/// Decimal places for ratios expressed as fractions (coverage, LTV, HHI, LCR).
pub const RATIO_DP: u32 = 4;

/// Decimal places for values scaled to percent.
pub const PERCENT_DP: u32 = 2;

/// A ratio whose denominator may legitimately be zero.
///
/// A zero denominator is not an error: zero debt means coverage is
/// unbounded, and the ratio is reported as `Infinite`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ratio {
    Finite(Decimal),
    Infinite,
}

impl Ratio {
    /// `numerator / denominator`, or `Infinite` when the denominator is zero
    /// or the quotient is too large for a Decimal. A quotient too small to
    /// represent is zero.
    pub fn of(numerator: Decimal, denominator: Decimal) -> Self {
        if denominator.is_zero() {
            return Ratio::Infinite;
        }
        match numerator.checked_div(denominator) {
            Some(v) => Ratio::Finite(v),
            None if numerator.abs() < denominator.abs() => Ratio::Finite(Decimal::ZERO),
            None => Ratio::Infinite,
        }
    }

    pub fn finite(&self) -> Option<Decimal> {
        match self {
            Ratio::Finite(v) => Some(*v),
            Ratio::Infinite => None,
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Ratio::Infinite)
    }

    /// True when the ratio is strictly below `threshold`. `Infinite` never is.
    pub fn is_below(&self, threshold: Decimal) -> bool {
        match self {
            Ratio::Finite(v) => *v < threshold,
            Ratio::Infinite => false,
        }
    }

    pub fn round_dp(&self, dp: u32) -> Self {
        match self {
            Ratio::Finite(v) => Ratio::Finite(v.round_dp(dp)),
            Ratio::Infinite => Ratio::Infinite,
        }
    }
}

impl std::fmt::Display for Ratio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ratio::Finite(v) => write!(f, "{v}"),
            Ratio::Infinite => write!(f, "inf"),
        }
    }
}

/// Round a monetary amount to the reporting precision.
pub fn round_currency(value: Money) -> Money {
    value.round_dp(CURRENCY_DP)
}

/// Round a fractional ratio to the reporting precision.
pub fn round_ratio(value: Decimal) -> Decimal {
    value.round_dp(RATIO_DP)
}

/// Scale a fraction to percent and round (0.123456 -> 12.35).
pub fn to_percent(fraction: Decimal) -> Decimal {
    saturating_mul(fraction, Decimal::ONE_HUNDRED).round_dp(PERCENT_DP)
}

/// `numerator / denominator`, or zero when the denominator is zero.
/// A quotient too large for Decimal saturates at `Decimal::MAX`/`MIN`.
pub fn ratio_or_zero(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator
        .checked_div(denominator)
        .unwrap_or_else(|| saturated(numerator.is_sign_negative() != denominator.is_sign_negative()))
}

/// `a * b`, saturating at `Decimal::MAX`/`MIN` on overflow.
pub fn saturating_mul(a: Decimal, b: Decimal) -> Decimal {
    a.checked_mul(b)
        .unwrap_or_else(|| saturated(a.is_sign_negative() != b.is_sign_negative()))
}

fn saturated(negative: bool) -> Decimal {
    if negative {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}

pub(crate) fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Convert a simulation output back to Decimal. Non-finite values map to zero.
pub(crate) fn from_f64(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_ratio_zero_denominator_is_infinite() {
        assert_eq!(Ratio::of(dec!(100), Decimal::ZERO), Ratio::Infinite);
        assert!(!Ratio::Infinite.is_below(dec!(1.5)));
    }

    #[test]
    fn test_ratio_finite_comparison() {
        let r = Ratio::of(dec!(150), dec!(100));
        assert_eq!(r, Ratio::Finite(dec!(1.5)));
        assert!(!r.is_below(dec!(1.5)));
        assert!(r.is_below(dec!(1.6)));
    }

    #[test]
    fn test_ratio_serializes_with_stable_tags() {
        let json = serde_json::to_string(&Ratio::Infinite).unwrap();
        assert_eq!(json, "\"infinite\"");
        let json = serde_json::to_string(&Ratio::Finite(dec!(2.5))).unwrap();
        assert_eq!(json, "{\"finite\":\"2.5\"}");
    }

    #[test]
    fn test_overflowing_ratio_saturates() {
        let huge = dec!(10000000000000000000000);
        let tiny = dec!(0.0000001);
        assert_eq!(ratio_or_zero(huge, tiny), Decimal::MAX);
        assert_eq!(ratio_or_zero(-huge, tiny), Decimal::MIN);
        assert_eq!(to_percent(Decimal::MAX), Decimal::MAX);
    }

    #[test]
    fn test_percent_scaling() {
        assert_eq!(to_percent(dec!(0.123456)), dec!(12.35));
        assert_eq!(ratio_or_zero(dec!(1), Decimal::ZERO), Decimal::ZERO);
    }
}

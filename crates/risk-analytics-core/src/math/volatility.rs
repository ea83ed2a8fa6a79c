use crate::policy::RiskPolicy;
use crate::positions::{total_market_value, CollateralPosition};
use crate::types::to_f64;

/// Annualised portfolio volatility with bucket-based correlation.
///
/// Positions sharing a correlation bucket co-move at the policy's
/// same-bucket correlation; all other pairs use the cross-bucket value.
/// Returns zero for an empty or zero-valued book.
pub fn portfolio_volatility(positions: &[CollateralPosition], policy: &RiskPolicy) -> f64 {
    let total = to_f64(total_market_value(positions));
    if total <= 0.0 {
        return 0.0;
    }

    let weights: Vec<f64> = positions
        .iter()
        .map(|p| to_f64(p.market_value) / total)
        .collect();
    let vols: Vec<f64> = positions.iter().map(|p| to_f64(p.volatility)).collect();

    let mut variance = 0.0;
    #[allow(clippy::needless_range_loop)]
    for i in 0..positions.len() {
        variance += weights[i] * weights[i] * vols[i] * vols[i];
        for j in (i + 1)..positions.len() {
            let rho = if positions[i].correlation_bucket == positions[j].correlation_bucket {
                policy.same_bucket_correlation
            } else {
                policy.cross_bucket_correlation
            };
            variance += 2.0 * weights[i] * weights[j] * rho * vols[i] * vols[j];
        }
    }

    variance.max(0.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::positions::CollateralType;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn pos(id: &str, mv: Decimal, vol: Decimal, bucket: &str) -> CollateralPosition {
        CollateralPosition {
            id: id.into(),
            name: id.into(),
            collateral_type: CollateralType::Token,
            face_value: mv,
            market_value: mv,
            custodian: "C".into(),
            cusip: None,
            coupon_rate: None,
            maturity_date: None,
            advance_rate: dec!(0.5),
            haircut: dec!(0.5),
            volatility: vol,
            correlation_bucket: bucket.into(),
            liquidity_score: 8,
        }
    }

    #[test]
    fn test_single_position_volatility_is_own_volatility() {
        let v = portfolio_volatility(&[pos("A", dec!(100), dec!(0.2), "x")], &RiskPolicy::default());
        assert!((v - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_two_positions_same_bucket() {
        // w = 0.5 each, sigma 0.2 each, rho 0.8
        // var = 2 * 0.25 * 0.04 + 2 * 0.25 * 0.8 * 0.04 = 0.02 + 0.016
        let positions = [pos("A", dec!(100), dec!(0.2), "x"), pos("B", dec!(100), dec!(0.2), "x")];
        let v = portfolio_volatility(&positions, &RiskPolicy::default());
        assert!((v - 0.036_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_cross_bucket_diversifies() {
        let same = [pos("A", dec!(100), dec!(0.2), "x"), pos("B", dec!(100), dec!(0.2), "x")];
        let cross = [pos("A", dec!(100), dec!(0.2), "x"), pos("B", dec!(100), dec!(0.2), "y")];
        let policy = RiskPolicy::default();
        assert!(portfolio_volatility(&cross, &policy) < portfolio_volatility(&same, &policy));
        // var = 0.02 + 2 * 0.25 * 0.3 * 0.04 = 0.026
        assert!((portfolio_volatility(&cross, &policy) - 0.026_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_is_configurable() {
        let positions = [pos("A", dec!(100), dec!(0.2), "x"), pos("B", dec!(100), dec!(0.2), "y")];
        let policy = RiskPolicy {
            cross_bucket_correlation: 1.0,
            ..RiskPolicy::default()
        };
        assert!((portfolio_volatility(&positions, &policy) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_empty_book_has_zero_volatility() {
        assert_eq!(portfolio_volatility(&[], &RiskPolicy::default()), 0.0);
    }
}

use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RiskAnalyticsError;
use crate::math::{inverse_normal_cdf, portfolio_volatility, standard_normal_sample};
use crate::policy::RiskPolicy;
use crate::positions::{total_market_value, CollateralPosition};
use crate::types::{from_f64, round_currency, to_f64, Money, Rate};
use crate::RiskAnalyticsResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Parameters for a single VaR run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarParams {
    /// Confidence level, strictly between 0 and 1 (e.g. 0.95)
    pub confidence: Rate,
    /// Holding horizon in trading days
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
    /// Number of Monte Carlo trials
    #[serde(default = "default_simulations")]
    pub simulations: u32,
}

fn default_horizon_days() -> u32 {
    10
}

fn default_simulations() -> u32 {
    10_000
}

impl VarParams {
    pub fn new(confidence: Rate, horizon_days: u32, simulations: u32) -> Self {
        Self {
            confidence,
            horizon_days,
            simulations,
        }
    }
}

impl Default for VarParams {
    fn default() -> Self {
        Self::new(dec!(0.95), default_horizon_days(), default_simulations())
    }
}

/// Value-at-Risk figures for one confidence level and horizon.
///
/// `simulated_var` is the empirical quantile of a Monte Carlo loss
/// distribution. It is not a replay of historical market moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarResult {
    pub confidence: Rate,
    pub horizon_days: u32,
    /// Normal-distribution VaR from portfolio volatility
    pub parametric_var: Money,
    /// Monte Carlo VaR
    pub simulated_var: Money,
    /// Expected shortfall beyond the simulated VaR
    pub conditional_var: Money,
    pub simulations: u32,
    pub timestamp: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute parametric and Monte Carlo VaR for a position set.
///
/// The generator is supplied by the caller; a seeded `StdRng` makes runs
/// reproducible. A zero-valued book returns all-zero figures.
pub fn compute_var<R: Rng + ?Sized>(
    positions: &[CollateralPosition],
    params: &VarParams,
    policy: &RiskPolicy,
    rng: &mut R,
    timestamp: DateTime<Utc>,
) -> RiskAnalyticsResult<VarResult> {
    validate_params(params)?;

    let zero = VarResult {
        confidence: params.confidence,
        horizon_days: params.horizon_days,
        parametric_var: Decimal::ZERO,
        simulated_var: Decimal::ZERO,
        conditional_var: Decimal::ZERO,
        simulations: params.simulations,
        timestamp,
    };

    let total_nav = to_f64(total_market_value(positions));
    if total_nav <= 0.0 {
        return Ok(zero);
    }

    let confidence = to_f64(params.confidence);
    let trading_days = f64::from(policy.trading_days_per_year);
    let horizon = f64::from(params.horizon_days);

    // -- Parametric --
    let sigma_p = portfolio_volatility(positions, policy);
    let z = inverse_normal_cdf(confidence)?;
    let parametric = total_nav * sigma_p * (horizon / trading_days).sqrt() * z;

    // -- Monte Carlo --
    let mut losses = simulate_losses(positions, total_nav, horizon, trading_days, params.simulations, rng);
    losses.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

    let rank = var_rank(losses.len(), params.confidence);
    let (simulated, conditional) = tail_statistics(&losses, rank);

    let result = VarResult {
        parametric_var: round_currency(from_f64(parametric)),
        simulated_var: round_currency(from_f64(simulated)),
        conditional_var: round_currency(from_f64(conditional)),
        ..zero
    };

    debug!(
        confidence = %result.confidence,
        horizon_days = result.horizon_days,
        parametric = %result.parametric_var,
        simulated = %result.simulated_var,
        conditional = %result.conditional_var,
        "computed VaR"
    );

    Ok(result)
}

// ---------------------------------------------------------------------------
// Internal logic
// ---------------------------------------------------------------------------

fn validate_params(params: &VarParams) -> RiskAnalyticsResult<()> {
    if params.confidence <= Decimal::ZERO || params.confidence >= Decimal::ONE {
        return Err(RiskAnalyticsError::InvalidInput {
            field: "confidence".into(),
            reason: "Confidence level must be between 0 and 1 (exclusive)".into(),
        });
    }
    if params.simulations == 0 {
        return Err(RiskAnalyticsError::InvalidInput {
            field: "simulations".into(),
            reason: "At least one simulation is required".into(),
        });
    }
    Ok(())
}

/// Simulated dollar losses, one per trial, in draw order.
fn simulate_losses<R: Rng + ?Sized>(
    positions: &[CollateralPosition],
    total_nav: f64,
    horizon: f64,
    trading_days: f64,
    simulations: u32,
    rng: &mut R,
) -> Vec<f64> {
    // weight * daily vol * sqrt(horizon), per position
    let scales: Vec<f64> = positions
        .iter()
        .map(|p| {
            let weight = to_f64(p.market_value) / total_nav;
            let daily_vol = to_f64(p.volatility) / trading_days.sqrt();
            weight * daily_vol * horizon.sqrt()
        })
        .collect();

    let mut losses = Vec::with_capacity(simulations as usize);
    for _ in 0..simulations {
        let mut portfolio_return = 0.0;
        for scale in &scales {
            portfolio_return += standard_normal_sample(&mut *rng) * scale;
        }
        losses.push(-portfolio_return * total_nav);
    }
    losses
}

/// Index of the VaR loss in a descending sort: floor(n * (1 - confidence)).
///
/// Computed in Decimal so that e.g. 10 * (1 - 0.8) is exactly 2.
fn var_rank(n: usize, confidence: Rate) -> usize {
    (Decimal::from(n as u64) * (Decimal::ONE - confidence))
        .floor()
        .to_usize()
        .unwrap_or(0)
}

/// VaR and CVaR from losses sorted in descending order.
fn tail_statistics(sorted_desc: &[f64], rank: usize) -> (f64, f64) {
    if sorted_desc.is_empty() {
        return (0.0, 0.0);
    }
    let rank = rank.min(sorted_desc.len() - 1);
    let var = sorted_desc[rank];

    let tail = &sorted_desc[..rank];
    let cvar = if tail.is_empty() {
        var
    } else {
        tail.iter().sum::<f64>() / tail.len() as f64
    };
    (var, cvar)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::positions::CollateralType;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

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

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_tail_statistics_picks_rank_and_averages_beyond() {
        let losses = [10.0, 8.0, 6.0, 4.0, 2.0, 0.0, -2.0, -4.0, -6.0, -8.0];
        // floor(10 * 0.2) = 2 -> VaR = 6, tail = [10, 8]
        assert_eq!(var_rank(losses.len(), dec!(0.8)), 2);
        let (var, cvar) = tail_statistics(&losses, 2);
        assert_eq!(var, 6.0);
        assert_eq!(cvar, 9.0);
    }

    #[test]
    fn test_tail_statistics_empty_tail_falls_back_to_var() {
        let losses = [5.0, 1.0, -1.0];
        assert_eq!(var_rank(losses.len(), dec!(0.9)), 0);
        let (var, cvar) = tail_statistics(&losses, 0);
        assert_eq!(var, 5.0);
        assert_eq!(cvar, 5.0);
    }

    #[test]
    fn test_single_position_parametric_var_is_closed_form() {
        let positions = vec![pos("A", dec!(1000000), dec!(0.20), "x")];
        let mut rng = StdRng::seed_from_u64(1);
        let result = compute_var(&positions, &VarParams::new(dec!(0.99), 10, 1000), &RiskPolicy::default(), &mut rng, ts()).unwrap();

        let z = inverse_normal_cdf(0.99).unwrap();
        let expected = 1_000_000.0 * 0.20 * (10.0_f64 / 252.0).sqrt() * z;
        assert!(
            (to_f64(result.parametric_var) - expected).abs() <= 0.005,
            "got {} expected {expected}",
            result.parametric_var
        );
    }

    #[test]
    fn test_zero_nav_returns_zero() {
        let positions = vec![pos("A", Decimal::ZERO, dec!(0.20), "x")];
        let mut rng = StdRng::seed_from_u64(1);
        let result = compute_var(&positions, &VarParams::default(), &RiskPolicy::default(), &mut rng, ts()).unwrap();
        assert_eq!(result.parametric_var, Decimal::ZERO);
        assert_eq!(result.simulated_var, Decimal::ZERO);
        assert_eq!(result.conditional_var, Decimal::ZERO);
        assert_eq!(result.simulations, 10_000);
    }

    #[test]
    fn test_invalid_confidence_rejected() {
        let positions = vec![pos("A", dec!(100), dec!(0.20), "x")];
        let mut rng = StdRng::seed_from_u64(1);
        for c in [Decimal::ZERO, Decimal::ONE, dec!(1.2)] {
            let params = VarParams::new(c, 10, 100);
            assert!(compute_var(&positions, &params, &RiskPolicy::default(), &mut rng, ts()).is_err());
        }
    }

    #[test]
    fn test_zero_simulations_rejected() {
        let positions = vec![pos("A", dec!(100), dec!(0.20), "x")];
        let mut rng = StdRng::seed_from_u64(1);
        let params = VarParams::new(dec!(0.95), 10, 0);
        assert!(compute_var(&positions, &params, &RiskPolicy::default(), &mut rng, ts()).is_err());
    }

    #[test]
    fn test_cvar_not_below_var() {
        let positions = vec![
            pos("A", dec!(600000), dec!(0.30), "x"),
            pos("B", dec!(400000), dec!(0.10), "y"),
        ];
        for seed in 0..5 {
            let mut rng = StdRng::seed_from_u64(seed);
            let r = compute_var(&positions, &VarParams::new(dec!(0.95), 10, 2000), &RiskPolicy::default(), &mut rng, ts()).unwrap();
            assert!(r.conditional_var >= r.simulated_var);
        }
    }

    #[test]
    fn test_simulated_var_near_parametric_for_independent_draws() {
        // A single position has no correlation term, so the Monte Carlo
        // quantile converges to the parametric figure.
        let positions = vec![pos("A", dec!(1000000), dec!(0.25), "x")];
        let mut rng = StdRng::seed_from_u64(2024);
        let r = compute_var(&positions, &VarParams::new(dec!(0.95), 10, 50_000), &RiskPolicy::default(), &mut rng, ts()).unwrap();
        let rel = ((r.simulated_var - r.parametric_var) / r.parametric_var).abs();
        assert!(rel < dec!(0.03), "relative gap {rel}");
    }
}

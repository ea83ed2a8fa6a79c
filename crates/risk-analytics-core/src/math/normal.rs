use rand::Rng;

use crate::error::RiskAnalyticsError;
use crate::RiskAnalyticsResult;

// Acklam's rational approximation to the standard normal quantile.
const A: [f64; 6] = [
    -3.969683028665376e+01,
    2.209460984245205e+02,
    -2.759285104469687e+02,
    1.383577518672690e+02,
    -3.066479806614716e+01,
    2.506628277459239e+00,
];
const B: [f64; 5] = [
    -5.447609879822406e+01,
    1.615858368580409e+02,
    -1.556989798598866e+02,
    6.680131188771972e+01,
    -1.328068155288572e+01,
];
const C: [f64; 6] = [
    -7.784894002430293e-03,
    -3.223964580411365e-01,
    -2.400758277161838e+00,
    -2.549732539343734e+00,
    4.374664141464968e+00,
    2.938163982698783e+00,
];
const D: [f64; 4] = [
    7.784695709041462e-03,
    3.224671290700398e-01,
    2.445134137142996e+00,
    3.754408661907416e+00,
];

const P_LOW: f64 = 0.02425;
const P_HIGH: f64 = 1.0 - P_LOW;

/// Inverse standard normal CDF (z-score for probability `p`).
///
/// Three-region rational approximation: a lower tail for p < 0.02425, a
/// central region, and an upper tail for p > 0.97575. Relative error is
/// around 1.15e-9 across (0, 1).
pub fn inverse_normal_cdf(p: f64) -> RiskAnalyticsResult<f64> {
    if !(p > 0.0 && p < 1.0) {
        return Err(RiskAnalyticsError::InvalidInput {
            field: "p".into(),
            reason: format!("Probability must be strictly between 0 and 1, got {p}"),
        });
    }

    let z = if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        tail(q)
    } else if p <= P_HIGH {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -tail(q)
    };
    Ok(z)
}

fn tail(q: f64) -> f64 {
    (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
        / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
}

/// Draw one standard normal variate with the Box–Muller transform.
///
/// `u` is redrawn while it is exactly zero so the logarithm stays finite.
pub fn standard_normal_sample<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let mut u: f64 = rng.gen();
    while u == 0.0 {
        u = rng.gen();
    }
    let v: f64 = rng.gen();
    (-2.0 * u.ln()).sqrt() * (2.0 * std::f64::consts::PI * v).cos()
}

pub mod herfindahl;
pub mod liquidity;

pub use herfindahl::{compute_concentration_risk, ConcentrationRisk, TopHolding};
pub use liquidity::{classify_lcr, compute_liquidity_coverage, LiquidityCoverage, LiquidityStatus};

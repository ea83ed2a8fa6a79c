use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use risk_analytics_core::seeded_rng;
use risk_analytics_core::var::VarParams;

use super::report::resolve_seed;
use super::{build_engine, BookArgs};

/// Arguments for Value-at-Risk
#[derive(Args)]
pub struct VarArgs {
    #[command(flatten)]
    pub book: BookArgs,

    /// Confidence level (e.g. 0.95 for 95%)
    #[arg(long, default_value = "0.95")]
    pub confidence: Decimal,

    /// Holding horizon in trading days
    #[arg(long, default_value_t = 10)]
    pub horizon_days: u32,

    /// Number of Monte Carlo trials
    #[arg(long, default_value_t = 10_000)]
    pub simulations: u32,

    /// Seed for the Monte Carlo generator (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Arguments for the market-value sensitivity sweep
#[derive(Args)]
pub struct SensitivityArgs {
    #[command(flatten)]
    pub book: BookArgs,

    /// Comma-separated market-value shocks as fractions (e.g. "-0.2,-0.1,0")
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub shocks: Option<Vec<Decimal>>,
}

pub fn run_var(args: VarArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let engine = build_engine(&args.book)?;
    let params = VarParams::new(args.confidence, args.horizon_days, args.simulations);
    let mut rng = seeded_rng(resolve_seed(args.seed));
    let result = engine.compute_var(&params, &mut rng)?;
    Ok(json!({ "result": result }))
}

pub fn run_borrowing_base(args: BookArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let engine = build_engine(&args)?;
    Ok(json!({ "result": engine.compute_borrowing_base() }))
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let engine = build_engine(&args.book)?;
    let points = engine.run_sensitivity(args.shocks.as_deref());
    Ok(json!({ "results": points }))
}

pub fn run_concentration(args: BookArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let engine = build_engine(&args)?;
    Ok(json!({ "result": engine.compute_concentration_risk() }))
}

pub fn run_liquidity(args: BookArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let engine = build_engine(&args)?;
    Ok(json!({ "result": engine.compute_liquidity_coverage() }))
}

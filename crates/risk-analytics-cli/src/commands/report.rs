use clap::Args;
use rand::Rng;
use serde_json::Value;

use risk_analytics_core::seeded_rng;

use super::{build_engine, BookArgs};

/// Arguments for the full risk report
#[derive(Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub book: BookArgs,

    /// Seed for the Monte Carlo generator (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run_report(args: ReportArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let engine = build_engine(&args.book)?;
    let mut rng = seeded_rng(resolve_seed(args.seed));
    let report = engine.generate_report(&mut rng)?;
    Ok(serde_json::to_value(report)?)
}

/// The supplied seed, or a fresh one from the thread generator.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| rand::thread_rng().gen())
}

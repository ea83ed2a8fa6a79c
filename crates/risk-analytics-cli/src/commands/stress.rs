use clap::Args;
use serde_json::{json, Value};

use risk_analytics_core::policy::RiskPolicy;
use risk_analytics_core::stress::default_scenarios;

use super::{build_engine, BookArgs};
use crate::input;

/// Arguments for stress testing
#[derive(Args)]
pub struct StressArgs {
    #[command(flatten)]
    pub book: BookArgs,

    /// Run only this scenario id
    #[arg(long)]
    pub scenario: Option<String>,
}

/// Arguments for listing the scenario catalog
#[derive(Args)]
pub struct ScenariosArgs {
    /// Path to JSON or YAML risk policy, for recovery-day estimates
    #[arg(long)]
    pub policy: Option<String>,
}

pub fn run_stress(args: StressArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let engine = build_engine(&args.book)?;
    match args.scenario {
        Some(ref id) => Ok(json!({ "result": engine.run_stress_scenario(id)? })),
        None => Ok(json!({ "results": engine.run_stress_tests() })),
    }
}

pub fn run_scenarios(args: ScenariosArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let policy: RiskPolicy = input::load_policy(&args.policy)?;
    let rows: Vec<Value> = default_scenarios()
        .into_iter()
        .map(|s| {
            json!({
                "id": s.id,
                "name": s.name,
                "severity": s.severity,
                "probability": s.probability,
                "recovery_days": policy.recovery_days.for_severity(s.severity),
                "description": s.description,
            })
        })
        .collect();
    Ok(json!({ "results": rows }))
}

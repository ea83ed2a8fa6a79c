pub mod analysis;
pub mod report;
pub mod stress;

use clap::Args;
use tracing::debug;

use risk_analytics_core::RiskEngine;

use crate::input;

/// Inputs shared by every analysis command
#[derive(Args)]
pub struct BookArgs {
    /// Path to JSON file with facility and positions (stdin if omitted)
    #[arg(long)]
    pub input: Option<String>,

    /// Path to JSON or YAML risk policy (built-in defaults if omitted)
    #[arg(long)]
    pub policy: Option<String>,
}

/// Build an engine loaded with the book, custom scenarios and NAV history.
pub fn build_engine(args: &BookArgs) -> Result<RiskEngine, Box<dyn std::error::Error>> {
    let book = input::load_input(&args.input)?;
    let policy = input::load_policy(&args.policy)?;

    let mut engine = RiskEngine::with_policy(book.facility, policy)?;
    engine.set_positions(book.positions)?;
    for scenario in book.scenarios {
        engine.add_scenario(scenario)?;
    }
    if !book.nav_history.is_empty() {
        engine.set_nav_history(book.nav_history);
    }
    debug!(
        positions = engine.positions().len(),
        scenarios = engine.scenarios().len(),
        policy = %engine.policy().version,
        "loaded book"
    );
    Ok(engine)
}

pub mod file;
pub mod stdin;

use serde::{Deserialize, Serialize};

use risk_analytics_core::policy::{FacilityConfig, RiskPolicy};
use risk_analytics_core::positions::CollateralPosition;
use risk_analytics_core::report::NavObservation;
use risk_analytics_core::stress::StressScenario;

/// Book description accepted on `--input` or stdin.
#[derive(Debug, Serialize, Deserialize)]
pub struct EngineInput {
    pub facility: FacilityConfig,
    pub positions: Vec<CollateralPosition>,
    /// Extra scenarios appended to the default catalog
    #[serde(default)]
    pub scenarios: Vec<StressScenario>,
    #[serde(default)]
    pub nav_history: Vec<NavObservation>,
}

/// Load the book from a file, or from piped stdin when no path is given.
pub fn load_input(path: &Option<String>) -> Result<EngineInput, Box<dyn std::error::Error>> {
    if let Some(ref p) = path {
        file::read_json(p)
    } else if let Some(book) = stdin::read_stdin()? {
        Ok(book)
    } else {
        Err("Provide --input file or pipe JSON via stdin".into())
    }
}

/// Policy from `--policy`, or the built-in default.
pub fn load_policy(path: &Option<String>) -> Result<RiskPolicy, Box<dyn std::error::Error>> {
    match path {
        Some(p) => file::read_config(p),
        None => Ok(RiskPolicy::default()),
    }
}

pub mod runner;
pub mod scenario;

pub use runner::{run_stress_test, run_stress_tests, stress_position, LiquidationRisk, StressTestResult, StressedPosition};
pub use scenario::{default_scenarios, ScenarioSeverity, ScenarioShocks, StressScenario};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::borrowing_base::BorrowingBaseCalc;
use crate::concentration::{ConcentrationRisk, LiquidityCoverage};
use crate::positions::CollateralPosition;
use crate::report::drawdown::DrawdownAnalysis;
use crate::stress::{LiquidationRisk, ScenarioSeverity, StressTestResult};
use crate::var::VarResult;
use crate::RiskAnalyticsResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskRating {
    Low,
    Moderate,
    Elevated,
    High,
    Critical,
}

impl std::fmt::Display for RiskRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            RiskRating::Low => "low",
            RiskRating::Moderate => "moderate",
            RiskRating::Elevated => "elevated",
            RiskRating::High => "high",
            RiskRating::Critical => "critical",
        };
        f.write_str(tag)
    }
}

/// Independently computed analyses that make up a report body.
#[derive(Debug, Clone)]
pub struct ReportSections {
    pub var_95: VarResult,
    pub var_99: VarResult,
    pub stress_tests: Vec<StressTestResult>,
    pub borrowing_base: BorrowingBaseCalc,
    pub drawdown: DrawdownAnalysis,
    pub concentration_risk: ConcentrationRisk,
    pub liquidity_coverage: LiquidityCoverage,
}

/// Full risk report. Field order is the serialization order and therefore
/// part of the hash input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    pub id: String,
    pub generated_at: DateTime<Utc>,
    pub entity: String,
    pub policy_version: String,
    pub collateral: Vec<CollateralPosition>,
    pub var_95: VarResult,
    pub var_99: VarResult,
    pub stress_tests: Vec<StressTestResult>,
    pub borrowing_base: BorrowingBaseCalc,
    pub drawdown: DrawdownAnalysis,
    pub concentration_risk: ConcentrationRisk,
    pub liquidity_coverage: LiquidityCoverage,
    pub overall_risk_rating: RiskRating,
    /// Hex SHA-256 of the report serialized with this field empty
    pub hash: String,
}

impl RiskReport {
    /// Build and seal a report. The rating is derived from the stress
    /// results and the hash is computed last.
    pub fn assemble(
        entity: &str,
        policy_version: &str,
        collateral: Vec<CollateralPosition>,
        sections: ReportSections,
        generated_at: DateTime<Utc>,
    ) -> RiskAnalyticsResult<Self> {
        let overall_risk_rating = overall_risk_rating(&sections.stress_tests);
        let mut report = Self {
            id: format!("RISK-{}", generated_at.timestamp_millis()),
            generated_at,
            entity: entity.to_string(),
            policy_version: policy_version.to_string(),
            collateral,
            var_95: sections.var_95,
            var_99: sections.var_99,
            stress_tests: sections.stress_tests,
            borrowing_base: sections.borrowing_base,
            drawdown: sections.drawdown,
            concentration_risk: sections.concentration_risk,
            liquidity_coverage: sections.liquidity_coverage,
            overall_risk_rating,
            hash: String::new(),
        };
        report.hash = report.compute_hash()?;
        Ok(report)
    }

    /// SHA-256 over the canonical JSON form with `hash` blanked.
    pub fn compute_hash(&self) -> RiskAnalyticsResult<String> {
        let mut unsealed = self.clone();
        unsealed.hash = String::new();
        let canonical = serde_json::to_vec(&unsealed)?;

        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        Ok(format!("{:x}", hasher.finalize()))
    }

    /// True when the stored hash matches the current contents.
    pub fn verify_integrity(&self) -> RiskAnalyticsResult<bool> {
        Ok(!self.hash.is_empty() && self.compute_hash()? == self.hash)
    }
}

/// Overall rating from the worst non-extreme stress outcome. Extreme
/// scenarios are tail illustrations and do not drive the rating.
pub fn overall_risk_rating(stress_tests: &[StressTestResult]) -> RiskRating {
    let relevant: Vec<&StressTestResult> = stress_tests
        .iter()
        .filter(|r| r.scenario.severity != ScenarioSeverity::Extreme)
        .collect();

    if relevant.iter().any(|r| r.liquidation_risk >= LiquidationRisk::High) {
        RiskRating::High
    } else if relevant.iter().any(|r| r.liquidation_risk == LiquidationRisk::Moderate) {
        RiskRating::Elevated
    } else if relevant.iter().any(|r| r.margin_call_triggered) {
        RiskRating::Moderate
    } else {
        RiskRating::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{FacilityConfig, RiskPolicy};
    use crate::stress::{default_scenarios, run_stress_test};

    fn result(severity: ScenarioSeverity, risk: LiquidationRisk, margin_call: bool) -> StressTestResult {
        let mut scenario = default_scenarios()[0].clone();
        scenario.severity = severity;
        let facility = FacilityConfig::default();
        let mut r = run_stress_test(&[], &scenario, &facility, &RiskPolicy::default(), Utc::now());
        r.liquidation_risk = risk;
        r.margin_call_triggered = margin_call;
        r
    }

    #[test]
    fn test_rating_low_when_clean() {
        let results = vec![result(ScenarioSeverity::Base, LiquidationRisk::None, false)];
        assert_eq!(overall_risk_rating(&results), RiskRating::Low);
        assert_eq!(overall_risk_rating(&[]), RiskRating::Low);
    }

    #[test]
    fn test_rating_ladder() {
        let margin = vec![result(ScenarioSeverity::Moderate, LiquidationRisk::Low, true)];
        assert_eq!(overall_risk_rating(&margin), RiskRating::Moderate);

        let moderate = vec![
            result(ScenarioSeverity::Base, LiquidationRisk::None, true),
            result(ScenarioSeverity::Severe, LiquidationRisk::Moderate, true),
        ];
        assert_eq!(overall_risk_rating(&moderate), RiskRating::Elevated);

        let critical = vec![result(ScenarioSeverity::Severe, LiquidationRisk::Critical, true)];
        assert_eq!(overall_risk_rating(&critical), RiskRating::High);
    }

    #[test]
    fn test_extreme_scenarios_ignored() {
        let results = vec![
            result(ScenarioSeverity::Base, LiquidationRisk::None, false),
            result(ScenarioSeverity::Extreme, LiquidationRisk::Critical, true),
        ];
        assert_eq!(overall_risk_rating(&results), RiskRating::Low);
    }

    #[test]
    fn test_rating_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&RiskRating::Elevated).unwrap(), "\"elevated\"");
        assert_eq!(RiskRating::High.to_string(), "high");
    }
}

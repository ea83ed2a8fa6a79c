pub mod assembler;
pub mod drawdown;

pub use assembler::{overall_risk_rating, ReportSections, RiskRating, RiskReport};
pub use drawdown::{DrawdownAnalysis, DrawdownPoint, NavObservation};

pub mod error;
pub mod types;

pub mod borrowing_base;
pub mod concentration;
pub mod engine;
pub mod events;
pub mod math;
pub mod policy;
pub mod positions;
pub mod report;
pub mod stress;
pub mod var;

pub use engine::{seeded_rng, RiskEngine};
pub use error::RiskAnalyticsError;
pub use types::*;

/// Standard result type for all risk-analytics operations
pub type RiskAnalyticsResult<T> = Result<T, RiskAnalyticsError>;

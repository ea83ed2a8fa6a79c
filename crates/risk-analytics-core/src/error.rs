use thiserror::Error;

#[derive(Debug, Error)]
pub enum RiskAnalyticsError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: String, id: String },

    #[error("Unknown position id: {0}")]
    UnknownPosition(String),

    #[error("Unknown scenario id: {0}")]
    UnknownScenario(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for RiskAnalyticsError {
    fn from(e: serde_json::Error) -> Self {
        RiskAnalyticsError::SerializationError(e.to_string())
    }
}

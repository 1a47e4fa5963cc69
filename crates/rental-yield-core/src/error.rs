use thiserror::Error;

#[derive(Debug, Error)]
pub enum RentalYieldError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for RentalYieldError {
    fn from(e: serde_json::Error) -> Self {
        RentalYieldError::SerializationError(e.to_string())
    }
}

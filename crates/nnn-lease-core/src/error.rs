use thiserror::Error;

use crate::inputs::FieldErrors;

#[derive(Debug, Error)]
pub enum LeaseError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Lease inputs failed validation: {0}")]
    Validation(FieldErrors),

    #[error("Escalation option '{0}' is not implemented")]
    UnsupportedEscalationOption(String),

    #[error("Arithmetic overflow in {context}")]
    Overflow { context: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LeaseError {
    fn from(e: serde_json::Error) -> Self {
        LeaseError::SerializationError(e.to_string())
    }
}

impl From<FieldErrors> for LeaseError {
    fn from(errors: FieldErrors) -> Self {
        LeaseError::Validation(errors)
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanScopeError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Unresolved lookup in {table}: {context}")]
    UnresolvedLookup { table: String, context: String },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LoanScopeError {
    fn from(e: serde_json::Error) -> Self {
        LoanScopeError::SerializationError(e.to_string())
    }
}

use thiserror::Error;
use uuid::Uuid;

/// Unified error type for engine and storage layers.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    #[error("Persistence failure: {0}")]
    Persistence(String),
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),
    #[error("Rule not found: {0}")]
    RuleNotFound(Uuid),
    #[error("Book not found: {0}")]
    BookNotFound(String),
    #[error("Invalid rule shape: {0}")]
    InvalidRuleShape(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Persistence(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

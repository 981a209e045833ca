use thiserror::Error;
use uuid::Uuid;

/// Error type shared by ingestion, storage and extraction paths.
#[derive(Debug, Error)]
pub enum ExpenseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Expense not found: {0}")]
    NotFound(Uuid),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Extraction failed: {0}")]
    Extraction(String),
    #[error("No signed-in user")]
    NotAuthenticated,
}

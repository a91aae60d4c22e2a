use thiserror::Error;

use super::item::PrimaryKey;

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("Referenced {entity_type} does not exist: {id}")]
    InvalidReference {
        entity_type: &'static str,
        id: String,
    },
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),
    #[error("Store operation failed: {0}")]
    StoreOperationFailed(String),
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),
    #[error("Batch left {} request(s) unprocessed", unprocessed.len())]
    PartialBatchFailure { unprocessed: Vec<PrimaryKey> },
    #[error("Batch of {requested} exceeds the limit of {limit}")]
    BatchTooLarge { limit: usize, requested: usize },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Operation cancelled")]
    Cancelled,
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

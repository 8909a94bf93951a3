use std::sync::PoisonError;
use thiserror::Error;

/// Error type for collection store operations
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Collection name rejected by the store
    #[error("Invalid collection name: {0}")]
    InvalidCollection(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored document is not a JSON array
    #[error("Collection '{0}' is not a JSON array")]
    Malformed(String),

    /// Lock error
    #[error("Lock error: {0}")]
    Lock(String),

    /// Store cannot be reached at all
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl<T> From<PoisonError<T>> for RepositoryError {
    fn from(error: PoisonError<T>) -> Self {
        RepositoryError::Lock(error.to_string())
    }
}

//! Persistence surface errors.

use thiserror::Error;

/// Result alias for key-value persistence operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Failure of a key-value persistence operation.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The backing store could not be reached at all.
    #[error("Persistence backend unavailable: {0}")]
    Unavailable(String),

    /// Filesystem failure.
    #[error("Persistence IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Key rejected before touching the backend.
    #[error("Invalid persistence key '{0}'")]
    InvalidKey(String),

    /// A value could not be encoded for storage.
    #[error("Failed to encode persisted value: {0}")]
    Serialization(#[from] serde_json::Error),
}

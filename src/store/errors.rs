//! Record store errors

use thiserror::Error;

use crate::storage::StorageError;

/// Result type for record store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the record store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying record file failure
    #[error("{0}")]
    Storage(#[from] StorageError),

    /// A record could not be encoded or a stored body could not be decoded
    #[error("Record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The record file names a collection this store does not know
    #[error("Unknown collection in record file: {0}")]
    UnknownCollection(String),

    /// A previous writer panicked while holding the store lock
    #[error("Record store lock poisoned")]
    Poisoned,
}

impl StoreError {
    /// Whether the store must not be used any further
    pub fn is_fatal(&self) -> bool {
        match self {
            StoreError::Storage(e) => e.is_fatal(),
            StoreError::UnknownCollection(_) | StoreError::Poisoned => true,
            StoreError::Serialization(_) => false,
        }
    }
}

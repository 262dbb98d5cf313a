//! Storage errors
//!
//! Codes:
//! - STATS_STORAGE_OPEN_FAILED
//! - STATS_STORAGE_WRITE_FAILED
//! - STATS_STORAGE_UNWRITABLE (fatal)
//! - STATS_DATA_CORRUPTION (fatal)

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors from the record file
#[derive(Debug, Error)]
pub enum StorageError {
    /// The record file or its directory could not be created or read
    #[error("STATS_STORAGE_OPEN_FAILED: {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    /// An append did not reach disk; the file was rolled back
    #[error("STATS_STORAGE_WRITE_FAILED: record {record}: {source}")]
    Write { record: String, source: io::Error },

    /// A failed append could not be rolled back; the file tail is unknown
    #[error("STATS_STORAGE_UNWRITABLE: rollback to byte {len} failed: {source}")]
    Unwritable { len: u64, source: io::Error },

    /// A stored frame failed validation
    #[error("STATS_DATA_CORRUPTION: {reason} (byte_offset: {offset})")]
    Corrupt { offset: u64, reason: String },
}

impl StorageError {
    /// Machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            StorageError::Open { .. } => "STATS_STORAGE_OPEN_FAILED",
            StorageError::Write { .. } => "STATS_STORAGE_WRITE_FAILED",
            StorageError::Unwritable { .. } => "STATS_STORAGE_UNWRITABLE",
            StorageError::Corrupt { .. } => "STATS_DATA_CORRUPTION",
        }
    }

    /// Whether the record file can no longer be trusted
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            StorageError::Unwritable { .. } | StorageError::Corrupt { .. }
        )
    }
}

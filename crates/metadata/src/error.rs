//! Storage error types.

use thiserror::Error;

/// Storage operation errors.
///
/// Only unexpected faults surface here. Expected outcomes (row not found)
/// are `Ok(None)`; uniqueness conflicts get their own named variant so the
/// domain layer can map them to a coded envelope.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Result type for storage operations.
pub type MetadataResult<T> = std::result::Result<T, MetadataError>;

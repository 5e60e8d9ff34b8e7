use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by a durable cache backend.
pub enum CacheError {
    /// Backend could not be reached or the operation failed at the I/O layer.
    #[error("durable tier unavailable: {reason}")]
    DurableUnavailable {
        /// Error message.
        reason: String,
    },

    /// Stored bytes could not be decoded.
    #[error("corrupt cache entry at {path}: {reason}")]
    CorruptEntry {
        /// File or object location.
        path: PathBuf,
        /// Error message.
        reason: String,
    },

    /// Entry could not be encoded for storage.
    #[error("failed to serialize cache entry: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience result type for durable tier operations.
pub type CacheResult<T> = Result<T, CacheError>;

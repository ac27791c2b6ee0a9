//! Error types for the reminisce core library.
//!
//! Two layers: [`StoreError`] is what a [`MemoryStore`](crate::store::MemoryStore)
//! reports, [`MemoryError`] is what the public operations return.  A failed
//! read degrades to an empty retrieval; a failed write always reaches the
//! caller.

use thiserror::Error;

use crate::types::MemoryId;

/// Failure reported by a memory record store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// SQLite failure.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A record could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A stored row exists but cannot be turned back into a memory.
    #[error("Corrupt record {id}: {reason}")]
    Corrupt {
        /// Identifier of the offending row.
        id: MemoryId,
        /// What was wrong with it.
        reason: String,
    },
}

/// Top-level error type for all reminisce operations.
#[derive(Error, Debug)]
pub enum MemoryError {
    /// Fetching candidate memories failed.
    #[error("Failed to read memories: {0}")]
    StoreRead(#[source] StoreError),

    /// Persisting a new memory failed.
    #[error("Failed to write memory: {0}")]
    StoreWrite(#[source] StoreError),

    /// A value supplied on write is outside its allowed range.
    #[error("Invalid {field}: {value} ({reason})")]
    Validation {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value, rendered for display.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MemoryError {
    /// Build a [`MemoryError::Validation`] for a numeric field.
    pub(crate) fn out_of_range(field: &'static str, value: f32, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, MemoryError>;

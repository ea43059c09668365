//! Error types for tree decoding, alignment, and object access.

use crate::types::ObjectId;
use thiserror::Error;

/// Object store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Object not found: {0}")]
    NotFound(ObjectId),

    #[error("Store I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Traversal and decoding errors
#[derive(Debug, Error)]
pub enum TraverseError {
    /// Malformed record data. Fatal: the decoder never resynchronizes,
    /// because record boundaries come purely from scanning. The offset is
    /// the offending byte, or the buffer length when the record is
    /// truncated.
    #[error("Corrupt tree object at byte offset {0}")]
    CorruptTree(usize),

    /// A cursor produced entries violating the required sort order.
    #[error("Tree entries out of sort order")]
    UnsortedTree,

    /// More cursors than advance-mask bits.
    #[error("Cannot traverse {count} trees at once (limit {max})")]
    TooManyTrees { count: usize, max: usize },

    /// Recursion descended past the configured ceiling.
    #[error("Traversal depth {depth} exceeds limit {max}")]
    DepthExceeded { depth: usize, max: usize },

    /// Rejected input to a builder or snapshot constructor.
    #[error("Invalid tree entry: {0}")]
    InvalidEntry(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// An error raised inside a traversal callback, passed through
    /// unchanged.
    #[error(transparent)]
    Callback(#[from] anyhow::Error),
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log directive: {0}")]
    InvalidLogDirective(String),

    #[error("Invalid log format: {0} (must be 'json' or 'text')")]
    InvalidLogFormat(String),
}

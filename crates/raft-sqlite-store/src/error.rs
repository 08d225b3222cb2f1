//! Error types for the store module.

use raft_sqlite_core::{display_key, CoreError};
use thiserror::Error;

/// Broad classification of a [`StoreError`].
///
/// Callers branch on the kind instead of matching individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The store could not be opened or its schema created.
    Initialization,
    /// The requested log index or key does not exist.
    NotFound,
    /// A write failed and its transaction was rolled back (or rollback failed too).
    Transaction,
    /// Storage engine or filesystem failure.
    Io,
    /// A stored payload could not be encoded or decoded.
    Codec,
    /// The store has been closed.
    Closed,
}

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Opening the database or creating its schema failed.
    #[error("failed to initialize store at {path}: {source}")]
    Initialization {
        path: String,
        #[source]
        source: Box<StoreError>,
    },

    /// No log entry at this index.
    #[error("log not found: {0}")]
    LogNotFound(u64),

    /// The log holds no entries.
    #[error("log is empty")]
    EmptyLog,

    /// No value under this key.
    #[error("key not found: {}", display_key(.0))]
    KeyNotFound(Vec<u8>),

    /// A log entry already exists at this index.
    #[error("log entry already exists at index {0}")]
    DuplicateIndex(u64),

    /// The index cannot be represented as an SQLite integer.
    #[error("log index {0} exceeds the storable range")]
    IndexOutOfRange(u64),

    /// A stored value has the wrong shape for the requested type.
    #[error("invalid value for key {}: expected {expected} bytes, found {found}", display_key(.key))]
    InvalidValue {
        key: Vec<u8>,
        expected: usize,
        found: usize,
    },

    /// The operation failed and so did the rollback that followed.
    #[error("{source}; rollback failed: {rollback}")]
    Rollback {
        source: Box<StoreError>,
        rollback: rusqlite::Error,
    },

    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Entry encoding/decoding error.
    #[error("codec error: {0}")]
    Codec(#[from] CoreError),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store was closed.
    #[error("store is closed")]
    Closed,
}

impl StoreError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Initialization { .. } | Self::Config(_) => ErrorKind::Initialization,
            Self::LogNotFound(_) | Self::EmptyLog | Self::KeyNotFound(_) => ErrorKind::NotFound,
            Self::DuplicateIndex(_) | Self::Rollback { .. } => ErrorKind::Transaction,
            Self::Database(e) if is_constraint_violation(e) => ErrorKind::Transaction,
            Self::Database(_)
            | Self::IndexOutOfRange(_)
            | Self::InvalidValue { .. }
            | Self::Migration(_)
            | Self::Io(_) => ErrorKind::Io,
            Self::Codec(_) => ErrorKind::Codec,
            Self::Closed => ErrorKind::Closed,
        }
    }

    /// True for missing log entries, an empty log, and missing keys.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

pub(crate) fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

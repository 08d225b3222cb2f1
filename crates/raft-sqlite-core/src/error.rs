//! Error types for raft-sqlite core.

use thiserror::Error;

/// Errors raised while encoding or decoding log entries.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("decoding error: {0}")]
    Decoding(String),

    #[error("invalid log kind: {0}")]
    InvalidLogKind(u8),
}

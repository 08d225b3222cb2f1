//! Log entry: one unit of replicated state-machine input.
//!
//! The store treats an entry as opaque once encoded. The fields here are the
//! metadata a Raft implementation attaches to each record.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// How the consensus layer interprets an entry's `data`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum LogKind {
    /// A command applied to the user state machine.
    #[default]
    Command = 0,
    /// Appended by a new leader to commit entries from earlier terms.
    Noop = 1,
    /// Legacy membership change.
    AddPeerDeprecated = 2,
    /// Legacy membership change.
    RemovePeerDeprecated = 3,
    /// Ensures all preceding entries are applied before it is.
    Barrier = 4,
    /// A cluster membership configuration.
    Configuration = 5,
}

impl LogKind {
    /// Convert to u8 for serialization.
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Try to parse from u8.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Command),
            1 => Some(Self::Noop),
            2 => Some(Self::AddPeerDeprecated),
            3 => Some(Self::RemovePeerDeprecated),
            4 => Some(Self::Barrier),
            5 => Some(Self::Configuration),
            _ => None,
        }
    }
}

impl From<LogKind> for u8 {
    fn from(kind: LogKind) -> Self {
        kind.to_u8()
    }
}

impl TryFrom<u8> for LogKind {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value).ok_or(CoreError::InvalidLogKind(value))
    }
}

/// A single Raft log record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Position in the log. Unique within a store.
    pub index: u64,

    /// Election term in which the entry was created.
    pub term: u64,

    /// The kind of entry.
    pub kind: LogKind,

    /// Command bytes, interpreted by the state machine.
    pub data: Bytes,

    /// Opaque extension bytes reserved for the consensus layer.
    pub extensions: Bytes,

    /// Leader wall clock when the entry was appended (Unix milliseconds).
    /// Zero when unknown.
    pub appended_at: i64,
}

impl LogEntry {
    /// Create a command entry.
    pub fn new(index: u64, term: u64, data: impl Into<Bytes>) -> Self {
        Self {
            index,
            term,
            kind: LogKind::Command,
            data: data.into(),
            extensions: Bytes::new(),
            appended_at: 0,
        }
    }

    /// Set the entry kind.
    pub fn with_kind(mut self, kind: LogKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the extension bytes.
    pub fn with_extensions(mut self, extensions: impl Into<Bytes>) -> Self {
        self.extensions = extensions.into();
        self
    }

    /// Set the append timestamp.
    pub fn appended_at(mut self, millis: i64) -> Self {
        self.appended_at = millis;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_kind_u8_roundtrip() {
        for value in 0u8..=5 {
            let kind = LogKind::from_u8(value).unwrap();
            assert_eq!(kind.to_u8(), value);
        }
        assert_eq!(LogKind::from_u8(6), None);
    }

    #[test]
    fn test_log_kind_rejects_unknown() {
        let err = LogKind::try_from(42).unwrap_err();
        assert!(matches!(err, CoreError::InvalidLogKind(42)));
    }

    #[test]
    fn test_builder() {
        let entry = LogEntry::new(7, 2, b"set x=1".to_vec())
            .with_kind(LogKind::Barrier)
            .with_extensions(b"ext".to_vec())
            .appended_at(1_700_000_000_000);

        assert_eq!(entry.index, 7);
        assert_eq!(entry.term, 2);
        assert_eq!(entry.kind, LogKind::Barrier);
        assert_eq!(entry.data.as_ref(), b"set x=1");
        assert_eq!(entry.extensions.as_ref(), b"ext");
        assert_eq!(entry.appended_at, 1_700_000_000_000);
    }

    #[test]
    fn test_kind_serializes_as_integer() {
        let json = serde_json::to_string(&LogKind::Configuration).unwrap();
        assert_eq!(json, "5");
        assert!(serde_json::from_str::<LogKind>("9").is_err());
    }
}

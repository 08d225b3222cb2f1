//! Store configuration.
//!
//! The defaults trade a little durability for write throughput: WAL
//! journaling with `synchronous=NORMAL` only syncs at checkpoints. The
//! database stays consistent after a process crash, but commits made just
//! before an OS crash or power loss may be rolled back on recovery. Use
//! [`Synchronous::Full`] when every commit must survive power loss.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// SQLite `journal_mode` pragma.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalMode {
    Delete,
    Truncate,
    Persist,
    Memory,
    #[default]
    Wal,
    Off,
}

impl JournalMode {
    /// The pragma value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Delete => "DELETE",
            Self::Truncate => "TRUNCATE",
            Self::Persist => "PERSIST",
            Self::Memory => "MEMORY",
            Self::Wal => "WAL",
            Self::Off => "OFF",
        }
    }
}

/// SQLite `synchronous` pragma.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Synchronous {
    Off,
    #[default]
    Normal,
    Full,
    Extra,
}

impl Synchronous {
    /// The pragma value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Normal => "NORMAL",
            Self::Full => "FULL",
            Self::Extra => "EXTRA",
        }
    }

    /// The numeric level SQLite reports when the pragma is queried.
    pub fn level(self) -> i64 {
        match self {
            Self::Off => 0,
            Self::Normal => 1,
            Self::Full => 2,
            Self::Extra => 3,
        }
    }
}

/// Configuration applied when a store is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Journal mode. In-memory databases always report `memory`.
    pub journal_mode: JournalMode,
    /// Sync level.
    pub synchronous: Synchronous,
    /// How long SQLite retries when another process holds the write lock.
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            journal_mode: JournalMode::Wal,
            synchronous: Synchronous::Normal,
            busy_timeout_ms: 5_000,
        }
    }
}

impl StoreConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the journal mode.
    pub fn journal_mode(mut self, mode: JournalMode) -> Self {
        self.journal_mode = mode;
        self
    }

    /// Set the `synchronous` level.
    pub fn synchronous(mut self, level: Synchronous) -> Self {
        self.synchronous = level;
        self
    }

    /// Set how long SQLite waits on a lock held by another connection.
    /// Saturates at `u64::MAX` milliseconds.
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub(crate) fn busy_timeout_duration(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.journal_mode, JournalMode::Wal);
        assert_eq!(config.synchronous, Synchronous::Normal);
        assert_eq!(config.busy_timeout_duration(), Duration::from_secs(5));
    }

    #[test]
    fn test_from_json_partial() {
        let config = StoreConfig::from_json(r#"{"synchronous": "full"}"#).unwrap();
        assert_eq!(config.synchronous, Synchronous::Full);
        assert_eq!(config.journal_mode, JournalMode::Wal);
    }

    #[test]
    fn test_from_json_rejects_unknown_mode() {
        let err = StoreConfig::from_json(r#"{"journal_mode": "sideways"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Initialization);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = StoreConfig::default()
            .journal_mode(JournalMode::Truncate)
            .synchronous(Synchronous::Extra)
            .busy_timeout(Duration::from_millis(250));
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"truncate\""), "{json}");
        assert_eq!(StoreConfig::from_json(&json).unwrap(), config);
    }
}

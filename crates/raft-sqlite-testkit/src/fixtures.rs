//! Test fixtures and helpers.

use std::ops::RangeInclusive;
use std::path::PathBuf;

use raft_sqlite_core::LogEntry;
use raft_sqlite_store::{Result, SqliteStore, StoreConfig};
use tempfile::TempDir;

/// A command entry at `index`, term 1, with `data` as its payload.
pub fn entry(index: u64, data: &str) -> LogEntry {
    LogEntry::new(index, 1, data.as_bytes().to_vec())
}

/// Entries for every index in `range`, with payload `log<index>`.
pub fn entries(range: RangeInclusive<u64>) -> Vec<LogEntry> {
    range.map(|i| entry(i, &format!("log{}", i))).collect()
}

/// A disk-backed store in a temporary directory.
///
/// The directory, and with it the database, is removed on drop.
pub struct TempStore {
    pub store: SqliteStore,
    dir: TempDir,
    config: StoreConfig,
}

impl TempStore {
    /// Open a store with the default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(StoreConfig::default())
    }

    /// Open a store with `config`.
    pub fn with_config(config: StoreConfig) -> Result<Self> {
        let dir = TempDir::new()?;
        let store = SqliteStore::open_with_config(dir.path().join("raft.db"), config.clone())?;
        Ok(Self { store, dir, config })
    }

    /// Path of the database file.
    pub fn path(&self) -> PathBuf {
        self.dir.path().join("raft.db")
    }

    /// Close the store and open the same file again, as after a restart.
    pub fn reopen(self) -> Result<Self> {
        let Self { store, dir, config } = self;
        store.close()?;
        let store = SqliteStore::open_with_config(dir.path().join("raft.db"), config.clone())?;
        Ok(Self { store, dir, config })
    }
}

//! In-memory implementation of the store traits.
//!
//! This is primarily for testing hosts that embed the store. It has the same
//! semantics as [`SqliteStore`](crate::SqliteStore) (insert-or-fail, atomic
//! batches, the same not-found errors) but keeps everything in ordinary maps.
//! Entries are held decoded, so no codec is involved.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use raft_sqlite_core::LogEntry;

use crate::error::{Result, StoreError};
use crate::traits::{LogStore, StableStore};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    /// Log entries ordered by index.
    logs: BTreeMap<u64, LogEntry>,

    /// Stable key/value pairs.
    kv: HashMap<Vec<u8>, Vec<u8>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored log entries.
    pub fn log_count(&self) -> Result<usize> {
        Ok(self.read()?.logs.len())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner.read().map_err(|_| poisoned())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner.write().map_err(|_| poisoned())
    }
}

fn poisoned() -> StoreError {
    StoreError::Io(std::io::Error::new(
        std::io::ErrorKind::Other,
        "memory store lock poisoned",
    ))
}

impl LogStore for MemoryStore {
    fn first_index(&self) -> Result<u64> {
        Ok(self.read()?.logs.keys().next().copied().unwrap_or(0))
    }

    fn last_index(&self) -> Result<u64> {
        self.read()?
            .logs
            .keys()
            .next_back()
            .copied()
            .ok_or(StoreError::EmptyLog)
    }

    fn get_log(&self, index: u64) -> Result<LogEntry> {
        self.read()?
            .logs
            .get(&index)
            .cloned()
            .ok_or(StoreError::LogNotFound(index))
    }

    fn store_logs(&self, entries: &[LogEntry]) -> Result<()> {
        let mut inner = self.write()?;

        // Validate the whole batch before touching the map.
        let mut batch = BTreeMap::new();
        for entry in entries {
            if i64::try_from(entry.index).is_err() {
                return Err(StoreError::IndexOutOfRange(entry.index));
            }
            if inner.logs.contains_key(&entry.index)
                || batch.insert(entry.index, entry.clone()).is_some()
            {
                return Err(StoreError::DuplicateIndex(entry.index));
            }
        }

        inner.logs.append(&mut batch);
        Ok(())
    }

    fn delete_range(&self, min: u64, max: u64) -> Result<()> {
        if min > max {
            return Ok(());
        }
        let mut inner = self.write()?;
        let doomed: Vec<u64> = inner.logs.range(min..=max).map(|(k, _)| *k).collect();
        for index in doomed {
            inner.logs.remove(&index);
        }
        Ok(())
    }
}

impl StableStore for MemoryStore {
    fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.write()?.kv.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        self.read()?
            .kv
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::KeyNotFound(key.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(index: u64) -> LogEntry {
        LogEntry::new(index, 1, format!("log{}", index).into_bytes())
    }

    #[test]
    fn test_empty_log_asymmetry() {
        let store = MemoryStore::new();
        assert_eq!(store.first_index().unwrap(), 0);
        assert!(matches!(store.last_index(), Err(StoreError::EmptyLog)));
    }

    #[test]
    fn test_duplicate_within_batch_stores_nothing() {
        let store = MemoryStore::new();
        let err = store
            .store_logs(&[entry(1), entry(2), entry(1)])
            .unwrap_err();

        assert!(matches!(err, StoreError::DuplicateIndex(1)));
        assert_eq!(store.log_count().unwrap(), 0);
    }

    #[test]
    fn test_delete_range() {
        let store = MemoryStore::new();
        store.store_logs(&(1..=5).map(entry).collect::<Vec<_>>()).unwrap();

        store.delete_range(2, 4).unwrap();

        assert_eq!(store.log_count().unwrap(), 2);
        assert_eq!(store.first_index().unwrap(), 1);
        assert_eq!(store.last_index().unwrap(), 5);
        assert!(store.get_log(3).unwrap_err().is_not_found());
    }
}

//! The log store and stable store contracts a Raft implementation consumes.
//!
//! Both traits are synchronous: every call blocks until the backing
//! transaction commits or fails.

use raft_sqlite_core::value::U64_WIDTH;
use raft_sqlite_core::{decode_u64, encode_u64, LogEntry};

use crate::error::{Result, StoreError};

/// Ordered storage for replicated log entries.
///
/// # Design Notes
///
/// - **Insert or fail**: storing an index that already exists is an error,
///   and the whole batch is rolled back.
/// - **Atomic batches**: [`LogStore::store_logs`] is visible fully or not at all.
/// - **Empty log**: [`LogStore::first_index`] reports `0`, while
///   [`LogStore::last_index`] fails with [`StoreError::EmptyLog`].
pub trait LogStore: Send + Sync {
    /// The smallest stored index, or `0` if the log is empty.
    fn first_index(&self) -> Result<u64>;

    /// The largest stored index.
    ///
    /// Fails with [`StoreError::EmptyLog`] if the log is empty.
    fn last_index(&self) -> Result<u64>;

    /// Get the entry at `index`.
    ///
    /// Fails with [`StoreError::LogNotFound`] if there is none.
    fn get_log(&self, index: u64) -> Result<LogEntry>;

    /// Store a single entry.
    fn store_log(&self, entry: &LogEntry) -> Result<()> {
        self.store_logs(std::slice::from_ref(entry))
    }

    /// Store a batch of entries in one transaction.
    fn store_logs(&self, entries: &[LogEntry]) -> Result<()>;

    /// Delete entries with `min <= index <= max`.
    fn delete_range(&self, min: u64, max: u64) -> Result<()>;
}

/// Durable key/value storage for consensus metadata (current term, vote).
pub trait StableStore: Send + Sync {
    /// Insert or replace the value under `key`.
    fn set(&self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Get the value under `key`.
    ///
    /// Fails with [`StoreError::KeyNotFound`] if the key was never set.
    fn get(&self, key: &[u8]) -> Result<Vec<u8>>;

    /// Like [`StableStore::set`], for `u64` values (8 bytes, big-endian).
    fn set_u64(&self, key: &[u8], value: u64) -> Result<()> {
        self.set(key, &encode_u64(value))
    }

    /// Like [`StableStore::get`], for values written by [`StableStore::set_u64`].
    fn get_u64(&self, key: &[u8]) -> Result<u64> {
        let value = self.get(key)?;
        decode_u64(&value).ok_or_else(|| StoreError::InvalidValue {
            key: key.to_vec(),
            expected: U64_WIDTH,
            found: value.len(),
        })
    }
}

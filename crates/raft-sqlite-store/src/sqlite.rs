//! SQLite implementation of the log store and stable store.
//!
//! Uses rusqlite with bundled SQLite. One connection serves every operation;
//! it sits behind a mutex because `rusqlite::Connection` is `Send` but not
//! `Sync`. The mutex is the only lock the store adds, and each operation
//! holds it for exactly one transaction.

use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use raft_sqlite_core::{display_key, CborCodec, CoreError, EntryCodec, LogEntry};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};

use crate::config::StoreConfig;
use crate::error::{is_constraint_violation, Result, StoreError};
use crate::migration;
use crate::traits::{LogStore, StableStore};
use crate::tx::transaction;

/// Distinguishes databases created by [`SqliteStore::open_memory`].
static NEXT_MEMORY_ID: AtomicU64 = AtomicU64::new(0);

/// SQLite-backed Raft storage.
///
/// Opened on a file path or on one of SQLite's in-memory forms
/// (`:memory:`, `file::memory:?cache=shared`, or a `file:` URI with
/// `mode=memory`). Thread-safe via an internal mutex; share it behind an
/// `Arc`.
pub struct SqliteStore<C = CborCodec> {
    /// The SQLite connection. `None` once the store is closed.
    conn: Mutex<Option<Connection>>,
    /// Path or URI the store was opened with.
    path: String,
    /// Whether `path` names an in-memory database.
    memory: bool,
    /// Serializes entries to the opaque `logs.data` payload.
    codec: C,
}

impl SqliteStore<CborCodec> {
    /// Open a SQLite database at the given path with the default
    /// configuration (WAL, `synchronous=NORMAL`).
    ///
    /// Creates the file and the schema if they don't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, StoreConfig::default())
    }

    /// Open a SQLite database with an explicit configuration.
    pub fn open_with_config(path: impl AsRef<Path>, config: StoreConfig) -> Result<Self> {
        Self::with_codec(path, config, CborCodec)
    }

    /// Open a fresh in-memory database.
    ///
    /// Each call gets its own database, so parallel tests never share state.
    pub fn open_memory() -> Result<Self> {
        let id = NEXT_MEMORY_ID.fetch_add(1, Ordering::Relaxed);
        Self::open(format!(
            "file:raft-sqlite-{}-{}?mode=memory&cache=shared",
            std::process::id(),
            id
        ))
    }
}

impl<C: EntryCodec> SqliteStore<C> {
    /// Open a database that encodes entries with `codec`.
    pub fn with_codec(path: impl AsRef<Path>, config: StoreConfig, codec: C) -> Result<Self> {
        let path = path.as_ref();
        let shown = path.to_string_lossy().into_owned();
        let memory = is_memory_path(&shown);

        let (conn, journal_mode) =
            initialize(path, &config).map_err(|source| StoreError::Initialization {
                path: shown.clone(),
                source: Box::new(source),
            })?;

        tracing::info!(
            path = %shown,
            memory,
            journal_mode = %journal_mode,
            synchronous = config.synchronous.as_str(),
            "opened raft store"
        );

        Ok(Self {
            conn: Mutex::new(Some(conn)),
            path: shown,
            memory,
            codec,
        })
    }

    /// The path or URI this store was opened with.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether the database lives in memory.
    pub fn is_memory(&self) -> bool {
        self.memory
    }

    /// The effective journal mode, lowercase (`wal`, `memory`, ...).
    pub fn journal_mode(&self) -> Result<String> {
        let mode: String = self.read(|tx| {
            Ok(tx.pragma_query_value(None, "journal_mode", |row| row.get(0))?)
        })?;
        Ok(mode.to_lowercase())
    }

    /// The effective `synchronous` level (0 = OFF, 1 = NORMAL, 2 = FULL, 3 = EXTRA).
    pub fn synchronous(&self) -> Result<i64> {
        self.read(|tx| Ok(tx.pragma_query_value(None, "synchronous", |row| row.get(0))?))
    }

    /// Close the database handle.
    ///
    /// Every later call, including another `close`, fails with
    /// [`StoreError::Closed`].
    pub fn close(&self) -> Result<()> {
        let conn = self.lock()?.take().ok_or(StoreError::Closed)?;
        conn.close().map_err(|(_, e)| StoreError::Database(e))?;
        tracing::info!(path = %self.path, "closed raft store");
        Ok(())
    }

    /// Close the store and delete its database files.
    ///
    /// Removes the main file and its `-wal` and `-shm` siblings. In-memory
    /// stores are only closed. For `file:` URIs the scheme, authority and
    /// query are stripped; percent-escapes in the path are not decoded.
    pub fn destroy(self) -> Result<()> {
        match self.close() {
            Ok(()) | Err(StoreError::Closed) => {}
            Err(e) => return Err(e),
        }

        if !self.memory {
            let file = database_file(&self.path);
            for suffix in ["", "-wal", "-shm"] {
                remove_if_exists(&format!("{}{}", file, suffix))?;
            }
            tracing::info!(path = %self.path, "destroyed raft store");
        }
        Ok(())
    }

    /// Fail with [`StoreError::Closed`] once the store is closed.
    fn ensure_open(&self) -> Result<()> {
        match self.lock()?.as_ref() {
            Some(_) => Ok(()),
            None => Err(StoreError::Closed),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Connection>>> {
        self.conn.lock().map_err(|e| {
            StoreError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
                Some(format!("mutex poisoned: {}", e)),
            ))
        })
    }

    /// Run `f` in a transaction while holding the connection.
    fn with_tx<T, F>(&self, behavior: TransactionBehavior, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let mut guard = self.lock()?;
        let conn = guard.as_mut().ok_or(StoreError::Closed)?;
        transaction(conn, behavior, f)
    }

    fn read<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        self.with_tx(TransactionBehavior::Deferred, f)
    }

    /// Writes take the write lock up front so a batch never fails halfway
    /// on a lock upgrade.
    fn write<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        self.with_tx(TransactionBehavior::Immediate, f)
    }
}

impl<C> fmt::Debug for SqliteStore<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteStore")
            .field("path", &self.path)
            .field("memory", &self.memory)
            .finish_non_exhaustive()
    }
}

/// Open the connection, apply pragmas, and migrate the schema.
///
/// `journal_mode` cannot change inside a transaction, so the pragmas run
/// before the migration transaction.
fn initialize(path: &Path, config: &StoreConfig) -> Result<(Connection, String)> {
    let mut conn = Connection::open(path)?;
    conn.busy_timeout(config.busy_timeout_duration())?;

    let journal_mode: String = conn.pragma_update_and_check(
        None,
        "journal_mode",
        config.journal_mode.as_str(),
        |row| row.get(0),
    )?;
    conn.pragma_update(None, "synchronous", config.synchronous.as_str())?;

    migration::migrate(&mut conn)?;
    Ok((conn, journal_mode.to_lowercase()))
}

fn is_memory_path(path: &str) -> bool {
    path == ":memory:"
        || path.starts_with("file::memory:")
        || (path.starts_with("file:") && path.contains("mode=memory"))
}

/// The filesystem path behind a store path, which may be a `file:` URI.
fn database_file(path: &str) -> &str {
    let Some(rest) = path.strip_prefix("file:") else {
        return path;
    };
    let rest = rest.split(['?', '#']).next().unwrap_or(rest);
    match rest.strip_prefix("//") {
        // `file://host/path`: only an empty or `localhost` authority is valid.
        Some(authority_and_path) => authority_and_path
            .find('/')
            .map_or(authority_and_path, |slash| &authority_and_path[slash..]),
        None => rest,
    }
}

fn remove_if_exists(path: &str) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// SQLite integers are signed; indices past `i64::MAX` cannot be stored.
fn storable_index(index: u64) -> Option<i64> {
    i64::try_from(index).ok()
}

/// Clamp a range bound into SQLite's integer range. No stored index exceeds
/// `i64::MAX`, so clamping never changes which rows match.
fn clamp_index(index: u64) -> i64 {
    storable_index(index).unwrap_or(i64::MAX)
}

impl<C: EntryCodec> LogStore for SqliteStore<C> {
    fn first_index(&self) -> Result<u64> {
        let first: Option<i64> = self.read(|tx| {
            Ok(tx
                .query_row("SELECT idx FROM logs ORDER BY idx ASC LIMIT 1", [], |row| {
                    row.get(0)
                })
                .optional()?)
        })?;
        Ok(first.map_or(0, |idx| idx as u64))
    }

    fn last_index(&self) -> Result<u64> {
        let last: Option<i64> = self.read(|tx| {
            Ok(tx
                .query_row("SELECT idx FROM logs ORDER BY idx DESC LIMIT 1", [], |row| {
                    row.get(0)
                })
                .optional()?)
        })?;
        last.map(|idx| idx as u64).ok_or(StoreError::EmptyLog)
    }

    fn get_log(&self, index: u64) -> Result<LogEntry> {
        let key = storable_index(index);
        let data: Option<Vec<u8>> = self.read(|tx| match key {
            Some(key) => Ok(tx
                .query_row("SELECT data FROM logs WHERE idx = ?1", params![key], |row| {
                    row.get(0)
                })
                .optional()?),
            None => Ok(None),
        })?;

        let data = data.ok_or(StoreError::LogNotFound(index))?;
        let entry = self.codec.decode(&data)?;
        if entry.index != index {
            return Err(CoreError::Decoding(format!(
                "row {} holds an entry for index {}",
                index, entry.index
            ))
            .into());
        }
        Ok(entry)
    }

    fn store_logs(&self, entries: &[LogEntry]) -> Result<()> {
        self.ensure_open()?;
        if entries.is_empty() {
            return Ok(());
        }

        let rows = entries
            .iter()
            .map(|entry| {
                let idx = storable_index(entry.index)
                    .ok_or(StoreError::IndexOutOfRange(entry.index))?;
                Ok((idx, self.codec.encode(entry)?))
            })
            .collect::<Result<Vec<_>>>()?;

        self.write(|tx| {
            let mut stmt = tx.prepare_cached("INSERT INTO logs (idx, data) VALUES (?1, ?2)")?;
            for (idx, data) in &rows {
                stmt.execute(params![idx, data]).map_err(|e| {
                    if is_constraint_violation(&e) {
                        StoreError::DuplicateIndex(*idx as u64)
                    } else {
                        StoreError::Database(e)
                    }
                })?;
            }
            Ok(())
        })?;

        tracing::debug!(
            count = entries.len(),
            first = entries[0].index,
            last = entries[entries.len() - 1].index,
            "stored log entries"
        );
        Ok(())
    }

    fn delete_range(&self, min: u64, max: u64) -> Result<()> {
        self.ensure_open()?;
        if min > max || storable_index(min).is_none() {
            return Ok(());
        }

        let deleted = self.write(|tx| {
            Ok(tx.execute(
                "DELETE FROM logs WHERE idx >= ?1 AND idx <= ?2",
                params![clamp_index(min), clamp_index(max)],
            )?)
        })?;

        tracing::debug!(min, max, deleted, "deleted log range");
        Ok(())
    }
}

impl<C: EntryCodec> StableStore for SqliteStore<C> {
    fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.write(|tx| {
            tx.execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![key, value],
            )?;
            Ok(())
        })?;
        tracing::trace!(key = %display_key(key), len = value.len(), "set stable value");
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        let value: Option<Vec<u8>> = self.read(|tx| {
            Ok(tx
                .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                    row.get(0)
                })
                .optional()?)
        })?;
        value.ok_or_else(|| StoreError::KeyNotFound(key.to_vec()))
    }
}

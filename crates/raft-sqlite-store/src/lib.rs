//! # raft-sqlite Store
//!
//! Raft log storage and stable storage on SQLite.
//!
//! ## Overview
//!
//! A Raft implementation needs two kinds of durable state: the replicated
//! log and a handful of metadata values (current term, last vote). This
//! crate provides both behind the [`LogStore`] and [`StableStore`] traits.
//! The primary implementation is [`SqliteStore`], with [`MemoryStore`] for
//! tests.
//!
//! ## Key Types
//!
//! - [`LogStore`] - Ordered log entries keyed by index
//! - [`StableStore`] - Byte-string key/value pairs with `u64` helpers
//! - [`SqliteStore`] - SQLite-backed storage for both
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`StoreConfig`] - Journal mode, sync level, and busy timeout
//! - [`StoreError`] / [`ErrorKind`] - Typed failures
//!
//! ## Usage
//!
//! ```rust,no_run
//! use raft_sqlite_core::LogEntry;
//! use raft_sqlite_store::{LogStore, SqliteStore, StableStore};
//!
//! let store = SqliteStore::open("raft.db").unwrap();
//!
//! store.store_log(&LogEntry::new(1, 1, b"set x=1".to_vec())).unwrap();
//! assert_eq!(store.last_index().unwrap(), 1);
//!
//! store.set_u64(b"CurrentTerm", 1).unwrap();
//! assert_eq!(store.get_u64(b"CurrentTerm").unwrap(), 1);
//! ```
//!
//! ## Design Notes
//!
//! - **Durability**: WAL with `synchronous=NORMAL` by default. Consistent
//!   after a process crash; the newest commits may be lost on power loss.
//!   See [`config`].
//! - **Insert or fail**: a duplicate index fails the whole batch.
//! - **Empty log**: `first_index` returns `0`, `last_index` returns
//!   [`StoreError::EmptyLog`].
//! - **One connection**: guarded by a mutex; each operation is one
//!   transaction.

pub mod config;
pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;
mod tx;

pub use config::{JournalMode, StoreConfig, Synchronous};
pub use error::{ErrorKind, Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{LogStore, StableStore};

//! # raft-sqlite
//!
//! Durable storage for a Raft consensus engine on an embedded SQLite file.
//!
//! ## Overview
//!
//! The store persists two things a Raft node must not lose:
//!
//! - **The log**: ordered entries keyed by index, appended in atomic
//!   batches and truncated by inclusive range deletes
//! - **Stable metadata**: byte-string key/value pairs such as the current
//!   term and last vote
//!
//! Consensus, replication, snapshots and transport belong to the host.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use raft_sqlite::{LogEntry, LogStore, SqliteStore, StableStore};
//!
//! let store = SqliteStore::open("raft.db").unwrap();
//!
//! store
//!     .store_logs(&[
//!         LogEntry::new(1, 1, b"a".to_vec()),
//!         LogEntry::new(2, 1, b"b".to_vec()),
//!     ])
//!     .unwrap();
//! store.delete_range(1, 1).unwrap();
//! assert_eq!(store.first_index().unwrap(), 2);
//!
//! store.set_u64(b"CurrentTerm", 1).unwrap();
//! ```
//!
//! Async hosts wrap the store in [`AsyncStore`], which moves each call onto
//! tokio's blocking pool.
//!
//! ## Re-exports
//!
//! - `raft_sqlite::core` - Entry types and codecs
//! - `raft_sqlite::store` - Store traits, SQLite and memory stores

pub mod async_store;

// Re-export component crates
pub use raft_sqlite_core as core;
pub use raft_sqlite_store as store;

pub use async_store::{AsyncLogStore, AsyncStableStore, AsyncStore};

// Re-export commonly used types
pub use raft_sqlite_core::{CborCodec, EntryCodec, LogEntry, LogKind};
pub use raft_sqlite_store::{
    ErrorKind, JournalMode, LogStore, MemoryStore, Result, SqliteStore, StableStore, StoreConfig,
    StoreError, Synchronous,
};

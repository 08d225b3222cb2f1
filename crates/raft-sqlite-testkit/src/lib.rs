//! # raft-sqlite Testkit
//!
//! Testing utilities for raft-sqlite stores.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: disk-backed stores in temporary directories, entry builders
//! - **Generators**: Proptest strategies for log entries and index sets
//! - **Conformance**: checks every [`LogStore`](raft_sqlite_store::LogStore) +
//!   [`StableStore`](raft_sqlite_store::StableStore) implementation must pass
//!
//! ## Conformance
//!
//! ```rust
//! use raft_sqlite_store::MemoryStore;
//! use raft_sqlite_testkit::conformance::run_all;
//!
//! run_all(MemoryStore::new);
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use raft_sqlite_testkit::generators::log_batch;
//!
//! proptest! {
//!     #[test]
//!     fn stored_entries_read_back(entries in log_batch(64)) {
//!         // ...
//!     }
//! }
//! ```

pub mod conformance;
pub mod fixtures;
pub mod generators;

pub use fixtures::{entries, entry, TempStore};
pub use generators::{log_batch, log_entry, LogEntryParams};

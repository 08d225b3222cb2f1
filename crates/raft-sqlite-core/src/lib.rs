//! # raft-sqlite Core
//!
//! Pure primitives for the raft-sqlite store: log entries, the entry
//! serialization boundary, and stable-store value encoding.
//!
//! This crate contains no I/O and no storage. The store crate depends on it
//! for everything it persists.
//!
//! ## Key Types
//!
//! - [`LogEntry`] - One replicated log record, identified by its index
//! - [`LogKind`] - Discriminator for how the consensus layer interprets `data`
//! - [`EntryCodec`] - Pluggable encoding of a [`LogEntry`] to an opaque blob
//! - [`CborCodec`] - The default, self-describing CBOR codec
//!
//! ## Value Encoding
//!
//! Integer values in the stable store are 8-byte big-endian. See [`value`].

pub mod codec;
pub mod entry;
pub mod error;
pub mod value;

pub use codec::{CborCodec, EntryCodec};
pub use entry::{LogEntry, LogKind};
pub use error::CoreError;
pub use value::{decode_u64, display_key, encode_u64};

//! Proptest generators for property-based testing.

use std::collections::BTreeSet;

use proptest::prelude::*;

use raft_sqlite_core::{LogEntry, LogKind};

/// Largest index the generators produce. Stays well inside SQLite's
/// signed integer range.
pub const MAX_INDEX: u64 = 1 << 40;

/// Generate a LogKind.
pub fn log_kind() -> impl Strategy<Value = LogKind> {
    prop_oneof![
        Just(LogKind::Command),
        Just(LogKind::Noop),
        Just(LogKind::AddPeerDeprecated),
        Just(LogKind::RemovePeerDeprecated),
        Just(LogKind::Barrier),
        Just(LogKind::Configuration),
    ]
}

/// Generate payload bytes of specified max length.
pub fn payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate a storable log index (1-indexed).
pub fn index() -> impl Strategy<Value = u64> {
    1u64..=MAX_INDEX
}

/// Generate a log entry at a given index.
pub fn log_entry(index: u64) -> impl Strategy<Value = LogEntry> {
    (0u64..=1_000, log_kind(), payload(256), payload(16), any::<i64>()).prop_map(
        move |(term, kind, data, extensions, appended_at)| {
            LogEntry::new(index, term, data)
                .with_kind(kind)
                .with_extensions(extensions)
                .appended_at(appended_at)
        },
    )
}

/// Generate up to `max_len` entries with distinct indices, ordered by index.
pub fn log_batch(max_len: usize) -> impl Strategy<Value = Vec<LogEntry>> {
    prop::collection::btree_set(index(), 1..=max_len.max(1)).prop_flat_map(|indices| {
        indices
            .into_iter()
            .map(log_entry)
            .collect::<Vec<_>>()
    })
}

/// Generate a set of distinct indices.
pub fn index_set(max_len: usize) -> impl Strategy<Value = BTreeSet<u64>> {
    prop::collection::btree_set(1u64..=1_000, 0..=max_len)
}

/// Parameters for generating a log entry.
#[derive(Debug, Clone)]
pub struct LogEntryParams {
    pub index: u64,
    pub term: u64,
    pub kind: LogKind,
    pub data: Vec<u8>,
    pub extensions: Vec<u8>,
    pub appended_at: i64,
}

impl LogEntryParams {
    pub fn to_entry(&self) -> LogEntry {
        LogEntry::new(self.index, self.term, self.data.clone())
            .with_kind(self.kind)
            .with_extensions(self.extensions.clone())
            .appended_at(self.appended_at)
    }
}

impl Arbitrary for LogEntryParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            index(),
            0u64..=1_000,
            log_kind(),
            payload(1000),
            payload(32),
            0i64..=1_700_000_000_000i64,
        )
            .prop_map(
                |(index, term, kind, data, extensions, appended_at)| LogEntryParams {
                    index,
                    term,
                    kind,
                    data,
                    extensions,
                    appended_at,
                },
            )
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn batches_have_unique_sorted_indices(batch in log_batch(32)) {
            let indices: Vec<u64> = batch.iter().map(|e| e.index).collect();
            let mut sorted = indices.clone();
            sorted.sort_unstable();
            sorted.dedup();
            prop_assert_eq!(indices, sorted);
        }

        #[test]
        fn params_build_matching_entry(params: LogEntryParams) {
            let entry = params.to_entry();
            prop_assert_eq!(entry.index, params.index);
            prop_assert_eq!(entry.kind, params.kind);
            prop_assert_eq!(entry.data.as_ref(), &params.data[..]);
        }
    }
}

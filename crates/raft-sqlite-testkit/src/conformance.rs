//! Behavior every store implementation must share.
//!
//! Each check takes a fresh, empty store and panics on the first deviation,
//! so it can be called from an ordinary `#[test]`.

use raft_sqlite_core::{LogEntry, LogKind};
use raft_sqlite_store::{ErrorKind, LogStore, StableStore, StoreError};

use crate::fixtures::{entries, entry};

/// Run every check, each against a store produced by `make`.
pub fn run_all<S, F>(make: F)
where
    S: LogStore + StableStore,
    F: Fn() -> S,
{
    empty_log(&make());
    store_and_get(&make());
    first_and_last_index(&make());
    missing_index_is_not_found(&make());
    delete_range_is_inclusive(&make());
    duplicate_index_fails_whole_batch(&make());
    empty_batch_is_noop(&make());
    set_get_roundtrip(&make());
    set_overwrites(&make());
    missing_key_is_not_found(&make());
    u64_roundtrip(&make());
}

/// `first_index` is 0 and `last_index` reports an empty log.
pub fn empty_log<S: LogStore>(store: &S) {
    assert_eq!(store.first_index().unwrap(), 0);
    let err = store.last_index().unwrap_err();
    assert!(matches!(err, StoreError::EmptyLog), "got {err:?}");
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

/// Stored entries read back unchanged, every field included.
pub fn store_and_get<S: LogStore>(store: &S) {
    let batch = vec![
        LogEntry::new(1, 1, Vec::new()).with_kind(LogKind::Noop),
        LogEntry::new(2, 1, b"set x=1".to_vec())
            .with_extensions(b"trace-id".to_vec())
            .appended_at(1_700_000_000_123),
        LogEntry::new(3, 2, vec![0u8; 4096]).with_kind(LogKind::Configuration),
    ];
    store.store_logs(&batch).unwrap();
    store.store_log(&entry(4, "single")).unwrap();

    for expected in &batch {
        assert_eq!(&store.get_log(expected.index).unwrap(), expected);
    }
    assert_eq!(store.get_log(4).unwrap(), entry(4, "single"));
}

/// Indices {1, 2, 3} give first 1 and last 3.
pub fn first_and_last_index<S: LogStore>(store: &S) {
    store.store_logs(&entries(1..=3)).unwrap();
    assert_eq!(store.first_index().unwrap(), 1);
    assert_eq!(store.last_index().unwrap(), 3);
}

/// Missing indices report `LogNotFound`, before and after other entries exist.
pub fn missing_index_is_not_found<S: LogStore>(store: &S) {
    assert!(matches!(store.get_log(5), Err(StoreError::LogNotFound(5))));
    store.store_logs(&entries(1..=3)).unwrap();
    store.store_logs(&entries(7..=9)).unwrap();
    assert!(matches!(store.get_log(5), Err(StoreError::LogNotFound(5))));
    assert!(matches!(store.get_log(0), Err(StoreError::LogNotFound(0))));
}

/// Exactly the entries in `[min, max]` disappear.
pub fn delete_range_is_inclusive<S: LogStore>(store: &S) {
    store.store_logs(&entries(1..=10)).unwrap();
    store.delete_range(3, 6).unwrap();

    for i in 1..=10 {
        let result = store.get_log(i);
        if (3..=6).contains(&i) {
            assert!(result.unwrap_err().is_not_found(), "index {i} survived");
        } else {
            assert_eq!(result.unwrap().index, i);
        }
    }

    store.delete_range(1, 2).unwrap();
    assert_eq!(store.first_index().unwrap(), 7);
    store.delete_range(7, 10).unwrap();
    assert_eq!(store.first_index().unwrap(), 0);
}

/// A batch containing an existing index stores nothing.
pub fn duplicate_index_fails_whole_batch<S: LogStore>(store: &S) {
    store.store_log(&entry(3, "original")).unwrap();

    let err = store.store_logs(&entries(1..=5)).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateIndex(3)), "got {err:?}");
    assert_eq!(err.kind(), ErrorKind::Transaction);

    assert_eq!(store.first_index().unwrap(), 3);
    assert_eq!(store.last_index().unwrap(), 3);
    assert_eq!(store.get_log(3).unwrap().data.as_ref(), b"original");
}

/// Storing nothing succeeds and changes nothing.
pub fn empty_batch_is_noop<S: LogStore>(store: &S) {
    store.store_logs(&[]).unwrap();
    assert_eq!(store.first_index().unwrap(), 0);
}

pub fn set_get_roundtrip<S: StableStore>(store: &S) {
    let pairs: [(&[u8], &[u8]); 3] = [
        (b"CurrentTerm", b"\x00\x00\x00\x00\x00\x00\x00\x05"),
        (b"LastVoteCand", b"node-3"),
        (&[0x00, 0xff], b""),
    ];
    for (key, value) in pairs {
        store.set(key, value).unwrap();
    }
    for (key, value) in pairs {
        assert_eq!(store.get(key).unwrap(), value);
    }
}

pub fn set_overwrites<S: StableStore>(store: &S) {
    store.set(b"key", b"first").unwrap();
    store.set(b"key", b"second").unwrap();
    assert_eq!(store.get(b"key").unwrap(), b"second");
}

pub fn missing_key_is_not_found<S: StableStore>(store: &S) {
    let err = store.get(b"404").unwrap_err();
    assert!(matches!(err, StoreError::KeyNotFound(ref k) if k == b"404"), "got {err:?}");
    assert!(store.get_u64(b"404").unwrap_err().is_not_found());
}

pub fn u64_roundtrip<S: StableStore>(store: &S) {
    for value in [0, 1, 123, u64::MAX] {
        store.set_u64(b"n", value).unwrap();
        assert_eq!(store.get_u64(b"n").unwrap(), value);
    }
    assert_eq!(store.get(b"n").unwrap(), u64::MAX.to_be_bytes());

    store.set(b"short", b"1234").unwrap();
    assert!(matches!(
        store.get_u64(b"short"),
        Err(StoreError::InvalidValue { found: 4, .. })
    ));
}

//! Entry codecs: the boundary between a [`LogEntry`] and the opaque blob the
//! store persists.
//!
//! The store only requires that `decode(encode(e)) == e` and that the format
//! stays readable across releases. [`CborCodec`] is the default: CBOR is
//! self-describing, so fields can be added without breaking old rows.

use crate::entry::LogEntry;
use crate::error::CoreError;

/// Encodes and decodes log entries for persistence.
pub trait EntryCodec: Send + Sync {
    /// Serialize an entry to bytes.
    fn encode(&self, entry: &LogEntry) -> Result<Vec<u8>, CoreError>;

    /// Deserialize an entry from bytes produced by [`EntryCodec::encode`].
    fn decode(&self, bytes: &[u8]) -> Result<LogEntry, CoreError>;
}

/// CBOR codec backed by `ciborium`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CborCodec;

impl EntryCodec for CborCodec {
    fn encode(&self, entry: &LogEntry) -> Result<Vec<u8>, CoreError> {
        let mut buf = Vec::new();
        ciborium::into_writer(entry, &mut buf).map_err(|e| CoreError::Encoding(e.to_string()))?;
        Ok(buf)
    }

    fn decode(&self, bytes: &[u8]) -> Result<LogEntry, CoreError> {
        ciborium::from_reader(bytes).map_err(|e| CoreError::Decoding(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::LogKind;
    use ciborium::value::Value;
    use proptest::prelude::*;

    fn sample() -> LogEntry {
        LogEntry::new(3, 1, b"payload".to_vec())
            .with_kind(LogKind::Configuration)
            .with_extensions(vec![0xde, 0xad])
            .appended_at(1234567890000)
    }

    #[test]
    fn test_cbor_roundtrip() {
        let entry = sample();
        let bytes = CborCodec.encode(&entry).unwrap();
        assert_eq!(CborCodec.decode(&bytes).unwrap(), entry);
    }

    #[test]
    fn test_cbor_is_self_describing() {
        let bytes = CborCodec.encode(&sample()).unwrap();
        let value: Value = ciborium::from_reader(&bytes[..]).unwrap();

        let map = value.as_map().expect("entry encodes as a map");
        let index = map
            .iter()
            .find(|(k, _)| k.as_text() == Some("index"))
            .map(|(_, v)| v.clone())
            .expect("index field present");
        assert_eq!(index, Value::Integer(3.into()));

        let data = map
            .iter()
            .find(|(k, _)| k.as_text() == Some("data"))
            .map(|(_, v)| v.clone())
            .unwrap();
        assert_eq!(data, Value::Bytes(b"payload".to_vec()));
    }

    #[test]
    fn test_decode_garbage_fails() {
        let err = CborCodec.decode(&[0xff, 0x00, 0x13]).unwrap_err();
        assert!(matches!(err, CoreError::Decoding(_)));
    }

    #[test]
    fn test_decode_unknown_kind_fails() {
        let mut entry = sample();
        entry.kind = LogKind::Command;
        let bytes = CborCodec.encode(&entry).unwrap();

        // Rewrite the kind field to an unassigned discriminant.
        let mut value: Value = ciborium::from_reader(&bytes[..]).unwrap();
        if let Value::Map(map) = &mut value {
            for (k, v) in map.iter_mut() {
                if k.as_text() == Some("kind") {
                    *v = Value::Integer(200.into());
                }
            }
        }
        let mut tampered = Vec::new();
        ciborium::into_writer(&value, &mut tampered).unwrap();

        assert!(CborCodec.decode(&tampered).is_err());
    }

    proptest! {
        #[test]
        fn cbor_roundtrip_preserves_entry(
            index: u64,
            term: u64,
            kind in 0u8..=5,
            data in prop::collection::vec(any::<u8>(), 0..512),
            extensions in prop::collection::vec(any::<u8>(), 0..32),
            appended_at: i64,
        ) {
            let entry = LogEntry::new(index, term, data)
                .with_kind(LogKind::from_u8(kind).unwrap())
                .with_extensions(extensions)
                .appended_at(appended_at);
            let bytes = CborCodec.encode(&entry).unwrap();
            prop_assert_eq!(CborCodec.decode(&bytes).unwrap(), entry);
        }
    }
}

//! Stable-store value encoding.
//!
//! Integers are stored as fixed-width big-endian bytes so that values written
//! on one platform read back identically on any other, and so that the byte
//! order of two encoded values matches their numeric order.

/// Width in bytes of an encoded `u64`.
pub const U64_WIDTH: usize = 8;

/// Encode a `u64` as 8 big-endian bytes.
pub fn encode_u64(value: u64) -> [u8; U64_WIDTH] {
    value.to_be_bytes()
}

/// Decode 8 big-endian bytes into a `u64`.
///
/// Returns `None` unless `bytes` is exactly 8 bytes long.
pub fn decode_u64(bytes: &[u8]) -> Option<u64> {
    let arr: [u8; U64_WIDTH] = bytes.try_into().ok()?;
    Some(u64::from_be_bytes(arr))
}

/// Render a stable-store key for errors and logs.
///
/// Printable ASCII keys are shown verbatim, anything else as `0x`-prefixed hex.
pub fn display_key(key: &[u8]) -> String {
    if !key.is_empty() && key.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
        String::from_utf8_lossy(key).into_owned()
    } else {
        format!("0x{}", hex::encode(key))
    }
}

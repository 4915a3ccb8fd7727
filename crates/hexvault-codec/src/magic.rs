//! Packed ASCII structure tags
//!
//! Tags are packed with the first character in the lowest-order byte, so the
//! packed value equals a little-endian integer read from the tag's on-disk
//! bytes on every host.

/// Pack a four-character tag
pub const fn magic32(tag: &[u8; 4]) -> u32 {
    u32::from_le_bytes(*tag)
}

/// Pack an eight-character tag
pub const fn magic64(tag: &[u8; 8]) -> u64 {
    u64::from_le_bytes(*tag)
}

/// Unpack a four-character tag
pub const fn unmagic32(value: u32) -> [u8; 4] {
    value.to_le_bytes()
}

/// Unpack an eight-character tag
pub const fn unmagic64(value: u64) -> [u8; 8] {
    value.to_le_bytes()
}

//! Fixed-capacity string fields
//!
//! Record layouts often reserve `ENCODED` bytes for a name but only allow
//! `LOGICAL` characters, keeping the trailing bytes for a terminator or for
//! future use. [`FixedString`] never reads or writes past `LOGICAL`.

use std::borrow::Cow;
use std::fmt;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// A NUL-padded string field of `ENCODED` bytes, `LOGICAL` of them usable
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct FixedString<const ENCODED: usize, const LOGICAL: usize> {
    bytes: [u8; ENCODED],
}

impl<const ENCODED: usize, const LOGICAL: usize> FixedString<ENCODED, LOGICAL> {
    const LAYOUT_OK: () = assert!(LOGICAL <= ENCODED, "logical size exceeds encoded size");

    /// Physical size of the field
    pub const ENCODED_SIZE: usize = ENCODED;

    /// Maximum decodable length
    pub const LOGICAL_SIZE: usize = LOGICAL;

    /// An all-zero field
    pub fn new() -> Self {
        let () = Self::LAYOUT_OK;
        Self {
            bytes: [0u8; ENCODED],
        }
    }

    /// Wrap raw field bytes
    pub fn from_bytes(bytes: [u8; ENCODED]) -> Self {
        let () = Self::LAYOUT_OK;
        Self { bytes }
    }

    /// A field holding `value`
    pub fn from_str_truncated(value: &str) -> Self {
        let mut field = Self::new();
        field.encode(value);
        field
    }

    /// Raw field bytes, including the reserved tail
    pub fn bytes(&self) -> &[u8; ENCODED] {
        &self.bytes
    }

    /// Store `value`, truncated to `LOGICAL` bytes
    ///
    /// The rest of the logical region is zero-filled. Bytes in
    /// `[LOGICAL, ENCODED)` are left untouched.
    pub fn encode(&mut self, value: &str) {
        let () = Self::LAYOUT_OK;
        let src = value.as_bytes();
        let n = src.len().min(LOGICAL);
        self.bytes[..n].copy_from_slice(&src[..n]);
        self.bytes[n..LOGICAL].fill(0);
    }

    /// The logical bytes up to the first NUL
    pub fn decode_bytes(&self) -> &[u8] {
        let () = Self::LAYOUT_OK;
        let logical = &self.bytes[..LOGICAL];
        let end = logical.iter().position(|&b| b == 0).unwrap_or(LOGICAL);
        &logical[..end]
    }

    /// Decode the stored string, replacing invalid UTF-8
    pub fn decode(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.decode_bytes())
    }
}

impl<const ENCODED: usize, const LOGICAL: usize> Default for FixedString<ENCODED, LOGICAL> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const ENCODED: usize, const LOGICAL: usize> fmt::Debug for FixedString<ENCODED, LOGICAL> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedString<{}, {}>({:?})", ENCODED, LOGICAL, self.decode())
    }
}

impl<const ENCODED: usize, const LOGICAL: usize> fmt::Display for FixedString<ENCODED, LOGICAL> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.decode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_to_logical_size() {
        let mut field = FixedString::<8, 6>::from_bytes([0xEE; 8]);
        field.encode("ABCDEFGHIJ");
        assert_eq!(field.bytes(), &[b'A', b'B', b'C', b'D', b'E', b'F', 0xEE, 0xEE]);
        assert_eq!(field.decode(), "ABCDEF");
    }

    #[test]
    fn test_short_string_zero_fills_logical_region() {
        let mut field = FixedString::<8, 6>::from_bytes([0xEE; 8]);
        field.encode("AB");
        assert_eq!(field.bytes(), &[b'A', b'B', 0, 0, 0, 0, 0xEE, 0xEE]);
        assert_eq!(field.decode(), "AB");
    }

    #[test]
    fn test_decode_stops_at_logical_boundary() {
        let field = FixedString::<6, 4>::from_bytes(*b"WXYZ12");
        assert_eq!(field.decode(), "WXYZ");
        assert_eq!(FixedString::<6, 4>::LOGICAL_SIZE, 4);
        assert_eq!(FixedString::<6, 4>::ENCODED_SIZE, 6);
    }

    #[test]
    fn test_decode_invalid_utf8_is_lossy() {
        let field = FixedString::<4, 4>::from_bytes([b'a', 0xFF, b'b', 0]);
        assert_eq!(field.decode(), "a\u{FFFD}b");
    }

    #[test]
    fn test_full_width_string() {
        let field = FixedString::<4, 4>::from_str_truncated("TEST");
        assert_eq!(field.to_string(), "TEST");
        assert_eq!(field.decode_bytes(), b"TEST");
    }
}

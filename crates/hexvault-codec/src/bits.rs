//! Bit arrays with selectable byte and bit order
//!
//! Flag words in firmware headers are specified bit-by-bit, but formats
//! disagree on where bit 0 lives. A [`BitArray`] locates bit `i` in two
//! steps:
//!
//! 1. byte: `i / 8` with [`LeBytes`], `N - 1 - i / 8` with [`BeBytes`]
//! 2. bit within that byte: mask `1 << (i % 8)` with [`Lsb0`],
//!    `0x80 >> (i % 8)` with [`Msb0`]
//!
//! ```rust
//! use hexvault_codec::bits::{BeBytes, BitArray, Lsb0, Msb0, LeBytes};
//!
//! let mut flags = BitArray::<2, BeBytes, Msb0>::new();
//! flags.set(0);
//! assert_eq!(flags.bytes(), &[0x00, 0x80]);
//!
//! let mut flags = BitArray::<2, LeBytes, Lsb0>::new();
//! flags.set(0);
//! assert_eq!(flags.bytes(), &[0x01, 0x00]);
//! ```

use std::fmt;
use std::marker::PhantomData;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// Where bit index 0 lands at byte granularity
pub trait ByteOrdering {
    /// True if the last byte holds the lowest indices
    const REVERSED: bool;
}

/// Where bit index 0 lands inside a byte
pub trait BitOrdering {
    /// True if the most significant bit holds the lowest index
    const MSB_FIRST: bool;
}

/// Lowest indices in the first byte
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned, Debug, Clone, Copy)]
#[repr(C)]
pub struct LeBytes;

/// Lowest indices in the last byte
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned, Debug, Clone, Copy)]
#[repr(C)]
pub struct BeBytes;

/// Lowest index in the least significant bit
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned, Debug, Clone, Copy)]
#[repr(C)]
pub struct Lsb0;

/// Lowest index in the most significant bit
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned, Debug, Clone, Copy)]
#[repr(C)]
pub struct Msb0;

impl ByteOrdering for LeBytes {
    const REVERSED: bool = false;
}

impl ByteOrdering for BeBytes {
    const REVERSED: bool = true;
}

impl BitOrdering for Lsb0 {
    const MSB_FIRST: bool = false;
}

impl BitOrdering for Msb0 {
    const MSB_FIRST: bool = true;
}

/// `N` bytes addressed as `N * 8` bits
///
/// Out-of-range indices read as clear and are ignored by the mutators.
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(transparent)]
pub struct BitArray<const N: usize, B = LeBytes, O = Lsb0> {
    bytes: [u8; N],
    _order: PhantomData<(B, O)>,
}

impl<const N: usize, B: ByteOrdering, O: BitOrdering> BitArray<N, B, O> {
    /// All bits clear
    pub fn new() -> Self {
        Self::from_bytes([0u8; N])
    }

    /// Wrap raw bytes
    pub fn from_bytes(bytes: [u8; N]) -> Self {
        Self {
            bytes,
            _order: PhantomData,
        }
    }

    /// Raw bytes
    pub fn bytes(&self) -> &[u8; N] {
        &self.bytes
    }

    /// Number of addressable bits
    pub fn bit_len(&self) -> usize {
        N * 8
    }

    /// Byte index and mask for bit `index`
    pub fn locate(index: usize) -> Option<(usize, u8)> {
        if index >= N * 8 {
            return None;
        }
        let byte = if B::REVERSED { N - 1 - index / 8 } else { index / 8 };
        let shift = (index % 8) as u32;
        let mask = if O::MSB_FIRST { 0x80u8 >> shift } else { 1u8 << shift };
        Some((byte, mask))
    }

    pub fn test(&self, index: usize) -> bool {
        match Self::locate(index) {
            Some((byte, mask)) => self.bytes[byte] & mask != 0,
            None => false,
        }
    }

    pub fn set(&mut self, index: usize) {
        if let Some((byte, mask)) = Self::locate(index) {
            self.bytes[byte] |= mask;
        }
    }

    pub fn reset(&mut self, index: usize) {
        if let Some((byte, mask)) = Self::locate(index) {
            self.bytes[byte] &= !mask;
        }
    }

    pub fn flip(&mut self, index: usize) {
        if let Some((byte, mask)) = Self::locate(index) {
            self.bytes[byte] ^= mask;
        }
    }

    /// Number of set bits
    pub fn count_ones(&self) -> u32 {
        self.bytes.iter().map(|b| b.count_ones()).sum()
    }
}

impl<const N: usize, B: ByteOrdering, O: BitOrdering> Default for BitArray<N, B, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize, B, O> Clone for BitArray<N, B, O> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<const N: usize, B, O> Copy for BitArray<N, B, O> {}

impl<const N: usize, B, O> PartialEq for BitArray<N, B, O> {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl<const N: usize, B, O> Eq for BitArray<N, B, O> {}

impl<const N: usize, B, O> fmt::Debug for BitArray<N, B, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitArray(")?;
        for byte in &self.bytes {
            write!(f, "{:08b}", byte)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_regimes_for_index_zero() {
        let mut a = BitArray::<2, LeBytes, Lsb0>::new();
        a.set(0);
        assert_eq!(a.bytes(), &[0x01, 0x00]);

        let mut b = BitArray::<2, LeBytes, Msb0>::new();
        b.set(0);
        assert_eq!(b.bytes(), &[0x80, 0x00]);

        let mut c = BitArray::<2, BeBytes, Lsb0>::new();
        c.set(0);
        assert_eq!(c.bytes(), &[0x00, 0x01]);

        let mut d = BitArray::<2, BeBytes, Msb0>::new();
        d.set(0);
        assert_eq!(d.bytes(), &[0x00, 0x80]);
    }

    #[test]
    fn test_crossing_byte_boundary() {
        let mut bits = BitArray::<2, LeBytes, Lsb0>::new();
        bits.set(9);
        assert_eq!(bits.bytes(), &[0x00, 0x02]);

        let mut bits = BitArray::<2, BeBytes, Msb0>::new();
        bits.set(9);
        assert_eq!(bits.bytes(), &[0x40, 0x00]);
    }

    #[test]
    fn test_set_is_idempotent() {
        let mut bits = BitArray::<4, BeBytes, Lsb0>::from_bytes([0xA5, 0x00, 0x3C, 0x81]);
        let before = bits;
        bits.set(5);
        let once = bits;
        bits.set(5);
        assert_eq!(bits, once);
        assert!(bits.test(5));
        for i in (0..32).filter(|&i| i != 5) {
            assert_eq!(bits.test(i), before.test(i), "bit {} changed", i);
        }
    }

    #[test]
    fn test_flip_twice_restores() {
        let original = BitArray::<3, LeBytes, Msb0>::from_bytes([0x12, 0x34, 0x56]);
        let mut bits = original;
        for i in 0..24 {
            bits.flip(i);
            bits.flip(i);
        }
        assert_eq!(bits, original);
    }

    #[test]
    fn test_reset_and_out_of_range() {
        let mut bits = BitArray::<1>::from_bytes([0xFF]);
        bits.reset(3);
        assert_eq!(bits.bytes(), &[0xF7]);
        assert_eq!(bits.count_ones(), 7);

        bits.set(8);
        bits.flip(100);
        assert_eq!(bits.bytes(), &[0xF7]);
        assert!(!bits.test(8));
        assert_eq!(bits.bit_len(), 8);
    }
}

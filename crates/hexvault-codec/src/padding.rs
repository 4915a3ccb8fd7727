//! Reserved byte runs

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// `N` reserved bytes with no meaning
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned, Clone, Copy, PartialEq, Eq, Debug)]
#[repr(transparent)]
pub struct Padding<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> Padding<N> {
    pub const SIZE: usize = N;

    pub fn new() -> Self {
        Self { bytes: [0u8; N] }
    }

    /// True if every reserved byte is zero
    pub fn is_zeroed(&self) -> bool {
        self.bytes.iter().all(|&b| b == 0)
    }
}

impl<const N: usize> Default for Padding<N> {
    fn default() -> Self {
        Self::new()
    }
}

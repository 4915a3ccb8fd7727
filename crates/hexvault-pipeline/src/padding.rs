//! Padding source - a virtual run of one repeated byte

use hexvault_core::{ByteWindow, Result, Source};

/// A [`Source`] of `length` copies of `fill`
///
/// Nothing is stored; only the bytes of each pull are allocated. Commonly
/// used as an overlay base or to stand in for sparse regions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaddingSource {
    fill: u8,
    length: u64,
}

impl PaddingSource {
    pub fn new(fill: u8, length: u64) -> Self {
        Self { fill, length }
    }

    /// A run of zero bytes
    pub fn zeroes(length: u64) -> Self {
        Self::new(0, length)
    }

    pub fn fill(&self) -> u8 {
        self.fill
    }
}

impl Source for PaddingSource {
    fn length(&self) -> u64 {
        self.length
    }

    fn pull(&self, offset: i64, requested: usize) -> Result<Vec<u8>> {
        Ok(match ByteWindow::clip(self.length, offset, requested) {
            Some(window) => vec![self.fill; window.length as usize],
            None => Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_pull() {
        let pad = PaddingSource::new(0xFF, 10);
        assert_eq!(pad.pull(0, 4).unwrap(), vec![0xFF; 4]);
        assert_eq!(pad.pull(8, 4).unwrap(), vec![0xFF; 2]);
        assert!(pad.pull(10, 4).unwrap().is_empty());
        assert!(pad.pull(-2, 4).unwrap().is_empty());
    }

    #[test]
    fn test_huge_padding_is_cheap() {
        let pad = PaddingSource::zeroes(u64::MAX);
        assert_eq!(pad.length(), u64::MAX);
        assert_eq!(pad.pull(i64::MAX - 1, 16).unwrap(), vec![0; 16]);
        assert_eq!(pad.fill(), 0);
    }
}

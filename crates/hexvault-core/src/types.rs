//! Core types for hexvault

use crate::path::Path;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open byte range `[offset, offset + length)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ByteWindow {
    /// Absolute start offset
    pub offset: u64,
    /// Number of bytes in the window
    pub length: u64,
}

impl ByteWindow {
    /// Create a new window
    pub fn new(offset: u64, length: u64) -> Self {
        Self { offset, length }
    }

    /// Exclusive end offset, saturating at `u64::MAX`
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.length)
    }

    /// True if the window holds no bytes
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// True if `offset` falls inside the window
    pub fn contains(&self, offset: u64) -> bool {
        offset >= self.offset && offset < self.end()
    }

    /// True if the two windows share at least one byte
    pub fn overlaps(&self, other: &ByteWindow) -> bool {
        !self.is_empty() && !other.is_empty() && self.offset < other.end() && other.offset < self.end()
    }

    /// The bytes common to both windows, if any
    pub fn intersect(&self, other: &ByteWindow) -> Option<ByteWindow> {
        let start = self.offset.max(other.offset);
        let end = self.end().min(other.end());
        if start < end {
            Some(ByteWindow::new(start, end - start))
        } else {
            None
        }
    }

    /// Clip a pull request against a source of `length` bytes
    ///
    /// Returns `None` when the request yields no data: a negative offset, an
    /// offset at or past `length`, or a zero-byte request.
    pub fn clip(length: u64, offset: i64, requested: usize) -> Option<ByteWindow> {
        if offset < 0 || requested == 0 {
            return None;
        }
        let offset = offset as u64;
        if offset >= length {
            return None;
        }
        let available = length - offset;
        Some(ByteWindow::new(offset, available.min(requested as u64)))
    }
}

impl fmt::Display for ByteWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[0x{:X}, 0x{:X})", self.offset, self.end())
    }
}

/// How [`crate::FileSystem::open_file`] treats an existing or missing file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpenMode {
    /// Create the file, truncating it if it exists
    Create,
    /// Create the file, failing if it exists
    CreateNew,
    /// Open an existing file
    Open,
    /// Open the file, creating it if missing
    OpenOrCreate,
    /// Open an existing file and truncate it to zero bytes
    Truncate,
    /// Open or create the file and position the cursor at the end
    Append,
}

impl OpenMode {
    /// True if a missing file is created
    pub fn creates(self) -> bool {
        matches!(
            self,
            OpenMode::Create | OpenMode::CreateNew | OpenMode::OpenOrCreate | OpenMode::Append
        )
    }

    /// True if existing content is discarded
    pub fn truncates(self) -> bool {
        matches!(self, OpenMode::Create | OpenMode::Truncate)
    }
}

/// Access rights requested from [`crate::FileSystem::open_file`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileAccess {
    Read,
    Write,
    ReadWrite,
}

impl FileAccess {
    pub fn can_read(self) -> bool {
        matches!(self, FileAccess::Read | FileAccess::ReadWrite)
    }

    pub fn can_write(self) -> bool {
        matches!(self, FileAccess::Write | FileAccess::ReadWrite)
    }
}

/// Contents of a directory
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DirectoryListing {
    /// Names of child directories
    pub subdirectories: Vec<String>,
    /// Names of child files
    pub files: Vec<String>,
    /// Absolute path of the listed directory
    pub absolute_path: Path,
}

impl DirectoryListing {
    /// Create an empty listing for `absolute_path`
    pub fn new(absolute_path: Path) -> Self {
        Self {
            subdirectories: Vec::new(),
            files: Vec::new(),
            absolute_path,
        }
    }

    /// Sort both name lists so listings compare independent of backend order
    pub fn sorted(mut self) -> Self {
        self.subdirectories.sort();
        self.files.sort();
        self
    }
}

impl fmt::Display for DirectoryListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.absolute_path)?;
        for dir in &self.subdirectories {
            writeln!(f, "d {:>12} {}", "<DIR>", dir)?;
        }
        for file in &self.files {
            writeln!(f, "f {:>12} {}", "", file)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_rules() {
        assert_eq!(ByteWindow::clip(10, -1, 4), None);
        assert_eq!(ByteWindow::clip(10, 10, 4), None);
        assert_eq!(ByteWindow::clip(10, 3, 0), None);
        assert_eq!(ByteWindow::clip(10, 8, 4), Some(ByteWindow::new(8, 2)));
        assert_eq!(ByteWindow::clip(10, 2, 4), Some(ByteWindow::new(2, 4)));
    }

    #[test]
    fn test_window_overlap() {
        let a = ByteWindow::new(0, 10);
        let b = ByteWindow::new(10, 5);
        let c = ByteWindow::new(9, 2);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert_eq!(a.intersect(&c), Some(ByteWindow::new(9, 1)));
        assert_eq!(a.intersect(&b), None);
        assert!(!ByteWindow::new(3, 0).overlaps(&a));
    }

    #[test]
    fn test_open_mode_flags() {
        assert!(OpenMode::Create.creates());
        assert!(OpenMode::Create.truncates());
        assert!(!OpenMode::Open.creates());
        assert!(OpenMode::Truncate.truncates());
        assert!(FileAccess::ReadWrite.can_read());
        assert!(!FileAccess::Read.can_write());
    }
}

//! File-backed stream

use hexvault_core::{resolve_seek, Error, FileAccess, Result, Stream};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};

/// A [`Stream`] over an open host file
///
/// The stream keeps its own cursor and seeks the file before every transfer,
/// so the file's OS-level position is never relied upon.
#[derive(Debug)]
pub struct FileStream {
    file: File,
    position: u64,
    length: u64,
    access: FileAccess,
}

impl FileStream {
    /// Wrap an open file
    ///
    /// `access` must match the rights the file was opened with.
    ///
    /// # Errors
    ///
    /// Returns an error if the file metadata cannot be read
    pub fn from_file(file: File, access: FileAccess) -> Result<Self> {
        let length = file.metadata()?.len();
        Ok(Self {
            file,
            position: 0,
            length,
            access,
        })
    }

    /// Open `path` read-only
    pub fn open(path: &std::path::Path) -> Result<Self> {
        Self::from_file(File::open(path)?, FileAccess::Read)
    }

    /// Get the remaining bytes from current position to end
    pub fn remaining(&self) -> u64 {
        self.length.saturating_sub(self.position)
    }
}

impl Stream for FileStream {
    fn can_read(&self) -> bool {
        self.access.can_read()
    }

    fn can_write(&self) -> bool {
        self.access.can_write()
    }

    fn can_seek(&self) -> bool {
        true
    }

    fn length(&self) -> u64 {
        self.length
    }

    fn position(&self) -> u64 {
        self.position
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        self.position = resolve_seek(pos, self.position, self.length)?;
        Ok(self.position)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if !self.can_read() {
            return Err(Error::unsupported_capability("file opened without read access"));
        }
        if self.remaining() == 0 || buf.is_empty() {
            return Ok(0);
        }

        self.file.seek(SeekFrom::Start(self.position))?;
        let n = self.file.read(buf)?;
        self.position += n as u64;
        Ok(n)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        if !self.can_write() {
            return Err(Error::unsupported_capability("file opened without write access"));
        }
        self.file.seek(SeekFrom::Start(self.position))?;
        let n = self.file.write(buf)?;
        self.position += n as u64;
        self.length = self.length.max(self.position);
        Ok(n)
    }

    fn set_length(&mut self, length: u64) -> Result<()> {
        if !self.can_write() {
            return Err(Error::unsupported_capability("file opened without write access"));
        }
        self.file.set_len(length)?;
        self.length = length;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.file.flush()?;
        Ok(())
    }
}

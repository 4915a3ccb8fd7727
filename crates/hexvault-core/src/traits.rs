//! Core traits for hexvault

use crate::{
    error::{Error, Result},
    path::Path,
    types::{DirectoryListing, FileAccess, OpenMode},
};
use std::cell::RefCell;
use std::io::SeekFrom;
use std::rc::Rc;

/// Read-only random-access byte provider
///
/// `pull` is saturating: it returns `min(requested, length - offset)` bytes
/// and an empty buffer for a negative offset or one at or past the end.
/// Only backing-store failures are reported as errors.
pub trait Source {
    /// Total number of bytes
    fn length(&self) -> u64;

    /// Read up to `requested` bytes starting at `offset`
    fn pull(&self, offset: i64, requested: usize) -> Result<Vec<u8>>;
}

/// Write-only random-access byte consumer
pub trait Sink {
    /// Current number of bytes
    fn length(&self) -> u64;

    /// Write `data` at `offset`, growing the store when it ends past `length`
    fn push(&mut self, offset: u64, data: &[u8]) -> Result<()>;
}

/// Cursor-based read/write/seek object
pub trait Stream {
    fn can_read(&self) -> bool;

    fn can_write(&self) -> bool;

    fn can_seek(&self) -> bool;

    /// Total number of bytes
    fn length(&self) -> u64;

    /// Current cursor
    fn position(&self) -> u64;

    /// Move the cursor, returning the new absolute position
    fn seek(&mut self, pos: SeekFrom) -> Result<u64>;

    /// Read into `buf`, returning the number of bytes transferred
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Write `buf`, returning the number of bytes transferred
    fn write(&mut self, _buf: &[u8]) -> Result<usize> {
        Err(Error::unsupported_capability("stream is not writable"))
    }

    /// Resize the stream
    fn set_length(&mut self, _length: u64) -> Result<()> {
        Err(Error::unsupported_capability("stream cannot be resized"))
    }

    /// Push buffered writes to the backing store
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// Read until `buf` is full or the stream reports end of data
    fn read_fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.read(&mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        Ok(filled)
    }

    /// Write all of `buf`, failing if the stream stops accepting bytes
    fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        let mut written = 0;
        while written < buf.len() {
            let n = self.write(&buf[written..])?;
            if n == 0 {
                return Err(Error::out_of_range(format!(
                    "stream accepted {} of {} bytes",
                    written,
                    buf.len()
                )));
            }
            written += n;
        }
        Ok(())
    }
}

/// Directory and file operations over some backing store
///
/// Every instance owns its working directory. Operations other than
/// working-directory handling, opening and listing are optional and report
/// [`Error::NotImplemented`] unless a backend provides them.
pub trait FileSystem {
    /// Current working directory (always absolute)
    fn working_directory(&self) -> Path;

    /// Change the working directory
    fn set_working_directory(&mut self, path: &Path) -> Result<()>;

    /// Create an empty file
    fn create_file(&mut self, path: &Path) -> Result<()> {
        Err(Error::not_implemented(format!("create_file({})", path)))
    }

    /// Delete a file
    fn remove_file(&mut self, path: &Path) -> Result<()> {
        Err(Error::not_implemented(format!("remove_file({})", path)))
    }

    /// Open a file as a stream
    fn open_file(&mut self, path: &Path, mode: OpenMode, access: FileAccess)
        -> Result<Box<dyn Stream>>;

    /// Create a directory (the parent must exist)
    fn create_directory(&mut self, path: &Path) -> Result<()> {
        Err(Error::not_implemented(format!("create_directory({})", path)))
    }

    /// Delete an empty directory
    fn remove_directory(&mut self, path: &Path) -> Result<()> {
        Err(Error::not_implemented(format!("remove_directory({})", path)))
    }

    /// Enumerate a directory
    fn list_directory(&self, path: &Path) -> Result<DirectoryListing>;
}

/// A source shared between composed views
pub type SharedSource = Rc<dyn Source>;

/// A stream shared between composed views
pub type SharedStream = Rc<RefCell<dyn Stream>>;

/// A filesystem shared between scoped views
pub type SharedFileSystem = Rc<RefCell<dyn FileSystem>>;

impl<S: Source + ?Sized> Source for Rc<S> {
    fn length(&self) -> u64 {
        (**self).length()
    }

    fn pull(&self, offset: i64, requested: usize) -> Result<Vec<u8>> {
        (**self).pull(offset, requested)
    }
}

impl<S: Stream + ?Sized> Stream for Box<S> {
    fn can_read(&self) -> bool {
        (**self).can_read()
    }

    fn can_write(&self) -> bool {
        (**self).can_write()
    }

    fn can_seek(&self) -> bool {
        (**self).can_seek()
    }

    fn length(&self) -> u64 {
        (**self).length()
    }

    fn position(&self) -> u64 {
        (**self).position()
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        (**self).seek(pos)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read(buf)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        (**self).write(buf)
    }

    fn set_length(&mut self, length: u64) -> Result<()> {
        (**self).set_length(length)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

/// Resolve a [`SeekFrom`] against a cursor and length
///
/// # Errors
///
/// Returns [`Error::OutOfRange`] if the target is negative or overflows.
pub fn resolve_seek(pos: SeekFrom, position: u64, length: u64) -> Result<u64> {
    let (base, delta) = match pos {
        SeekFrom::Start(offset) => return Ok(offset),
        SeekFrom::End(delta) => (length, delta),
        SeekFrom::Current(delta) => (position, delta),
    };

    let target = if delta >= 0 {
        base.checked_add(delta as u64)
    } else {
        base.checked_sub(delta.unsigned_abs())
    };

    target.ok_or_else(|| {
        Error::out_of_range(format!(
            "seek by {} from {} leaves the addressable range",
            delta, base
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_seek() {
        assert_eq!(resolve_seek(SeekFrom::Start(7), 3, 10).unwrap(), 7);
        assert_eq!(resolve_seek(SeekFrom::Current(-2), 3, 10).unwrap(), 1);
        assert_eq!(resolve_seek(SeekFrom::End(-4), 0, 10).unwrap(), 6);
        assert_eq!(resolve_seek(SeekFrom::End(5), 0, 10).unwrap(), 15);
        assert!(matches!(
            resolve_seek(SeekFrom::Current(-4), 3, 10),
            Err(Error::OutOfRange(_))
        ));
    }
}

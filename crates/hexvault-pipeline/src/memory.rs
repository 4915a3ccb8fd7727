//! In-memory backing stores

use hexvault_core::security::{validate_allocation_size, MAX_ALLOCATION_SIZE};
use hexvault_core::{resolve_seek, ByteWindow, Error, FileAccess, Result, Sink, Source, Stream};
use std::cell::RefCell;
use std::io::SeekFrom;
use std::rc::Rc;

/// An immutable byte buffer exposed as a [`Source`]
///
/// # Example
///
/// ```rust
/// use hexvault_core::Source;
/// use hexvault_pipeline::MemorySource;
///
/// let source = MemorySource::new((0u8..10).collect::<Vec<_>>());
/// assert_eq!(source.pull(8, 4).unwrap(), vec![8, 9]);
/// assert!(source.pull(-1, 4).unwrap().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct MemorySource {
    data: Rc<[u8]>,
}

impl MemorySource {
    pub fn new(data: impl Into<Rc<[u8]>>) -> Self {
        Self { data: data.into() }
    }

    /// The whole buffer
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

impl Source for MemorySource {
    fn length(&self) -> u64 {
        self.data.len() as u64
    }

    fn pull(&self, offset: i64, requested: usize) -> Result<Vec<u8>> {
        match ByteWindow::clip(self.length(), offset, requested) {
            Some(window) => {
                let start = window.offset as usize;
                let end = start + window.length as usize;
                Ok(self.data[start..end].to_vec())
            }
            None => Ok(Vec::new()),
        }
    }
}

/// A growable byte buffer with a cursor
///
/// The buffer is reference counted so several streams (for example, handles
/// opened on the same in-memory file) can share it, each with its own cursor
/// and access rights.
#[derive(Debug, Clone)]
pub struct MemoryStream {
    buffer: Rc<RefCell<Vec<u8>>>,
    position: u64,
    access: FileAccess,
}

impl MemoryStream {
    /// An empty read/write stream
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// A read/write stream over `data`
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self::shared(Rc::new(RefCell::new(data)), FileAccess::ReadWrite)
    }

    /// A stream over a shared buffer with the given access rights
    pub fn shared(buffer: Rc<RefCell<Vec<u8>>>, access: FileAccess) -> Self {
        Self {
            buffer,
            position: 0,
            access,
        }
    }

    /// The shared buffer
    pub fn buffer(&self) -> Rc<RefCell<Vec<u8>>> {
        Rc::clone(&self.buffer)
    }

    /// Copy of the current contents
    pub fn to_vec(&self) -> Vec<u8> {
        self.buffer.borrow().clone()
    }

    fn write_at(&mut self, offset: u64, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        let end = validate_allocation_size(
            offset.saturating_add(data.len() as u64),
            MAX_ALLOCATION_SIZE,
            "memory stream",
        )?;
        let start = offset as usize;

        let mut buffer = self.buffer.borrow_mut();
        if buffer.len() < end {
            buffer.resize(end, 0);
        }
        buffer[start..end].copy_from_slice(data);
        Ok(())
    }
}

impl Default for MemoryStream {
    fn default() -> Self {
        Self::new()
    }
}

impl Stream for MemoryStream {
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
        self.buffer.borrow().len() as u64
    }

    fn position(&self) -> u64 {
        self.position
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        self.position = resolve_seek(pos, self.position, Stream::length(self))?;
        Ok(self.position)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if !self.can_read() {
            return Err(Error::unsupported_capability("memory stream opened without read access"));
        }
        let buffer = self.buffer.borrow();
        let len = buffer.len() as u64;
        if self.position >= len {
            return Ok(0);
        }

        let start = self.position as usize;
        let n = buf.len().min((len - self.position) as usize);
        buf[..n].copy_from_slice(&buffer[start..start + n]);
        drop(buffer);

        self.position += n as u64;
        Ok(n)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        if !self.can_write() {
            return Err(Error::unsupported_capability("memory stream opened without write access"));
        }
        self.write_at(self.position, buf)?;
        self.position += buf.len() as u64;
        Ok(buf.len())
    }

    fn set_length(&mut self, length: u64) -> Result<()> {
        if !self.can_write() {
            return Err(Error::unsupported_capability("memory stream opened without write access"));
        }
        let length = validate_allocation_size(length, MAX_ALLOCATION_SIZE, "memory stream")?;
        self.buffer.borrow_mut().resize(length, 0);
        Ok(())
    }
}

impl Sink for MemoryStream {
    fn length(&self) -> u64 {
        Stream::length(self)
    }

    fn push(&mut self, offset: u64, data: &[u8]) -> Result<()> {
        if !self.can_write() {
            return Err(Error::unsupported_capability("memory stream opened without write access"));
        }
        self.write_at(offset, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_clipping() {
        let source = MemorySource::new((0u8..100).collect::<Vec<_>>());
        assert_eq!(source.length(), 100);
        assert!(source.pull(-5, 10).unwrap().is_empty());
        assert!(source.pull(100, 10).unwrap().is_empty());
        assert!(source.pull(250, 10).unwrap().is_empty());

        let tail = source.pull(95, 50).unwrap();
        assert_eq!(tail, source.pull(95, 5).unwrap());
        assert_eq!(tail, vec![95, 96, 97, 98, 99]);
    }

    #[test]
    fn test_memory_stream_read_write() {
        let mut stream = MemoryStream::new();
        stream.write_all(b"hello world").unwrap();
        assert_eq!(stream.position(), 11);

        stream.seek(SeekFrom::Start(6)).unwrap();
        let mut buf = [0u8; 16];
        let n = stream.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"world");
        assert_eq!(stream.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_memory_stream_write_past_end_zero_fills() {
        let mut stream = MemoryStream::from_vec(vec![1, 2]);
        stream.seek(SeekFrom::Start(4)).unwrap();
        stream.write(&[9]).unwrap();
        assert_eq!(stream.to_vec(), vec![1, 2, 0, 0, 9]);
    }

    #[test]
    fn test_sink_push_grows_and_overwrites() {
        let mut sink = MemoryStream::new();
        sink.push(2, b"cd").unwrap();
        sink.push(0, b"ab").unwrap();
        sink.push(1, b"X").unwrap();
        assert_eq!(Sink::length(&sink), 4);
        assert_eq!(sink.to_vec(), b"aXcd".to_vec());
    }

    #[test]
    fn test_shared_buffer_separate_cursors() {
        let writer = MemoryStream::new();
        let buffer = writer.buffer();
        let mut writer = writer;
        writer.write_all(b"abc").unwrap();

        let mut reader = MemoryStream::shared(buffer, FileAccess::Read);
        assert!(!reader.can_write());
        let mut buf = [0u8; 3];
        assert_eq!(reader.read_fill(&mut buf).unwrap(), 3);
        assert_eq!(&buf, b"abc");
        assert!(matches!(
            reader.write(b"x"),
            Err(Error::UnsupportedCapability(_))
        ));
    }

    #[test]
    fn test_set_length_truncates() {
        let mut stream = MemoryStream::from_vec(vec![1, 2, 3, 4]);
        stream.set_length(2).unwrap();
        assert_eq!(stream.to_vec(), vec![1, 2]);
        stream.set_length(3).unwrap();
        assert_eq!(stream.to_vec(), vec![1, 2, 0]);
    }
}

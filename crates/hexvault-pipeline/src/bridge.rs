//! Adapters between streams, sources, sinks and `std::io`
//!
//! - [`StreamSource`]: serve `pull` from a seekable, readable stream
//! - [`StreamSink`]: serve `push` from a seekable, writable stream
//! - [`SourceStream`]: a read-only stream with a cursor over any source
//! - [`IoStream`]: `std::io::{Read, Write, Seek}` over any stream

use hexvault_core::{
    resolve_seek, ByteWindow, Error, Result, SharedSource, SharedStream, Sink, Source, Stream,
};
use std::io::{self, SeekFrom};

/// A [`Source`] that seeks and reads a shared stream
///
/// Every pull moves the stream's cursor; no position is restored.
pub struct StreamSource {
    stream: SharedStream,
}

impl StreamSource {
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedCapability`] unless the stream can seek
    /// and read
    pub fn new(stream: SharedStream) -> Result<Self> {
        {
            let s = stream.borrow();
            if !s.can_seek() || !s.can_read() {
                return Err(Error::unsupported_capability(
                    "stream source requires a seekable, readable stream",
                ));
            }
        }
        Ok(Self { stream })
    }
}

impl Source for StreamSource {
    fn length(&self) -> u64 {
        self.stream.borrow().length()
    }

    fn pull(&self, offset: i64, requested: usize) -> Result<Vec<u8>> {
        let mut stream = self.stream.borrow_mut();
        let window = match ByteWindow::clip(stream.length(), offset, requested) {
            Some(window) => window,
            None => return Ok(Vec::new()),
        };

        stream.seek(SeekFrom::Start(window.offset))?;
        let mut buf = vec![0u8; window.length as usize];
        let n = stream.read_fill(&mut buf)?;
        buf.truncate(n);
        Ok(buf)
    }
}

/// A [`Sink`] that seeks and writes a shared stream
pub struct StreamSink {
    stream: SharedStream,
}

impl StreamSink {
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedCapability`] unless the stream can seek
    /// and write
    pub fn new(stream: SharedStream) -> Result<Self> {
        {
            let s = stream.borrow();
            if !s.can_seek() || !s.can_write() {
                return Err(Error::unsupported_capability(
                    "stream sink requires a seekable, writable stream",
                ));
            }
        }
        Ok(Self { stream })
    }
}

impl Sink for StreamSink {
    fn length(&self) -> u64 {
        self.stream.borrow().length()
    }

    fn push(&mut self, offset: u64, data: &[u8]) -> Result<()> {
        let mut stream = self.stream.borrow_mut();
        stream.seek(SeekFrom::Start(offset))?;
        stream.write_all(data)
    }
}

/// A read-only, seekable [`Stream`] over a [`Source`]
pub struct SourceStream {
    source: SharedSource,
    position: u64,
}

impl SourceStream {
    pub fn new(source: SharedSource) -> Self {
        Self {
            source,
            position: 0,
        }
    }
}

impl Stream for SourceStream {
    fn can_read(&self) -> bool {
        true
    }

    fn can_write(&self) -> bool {
        false
    }

    fn can_seek(&self) -> bool {
        true
    }

    fn length(&self) -> u64 {
        self.source.length()
    }

    fn position(&self) -> u64 {
        self.position
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        self.position = resolve_seek(pos, self.position, self.source.length())?;
        Ok(self.position)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let offset = match i64::try_from(self.position) {
            Ok(offset) => offset,
            Err(_) => return Ok(0),
        };
        let data = self.source.pull(offset, buf.len())?;
        buf[..data.len()].copy_from_slice(&data);
        self.position += data.len() as u64;
        Ok(data.len())
    }
}

/// `std::io` view of a [`Stream`]
///
/// Lets ecosystem code that expects `Read + Seek` (decompressors, hashers)
/// consume any stream.
pub struct IoStream<S> {
    inner: S,
}

impl<S: Stream> IoStream<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }
}

impl<S: Stream> io::Read for IoStream<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.inner.read(buf)?)
    }
}

impl<S: Stream> io::Write for IoStream<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.inner.write(buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(self.inner.flush()?)
    }
}

impl<S: Stream> io::Seek for IoStream<S> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        Ok(self.inner.seek(pos)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemorySource, MemoryStream};
    use hexvault_core::FileAccess;
    use std::cell::RefCell;
    use std::io::Read;
    use std::rc::Rc;

    fn shared(data: Vec<u8>) -> SharedStream {
        Rc::new(RefCell::new(MemoryStream::from_vec(data)))
    }

    #[test]
    fn test_stream_source_pull() {
        let source = StreamSource::new(shared((0..50).collect())).unwrap();
        assert_eq!(source.length(), 50);
        assert_eq!(source.pull(10, 3).unwrap(), vec![10, 11, 12]);
        assert_eq!(source.pull(48, 10).unwrap(), vec![48, 49]);
        assert!(source.pull(-3, 10).unwrap().is_empty());
        assert!(source.pull(50, 10).unwrap().is_empty());
    }

    #[test]
    fn test_stream_source_requires_read() {
        let buffer = Rc::new(RefCell::new(vec![0u8; 4]));
        let write_only: SharedStream =
            Rc::new(RefCell::new(MemoryStream::shared(buffer, FileAccess::Write)));
        assert!(matches!(
            StreamSource::new(write_only),
            Err(Error::UnsupportedCapability(_))
        ));
    }

    #[test]
    fn test_stream_sink_push() {
        let stream = shared(vec![0u8; 4]);
        let mut sink = StreamSink::new(Rc::clone(&stream)).unwrap();
        sink.push(2, b"zzzz").unwrap();
        assert_eq!(sink.length(), 6);

        let source = StreamSource::new(stream).unwrap();
        assert_eq!(source.pull(0, 6).unwrap(), vec![0, 0, b'z', b'z', b'z', b'z']);
    }

    #[test]
    fn test_stream_sink_requires_write() {
        let buffer = Rc::new(RefCell::new(Vec::new()));
        let read_only: SharedStream =
            Rc::new(RefCell::new(MemoryStream::shared(buffer, FileAccess::Read)));
        assert!(matches!(
            StreamSink::new(read_only),
            Err(Error::UnsupportedCapability(_))
        ));
    }

    #[test]
    fn test_source_stream_round_trip() {
        let source: SharedSource = Rc::new(MemorySource::new(b"0123456789".to_vec()));
        let mut stream = SourceStream::new(source);
        assert!(!stream.can_write());

        stream.seek(SeekFrom::End(-3)).unwrap();
        let mut buf = [0u8; 8];
        let n = stream.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"789");
        assert_eq!(stream.read(&mut buf).unwrap(), 0);
        assert!(stream.write(b"x").is_err());
    }

    #[test]
    fn test_io_stream_read_to_end() {
        let mut io = IoStream::new(MemoryStream::from_vec(b"payload".to_vec()));
        let mut out = Vec::new();
        io.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"payload");
    }
}

//! Sub-views - a window into a subset of a source or stream

use hexvault_core::security::{checked_end, u64_to_i64};
use hexvault_core::{ByteWindow, Error, Result, SharedSource, SharedStream, Source, Stream};
use std::io::SeekFrom;

fn validate_window(window: ByteWindow, base_length: u64, context: &str) -> Result<()> {
    if window.is_empty() {
        return Err(Error::out_of_range(format!("{}: zero-length window", context)));
    }
    let end = checked_end(window.offset, window.length, context)?;
    if end > base_length {
        return Err(Error::out_of_range(format!(
            "{}: window {} exceeds base length {}",
            context, window, base_length
        )));
    }
    Ok(())
}

/// A [`Source`] that exposes only a window of a base source
///
/// This is how a partition or an embedded file is presented as an
/// independent source without copying the data. Requests are clipped to the
/// window before being translated, so a sub-view can never reach base bytes
/// outside it.
///
/// # Example
///
/// ```rust
/// use hexvault_core::{ByteWindow, SharedSource, Source};
/// use hexvault_pipeline::{MemorySource, SubSource};
/// use std::rc::Rc;
///
/// let base: SharedSource = Rc::new(MemorySource::new((0u8..100).collect::<Vec<_>>()));
///
/// // View bytes 20-29
/// let sub = SubSource::new(base, ByteWindow::new(20, 10)).unwrap();
/// assert_eq!(sub.pull(8, 5).unwrap(), vec![28, 29]);
/// ```
pub struct SubSource {
    base: SharedSource,
    window: ByteWindow,
}

impl SubSource {
    /// Create a new sub-view
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if the window is empty or extends past
    /// the base
    pub fn new(base: SharedSource, window: ByteWindow) -> Result<Self> {
        validate_window(window, base.length(), "sub source")?;
        tracing::debug!("Sub source {} over {} byte base", window, base.length());
        Ok(Self { base, window })
    }

    /// The window within the base
    pub fn window(&self) -> ByteWindow {
        self.window
    }
}

impl Source for SubSource {
    fn length(&self) -> u64 {
        self.window.length
    }

    fn pull(&self, offset: i64, requested: usize) -> Result<Vec<u8>> {
        match ByteWindow::clip(self.window.length, offset, requested) {
            Some(local) => {
                let base_offset = u64_to_i64(self.window.offset + local.offset, "sub source")?;
                self.base.pull(base_offset, local.length as usize)
            }
            None => Ok(Vec::new()),
        }
    }
}

/// A [`Stream`] that exposes only a window of a shared base stream
///
/// Reads stop at the window end; writes are clipped to the window and never
/// grow the base.
pub struct SubStream {
    inner: SharedStream,
    start: u64,
    length: u64,
    position: u64,
}

impl SubStream {
    /// Create a new sub-stream
    ///
    /// # Arguments
    ///
    /// * `inner` - The underlying stream
    /// * `start` - Offset from the beginning of the stream
    /// * `length` - Length of the window
    ///
    /// # Errors
    ///
    /// Returns an error if the stream cannot seek or the window does not fit
    pub fn new(inner: SharedStream, start: u64, length: u64) -> Result<Self> {
        {
            let stream = inner.borrow();
            if !stream.can_seek() {
                return Err(Error::unsupported_capability("sub stream requires a seekable stream"));
            }
            validate_window(ByteWindow::new(start, length), stream.length(), "sub stream")?;
        }

        Ok(Self {
            inner,
            start,
            length,
            position: 0,
        })
    }

    /// Get the start offset of this sub-stream
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Get the remaining bytes from current position to end
    pub fn remaining(&self) -> u64 {
        self.length.saturating_sub(self.position)
    }
}

impl Stream for SubStream {
    fn can_read(&self) -> bool {
        self.inner.borrow().can_read()
    }

    fn can_write(&self) -> bool {
        self.inner.borrow().can_write()
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
        let new_pos = hexvault_core::resolve_seek(pos, self.position, self.length)?;
        if new_pos > self.length {
            return Err(Error::out_of_range(format!(
                "seek to {} beyond end of {} byte sub stream",
                new_pos, self.length
            )));
        }

        self.position = new_pos;
        Ok(self.position)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let remaining = self.remaining();
        if remaining == 0 || buf.is_empty() {
            return Ok(0);
        }
        let to_read = buf.len().min(remaining.min(usize::MAX as u64) as usize);

        let mut inner = self.inner.borrow_mut();
        inner.seek(SeekFrom::Start(self.start + self.position))?;
        let bytes_read = inner.read(&mut buf[..to_read])?;

        self.position += bytes_read as u64;
        Ok(bytes_read)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let remaining = self.remaining();
        if remaining == 0 || buf.is_empty() {
            return Ok(0);
        }
        let to_write = buf.len().min(remaining.min(usize::MAX as u64) as usize);

        let mut inner = self.inner.borrow_mut();
        inner.seek(SeekFrom::Start(self.start + self.position))?;
        let written = inner.write(&buf[..to_write])?;

        self.position += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> Result<()> {
        self.inner.borrow_mut().flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemorySource, MemoryStream};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn base(len: u8) -> SharedSource {
        Rc::new(MemorySource::new((0..len).collect::<Vec<_>>()))
    }

    fn stream(len: u8) -> SharedStream {
        Rc::new(RefCell::new(MemoryStream::from_vec((0..len).collect())))
    }

    #[test]
    fn test_sub_source_composition_law() {
        let base = base(100);
        let window = ByteWindow::new(20, 30);
        let sub = SubSource::new(Rc::clone(&base), window).unwrap();

        for offset in 0..30i64 {
            for len in [0usize, 1, 7, 30, 64] {
                let clipped = len.min((window.length as i64 - offset) as usize);
                assert_eq!(
                    sub.pull(offset, len).unwrap(),
                    base.pull(window.offset as i64 + offset, clipped).unwrap(),
                    "offset {} len {}",
                    offset,
                    len
                );
            }
        }
    }

    #[test]
    fn test_sub_source_never_reaches_outside() {
        let sub = SubSource::new(base(100), ByteWindow::new(20, 10)).unwrap();
        assert!(sub.pull(-5, 10).unwrap().is_empty());
        assert!(sub.pull(10, 10).unwrap().is_empty());
        assert_eq!(sub.pull(5, 100).unwrap(), vec![25, 26, 27, 28, 29]);
    }

    #[test]
    fn test_sub_of_sub() {
        let outer: SharedSource =
            Rc::new(SubSource::new(base(100), ByteWindow::new(10, 50)).unwrap());
        let inner = SubSource::new(outer, ByteWindow::new(5, 5)).unwrap();
        assert_eq!(inner.pull(0, 10).unwrap(), vec![15, 16, 17, 18, 19]);
    }

    #[test]
    fn test_sub_source_rejects_bad_windows() {
        assert!(matches!(
            SubSource::new(base(100), ByteWindow::new(95, 10)),
            Err(Error::OutOfRange(_))
        ));
        assert!(matches!(
            SubSource::new(base(100), ByteWindow::new(0, 0)),
            Err(Error::OutOfRange(_))
        ));
        assert!(matches!(
            SubSource::new(base(100), ByteWindow::new(u64::MAX, 2)),
            Err(Error::OutOfRange(_))
        ));
    }

    #[test]
    fn test_sub_stream_read() {
        let mut sub = SubStream::new(stream(100), 20, 10).unwrap();
        assert_eq!(sub.start(), 20);
        assert_eq!(sub.length(), 10);

        let mut buf = [0u8; 5];
        assert_eq!(sub.read(&mut buf).unwrap(), 5);
        assert_eq!(&buf, &[20, 21, 22, 23, 24]);
        assert_eq!(sub.read(&mut buf).unwrap(), 5);
        assert_eq!(&buf, &[25, 26, 27, 28, 29]);
        assert_eq!(sub.remaining(), 0);
        assert_eq!(sub.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_sub_stream_seek() {
        let mut sub = SubStream::new(stream(100), 20, 10).unwrap();

        sub.seek(SeekFrom::Start(5)).unwrap();
        let mut buf = [0u8; 2];
        sub.read(&mut buf).unwrap();
        assert_eq!(&buf, &[25, 26]);

        sub.seek(SeekFrom::Current(-2)).unwrap();
        assert_eq!(sub.position(), 5);

        sub.seek(SeekFrom::End(-3)).unwrap();
        assert_eq!(sub.position(), 7);

        assert!(sub.seek(SeekFrom::Start(15)).is_err());
        assert!(sub.seek(SeekFrom::Current(-50)).is_err());
    }

    #[test]
    fn test_sub_stream_write_is_clipped() {
        let base = stream(10);
        let mut sub = SubStream::new(Rc::clone(&base), 4, 3).unwrap();
        assert_eq!(sub.write(b"abcdef").unwrap(), 3);
        assert_eq!(sub.write(b"x").unwrap(), 0);

        let base = base.borrow();
        assert_eq!(base.length(), 10);
    }

    #[test]
    fn test_sub_stream_requires_fit() {
        assert!(matches!(
            SubStream::new(stream(10), 8, 4),
            Err(Error::OutOfRange(_))
        ));
    }
}

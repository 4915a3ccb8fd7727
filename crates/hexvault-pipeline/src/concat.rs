//! Concatenation - several members joined into one address space
//!
//! Split images (`.001`, `.002`, ...) and multi-part packages are presented
//! as a single stream. Member lengths are captured at construction; the
//! concatenation never grows.

use hexvault_core::security::{checked_end, u64_to_i64};
use hexvault_core::{
    resolve_seek, ByteWindow, Error, Result, SharedSource, SharedStream, Source, Stream,
};
use std::io::SeekFrom;

/// Start offset of each member plus the total length
fn layout(lengths: impl Iterator<Item = u64>) -> Result<(Vec<u64>, u64)> {
    let mut starts = Vec::new();
    let mut total = 0u64;
    for length in lengths {
        starts.push(total);
        total = checked_end(total, length, "concatenation")?;
    }
    Ok((starts, total))
}

/// Index of the member holding `offset`, skipping empty members
fn member_at(starts: &[u64], total: u64, offset: u64) -> Option<usize> {
    if offset >= total {
        return None;
    }
    Some(starts.partition_point(|&start| start <= offset) - 1)
}

/// A [`Stream`] over members joined end-to-end
///
/// Reads and writes that cross a member boundary continue into the next
/// member instead of returning short.
pub struct ConcatStream {
    members: Vec<SharedStream>,
    starts: Vec<u64>,
    length: u64,
    position: u64,
    readable: bool,
    writable: bool,
}

impl ConcatStream {
    /// # Errors
    ///
    /// - [`Error::NullArgument`] if `members` is empty
    /// - [`Error::UnsupportedCapability`] if a member cannot seek
    pub fn new(members: Vec<SharedStream>) -> Result<Self> {
        if members.is_empty() {
            return Err(Error::null_argument("concatenation needs at least one member"));
        }
        if members.iter().any(|m| !m.borrow().can_seek()) {
            return Err(Error::unsupported_capability(
                "every concatenated stream must be seekable",
            ));
        }

        let readable = members.iter().all(|m| m.borrow().can_read());
        let writable = members.iter().all(|m| m.borrow().can_write());
        let (starts, length) = layout(members.iter().map(|m| m.borrow().length()))?;

        tracing::debug!("Concatenated {} streams, {} bytes", members.len(), length);
        Ok(Self {
            members,
            starts,
            length,
            position: 0,
            readable,
            writable,
        })
    }

    /// Number of members
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Member index, member-local offset and bytes left in that member
    fn locate(&self) -> Option<(usize, u64, u64)> {
        let index = member_at(&self.starts, self.length, self.position)?;
        let end = self
            .starts
            .get(index + 1)
            .copied()
            .unwrap_or(self.length);
        let local = self.position - self.starts[index];
        Some((index, local, end - self.position))
    }
}

impl Stream for ConcatStream {
    fn can_read(&self) -> bool {
        self.readable
    }

    fn can_write(&self) -> bool {
        self.writable
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
        if !self.readable {
            return Err(Error::unsupported_capability("a concatenated member is not readable"));
        }

        let mut filled = 0;
        while filled < buf.len() {
            let (index, local, left) = match self.locate() {
                Some(found) => found,
                None => break,
            };
            let want = (buf.len() - filled).min(left.min(usize::MAX as u64) as usize);

            let mut member = self.members[index].borrow_mut();
            member.seek(SeekFrom::Start(local))?;
            let n = member.read_fill(&mut buf[filled..filled + want])?;
            drop(member);

            self.position += n as u64;
            filled += n;
            if n < want {
                break;
            }
        }
        Ok(filled)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        if !self.writable {
            return Err(Error::unsupported_capability("a concatenated member is not writable"));
        }

        let mut written = 0;
        while written < buf.len() {
            let (index, local, left) = match self.locate() {
                Some(found) => found,
                None => break,
            };
            let want = (buf.len() - written).min(left.min(usize::MAX as u64) as usize);

            let mut member = self.members[index].borrow_mut();
            member.seek(SeekFrom::Start(local))?;
            member.write_all(&buf[written..written + want])?;
            drop(member);

            self.position += want as u64;
            written += want;
        }
        Ok(written)
    }

    fn flush(&mut self) -> Result<()> {
        for member in &self.members {
            member.borrow_mut().flush()?;
        }
        Ok(())
    }
}

/// A [`Source`] over members joined end-to-end
pub struct ConcatSource {
    members: Vec<SharedSource>,
    starts: Vec<u64>,
    length: u64,
}

impl ConcatSource {
    /// # Errors
    ///
    /// Returns [`Error::NullArgument`] if `members` is empty
    pub fn new(members: Vec<SharedSource>) -> Result<Self> {
        if members.is_empty() {
            return Err(Error::null_argument("concatenation needs at least one member"));
        }
        let (starts, length) = layout(members.iter().map(|m| m.length()))?;
        Ok(Self {
            members,
            starts,
            length,
        })
    }
}

impl Source for ConcatSource {
    fn length(&self) -> u64 {
        self.length
    }

    fn pull(&self, offset: i64, requested: usize) -> Result<Vec<u8>> {
        let request = match ByteWindow::clip(self.length, offset, requested) {
            Some(request) => request,
            None => return Ok(Vec::new()),
        };

        let mut out = Vec::with_capacity(request.length as usize);
        let mut cursor = request.offset;
        while cursor < request.end() {
            let index = match member_at(&self.starts, self.length, cursor) {
                Some(index) => index,
                None => break,
            };
            let member_end = self.starts.get(index + 1).copied().unwrap_or(self.length);
            let want = request.end().min(member_end) - cursor;
            let local = u64_to_i64(cursor - self.starts[index], "concatenation")?;

            let data = self.members[index].pull(local, want as usize)?;
            out.extend_from_slice(&data);
            if (data.len() as u64) < want {
                break;
            }
            cursor += want;
        }
        Ok(out)
    }
}

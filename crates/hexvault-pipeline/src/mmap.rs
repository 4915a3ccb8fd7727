//! Memory-mapped file source

use hexvault_core::security::MAX_MMAP_SIZE;
use hexvault_core::{ByteWindow, Error, Result, Source};
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

/// A read-only [`Source`] backed by a memory-mapped file
///
/// Pulls are plain slice copies with no system call per request.
///
/// # Example
///
/// ```rust,no_run
/// use hexvault_core::Source;
/// use hexvault_pipeline::MmapSource;
/// use std::path::Path;
///
/// let source = MmapSource::open(Path::new("disk.img")).unwrap();
/// let boot_sector = source.pull(0, 512).unwrap();
/// ```
#[derive(Debug)]
pub struct MmapSource {
    mmap: Mmap,
}

impl MmapSource {
    /// Open a file with memory mapping
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or mapped
    ///
    /// # Safety
    ///
    /// Uses `unsafe` for memory mapping because:
    /// - The OS guarantees memory safety for valid file descriptors
    /// - We validate the file is a regular file before mapping
    /// - The mapping is read-only
    /// - File must not be truncated during access (caller responsibility)
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_file(&file)
    }

    /// Map an already open file
    ///
    /// See `open()` for safety documentation
    pub fn from_file(file: &File) -> Result<Self> {
        let metadata = file.metadata()?;

        if !metadata.is_file() {
            return Err(Error::unsupported_capability(
                "only regular files can be memory-mapped",
            ));
        }

        if metadata.len() > MAX_MMAP_SIZE {
            return Err(Error::out_of_range(format!(
                "file size {} exceeds memory mapping limit {}",
                metadata.len(),
                MAX_MMAP_SIZE
            )));
        }

        // SAFETY: the file is a regular file within the mapping limit and the
        // descriptor is valid; the map is read-only.
        let mmap = unsafe { Mmap::map(file)? };
        tracing::debug!("Mapped {} bytes", mmap.len());

        Ok(Self { mmap })
    }

    /// Get the length of the mapped region
    pub fn len(&self) -> u64 {
        self.mmap.len() as u64
    }

    /// Check if the mapped region is empty
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// Get a slice of the entire mapped data
    pub fn as_slice(&self) -> &[u8] {
        &self.mmap
    }
}

impl Source for MmapSource {
    fn length(&self) -> u64 {
        self.len()
    }

    fn pull(&self, offset: i64, requested: usize) -> Result<Vec<u8>> {
        match ByteWindow::clip(self.len(), offset, requested) {
            Some(window) => {
                let start = window.offset as usize;
                let end = start + window.length as usize;
                Ok(self.mmap[start..end].to_vec())
            }
            None => Ok(Vec::new()),
        }
    }
}

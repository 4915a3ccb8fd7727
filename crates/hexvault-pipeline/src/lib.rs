//! # Hexvault Pipeline
//!
//! Backing stores and composition wrappers for hexvault sources and streams.
//!
//! Backing stores:
//! - **MemorySource / MemoryStream**: in-memory bytes
//! - **FileStream**: a host file with its own cursor
//! - **MmapSource**: memory-mapped file access
//!
//! Composition wrappers:
//! - **SubSource / SubStream**: window into a subset of a base (for partitions)
//! - **OverlaySource**: ranges of a base patched from secondary sources
//! - **ConcatStream / ConcatSource**: members joined end-to-end
//! - **PaddingSource**: a virtual run of one fill byte
//!
//! Bridges:
//! - **StreamSource / StreamSink / SourceStream**: move between the cursor
//!   and random-access contracts
//! - **IoStream**: `std::io` traits over any stream
//!
//! ## Example
//!
//! ```rust
//! use hexvault_core::{ByteWindow, SharedSource, Source};
//! use hexvault_pipeline::{MemorySource, OverlaySource, PaddingSource, SubSource};
//! use std::rc::Rc;
//!
//! // A 4 KiB blank image with a patched header
//! let blank: SharedSource = Rc::new(PaddingSource::zeroes(4096));
//! let header: SharedSource = Rc::new(MemorySource::new(b"HDR0".to_vec()));
//! let image: SharedSource = Rc::new(
//!     OverlaySource::builder().base(blank).overlay(header, 0x200, 4).build().unwrap(),
//! );
//!
//! // View the second sector as its own source
//! let sector = SubSource::new(image, ByteWindow::new(0x200, 0x200)).unwrap();
//! assert_eq!(sector.pull(0, 6).unwrap(), b"HDR0\0\0".to_vec());
//! ```

pub mod bridge;
pub mod concat;
pub mod file;
pub mod memory;
pub mod mmap;
pub mod overlay;
pub mod padding;
pub mod sub;

pub use bridge::{IoStream, SourceStream, StreamSink, StreamSource};
pub use concat::{ConcatSource, ConcatStream};
pub use file::FileStream;
pub use memory::{MemorySource, MemoryStream};
pub use mmap::MmapSource;
pub use overlay::{OverlayRegion, OverlaySource, OverlaySourceBuilder};
pub use padding::PaddingSource;
pub use sub::{SubSource, SubStream};

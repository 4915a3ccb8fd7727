//! # Hexvault Core
//!
//! Core traits, types, and error handling for hexvault.
//!
//! This crate provides the foundational abstractions every container and
//! firmware parser builds on:
//! - **Source**: saturating random-access reads (`length`, `pull`)
//! - **Sink**: growable random-access writes (`push`)
//! - **Stream**: cursor-based read/write/seek with capability flags
//! - **FileSystem**: directory and file operations with a per-instance
//!   working directory
//! - **Path**: separator-free component lists with POSIX/Windows formatting
//!
//! ## Example
//!
//! ```rust,no_run
//! use hexvault_core::{Result, Source};
//!
//! fn probe_magic(source: &dyn Source) -> Result<bool> {
//!     // Short or empty sources simply yield fewer bytes.
//!     let head = source.pull(0, 4)?;
//!     Ok(head == b"NCA3")
//! }
//! ```

pub mod error;
pub mod path;
pub mod security;
pub mod traits;
pub mod types;

// Re-export commonly used items
pub use error::{Error, Result};
pub use path::{Path, PathFormat};
pub use traits::{
    resolve_seek, FileSystem, SharedFileSystem, SharedSource, SharedStream, Sink, Source, Stream,
};
pub use types::{ByteWindow, DirectoryListing, FileAccess, OpenMode};

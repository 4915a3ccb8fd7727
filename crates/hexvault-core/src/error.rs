//! Hexvault error types

use thiserror::Error;

/// The main error type for hexvault operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error reported by a backing store
    #[error("Backing store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required source, stream or handle was absent
    #[error("Missing argument: {0}")]
    NullArgument(String),

    /// A size, offset or index argument violates a documented precondition
    #[error("Out of range: {0}")]
    OutOfRange(String),

    /// The backing object lacks a read, write or seek capability
    #[error("Unsupported capability: {0}")]
    UnsupportedCapability(String),

    /// An overlay region is malformed (outside the base, too short, overlapping)
    #[error("Invalid overlay region: {0}")]
    InvalidOverlayRegion(String),

    /// A composed view was built without one of its sources
    #[error("Missing source: {0}")]
    MissingSource(String),

    /// The operation has no backing implementation
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// Invalid path or path syntax
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// File or directory not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Resource already exists
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// A path component that must be a directory is a file
    #[error("Not a directory: {0}")]
    NotADirectory(String),

    /// Directory still has entries
    #[error("Directory not empty: {0}")]
    DirectoryNotEmpty(String),
}

/// Result type alias for hexvault operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a null argument error
    pub fn null_argument(msg: impl Into<String>) -> Self {
        Error::NullArgument(msg.into())
    }

    /// Create an out of range error
    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Error::OutOfRange(msg.into())
    }

    /// Create an unsupported capability error
    pub fn unsupported_capability(msg: impl Into<String>) -> Self {
        Error::UnsupportedCapability(msg.into())
    }

    /// Create an invalid overlay region error
    pub fn invalid_overlay_region(msg: impl Into<String>) -> Self {
        Error::InvalidOverlayRegion(msg.into())
    }

    /// Create a missing source error
    pub fn missing_source(msg: impl Into<String>) -> Self {
        Error::MissingSource(msg.into())
    }

    /// Create a not implemented error
    pub fn not_implemented(msg: impl Into<String>) -> Self {
        Error::NotImplemented(msg.into())
    }

    /// Create an invalid path error
    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Error::InvalidPath(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    /// Create an already exists error
    pub fn already_exists(msg: impl Into<String>) -> Self {
        Error::AlreadyExists(msg.into())
    }

    /// Create a not a directory error
    pub fn not_a_directory(msg: impl Into<String>) -> Self {
        Error::NotADirectory(msg.into())
    }

    /// Create a directory not empty error
    pub fn directory_not_empty(msg: impl Into<String>) -> Self {
        Error::DirectoryNotEmpty(msg.into())
    }
}

impl From<Error> for std::io::Error {
    fn from(err: Error) -> Self {
        use std::io::ErrorKind;

        let kind = match &err {
            Error::Io(inner) => inner.kind(),
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Error::OutOfRange(_) | Error::InvalidPath(_) => ErrorKind::InvalidInput,
            Error::UnsupportedCapability(_) | Error::NotImplemented(_) => ErrorKind::Unsupported,
            _ => ErrorKind::Other,
        };
        match err {
            Error::Io(inner) => inner,
            other => std::io::Error::new(kind, other),
        }
    }
}

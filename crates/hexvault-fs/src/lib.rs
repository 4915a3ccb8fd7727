//! # Hexvault FS
//!
//! Filesystem backends for hexvault.
//!
//! - **LocalFileSystem**: the host's files, with optional memory mapping
//! - **MemoryFileSystem**: a directory tree held in memory
//! - **SubFileSystem**: one directory of another filesystem presented as a
//!   root that `..` cannot escape
//!
//! Every backend owns its working directory, so changing it on one instance
//! never affects another or the process.
//!
//! ## Example
//!
//! ```rust
//! use hexvault_core::{FileAccess, FileSystem, OpenMode, Path, SharedFileSystem, Stream};
//! use hexvault_fs::{MemoryFileSystem, SubFileSystem};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let mut memory = MemoryFileSystem::new();
//! memory.create_directory(&"/extracted".parse().unwrap()).unwrap();
//! let base: SharedFileSystem = Rc::new(RefCell::new(memory));
//!
//! let mut out = SubFileSystem::new(Rc::clone(&base), &"/extracted".parse().unwrap()).unwrap();
//! let name: Path = "../../escape.bin".parse().unwrap();
//! out.open_file(&name, OpenMode::CreateNew, FileAccess::Write)
//!     .unwrap()
//!     .write_all(b"data")
//!     .unwrap();
//!
//! let listing = base.borrow().list_directory(&"/extracted".parse().unwrap()).unwrap();
//! assert_eq!(listing.files, vec!["escape.bin"]);
//! ```

pub mod local;
pub mod memory;
pub mod resolve;
pub mod sub;

pub use local::{host_to_path, LocalConfig, LocalFileSystem};
pub use memory::MemoryFileSystem;
pub use resolve::resolve_path;
pub use sub::SubFileSystem;

//! Scoped filesystem - a directory of another filesystem presented as a root

use crate::resolve::resolve_path;
use hexvault_core::{
    DirectoryListing, Error, FileAccess, FileSystem, OpenMode, Path, Result, SharedFileSystem,
    Stream,
};

/// A [`FileSystem`] confined to one directory of a base filesystem
///
/// Paths are resolved against the scoped filesystem's own working directory
/// and `..` stops at the scoped root, so no path reaches outside
/// `base_path`. The base filesystem's working directory is only read once,
/// to resolve a relative `base_path`, and is never changed.
///
/// # Example
///
/// ```rust
/// use hexvault_core::{FileSystem, Path, SharedFileSystem};
/// use hexvault_fs::{MemoryFileSystem, SubFileSystem};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let mut memory = MemoryFileSystem::new();
/// memory.create_directory(&"/sd".parse().unwrap()).unwrap();
/// let base: SharedFileSystem = Rc::new(RefCell::new(memory));
///
/// let mut sd = SubFileSystem::new(base, &"/sd".parse().unwrap()).unwrap();
/// sd.create_file(&"../../boot.bin".parse().unwrap()).unwrap();
/// assert_eq!(sd.translate(&"boot.bin".parse().unwrap()).to_string(), "/sd/boot.bin");
/// ```
pub struct SubFileSystem {
    base: SharedFileSystem,
    base_path: Path,
    working_directory: Path,
}

impl SubFileSystem {
    /// Scope `base` to `base_path`
    ///
    /// A relative `base_path` is resolved against the base's working
    /// directory at construction.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_path` is not a listable directory of `base`
    pub fn new(base: SharedFileSystem, base_path: &Path) -> Result<Self> {
        let base_path = {
            let fs = base.borrow();
            let resolved = resolve_path(&fs.working_directory(), base_path);
            fs.list_directory(&resolved)?;
            resolved
        };
        tracing::debug!("Scoped filesystem rooted at {}", base_path);

        Ok(Self {
            base,
            base_path,
            working_directory: Path::root(),
        })
    }

    /// Root of this filesystem in base coordinates
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Location of `path` in base coordinates
    pub fn translate(&self, path: &Path) -> Path {
        let scoped = resolve_path(&self.working_directory, path);
        let translated = self.base_path.join(&scoped.subpath(1..));
        debug_assert!(translated.components().starts_with(self.base_path.components()));
        translated
    }
}

impl FileSystem for SubFileSystem {
    fn working_directory(&self) -> Path {
        self.working_directory.clone()
    }

    fn set_working_directory(&mut self, path: &Path) -> Result<()> {
        let scoped = resolve_path(&self.working_directory, path);
        self.base.borrow().list_directory(&self.translate(&scoped))?;
        self.working_directory = scoped;
        Ok(())
    }

    fn create_file(&mut self, path: &Path) -> Result<()> {
        let translated = self.translate(path);
        self.base.borrow_mut().create_file(&translated)
    }

    fn remove_file(&mut self, path: &Path) -> Result<()> {
        let translated = self.translate(path);
        self.base.borrow_mut().remove_file(&translated)
    }

    fn open_file(
        &mut self,
        path: &Path,
        mode: OpenMode,
        access: FileAccess,
    ) -> Result<Box<dyn Stream>> {
        let translated = self.translate(path);
        self.base.borrow_mut().open_file(&translated, mode, access)
    }

    fn create_directory(&mut self, path: &Path) -> Result<()> {
        let translated = self.translate(path);
        self.base.borrow_mut().create_directory(&translated)
    }

    fn remove_directory(&mut self, path: &Path) -> Result<()> {
        let translated = self.translate(path);
        if translated == self.base_path {
            return Err(Error::invalid_path(
                "the root of a scoped filesystem cannot be removed",
            ));
        }
        self.base.borrow_mut().remove_directory(&translated)
    }

    fn list_directory(&self, path: &Path) -> Result<DirectoryListing> {
        let scoped = resolve_path(&self.working_directory, path);
        let mut listing = self.base.borrow().list_directory(&self.translate(&scoped))?;
        listing.absolute_path = scoped;
        Ok(listing)
    }
}

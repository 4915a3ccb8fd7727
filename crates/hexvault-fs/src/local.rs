//! Host filesystem access

use crate::resolve::resolve_path;
use hexvault_core::{
    DirectoryListing, Error, FileAccess, FileSystem, OpenMode, Path, Result, Stream,
};
use hexvault_pipeline::{FileStream, MmapSource, SourceStream};
use std::fs::{self, File, OpenOptions};
use std::io::{self, SeekFrom};
use std::path::{Component, PathBuf};
use std::rc::Rc;

/// Configuration for a [`LocalFileSystem`]
#[derive(Debug, Clone)]
pub struct LocalConfig {
    /// Serve read-only opens of existing files from a memory map
    pub use_mmap: bool,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self { use_mmap: true }
    }
}

/// A [`FileSystem`] over the host's files
///
/// The working directory belongs to the instance; the process-wide current
/// directory is never read after construction or changed.
///
/// # Example
///
/// ```rust,no_run
/// use hexvault_core::{FileAccess, FileSystem, OpenMode, Stream};
/// use hexvault_fs::{LocalConfig, LocalFileSystem};
///
/// let mut fs = LocalFileSystem::new(LocalConfig::default());
/// fs.set_working_directory(&"/srv/dumps".parse().unwrap()).unwrap();
/// let image = fs
///     .open_file(&"nand.bin".parse().unwrap(), OpenMode::Open, FileAccess::Read)
///     .unwrap();
/// println!("{} bytes", image.length());
/// ```
#[derive(Debug, Clone)]
pub struct LocalFileSystem {
    config: LocalConfig,
    working_directory: Path,
}

impl LocalFileSystem {
    /// A filesystem whose working directory is the host root
    pub fn new(config: LocalConfig) -> Self {
        Self {
            config,
            working_directory: Path::root(),
        }
    }

    /// A filesystem starting in the process's current directory
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be read or is not
    /// valid UTF-8
    pub fn from_current_dir(config: LocalConfig) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Ok(Self {
            config,
            working_directory: host_to_path(&cwd)?,
        })
    }

    /// Host location of `path` after resolving it against the working directory
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if the path cannot be expressed on
    /// this host
    pub fn host_path(&self, path: &Path) -> Result<PathBuf> {
        path_to_host(&resolve_path(&self.working_directory, path))
    }

    fn open_mapped(&self, host: &std::path::Path) -> Result<Box<dyn Stream>> {
        let file = File::open(host).map_err(|e| host_error(e, host))?;
        match MmapSource::from_file(&file) {
            Ok(source) => Ok(Box::new(SourceStream::new(Rc::new(source)))),
            Err(e) => {
                tracing::warn!("Falling back to file I/O for {}: {}", host.display(), e);
                Ok(Box::new(FileStream::from_file(file, FileAccess::Read)?))
            }
        }
    }
}

impl Default for LocalFileSystem {
    fn default() -> Self {
        Self::new(LocalConfig::default())
    }
}

/// Convert a host path to a component path
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] if the host path is not valid UTF-8
pub fn host_to_path(host: &std::path::Path) -> Result<Path> {
    let s = host
        .to_str()
        .ok_or_else(|| Error::invalid_path(format!("{} is not valid UTF-8", host.display())))?;
    Path::parse(s)
}

/// Host location of a resolved path
///
/// Drive roots are only accepted on Windows, and every later component must
/// stay a single plain name on the host so `PathBuf::push` cannot replace
/// the prefix built so far.
fn path_to_host(resolved: &Path) -> Result<PathBuf> {
    let mut host = match resolved.front() {
        Some("") | None => PathBuf::from(std::path::MAIN_SEPARATOR_STR),
        Some(drive) if cfg!(windows) => {
            PathBuf::from(format!("{}{}", drive, std::path::MAIN_SEPARATOR))
        }
        Some(drive) => {
            return Err(Error::invalid_path(format!(
                "drive root '{}' in {} is not available on this host",
                drive, resolved
            )))
        }
    };
    for component in resolved.iter().skip(1) {
        let mut parts = std::path::Path::new(component).components();
        match (parts.next(), parts.next()) {
            (Some(Component::Normal(_)), None) => host.push(component),
            _ => {
                return Err(Error::invalid_path(format!(
                    "component '{}' of {} is not a plain host file name",
                    component, resolved
                )))
            }
        }
    }
    Ok(host)
}

/// Map the host error kinds callers match on to their own variants
fn host_error(err: io::Error, host: &std::path::Path) -> Error {
    match err.kind() {
        io::ErrorKind::NotFound => Error::not_found(host.display().to_string()),
        io::ErrorKind::AlreadyExists => Error::already_exists(host.display().to_string()),
        _ => Error::Io(err),
    }
}

fn require_directory(host: &std::path::Path) -> Result<()> {
    let metadata = fs::metadata(host).map_err(|e| host_error(e, host))?;
    if !metadata.is_dir() {
        return Err(Error::not_a_directory(host.display().to_string()));
    }
    Ok(())
}

impl FileSystem for LocalFileSystem {
    fn working_directory(&self) -> Path {
        self.working_directory.clone()
    }

    fn set_working_directory(&mut self, path: &Path) -> Result<()> {
        let resolved = resolve_path(&self.working_directory, path);
        require_directory(&path_to_host(&resolved)?)?;
        self.working_directory = resolved;
        Ok(())
    }

    fn create_file(&mut self, path: &Path) -> Result<()> {
        let host = self.host_path(path)?;
        File::create(&host).map_err(|e| host_error(e, &host))?;
        Ok(())
    }

    fn remove_file(&mut self, path: &Path) -> Result<()> {
        let host = self.host_path(path)?;
        if host.is_dir() {
            return Err(Error::invalid_path(format!("{} is a directory", host.display())));
        }
        fs::remove_file(&host).map_err(|e| host_error(e, &host))
    }

    fn open_file(
        &mut self,
        path: &Path,
        mode: OpenMode,
        access: FileAccess,
    ) -> Result<Box<dyn Stream>> {
        let host = self.host_path(path)?;
        if mode.truncates() && !access.can_write() {
            return Err(Error::unsupported_capability(format!(
                "{:?} on {} requires write access",
                mode,
                host.display()
            )));
        }
        if host.is_dir() {
            return Err(Error::invalid_path(format!("{} is a directory", host.display())));
        }

        tracing::debug!("Opening {} ({:?}, {:?})", host.display(), mode, access);
        if self.config.use_mmap && mode == OpenMode::Open && access == FileAccess::Read {
            return self.open_mapped(&host);
        }

        // std only creates files through a writable handle
        if mode.creates() && !access.can_write() {
            let mut creator = OpenOptions::new();
            creator.write(true);
            if mode == OpenMode::CreateNew {
                creator.create_new(true);
            } else {
                creator.create(true);
            }
            creator.open(&host).map_err(|e| host_error(e, &host))?;
        }

        let mut options = OpenOptions::new();
        options.read(access.can_read()).write(access.can_write());
        if access.can_write() {
            match mode {
                OpenMode::Create => {
                    options.create(true).truncate(true);
                }
                OpenMode::CreateNew => {
                    options.create_new(true);
                }
                OpenMode::OpenOrCreate | OpenMode::Append => {
                    options.create(true);
                }
                OpenMode::Truncate => {
                    options.truncate(true);
                }
                OpenMode::Open => {}
            }
        }

        let file = options.open(&host).map_err(|e| host_error(e, &host))?;
        let mut stream = FileStream::from_file(file, access)?;
        if mode == OpenMode::Append {
            stream.seek(SeekFrom::End(0))?;
        }
        Ok(Box::new(stream))
    }

    fn create_directory(&mut self, path: &Path) -> Result<()> {
        let host = self.host_path(path)?;
        fs::create_dir(&host).map_err(|e| host_error(e, &host))
    }

    fn remove_directory(&mut self, path: &Path) -> Result<()> {
        let resolved = resolve_path(&self.working_directory, path);
        if resolved.len() <= 1 {
            return Err(Error::invalid_path("the root directory cannot be removed"));
        }
        let host = path_to_host(&resolved)?;
        require_directory(&host)?;
        if fs::read_dir(&host)?.next().is_some() {
            return Err(Error::directory_not_empty(host.display().to_string()));
        }
        fs::remove_dir(&host).map_err(|e| host_error(e, &host))
    }

    fn list_directory(&self, path: &Path) -> Result<DirectoryListing> {
        let resolved = resolve_path(&self.working_directory, path);
        let host = path_to_host(&resolved)?;
        require_directory(&host)?;

        let mut listing = DirectoryListing::new(resolved);
        for entry in fs::read_dir(&host)? {
            let entry = entry?;
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    tracing::warn!("Skipping non UTF-8 entry {:?} in {}", raw, host.display());
                    continue;
                }
            };
            if entry.path().is_dir() {
                listing.subdirectories.push(name);
            } else {
                listing.files.push(name);
            }
        }
        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn in_tempdir() -> (TempDir, LocalFileSystem) {
        let dir = TempDir::new().unwrap();
        let mut fs = LocalFileSystem::default();
        fs.set_working_directory(&host_to_path(dir.path()).unwrap())
            .unwrap();
        (dir, fs)
    }

    fn p(s: &str) -> Path {
        s.parse().unwrap()
    }

    #[test]
    fn test_host_path_round_trip() {
        let (dir, fs) = in_tempdir();
        assert_eq!(fs.host_path(&p("a/../b.bin")).unwrap(), dir.path().join("b.bin"));
        assert_eq!(fs.host_path(&Path::new()).unwrap(), dir.path());
    }

    #[cfg(not(windows))]
    #[test]
    fn test_drive_root_rejected_off_windows() {
        let (_dir, mut fs) = in_tempdir();
        assert!(matches!(
            fs.host_path(&p("C:\\x")),
            Err(Error::InvalidPath(_))
        ));
        assert!(matches!(
            fs.open_file(&p("C:\\x"), OpenMode::Open, FileAccess::Read),
            Err(Error::InvalidPath(_))
        ));
        assert!(fs.set_working_directory(&p("C:\\")).is_err());
    }

    #[cfg(windows)]
    #[test]
    fn test_drive_component_inside_path_rejected() {
        let (_dir, fs) = in_tempdir();
        assert!(matches!(
            fs.host_path(&p("a/C:/b")),
            Err(Error::InvalidPath(_))
        ));
    }

    #[test]
    fn test_scoped_local_paths_stay_under_base() {
        let (dir, fs) = in_tempdir();
        let base = fs.working_directory();
        let scoped = crate::sub::SubFileSystem::new(
            std::rc::Rc::new(std::cell::RefCell::new(fs.clone())),
            &base,
        )
        .unwrap();

        for raw in ["a/C:/b", "../../C:/b", "/x/../../y"] {
            let translated = scoped.translate(&p(raw));
            if let Ok(host) = fs.host_path(&translated) {
                assert!(host.starts_with(dir.path()), "{} escaped to {}", raw, host.display());
            }
        }
    }

    #[test]
    fn test_create_and_list() {
        let (_dir, mut fs) = in_tempdir();
        fs.create_directory(&p("sub")).unwrap();
        fs.create_file(&p("sub/one.bin")).unwrap();
        fs.create_file(&p("two.bin")).unwrap();

        let listing = fs.list_directory(&Path::new()).unwrap().sorted();
        assert_eq!(listing.subdirectories, vec!["sub"]);
        assert_eq!(listing.files, vec!["two.bin"]);
        assert_eq!(listing.absolute_path, fs.working_directory());

        assert!(matches!(
            fs.create_directory(&p("sub")),
            Err(Error::AlreadyExists(_))
        ));
        assert!(matches!(
            fs.list_directory(&p("missing")),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            fs.list_directory(&p("two.bin")),
            Err(Error::NotADirectory(_))
        ));
    }

    #[test]
    fn test_open_read_write() {
        let (dir, mut fs) = in_tempdir();
        {
            let mut stream = fs
                .open_file(&p("data.bin"), OpenMode::CreateNew, FileAccess::ReadWrite)
                .unwrap();
            stream.write_all(b"0123456789").unwrap();
            stream.flush().unwrap();
        }
        assert_eq!(std::fs::read(dir.path().join("data.bin")).unwrap(), b"0123456789");

        let mut stream = fs
            .open_file(&p("data.bin"), OpenMode::Open, FileAccess::Read)
            .unwrap();
        assert_eq!(stream.length(), 10);
        assert!(!stream.can_write());
        stream.seek(SeekFrom::Start(7)).unwrap();
        let mut buf = [0u8; 8];
        let n = stream.read_fill(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"789");

        assert!(matches!(
            fs.open_file(&p("data.bin"), OpenMode::CreateNew, FileAccess::Write),
            Err(Error::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_without_mmap() {
        let dir = TempDir::new().unwrap();
        let mut file = File::create(dir.path().join("raw.img")).unwrap();
        file.write_all(&[0xAA; 64]).unwrap();
        drop(file);

        let mut fs = LocalFileSystem::new(LocalConfig { use_mmap: false });
        fs.set_working_directory(&host_to_path(dir.path()).unwrap())
            .unwrap();
        let mut stream = fs
            .open_file(&p("raw.img"), OpenMode::Open, FileAccess::Read)
            .unwrap();
        let mut buf = [0u8; 64];
        assert_eq!(stream.read_fill(&mut buf).unwrap(), 64);
        assert!(buf.iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn test_append_and_truncate() {
        let (dir, mut fs) = in_tempdir();
        fs.open_file(&p("log"), OpenMode::Append, FileAccess::Write)
            .unwrap()
            .write_all(b"ab")
            .unwrap();
        fs.open_file(&p("log"), OpenMode::Append, FileAccess::Write)
            .unwrap()
            .write_all(b"cd")
            .unwrap();
        assert_eq!(std::fs::read(dir.path().join("log")).unwrap(), b"abcd");

        assert!(matches!(
            fs.open_file(&p("log"), OpenMode::Truncate, FileAccess::Read),
            Err(Error::UnsupportedCapability(_))
        ));
        let stream = fs
            .open_file(&p("log"), OpenMode::Truncate, FileAccess::Write)
            .unwrap();
        assert_eq!(stream.length(), 0);
    }

    #[test]
    fn test_read_only_create() {
        let (dir, mut fs) = in_tempdir();
        let stream = fs
            .open_file(&p("fresh"), OpenMode::OpenOrCreate, FileAccess::Read)
            .unwrap();
        assert_eq!(stream.length(), 0);
        assert!(dir.path().join("fresh").is_file());
    }

    #[test]
    fn test_remove() {
        let (_dir, mut fs) = in_tempdir();
        fs.create_directory(&p("d")).unwrap();
        fs.create_file(&p("d/f")).unwrap();
        assert!(matches!(
            fs.remove_directory(&p("d")),
            Err(Error::DirectoryNotEmpty(_))
        ));
        assert!(fs.remove_file(&p("d")).is_err());
        fs.remove_file(&p("d/f")).unwrap();
        fs.remove_directory(&p("d")).unwrap();
        assert!(matches!(
            fs.remove_file(&p("d/f")),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_working_directory_does_not_leak() {
        let before = std::env::current_dir().unwrap();
        let (_dir, fs) = in_tempdir();
        assert_ne!(fs.working_directory(), Path::root());
        assert_eq!(std::env::current_dir().unwrap(), before);
    }
}

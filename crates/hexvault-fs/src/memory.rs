//! In-memory virtual filesystem

use crate::resolve::{relative_components, resolve_path};
use hexvault_core::{
    DirectoryListing, Error, FileAccess, FileSystem, OpenMode, Path, Result, Stream,
};
use hexvault_pipeline::MemoryStream;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::SeekFrom;
use std::rc::Rc;

type Key = Vec<String>;

#[derive(Debug, Clone)]
enum Node {
    Directory,
    File(Rc<RefCell<Vec<u8>>>),
}

/// A [`FileSystem`] held entirely in memory
///
/// Open handles share the file's buffer, so a write through one handle is
/// visible to every other handle on the same file.
///
/// # Example
///
/// ```rust
/// use hexvault_core::{FileAccess, FileSystem, OpenMode, Path, Stream};
/// use hexvault_fs::MemoryFileSystem;
///
/// let mut fs = MemoryFileSystem::new();
/// let dir: Path = "/title".parse().unwrap();
/// fs.create_directory(&dir).unwrap();
///
/// let file: Path = "/title/tmd.bin".parse().unwrap();
/// let mut stream = fs.open_file(&file, OpenMode::Create, FileAccess::Write).unwrap();
/// stream.write_all(b"TMD").unwrap();
///
/// assert_eq!(fs.list_directory(&dir).unwrap().files, vec!["tmd.bin"]);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryFileSystem {
    nodes: BTreeMap<Key, Node>,
    working_directory: Path,
}

impl MemoryFileSystem {
    /// An empty filesystem holding only the root directory
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(Vec::new(), Node::Directory);
        Self {
            nodes,
            working_directory: Path::root(),
        }
    }

    fn key(&self, path: &Path) -> (Path, Key) {
        let resolved = resolve_path(&self.working_directory, path);
        let key = relative_components(&resolved);
        (resolved, key)
    }

    fn require_parent_directory(&self, key: &Key, resolved: &Path) -> Result<()> {
        let parent = &key[..key.len().saturating_sub(1)];
        match self.nodes.get(parent) {
            Some(Node::Directory) => Ok(()),
            Some(Node::File(_)) => Err(Error::not_a_directory(format!(
                "parent of {} is a file",
                resolved
            ))),
            None => Err(Error::not_found(format!("parent of {}", resolved))),
        }
    }

    fn require_directory(&self, key: &Key, resolved: &Path) -> Result<()> {
        match self.nodes.get(key) {
            Some(Node::Directory) => Ok(()),
            Some(Node::File(_)) => Err(Error::not_a_directory(resolved.to_string())),
            None => Err(Error::not_found(resolved.to_string())),
        }
    }

    fn children<'a>(&'a self, key: &'a Key) -> impl Iterator<Item = (&'a Key, &'a Node)> + 'a {
        self.nodes
            .range(key.clone()..)
            .skip(1)
            .take_while(move |(k, _)| k.starts_with(key))
            .filter(move |(k, _)| k.len() == key.len() + 1)
    }
}

impl Default for MemoryFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MemoryFileSystem {
    fn working_directory(&self) -> Path {
        self.working_directory.clone()
    }

    fn set_working_directory(&mut self, path: &Path) -> Result<()> {
        let (resolved, key) = self.key(path);
        self.require_directory(&key, &resolved)?;
        self.working_directory = resolved;
        Ok(())
    }

    fn create_file(&mut self, path: &Path) -> Result<()> {
        let (resolved, key) = self.key(path);
        match self.nodes.get(&key) {
            Some(Node::Directory) => Err(Error::already_exists(format!(
                "{} is a directory",
                resolved
            ))),
            Some(Node::File(data)) => {
                data.borrow_mut().clear();
                Ok(())
            }
            None => {
                self.require_parent_directory(&key, &resolved)?;
                self.nodes.insert(key, Node::File(Rc::new(RefCell::new(Vec::new()))));
                Ok(())
            }
        }
    }

    fn remove_file(&mut self, path: &Path) -> Result<()> {
        let (resolved, key) = self.key(path);
        match self.nodes.get(&key) {
            Some(Node::File(_)) => {
                self.nodes.remove(&key);
                Ok(())
            }
            Some(Node::Directory) => Err(Error::invalid_path(format!(
                "{} is a directory",
                resolved
            ))),
            None => Err(Error::not_found(resolved.to_string())),
        }
    }

    fn open_file(
        &mut self,
        path: &Path,
        mode: OpenMode,
        access: FileAccess,
    ) -> Result<Box<dyn Stream>> {
        let (resolved, key) = self.key(path);
        if mode.truncates() && !access.can_write() {
            return Err(Error::unsupported_capability(format!(
                "{:?} on {} requires write access",
                mode, resolved
            )));
        }

        let data = match (self.nodes.get(&key), mode) {
            (Some(Node::Directory), _) => {
                return Err(Error::invalid_path(format!("{} is a directory", resolved)))
            }
            (Some(Node::File(_)), OpenMode::CreateNew) => {
                return Err(Error::already_exists(resolved.to_string()))
            }
            (Some(Node::File(data)), _) => {
                let data = Rc::clone(data);
                if mode.truncates() {
                    data.borrow_mut().clear();
                }
                data
            }
            (None, mode) if mode.creates() => {
                self.require_parent_directory(&key, &resolved)?;
                let data = Rc::new(RefCell::new(Vec::new()));
                self.nodes.insert(key, Node::File(Rc::clone(&data)));
                data
            }
            (None, _) => return Err(Error::not_found(resolved.to_string())),
        };

        let mut stream = MemoryStream::shared(data, access);
        if mode == OpenMode::Append {
            stream.seek(SeekFrom::End(0))?;
        }
        Ok(Box::new(stream))
    }

    fn create_directory(&mut self, path: &Path) -> Result<()> {
        let (resolved, key) = self.key(path);
        if self.nodes.contains_key(&key) {
            return Err(Error::already_exists(resolved.to_string()));
        }
        self.require_parent_directory(&key, &resolved)?;
        self.nodes.insert(key, Node::Directory);
        Ok(())
    }

    fn remove_directory(&mut self, path: &Path) -> Result<()> {
        let (resolved, key) = self.key(path);
        if key.is_empty() {
            return Err(Error::invalid_path("the root directory cannot be removed"));
        }
        self.require_directory(&key, &resolved)?;
        if self.children(&key).next().is_some() {
            return Err(Error::directory_not_empty(resolved.to_string()));
        }
        self.nodes.remove(&key);
        Ok(())
    }

    fn list_directory(&self, path: &Path) -> Result<DirectoryListing> {
        let (resolved, key) = self.key(path);
        self.require_directory(&key, &resolved)?;

        let mut listing = DirectoryListing::new(resolved);
        for (child, node) in self.children(&key) {
            let name = child[child.len() - 1].clone();
            match node {
                Node::Directory => listing.subdirectories.push(name),
                Node::File(_) => listing.files.push(name),
            }
        }
        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Path {
        s.parse().unwrap()
    }

    #[test]
    fn test_directory_tree() {
        let mut fs = MemoryFileSystem::new();
        fs.create_directory(&p("/a")).unwrap();
        fs.create_directory(&p("/a/b")).unwrap();
        fs.create_file(&p("/a/f.bin")).unwrap();
        fs.create_directory(&p("/ab")).unwrap();

        let listing = fs.list_directory(&p("/a")).unwrap();
        assert_eq!(listing.subdirectories, vec!["b"]);
        assert_eq!(listing.files, vec!["f.bin"]);
        assert_eq!(listing.absolute_path, p("/a"));

        let root = fs.list_directory(&Path::root()).unwrap().sorted();
        assert_eq!(root.subdirectories, vec!["a", "ab"]);
    }

    #[test]
    fn test_create_requires_parent() {
        let mut fs = MemoryFileSystem::new();
        assert!(matches!(
            fs.create_directory(&p("/missing/child")),
            Err(Error::NotFound(_))
        ));
        fs.create_file(&p("/file")).unwrap();
        assert!(matches!(
            fs.create_file(&p("/file/child")),
            Err(Error::NotADirectory(_))
        ));
        assert!(matches!(
            fs.create_directory(&p("/file")),
            Err(Error::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_working_directory_is_instance_state() {
        let mut fs = MemoryFileSystem::new();
        fs.create_directory(&p("/data")).unwrap();
        fs.set_working_directory(&p("data")).unwrap();
        assert_eq!(fs.working_directory(), p("/data"));

        fs.create_file(&p("rel.bin")).unwrap();
        assert_eq!(fs.list_directory(&Path::new()).unwrap().files, vec!["rel.bin"]);

        let other = MemoryFileSystem::new();
        assert_eq!(other.working_directory(), Path::root());

        assert!(fs.set_working_directory(&p("/nope")).is_err());
        assert!(fs.set_working_directory(&p("rel.bin")).is_err());
        assert_eq!(fs.working_directory(), p("/data"));
    }

    #[test]
    fn test_handles_share_contents() {
        let mut fs = MemoryFileSystem::new();
        let path = p("/blob");
        let mut writer = fs.open_file(&path, OpenMode::CreateNew, FileAccess::Write).unwrap();
        writer.write_all(b"abc").unwrap();

        let mut reader = fs.open_file(&path, OpenMode::Open, FileAccess::Read).unwrap();
        let mut buf = [0u8; 3];
        reader.read_fill(&mut buf).unwrap();
        assert_eq!(&buf, b"abc");

        let mut appender = fs.open_file(&path, OpenMode::Append, FileAccess::Write).unwrap();
        appender.write_all(b"de").unwrap();
        assert_eq!(reader.length(), 5);
    }

    #[test]
    fn test_open_modes() {
        let mut fs = MemoryFileSystem::new();
        let path = p("/x");
        assert!(matches!(
            fs.open_file(&path, OpenMode::Open, FileAccess::Read),
            Err(Error::NotFound(_))
        ));
        fs.open_file(&path, OpenMode::OpenOrCreate, FileAccess::ReadWrite)
            .unwrap()
            .write_all(b"1234")
            .unwrap();
        assert!(matches!(
            fs.open_file(&path, OpenMode::CreateNew, FileAccess::Write),
            Err(Error::AlreadyExists(_))
        ));
        assert!(matches!(
            fs.open_file(&path, OpenMode::Truncate, FileAccess::Read),
            Err(Error::UnsupportedCapability(_))
        ));
        let stream = fs.open_file(&path, OpenMode::Truncate, FileAccess::Write).unwrap();
        assert_eq!(stream.length(), 0);
    }

    #[test]
    fn test_remove() {
        let mut fs = MemoryFileSystem::new();
        fs.create_directory(&p("/d")).unwrap();
        fs.create_file(&p("/d/f")).unwrap();

        assert!(matches!(
            fs.remove_directory(&p("/d")),
            Err(Error::DirectoryNotEmpty(_))
        ));
        assert!(fs.remove_file(&p("/d")).is_err());
        fs.remove_file(&p("/d/f")).unwrap();
        fs.remove_directory(&p("/d")).unwrap();
        assert!(fs.remove_directory(&Path::root()).is_err());
        assert!(fs.list_directory(&Path::root()).unwrap().subdirectories.is_empty());
    }
}

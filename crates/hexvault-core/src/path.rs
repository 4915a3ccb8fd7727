//! Typed, separator-free paths
//!
//! A [`Path`] is an ordered list of components. It performs no I/O and knows
//! nothing about the host filesystem; it only converts between component
//! lists and POSIX (`/`) or Windows (`\`) delimited strings.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Bound, RangeBounds};
use std::str::FromStr;

/// String style used when formatting a [`Path`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathFormat {
    /// Components joined by `/`
    Posix,
    /// Components joined by `\`
    Windows,
    /// The host convention
    Native,
}

impl PathFormat {
    /// Separator character for this format
    pub fn separator(self) -> char {
        match self {
            PathFormat::Posix => Path::POSIX_SEPARATOR,
            PathFormat::Windows => Path::WINDOWS_SEPARATOR,
            PathFormat::Native => {
                if cfg!(windows) {
                    Path::WINDOWS_SEPARATOR
                } else {
                    Path::POSIX_SEPARATOR
                }
            }
        }
    }
}

/// An ordered sequence of path components
///
/// Empty components are kept. A leading empty component marks a POSIX-style
/// absolute path, so `"/usr/bin"` is stored as `["", "usr", "bin"]` and the
/// root `"/"` as `[""]`.
///
/// # Example
///
/// ```rust
/// use hexvault_core::{Path, PathFormat};
///
/// let mut path: Path = "a/b/c".parse().unwrap();
/// path.pop_front();
/// assert_eq!(path.to_string(), "b/c");
///
/// let joined = "C:\\Users\\x".parse::<Path>().unwrap() + "y.txt".parse::<Path>().unwrap();
/// assert_eq!(joined.format(PathFormat::Windows), "C:\\Users\\x\\y.txt");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Path {
    components: Vec<String>,
}

impl Path {
    pub const POSIX_SEPARATOR: char = '/';
    pub const WINDOWS_SEPARATOR: char = '\\';

    /// Create an empty path
    pub fn new() -> Self {
        Self::default()
    }

    /// The absolute root `/`
    pub fn root() -> Self {
        Self {
            components: vec![String::new()],
        }
    }

    /// Build a path from individual components
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if any component contains a separator.
    pub fn from_components<I, S>(components: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut path = Self::new();
        for component in components {
            path.push_back(component)?;
        }
        Ok(path)
    }

    /// Parse a POSIX or Windows delimited string
    ///
    /// A single trailing separator is ignored, so `"a/b/"` equals `"a/b"`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if the string mixes `/` and `\`.
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Ok(Self::new());
        }

        let has_posix = s.contains(Self::POSIX_SEPARATOR);
        let has_windows = s.contains(Self::WINDOWS_SEPARATOR);
        if has_posix && has_windows {
            return Err(Error::invalid_path(format!(
                "'{}' mixes POSIX and Windows separators",
                s
            )));
        }

        let separator = if has_windows {
            Self::WINDOWS_SEPARATOR
        } else {
            Self::POSIX_SEPARATOR
        };

        let mut components: Vec<String> = s.split(separator).map(str::to_owned).collect();
        if components.len() > 1 && s.ends_with(separator) {
            components.pop();
        }

        Ok(Self { components })
    }

    /// Number of components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// True if the path has no components
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// True if the path starts at a root (`/` or a drive letter such as `C:`)
    pub fn is_absolute(&self) -> bool {
        match self.components.first() {
            Some(first) => first.is_empty() || is_drive(first),
            None => false,
        }
    }

    /// Borrow the components
    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Iterate over the components
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.components.iter()
    }

    /// First component
    pub fn front(&self) -> Option<&str> {
        self.components.first().map(String::as_str)
    }

    /// Last component
    pub fn back(&self) -> Option<&str> {
        self.components.last().map(String::as_str)
    }

    /// Append a component
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if the component contains a separator.
    pub fn push_back(&mut self, component: impl Into<String>) -> Result<()> {
        let component = validate_component(component.into())?;
        self.components.push(component);
        Ok(())
    }

    /// Prepend a component
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if the component contains a separator.
    pub fn push_front(&mut self, component: impl Into<String>) -> Result<()> {
        let component = validate_component(component.into())?;
        self.components.insert(0, component);
        Ok(())
    }

    /// Remove and return the last component
    pub fn pop_back(&mut self) -> Option<String> {
        self.components.pop()
    }

    /// Remove and return the first component
    pub fn pop_front(&mut self) -> Option<String> {
        if self.components.is_empty() {
            None
        } else {
            Some(self.components.remove(0))
        }
    }

    /// Copy a range of components into a new path
    ///
    /// The range is clamped to the path length.
    pub fn subpath(&self, range: impl RangeBounds<usize>) -> Path {
        let len = self.components.len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        }
        .min(len);
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        }
        .min(len);

        if start >= end {
            return Path::new();
        }

        Path {
            components: self.components[start..end].to_vec(),
        }
    }

    /// Concatenate two paths
    pub fn join(&self, other: &Path) -> Path {
        let mut components = self.components.clone();
        components.extend(other.components.iter().cloned());
        Path { components }
    }

    /// Format the path with the given separator style
    pub fn format(&self, format: PathFormat) -> String {
        let separator = format.separator();
        if self.components.len() == 1 && self.components[0].is_empty() {
            return separator.to_string();
        }
        self.components.join(&separator.to_string())
    }

    /// Format the path using `/`
    pub fn to_posix_string(&self) -> String {
        self.format(PathFormat::Posix)
    }

    /// Format the path using `\`
    pub fn to_windows_string(&self) -> String {
        self.format(PathFormat::Windows)
    }

    /// Format the path using the host separator
    pub fn to_native_string(&self) -> String {
        self.format(PathFormat::Native)
    }
}

fn is_drive(component: &str) -> bool {
    let bytes = component.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

fn validate_component(component: String) -> Result<String> {
    if component.contains(Path::POSIX_SEPARATOR) || component.contains(Path::WINDOWS_SEPARATOR) {
        return Err(Error::invalid_path(format!(
            "component '{}' contains a separator",
            component
        )));
    }
    Ok(component)
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_posix_string())
    }
}

impl FromStr for Path {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Path::parse(s)
    }
}

impl TryFrom<&str> for Path {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Path::parse(s)
    }
}

impl TryFrom<String> for Path {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Path::parse(&s)
    }
}

impl TryFrom<Vec<String>> for Path {
    type Error = Error;

    fn try_from(components: Vec<String>) -> Result<Self> {
        Path::from_components(components)
    }
}

impl From<Path> for Vec<String> {
    fn from(path: Path) -> Self {
        path.components
    }
}

impl Add<&Path> for &Path {
    type Output = Path;

    fn add(self, rhs: &Path) -> Path {
        self.join(rhs)
    }
}

impl Add<Path> for Path {
    type Output = Path;

    fn add(mut self, rhs: Path) -> Path {
        self.components.extend(rhs.components);
        self
    }
}

impl AddAssign<&Path> for Path {
    fn add_assign(&mut self, rhs: &Path) {
        self.components.extend(rhs.components.iter().cloned());
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

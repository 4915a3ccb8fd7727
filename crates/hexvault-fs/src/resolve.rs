//! Lexical path resolution

use hexvault_core::Path;

/// Resolve `path` against `working_directory` without touching any store
///
/// Absolute paths replace the working directory; relative ones extend it.
/// `.` and empty components are skipped and `..` removes the previous
/// component, but never the root. The result is absolute and contains no
/// `.` or `..` components.
///
/// ```rust
/// use hexvault_core::Path;
/// use hexvault_fs::resolve_path;
///
/// let wd: Path = "/a/b".parse().unwrap();
/// let up: Path = "../../../../c".parse().unwrap();
/// assert_eq!(resolve_path(&wd, &up).to_string(), "/c");
/// ```
pub fn resolve_path(working_directory: &Path, path: &Path) -> Path {
    let (mut resolved, rest) = if path.is_absolute() {
        (path.subpath(..1), path.subpath(1..))
    } else if working_directory.is_absolute() {
        (working_directory.clone(), path.clone())
    } else {
        (Path::root(), working_directory.join(path))
    };

    for component in &rest {
        match component.as_str() {
            "" | "." => {}
            ".." => {
                if resolved.len() > 1 {
                    resolved.pop_back();
                }
            }
            _ => {
                // Every constructor of `Path` validates its components.
                let pushed = resolved.push_back(component.as_str());
                debug_assert!(pushed.is_ok(), "component {:?} holds a separator", component);
            }
        }
    }
    resolved
}

/// Components below the root of a resolved path
pub(crate) fn relative_components(resolved: &Path) -> Vec<String> {
    resolved.components().iter().skip(1).cloned().collect()
}

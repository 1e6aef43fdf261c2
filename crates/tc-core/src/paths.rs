//! Lexical path normalization.
//!
//! Input and output paths are compared component by component to find the
//! mount directory, so they must not carry `.` or `..` components.

use std::path::{Component, Path, PathBuf};

/// Remove `.` and `..` components without touching the filesystem.
///
/// `..` at the root stays at the root. A relative path that cancels out
/// entirely becomes `.`.
pub fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// `path` made absolute against the current directory and then cleaned.
pub fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    std::path::absolute(path).map(|p| clean(&p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_parent_and_current_components() {
        assert_eq!(clean(Path::new("/x/work/../book/./01.mp3")), Path::new("/x/book/01.mp3"));
        assert_eq!(clean(Path::new("/x/a/b/../../c")), Path::new("/x/c"));
    }

    #[test]
    fn parent_of_root_is_root() {
        assert_eq!(clean(Path::new("/../../a")), Path::new("/a"));
    }

    #[test]
    fn relative_paths_keep_leading_parents() {
        assert_eq!(clean(Path::new("../a/../b")), Path::new("../b"));
        assert_eq!(clean(Path::new("a/..")), Path::new("."));
    }

    #[test]
    fn absolute_has_no_dot_components() {
        let path = absolute(Path::new("../book/./out.m4a")).unwrap();
        assert!(path.is_absolute());
        assert!(path
            .components()
            .all(|c| !matches!(c, Component::ParentDir | Component::CurDir)));
        assert!(path.ends_with("book/out.m4a"));
    }
}

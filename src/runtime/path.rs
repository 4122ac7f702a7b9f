//! Lexical path helpers.

use std::path::{Component, Path, PathBuf};

/// Normalize a path by processing `.` and `..` components lexically.
/// Does not touch the filesystem.
pub(crate) fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !result.pop() {
                    result.push(component);
                }
            }
            _ => result.push(component),
        }
    }
    result
}

/// Returns true if `path` lies under `dir`, comparing normalized components.
///
/// `/home/u/ides/PCP-1/../../etc` is NOT under `/home/u/ides`.
pub fn is_path_under(path: &Path, dir: &Path) -> bool {
    let path = normalize_path(path);
    let dir = normalize_path(dir);
    path.starts_with(&dir)
}

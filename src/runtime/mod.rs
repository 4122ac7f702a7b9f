//! Runtime abstraction for system operations.
//!
//! Every component that touches the filesystem or the environment takes an
//! `R: Runtime`, so the install tree, the cache and the launcher directory can
//! be exercised against a `MockRuntime` in tests.
//!
//! # Structure
//!
//! - `path` - Lexical path helpers (normalize, is_path_under)
//! - `env` - Home directory lookup
//! - `fs` - File and directory operations
//! - `symlink` - Symlink operations (create, resolve, remove)

mod env;
mod fs;
pub mod path;
mod symlink;

use anyhow::Result;
use std::path::{Path, PathBuf};

pub use path::is_path_under;

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    // File System
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    fn create_file(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>>;
    fn open(&self, path: &Path) -> Result<Box<dyn std::io::Read + Send>>;

    /// Recursively remove a directory.
    /// Returns Ok(false) when there was nothing to remove.
    fn remove_dir_all(&self, path: &Path) -> Result<bool>;

    // Symlinks
    fn symlink(&self, original: &Path, link: &Path) -> Result<()>;
    fn is_symlink(&self, path: &Path) -> bool;

    /// Resolve a symlink to an absolute path without following nested links.
    /// A relative target is resolved against the link's parent directory.
    fn resolve_link(&self, path: &Path) -> Result<PathBuf>;

    /// Remove a symlink (or a plain file standing where a link should be).
    /// Returns Ok(false) when nothing existed at `path`.
    fn remove_link(&self, path: &Path) -> Result<bool>;

    // Directories
    fn home_dir(&self) -> Option<PathBuf>;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.write_impl(path, contents)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.read_to_string_impl(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        self.rename_impl(from, to)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.create_dir_all_impl(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.exists_impl(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.is_dir_impl(path)
    }

    fn create_file(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>> {
        self.create_file_impl(path)
    }

    fn open(&self, path: &Path) -> Result<Box<dyn std::io::Read + Send>> {
        self.open_impl(path)
    }

    fn remove_dir_all(&self, path: &Path) -> Result<bool> {
        self.remove_dir_all_impl(path)
    }

    fn symlink(&self, original: &Path, link: &Path) -> Result<()> {
        self.symlink_impl(original, link)
    }

    fn is_symlink(&self, path: &Path) -> bool {
        self.is_symlink_impl(path)
    }

    fn resolve_link(&self, path: &Path) -> Result<PathBuf> {
        self.resolve_link_impl(path)
    }

    fn remove_link(&self, path: &Path) -> Result<bool> {
        self.remove_link_impl(path)
    }

    fn home_dir(&self) -> Option<PathBuf> {
        self.home_dir_impl()
    }
}

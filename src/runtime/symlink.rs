//! Symlink operations (create, read, resolve, remove).

use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::RealRuntime;
use super::path::normalize_path;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn symlink_impl(&self, original: &Path, link: &Path) -> Result<()> {
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(original, link)
                .with_context(|| format!("Failed to create symlink {:?} -> {:?}", link, original))
        }
        #[cfg(not(unix))]
        {
            anyhow::bail!(
                "Symlinks are not supported on this platform: {:?} -> {:?}",
                link,
                original
            )
        }
    }

    fn read_link_impl(&self, path: &Path) -> Result<PathBuf> {
        fs::read_link(path).with_context(|| format!("Failed to read symlink {:?}", path))
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn is_symlink_impl(&self, path: &Path) -> bool {
        fs::symlink_metadata(path)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn resolve_link_impl(&self, path: &Path) -> Result<PathBuf> {
        let target = self.read_link_impl(path)?;
        if target.is_absolute() {
            return Ok(target);
        }
        let parent = path
            .parent()
            .context("Failed to get parent directory of symlink")?;
        Ok(normalize_path(&parent.join(&target)))
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn remove_link_impl(&self, path: &Path) -> Result<bool> {
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {:?}", path)),
        }
    }
}

//! File system operations (read, write, directory).

use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self, contents))]
    pub(crate) fn write_impl(&self, path: &Path, contents: &[u8]) -> Result<()> {
        fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn read_to_string_impl(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn rename_impl(&self, from: &Path, to: &Path) -> Result<()> {
        fs::rename(from, to).with_context(|| format!("Failed to rename {:?} to {:?}", from, to))
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn create_dir_all_impl(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).with_context(|| format!("Failed to create directory {:?}", path))
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn exists_impl(&self, path: &Path) -> bool {
        path.exists()
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn is_dir_impl(&self, path: &Path) -> bool {
        path.is_dir()
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn create_file_impl(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>> {
        let file =
            fs::File::create(path).with_context(|| format!("Failed to create file {:?}", path))?;
        Ok(Box::new(file))
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn open_impl(&self, path: &Path) -> Result<Box<dyn std::io::Read + Send>> {
        let file = fs::File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
        Ok(Box::new(file))
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn remove_dir_all_impl(&self, path: &Path) -> Result<bool> {
        match fs::remove_dir_all(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to remove directory {:?}", path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::runtime::{RealRuntime, Runtime};
    use std::io::{Read, Write};
    use tempfile::tempdir;

    #[test]
    fn test_real_runtime_file_ops() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("config.json");

        runtime.write(&file_path, b"{}").unwrap();
        assert!(runtime.exists(&file_path));
        assert_eq!(runtime.read_to_string(&file_path).unwrap(), "{}");

        let new_path = dir.path().join("moved.json");
        runtime.rename(&file_path, &new_path).unwrap();
        assert!(!runtime.exists(&file_path));
        assert!(runtime.exists(&new_path));
    }

    #[test]
    fn test_real_runtime_dir_ops() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let nested = dir.path().join("ides/fttb/PCP-2024.1");

        runtime.create_dir_all(&nested).unwrap();
        // Creating again is not an error
        runtime.create_dir_all(&nested).unwrap();
        assert!(runtime.is_dir(&nested));

        assert!(!runtime.is_dir(&dir.path().join("ides/fttb/PCP-2023.3")));

        assert!(runtime.remove_dir_all(&dir.path().join("ides")).unwrap());
        assert!(!runtime.exists(&nested));
    }

    #[test]
    fn test_real_runtime_remove_dir_all_absent() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();

        let removed = runtime.remove_dir_all(&dir.path().join("missing")).unwrap();
        assert!(!removed);
    }

    #[test]
    fn test_real_runtime_create_file_and_open() {
        let runtime = RealRuntime;
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("archive.tar.gz");

        {
            let mut writer = runtime.create_file(&file_path).unwrap();
            writer.write_all(b"streamed content").unwrap();
        }

        let mut reader = runtime.open(&file_path).unwrap();
        let mut content = String::new();
        reader.read_to_string(&mut content).unwrap();
        assert_eq!(content, "streamed content");
    }

    #[test]
    fn test_real_runtime_errors() {
        let runtime = RealRuntime;

        let result = runtime.read_to_string(std::path::Path::new("/nonexistent/path/file.txt"));
        assert!(result.is_err());

        let result = runtime.rename(
            std::path::Path::new("/nonexistent/a"),
            std::path::Path::new("/nonexistent/b"),
        );
        assert!(result.is_err());
    }
}

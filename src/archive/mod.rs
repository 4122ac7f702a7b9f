mod tar_gz;

use crate::runtime::Runtime;
use anyhow::Result;
use std::path::Path;

pub use tar_gz::TarGzExtractor;

/// Unpacks a downloaded archive.
#[cfg_attr(test, mockall::automock)]
pub trait Extractor: Send + Sync {
    /// Check if this extractor can handle the given archive name
    fn can_handle(&self, archive_path: &Path) -> bool;

    /// Extract every member under `extract_to` and return the name of the
    /// archive's top-level directory, taken from its first member.
    fn extract<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<String>;
}

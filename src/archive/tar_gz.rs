use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use log::{debug, warn};
use std::path::{Component, Path};
use tar::Archive;

use super::Extractor;
use crate::{error::FttbError, runtime::Runtime};

/// Extractor for `.tar.gz` / `.tgz` archives.
pub struct TarGzExtractor;

impl Extractor for TarGzExtractor {
    fn can_handle(&self, archive_path: &Path) -> bool {
        let name = archive_path.to_string_lossy().to_lowercase();
        name.ends_with(".tar.gz") || name.ends_with(".tgz")
    }

    #[tracing::instrument(skip(self, runtime))]
    fn extract<R: Runtime + 'static>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
    ) -> Result<String> {
        debug!("Extracting {:?} to {:?}...", archive_path, extract_to);
        let file = runtime
            .open(archive_path)
            .with_context(|| format!("Failed to open archive at {:?}", archive_path))?;
        let mut archive = Archive::new(GzDecoder::new(file));
        archive.set_preserve_permissions(true);

        let mut root: Option<String> = None;
        for entry in archive
            .entries()
            .with_context(|| format!("Failed to read archive {:?}", archive_path))?
        {
            let mut entry = entry.context("Failed to read archive entry")?;
            let entry_path = entry.path().context("Invalid entry path")?.into_owned();

            if root.is_none() {
                root = top_level_name(&entry_path);
                debug!("Archive top-level directory: {:?}", root);
            }

            let unpacked = entry
                .unpack_in(extract_to)
                .with_context(|| format!("Failed to unpack {:?}", entry_path))?;
            if !unpacked {
                warn!("Skipped entry outside of extraction root: {:?}", entry_path);
            }
        }

        root.ok_or_else(|| {
            FttbError::EmptyArchive {
                path: archive_path.to_path_buf(),
            }
            .into()
        })
    }
}

/// First normal component of `path`; `./idea-IU-241/bin` gives `idea-IU-241`.
fn top_level_name(path: &Path) -> Option<String> {
    path.components().find_map(|c| match c {
        Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
        _ => None,
    })
}

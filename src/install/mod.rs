//! Install and uninstall of versioned IDE directories.
//!
//! `{install_root}/{code}-{version}` existing is what "installed" means.
//! Archives are unpacked into a staging directory next to it and moved into
//! place only once extraction has finished.

use anyhow::{Context, Result, bail};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use crate::{
    archive::Extractor,
    catalog::{Catalog, Download},
    cleanup::{self, SharedCleanupContext},
    config::{AliasConfig, Layout},
    download::download_file,
    error::FttbError,
    http::HttpClient,
    platform,
    resolver::{ALL, LATEST, Resolver, check_path_token, find_release, select_version},
    runtime::{Runtime, is_path_under},
};

pub struct Installer<'a, R: Runtime, C: Catalog, E: Extractor> {
    runtime: &'a R,
    catalog: &'a C,
    http_client: &'a HttpClient,
    extractor: &'a E,
    layout: &'a Layout,
    config: &'a AliasConfig,
    platform: &'a str,
    cleanup_ctx: SharedCleanupContext,
}

impl<'a, R: Runtime + 'static, C: Catalog, E: Extractor> Installer<'a, R, C, E> {
    pub fn new(
        runtime: &'a R,
        catalog: &'a C,
        http_client: &'a HttpClient,
        extractor: &'a E,
        layout: &'a Layout,
        config: &'a AliasConfig,
    ) -> Self {
        Self {
            runtime,
            catalog,
            http_client,
            extractor,
            layout,
            config,
            platform: platform::download_key(),
            cleanup_ctx: cleanup::new_shared(),
        }
    }

    /// Registers partial downloads and staging directories in `ctx`, which
    /// the process-wide interrupt handler empties on Ctrl-C.
    pub fn with_cleanup(mut self, ctx: SharedCleanupContext) -> Self {
        self.cleanup_ctx = ctx;
        self
    }

    /// Overrides the catalog download key (defaults to this machine's).
    pub fn with_platform(mut self, platform: &'a str) -> Self {
        self.platform = platform;
        self
    }

    /// Installs `target` at `version` unless that directory already exists,
    /// and returns the concrete version.
    #[tracing::instrument(skip(self))]
    pub async fn download(&self, target: &str, version: &str) -> Result<String> {
        if target == ALL {
            return Err(FttbError::InvalidTarget.into());
        }
        check_path_token(target)?;
        let code = Resolver::new(self.config, self.catalog).canonical_code(target);
        check_path_token(&code)?;

        // Explicit versions can be checked before touching the network
        if version != LATEST {
            check_path_token(version)?;
        }
        if version != LATEST && self.runtime.exists(&self.layout.install_dir(&code, version)) {
            println!("   {} {} is already installed", code, version);
            return Ok(version.to_string());
        }

        let releases = self.catalog.get_product_releases(&code).await?;
        let version = select_version(&code, &releases, version)?;
        check_path_token(&version)?;
        let target_dir = self.layout.install_dir(&code, &version);

        if self.runtime.exists(&target_dir) {
            println!("   {} {} is already installed", code, version);
            return Ok(version);
        }

        let release = find_release(&code, &releases, &version)?;
        let download = release.download_for(self.platform).ok_or_else(|| {
            FttbError::NoDownloadForPlatform {
                code: code.clone(),
                version: version.clone(),
                platform: self.platform.to_string(),
            }
        })?;
        let archive_path = self.layout.cache_dir.join(download.file_name());
        if !self.extractor.can_handle(&archive_path) {
            bail!("Unsupported archive format: {}", download.link);
        }

        let result = self
            .fetch_and_unpack(&code, &version, download, &archive_path, &target_dir)
            .await;
        // Only the download itself is undone on interrupt
        cleanup::with_context(&self.cleanup_ctx, |ctx| ctx.clear());
        result?;

        println!("   installed {} {} -> {}", code, version, target_dir.display());
        Ok(version)
    }

    async fn fetch_and_unpack(
        &self,
        code: &str,
        version: &str,
        download: &Download,
        archive_path: &Path,
        target_dir: &Path,
    ) -> Result<()> {
        let cleanup_ctx = &self.cleanup_ctx;
        self.runtime.create_dir_all(&self.layout.cache_dir)?;
        self.runtime.create_dir_all(&self.layout.install_root)?;

        println!(" downloading {} {} -> {}", code, version, download.link);
        cleanup::with_context(cleanup_ctx, |ctx| ctx.add(archive_path.to_path_buf()));
        download_file(self.runtime, &download.link, archive_path, self.http_client).await?;
        cleanup::with_context(cleanup_ctx, |ctx| ctx.remove(archive_path));

        let staging = self.layout.staging_dir(code, version);
        if self.runtime.remove_dir_all(&staging)? {
            debug!("Removed stale staging directory {:?}", staging);
        }
        self.runtime.create_dir_all(&staging)?;
        cleanup::with_context(cleanup_ctx, |ctx| ctx.add(staging.clone()));

        println!("  installing {} {}", code, version);
        let placed = self.place_extracted(archive_path, &staging, target_dir);
        if let Err(e) = self.runtime.remove_dir_all(&staging) {
            warn!("Failed to remove staging directory {:?}: {}", staging, e);
        }
        cleanup::with_context(cleanup_ctx, |ctx| ctx.remove(&staging));
        placed
    }

    /// Extracts into `staging` and renames the archive's top-level directory
    /// to `target_dir`, replacing any directory already there.
    fn place_extracted(&self, archive_path: &Path, staging: &Path, target_dir: &Path) -> Result<()> {
        let root = self.extractor.extract(self.runtime, archive_path, staging)?;
        let extracted = staging.join(&root);
        if !self.runtime.is_dir(&extracted) {
            bail!(
                "Archive {:?} does not start with a directory (first entry: {})",
                archive_path,
                root
            );
        }

        if self.runtime.remove_dir_all(target_dir)? {
            info!("Replaced existing {:?}", target_dir);
        }
        self.runtime
            .rename(&extracted, target_dir)
            .with_context(|| format!("Failed to move {} into place", root))
    }

    /// Deletes the install directory for `target` at `version`; a version that
    /// is not installed is a no-op. The `bin/{target}` shim is removed too when
    /// it points into the deleted directory.
    #[tracing::instrument(skip(self))]
    pub async fn remove(&self, target: &str, version: &str) -> Result<()> {
        if target == ALL {
            return Err(FttbError::InvalidTarget.into());
        }
        check_path_token(target)?;
        let resolver = Resolver::new(self.config, self.catalog);
        let code = resolver.canonical_code(target);
        check_path_token(&code)?;
        let version = resolver.resolve_version(&code, version).await?;
        check_path_token(&version)?;
        let install_dir = self.layout.install_dir(&code, &version);

        if self.runtime.remove_dir_all(&install_dir)? {
            println!("   removed {} {}", code, version);
        } else {
            debug!("{:?} is not installed", install_dir);
        }

        self.remove_shim_into(&self.layout.shim_path(target), &install_dir);
        Ok(())
    }

    fn remove_shim_into(&self, shim: &Path, install_dir: &Path) {
        if !self.runtime.is_symlink(shim) {
            debug!("No shim at {:?}", shim);
            return;
        }
        let target: PathBuf = match self.runtime.resolve_link(shim) {
            Ok(target) => target,
            Err(e) => {
                warn!("Cannot read shim {:?}: {}", shim, e);
                return;
            }
        };
        if !is_path_under(&target, install_dir) {
            debug!("Shim {:?} points to {:?}, keeping it", shim, target);
            return;
        }
        match self.runtime.remove_link(shim) {
            Ok(_) => println!("   removed shim {}", shim.display()),
            Err(e) => warn!("Failed to remove shim {:?}: {}", shim, e),
        }
    }
}

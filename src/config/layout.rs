use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::runtime::Runtime;

pub const TOOL_NAME: &str = "fttb";

/// On-disk layout, every path rooted at a single home directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub config_dir: PathBuf,
    pub bin_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub install_root: PathBuf,
    pub applications_dir: PathBuf,
}

impl Layout {
    pub fn new(home: PathBuf) -> Self {
        Self {
            config_dir: home.join(".config").join(TOOL_NAME),
            bin_dir: home.join("bin"),
            cache_dir: home.join(".cache").join(TOOL_NAME),
            install_root: home.join("goinfre").join("ides").join(TOOL_NAME),
            applications_dir: home.join(".local").join("share").join("applications"),
        }
    }

    /// Builds the layout from CLI/env overrides, falling back to the
    /// user's home directory.
    #[tracing::instrument(skip(runtime))]
    pub fn resolve<R: Runtime>(
        runtime: &R,
        home: Option<PathBuf>,
        install_root: Option<PathBuf>,
    ) -> Result<Self> {
        let home = match home {
            Some(path) => path,
            None => runtime.home_dir().context("Could not find home directory")?,
        };
        let mut layout = Self::new(home);
        if let Some(root) = install_root {
            layout.install_root = root;
        }
        Ok(layout)
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }

    /// The four directories `config` creates.
    pub fn required_dirs(&self) -> [&Path; 4] {
        [
            &self.config_dir,
            &self.bin_dir,
            &self.cache_dir,
            &self.install_root,
        ]
    }

    /// `{install_root}/{code}-{version}`
    pub fn install_dir(&self, code: &str, version: &str) -> PathBuf {
        self.install_root.join(format!("{}-{}", code, version))
    }

    /// Extraction area that becomes `install_dir` only once complete.
    pub fn staging_dir(&self, code: &str, version: &str) -> PathBuf {
        self.install_root.join(format!(".{}-{}.partial", code, version))
    }

    pub fn shim_path(&self, alias: &str) -> PathBuf {
        self.bin_dir.join(alias)
    }

    pub fn desktop_entry_path(&self, alias: &str) -> PathBuf {
        self.applications_dir.join(format!("{}.desktop", alias))
    }

    /// `{install_dir}/bin/{alias}.sh`
    pub fn launcher_script(&self, code: &str, version: &str, alias: &str) -> PathBuf {
        self.install_dir(code, version)
            .join("bin")
            .join(format!("{}.sh", alias))
    }

    /// `{install_dir}/bin/{alias}.svg`
    pub fn launcher_icon(&self, code: &str, version: &str, alias: &str) -> PathBuf {
        self.install_dir(code, version)
            .join("bin")
            .join(format!("{}.svg", alias))
    }
}

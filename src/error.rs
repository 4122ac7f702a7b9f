//! Failure kinds surfaced to the command line.
//!
//! Library code returns `anyhow::Result`; these travel inside it and are
//! recovered with `downcast_ref` where the kind matters.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FttbError {
    #[error("run with config firstly (no alias table at {})", path.display())]
    ConfigMissing { path: PathBuf },

    #[error("request failed: {url} returned HTTP {status}")]
    RemoteRequestFailed { url: String, status: u16 },

    #[error("invalid IDE code")]
    InvalidTarget,

    #[error("{token:?} is not a valid IDE or version name")]
    InvalidPathToken { token: String },

    #[error("version {version} not found for {code}")]
    VersionNotFound { code: String, version: String },

    #[error("no releases published for {code}")]
    NoReleases { code: String },

    #[error("no product found for {code}")]
    ProductNotFound { code: String },

    #[error("{code} {version} has no {platform} download")]
    NoDownloadForPlatform {
        code: String,
        version: String,
        platform: String,
    },

    #[error("archive {} contains no entries", path.display())]
    EmptyArchive { path: PathBuf },
}

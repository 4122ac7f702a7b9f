//! Alias and version-token resolution.

use anyhow::Result;
use log::debug;

use crate::{
    catalog::{Catalog, Release, ReleaseType},
    config::AliasConfig,
    error::FttbError,
};

/// Version token meaning "newest stable release".
pub const LATEST: &str = "latest";

/// Target token meaning "no specific product".
pub const ALL: &str = "all";

pub struct Resolver<'a, C: Catalog> {
    config: &'a AliasConfig,
    catalog: &'a C,
}

impl<'a, C: Catalog> Resolver<'a, C> {
    pub fn new(config: &'a AliasConfig, catalog: &'a C) -> Self {
        Self { config, catalog }
    }

    pub fn canonical_code(&self, input: &str) -> String {
        self.config.resolve_alias_or_code(input).to_string()
    }

    /// Turns `latest` into a concrete version using the product's release
    /// list. Any other token is returned as-is without a catalog call.
    #[tracing::instrument(skip(self))]
    pub async fn resolve_version(&self, code: &str, requested: &str) -> Result<String> {
        if requested != LATEST {
            return Ok(requested.to_string());
        }
        let releases = self.catalog.get_product_releases(code).await?;
        select_version(code, &releases, requested)
    }
}

/// Picks the version `requested` names from `releases`.
///
/// `releases` must be in catalog order (newest first). For `latest` the first
/// entry typed `release` wins; if none is, the first entry of any type. An
/// explicit version is returned unchanged; checking that it exists is up to
/// the caller.
pub fn select_version(code: &str, releases: &[Release], requested: &str) -> Result<String> {
    if requested != LATEST {
        return Ok(requested.to_string());
    }

    let chosen = releases
        .iter()
        .find(|r| r.release_type == ReleaseType::Release)
        .or_else(|| releases.first())
        .ok_or_else(|| FttbError::NoReleases {
            code: code.to_string(),
        })?;
    debug!("Resolved {} {} to {}", code, requested, chosen.version);
    Ok(chosen.version.clone())
}

/// Aliases, codes and versions become file names; reject anything that
/// would not stay a single path component.
pub fn check_path_token(token: &str) -> Result<(), FttbError> {
    let single_component =
        !token.is_empty() && token != "." && token != ".." && !token.contains(['/', '\\', '\0']);
    if single_component {
        Ok(())
    } else {
        Err(FttbError::InvalidPathToken {
            token: token.to_string(),
        })
    }
}

/// The release carrying exactly `version`.
pub fn find_release<'r>(code: &str, releases: &'r [Release], version: &str) -> Result<&'r Release> {
    releases
        .iter()
        .find(|r| r.version == version)
        .ok_or_else(|| {
            FttbError::VersionNotFound {
                code: code.to_string(),
                version: version.to_string(),
            }
            .into()
        })
}

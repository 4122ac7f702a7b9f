//! Alias table and on-disk layout.
//!
//! The alias table is loaded once per invocation and handed to whatever
//! needs it; nothing mutates it after load.

mod layout;

use anyhow::{Context, Result};
use log::{debug, info};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::{error::FttbError, http::HttpClient, runtime::Runtime};

pub use layout::{Layout, TOOL_NAME};

/// Location of the canonical alias table fetched by `config`.
pub const DEFAULT_CONFIG_URL: &str = "https://gist.githubusercontent.com/BenoitRoux0/16b18e10cfd53dcf31a28cb1b38e4303/raw/85e83c6f716fb1ccba39cb88520d0c03f54d9f3e/config.json";

/// `{"aliases": {"pycharm": "PCP", ...}}`
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AliasConfig {
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

impl AliasConfig {
    /// Maps an alias to its product code.
    ///
    /// A token that is already a configured code, or that is not a known
    /// alias, is returned unchanged so the catalog can report it.
    pub fn resolve_alias_or_code<'a>(&'a self, token: &'a str) -> &'a str {
        if self.aliases.values().any(|code| code == token) {
            return token;
        }
        self.aliases
            .get(token)
            .map(String::as_str)
            .unwrap_or(token)
    }

    /// Distinct configured product codes, sorted.
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.aliases.values().map(String::as_str).collect();
        codes.sort_unstable();
        codes.dedup();
        codes
    }
}

/// Either the loaded alias table or the place it was expected.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigState {
    Loaded(AliasConfig),
    Missing { path: PathBuf },
}

impl ConfigState {
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, path: &Path) -> Result<Self> {
        if !runtime.exists(path) {
            debug!("No alias table at {:?}", path);
            return Ok(Self::Missing {
                path: path.to_path_buf(),
            });
        }

        let content = runtime.read_to_string(path)?;
        let config: AliasConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse alias table {:?}", path))?;
        debug!("Loaded {} alias(es) from {:?}", config.aliases.len(), path);
        Ok(Self::Loaded(config))
    }

    /// The alias table, or `ConfigMissing` if `config` was never run.
    pub fn require(&self) -> Result<&AliasConfig, FttbError> {
        match self {
            Self::Loaded(config) => Ok(config),
            Self::Missing { path } => Err(FttbError::ConfigMissing { path: path.clone() }),
        }
    }
}

/// Creates the directory layout and replaces the alias table with a fresh
/// copy from `config_url`.
#[tracing::instrument(skip(runtime, layout, http_client))]
pub async fn bootstrap<R: Runtime>(
    runtime: &R,
    layout: &Layout,
    http_client: &HttpClient,
    config_url: &str,
) -> Result<()> {
    for dir in layout.required_dirs() {
        debug!("Ensuring directory {:?}", dir);
        runtime.create_dir_all(dir)?;
    }

    let config_path = layout.config_file();
    info!("Fetching alias table from {} into {:?}", config_url, config_path);
    http_client
        .download_file(config_url, || {
            runtime
                .create_file(&config_path)
                .with_context(|| format!("Failed to create {:?}", config_path))
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;
    use reqwest::Client;

    fn sample() -> AliasConfig {
        AliasConfig {
            aliases: BTreeMap::from([
                ("pycharm".to_string(), "PCP".to_string()),
                ("pycharm-ce".to_string(), "PCC".to_string()),
                ("idea".to_string(), "IIU".to_string()),
                ("intellij".to_string(), "IIU".to_string()),
            ]),
        }
    }

    #[test]
    fn test_resolve_known_alias() {
        let config = sample();
        assert_eq!(config.resolve_alias_or_code("pycharm"), "PCP");
        assert_eq!(config.resolve_alias_or_code("idea"), "IIU");
    }

    #[test]
    fn test_resolve_code_passes_through() {
        let config = sample();
        assert_eq!(config.resolve_alias_or_code("PCC"), "PCC");
    }

    #[test]
    fn test_resolve_unknown_passes_through() {
        let config = sample();
        for token in ["RD", "not-an-ide", ""] {
            assert_eq!(config.resolve_alias_or_code(token), token);
        }
    }

    #[test]
    fn test_codes_are_distinct() {
        assert_eq!(sample().codes(), vec!["IIU", "PCC", "PCP"]);
    }

    #[test]
    fn test_parse_alias_file() {
        let config: AliasConfig =
            serde_json::from_str(r#"{"aliases": {"goland": "GO", "clion": "CL"}}"#).unwrap();
        assert_eq!(config.resolve_alias_or_code("goland"), "GO");
        assert_eq!(config.codes(), vec!["CL", "GO"]);
    }

    #[test]
    fn test_load_missing() {
        let path = PathBuf::from("/home/user/.config/fttb/config.json");
        let mut runtime = MockRuntime::new();
        runtime
            .expect_exists()
            .with(eq(path.clone()))
            .returning(|_| false);

        let state = ConfigState::load(&runtime, &path).unwrap();
        assert_eq!(state, ConfigState::Missing { path: path.clone() });
        assert_eq!(
            state.require().unwrap_err(),
            FttbError::ConfigMissing { path }
        );
    }

    #[test]
    fn test_load_present() {
        let path = PathBuf::from("/home/user/.config/fttb/config.json");
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_read_to_string()
            .with(eq(path.clone()))
            .returning(|_| Ok(r#"{"aliases": {"pycharm": "PCP"}}"#.to_string()));

        let state = ConfigState::load(&runtime, &path).unwrap();
        let config = state.require().unwrap();
        assert_eq!(config.resolve_alias_or_code("pycharm"), "PCP");
    }

    #[test]
    fn test_load_malformed() {
        let path = PathBuf::from("/home/user/.config/fttb/config.json");
        let mut runtime = MockRuntime::new();
        runtime.expect_exists().returning(|_| true);
        runtime
            .expect_read_to_string()
            .returning(|_| Ok("not json".to_string()));

        assert!(ConfigState::load(&runtime, &path).is_err());
    }

    #[tokio::test]
    async fn test_bootstrap_real_fs_is_idempotent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/config.json")
            .with_status(200)
            .with_body(r#"{"aliases": {"pycharm": "PCP"}}"#)
            .expect(2)
            .create_async()
            .await;

        let home = tempfile::tempdir().unwrap();
        let layout = Layout::new(home.path().to_path_buf());
        let runtime = crate::runtime::RealRuntime;
        let http_client = HttpClient::new(Client::new());
        let url = format!("{}/config.json", server.url());

        // Stale table is overwritten
        std::fs::create_dir_all(&layout.config_dir).unwrap();
        std::fs::write(layout.config_file(), r#"{"aliases": {"old": "OLD"}}"#).unwrap();

        bootstrap(&runtime, &layout, &http_client, &url).await.unwrap();
        bootstrap(&runtime, &layout, &http_client, &url).await.unwrap();

        mock.assert_async().await;
        for dir in layout.required_dirs() {
            assert!(dir.is_dir(), "{:?} should exist", dir);
        }
        let state = ConfigState::load(&runtime, &layout.config_file()).unwrap();
        assert_eq!(
            state.require().unwrap().aliases,
            BTreeMap::from([("pycharm".to_string(), "PCP".to_string())])
        );
    }

    #[tokio::test]
    async fn test_bootstrap_remote_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/config.json")
            .with_status(404)
            .create_async()
            .await;

        let layout = Layout::new(PathBuf::from("/home/user"));
        let mut runtime = MockRuntime::new();
        runtime.expect_create_dir_all().times(4).returning(|_| Ok(()));
        // create_file is never expected: nothing is written on failure

        let http_client = HttpClient::new(Client::new());
        let err = bootstrap(
            &runtime,
            &layout,
            &http_client,
            &format!("{}/config.json", server.url()),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<FttbError>(),
            Some(FttbError::RemoteRequestFailed { status: 404, .. })
        ));
    }
}

use anyhow::Result;
use log::debug;
use reqwest::Client;
use std::path::PathBuf;

use crate::{
    archive::{Extractor, TarGzExtractor},
    catalog::{Catalog, JetBrainsCatalog},
    cleanup::{self, SharedCleanupContext},
    config::{DEFAULT_CONFIG_URL, Layout},
    http::HttpClient,
    launcher::DEFAULT_TEMPLATE_URL,
    runtime::Runtime,
};

pub const USER_AGENT: &str = "fttb-cli";

/// Overrides collected from the command line and environment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    pub home: Option<PathBuf>,
    pub install_root: Option<PathBuf>,
    pub api_url: Option<String>,
    pub config_url: Option<String>,
    pub template_url: Option<String>,
}

/// Everything an action needs, assembled once per invocation.
pub struct Config<R: Runtime, C: Catalog, E: Extractor> {
    pub runtime: R,
    pub catalog: C,
    pub http_client: HttpClient,
    pub extractor: E,
    pub layout: Layout,
    pub config_url: String,
    pub template_url: String,
    /// Partial downloads to remove if the process is interrupted.
    pub cleanup: SharedCleanupContext,
}

impl<R: Runtime> Config<R, JetBrainsCatalog, TarGzExtractor> {
    pub fn new(runtime: R, options: Options) -> Result<Self> {
        let layout = Layout::resolve(&runtime, options.home, options.install_root)?;
        debug!("Using layout {:?}", layout);

        let client = Client::builder().user_agent(USER_AGENT).build()?;
        let http_client = HttpClient::new(client).with_progress(true);
        let catalog = JetBrainsCatalog::new(http_client.clone(), options.api_url);

        Ok(Self {
            runtime,
            catalog,
            http_client,
            extractor: TarGzExtractor,
            layout,
            config_url: options
                .config_url
                .unwrap_or_else(|| DEFAULT_CONFIG_URL.to_string()),
            template_url: options
                .template_url
                .unwrap_or_else(|| DEFAULT_TEMPLATE_URL.to_string()),
            cleanup: cleanup::new_shared(),
        })
    }
}

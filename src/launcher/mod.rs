//! Desktop entry and `bin/` shim for an installed version.

use anyhow::Result;
use log::{debug, info};
use std::path::PathBuf;

use crate::{
    catalog::Catalog,
    config::{AliasConfig, Layout},
    error::FttbError,
    http::HttpClient,
    resolver::{Resolver, check_path_token},
    runtime::Runtime,
};

/// Desktop-entry template with `{name}`, `{desc}`, `{exec}` and `{icon}`
/// placeholders.
pub const DEFAULT_TEMPLATE_URL: &str = "https://gist.githubusercontent.com/BenoitRoux0/ece685d71749e9d52a1c03b09a5b6e74/raw/dd5bd0f2a2f24c157a26aa7c97121f883dd6eeef/template.desktop";

/// Values substituted into the template.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryFields {
    pub name: String,
    pub description: String,
    pub exec: String,
    pub icon: String,
}

/// Literal placeholder substitution; unknown placeholders are left as-is.
pub fn render_entry(template: &str, fields: &EntryFields) -> String {
    template
        .replace("{name}", &fields.name)
        .replace("{desc}", &fields.description)
        .replace("{exec}", &fields.exec)
        .replace("{icon}", &fields.icon)
}

/// What `publish` wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedLauncher {
    pub version: String,
    pub entry_path: PathBuf,
    pub shim_path: PathBuf,
    pub shim_target: PathBuf,
}

pub struct Publisher<'a, R: Runtime, C: Catalog> {
    runtime: &'a R,
    catalog: &'a C,
    http_client: &'a HttpClient,
    layout: &'a Layout,
    config: &'a AliasConfig,
    template_url: &'a str,
}

impl<'a, R: Runtime, C: Catalog> Publisher<'a, R, C> {
    pub fn new(
        runtime: &'a R,
        catalog: &'a C,
        http_client: &'a HttpClient,
        layout: &'a Layout,
        config: &'a AliasConfig,
        template_url: &'a str,
    ) -> Self {
        Self {
            runtime,
            catalog,
            http_client,
            layout,
            config,
            template_url,
        }
    }

    /// Points `{alias}.desktop` and `bin/{alias}` at `{code}-{version}`.
    ///
    /// Earlier launchers for the alias are overwritten. Nothing checks that
    /// the referenced script or icon exist, and nothing is rolled back if a
    /// later step fails.
    #[tracing::instrument(skip(self))]
    pub async fn publish(&self, alias: &str, version: &str) -> Result<PublishedLauncher> {
        check_path_token(alias)?;
        let resolver = Resolver::new(self.config, self.catalog);
        let code = resolver.canonical_code(alias);
        check_path_token(&code)?;
        let version = resolver.resolve_version(&code, version).await?;
        check_path_token(&version)?;

        let product = self
            .catalog
            .get_product(&code)
            .await?
            .ok_or_else(|| FttbError::ProductNotFound { code: code.clone() })?;
        let template = self.http_client.get_text(self.template_url).await?;

        let shim_target = self.layout.launcher_script(&code, &version, alias);
        let fields = EntryFields {
            description: product.description().to_string(),
            name: product.name,
            exec: format!("{} %U", shim_target.display()),
            icon: self
                .layout
                .launcher_icon(&code, &version, alias)
                .display()
                .to_string(),
        };

        let entry_path = self.layout.desktop_entry_path(alias);
        self.runtime.create_dir_all(&self.layout.applications_dir)?;
        self.runtime
            .write(&entry_path, render_entry(&template, &fields).as_bytes())?;
        info!("Wrote launcher entry {:?}", entry_path);

        let shim_path = self.layout.shim_path(alias);
        self.runtime.create_dir_all(&self.layout.bin_dir)?;
        if self.runtime.remove_link(&shim_path)? {
            debug!("Replaced previous shim {:?}", shim_path);
        }
        self.runtime.symlink(&shim_target, &shim_path)?;
        println!(
            "   linked {} -> {}",
            shim_path.display(),
            shim_target.display()
        );

        Ok(PublishedLauncher {
            version,
            entry_path,
            shim_path,
            shim_target,
        })
    }
}

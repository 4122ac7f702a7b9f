//! One entry point per CLI action.
//!
//! Every action except `config` receives the alias table already loaded;
//! `main` is responsible for refusing to run without one.

use anyhow::Result;
use log::{debug, info};

use crate::{
    archive::Extractor,
    catalog::{Catalog, ProductSummary, Release, ide_products},
    config::{self as alias_config, AliasConfig},
    install::Installer,
    launcher::Publisher,
    resolver::{ALL, Resolver},
    runtime::Runtime,
};

pub mod config;

pub use config::{Config, Options};

/// `list all` prints the configured IDEs; `list <target>` prints every
/// release of one product, oldest first.
#[tracing::instrument(skip(config, aliases))]
pub async fn list<R: Runtime, C: Catalog, E: Extractor>(
    config: &Config<R, C, E>,
    aliases: &AliasConfig,
    target: &str,
) -> Result<()> {
    if target == ALL {
        let codes = aliases.codes().into_iter().map(str::to_string).collect();
        let products = ide_products(config.catalog.list_products(Some(codes)).await?);
        for product in &products {
            println!("{}", render_summary(product));
        }
        return Ok(());
    }

    let code = Resolver::new(aliases, &config.catalog).canonical_code(target);
    let releases = config.catalog.list_releases(&code).await?;
    debug!("{} has {} release(s)", code, releases.len());
    for release in releases.iter().rev() {
        println!("{}", render_version(release));
        println!();
    }
    Ok(())
}

#[tracing::instrument(skip(config))]
pub async fn search<R: Runtime, C: Catalog, E: Extractor>(
    config: &Config<R, C, E>,
    query: &str,
) -> Result<()> {
    let products = ide_products(config.catalog.list_products(None).await?);
    println!("search for {}", query);
    for product in products.iter().filter(|p| p.matches(query)) {
        println!("{}", render_details(product));
    }
    Ok(())
}

#[tracing::instrument(skip(config, aliases))]
pub async fn infos<R: Runtime, C: Catalog, E: Extractor>(
    config: &Config<R, C, E>,
    aliases: &AliasConfig,
    target: &str,
) -> Result<()> {
    let code = Resolver::new(aliases, &config.catalog).canonical_code(target);
    match config.catalog.get_product(&code).await? {
        Some(product) => println!("{}", render_details(&product)),
        None => debug!("Catalog has no product {}", code),
    }
    Ok(())
}

/// Installs `target` and returns the concrete version.
#[tracing::instrument(skip(config, aliases))]
pub async fn download<R: Runtime + 'static, C: Catalog, E: Extractor>(
    config: &Config<R, C, E>,
    aliases: &AliasConfig,
    target: &str,
    version: &str,
) -> Result<String> {
    let installer = installer(config, aliases);
    let version = installer.download(target, version).await?;
    println!("{}", version);
    Ok(version)
}

/// Installs `target` if needed and points its launcher and shim at it.
#[tracing::instrument(skip(config, aliases))]
pub async fn use_version<R: Runtime + 'static, C: Catalog, E: Extractor>(
    config: &Config<R, C, E>,
    aliases: &AliasConfig,
    target: &str,
    version: &str,
) -> Result<()> {
    let version = installer(config, aliases).download(target, version).await?;
    // Publish the version just installed so `latest` is not resolved twice
    let published = Publisher::new(
        &config.runtime,
        &config.catalog,
        &config.http_client,
        &config.layout,
        aliases,
        &config.template_url,
    )
    .publish(target, &version)
    .await?;
    info!("Published {:?}", published);
    Ok(())
}

/// Creates the directory layout and fetches a fresh alias table.
#[tracing::instrument(skip(config))]
pub async fn setup<R: Runtime, C: Catalog, E: Extractor>(config: &Config<R, C, E>) -> Result<()> {
    alias_config::bootstrap(
        &config.runtime,
        &config.layout,
        &config.http_client,
        &config.config_url,
    )
    .await
}

/// Empties the download cache.
#[tracing::instrument(skip(config))]
pub fn clear<R: Runtime, C: Catalog, E: Extractor>(config: &Config<R, C, E>) -> Result<()> {
    let cache = &config.layout.cache_dir;
    if config.runtime.remove_dir_all(cache)? {
        info!("Removed {:?}", cache);
    }
    config.runtime.create_dir_all(cache)
}

#[tracing::instrument(skip(config, aliases))]
pub async fn remove<R: Runtime + 'static, C: Catalog, E: Extractor>(
    config: &Config<R, C, E>,
    aliases: &AliasConfig,
    target: &str,
    version: &str,
) -> Result<()> {
    installer(config, aliases).remove(target, version).await
}

fn installer<'a, R: Runtime + 'static, C: Catalog, E: Extractor>(
    config: &'a Config<R, C, E>,
    aliases: &'a AliasConfig,
) -> Installer<'a, R, C, E> {
    Installer::new(
        &config.runtime,
        &config.catalog,
        &config.http_client,
        &config.extractor,
        &config.layout,
        aliases,
    )
    .with_cleanup(config.cleanup.clone())
}

/// `name`, blank line, `description`, blank line.
pub fn render_summary(product: &ProductSummary) -> String {
    format!("{}\n\n{}\n", product.name, product.description())
}

pub fn render_details(product: &ProductSummary) -> String {
    format!(
        "{}\ncode: {}\n{}\n",
        product.name,
        product.code(),
        product.description()
    )
}

/// The version, wrapped in an OSC 8 hyperlink to its release notes if any.
pub fn render_version(release: &Release) -> String {
    match release.notes_link.as_deref() {
        Some(link) => format!("\x1b]8;;{}\x1b\\{}\x1b]8;;\x1b\\", link, release.version),
        None => release.version.clone(),
    }
}

//! Typed access to the vendor release catalog.

mod types;

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;

use crate::{error::FttbError, http::HttpClient};

pub use types::{Download, IDE_CATEGORY, ProductSummary, Release, ReleaseType, ide_products};
use types::ProductReleases;

pub const DEFAULT_API_URL: &str = "https://data.services.jetbrains.com";

const SUMMARY_FIELDS: &str = "name,intellijProductCode,description,categories";

/// Read operations against the release catalog.
///
/// Release lists are returned in catalog order, newest first. Latest-version
/// resolution depends on that order; callers that display oldest-first must
/// reverse a copy.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Product summaries, optionally restricted to `codes` server-side.
    /// Entries are returned unfiltered; see [`ide_products`].
    async fn list_products(&self, codes: Option<Vec<String>>) -> Result<Vec<ProductSummary>>;

    /// Releases of `code` from the per-code release listing.
    async fn list_releases(&self, code: &str) -> Result<Vec<Release>>;

    /// Releases embedded in the single-product record for `code`.
    /// Fails with `ProductNotFound` when the catalog knows no such code.
    async fn get_product_releases(&self, code: &str) -> Result<Vec<Release>>;

    async fn get_product(&self, code: &str) -> Result<Option<ProductSummary>>;
}

pub struct JetBrainsCatalog {
    http_client: HttpClient,
    api_url: String,
}

impl JetBrainsCatalog {
    #[tracing::instrument(skip(http_client, api_url))]
    pub fn new(http_client: HttpClient, api_url: Option<String>) -> Self {
        let api_url = api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    fn products_url(&self) -> String {
        format!("{}/products", self.api_url)
    }
}

#[async_trait]
impl Catalog for JetBrainsCatalog {
    #[tracing::instrument(skip(self))]
    async fn list_products(&self, codes: Option<Vec<String>>) -> Result<Vec<ProductSummary>> {
        let joined = codes.map(|codes| codes.join(","));
        let mut query = vec![("fields", SUMMARY_FIELDS)];
        if let Some(joined) = joined.as_deref() {
            query.push(("code", joined));
        }

        let products: Vec<ProductSummary> =
            self.http_client.get_json(&self.products_url(), &query).await?;
        debug!("Catalog returned {} product(s)", products.len());
        Ok(products)
    }

    #[tracing::instrument(skip(self))]
    async fn list_releases(&self, code: &str) -> Result<Vec<Release>> {
        let url = format!("{}/products/releases", self.api_url);
        let mut by_code: HashMap<String, Vec<Release>> =
            self.http_client.get_json(&url, &[("code", code)]).await?;
        Ok(by_code.remove(code).unwrap_or_default())
    }

    #[tracing::instrument(skip(self))]
    async fn get_product_releases(&self, code: &str) -> Result<Vec<Release>> {
        let products: Vec<ProductReleases> = self
            .http_client
            .get_json(&self.products_url(), &[("code", code), ("fields", "releases")])
            .await?;
        let product = products
            .into_iter()
            .next()
            .ok_or_else(|| FttbError::ProductNotFound {
                code: code.to_string(),
            })?;
        debug!("{} has {} release(s)", code, product.releases.len());
        Ok(product.releases)
    }

    #[tracing::instrument(skip(self))]
    async fn get_product(&self, code: &str) -> Result<Option<ProductSummary>> {
        let products: Vec<ProductSummary> = self
            .http_client
            .get_json(&self.products_url(), &[("fields", SUMMARY_FIELDS), ("code", code)])
            .await?;
        Ok(products.into_iter().next())
    }
}

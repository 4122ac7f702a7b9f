use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

/// Category a product must carry to be treated as an IDE.
pub const IDE_CATEGORY: &str = "IDE";

/// One entry of the product listing.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ProductSummary {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "intellijProductCode", default)]
    pub product_code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub categories: Option<BTreeSet<String>>,
}

impl ProductSummary {
    /// Has a non-empty product code and the IDE category.
    pub fn is_ide(&self) -> bool {
        let has_code = self
            .product_code
            .as_deref()
            .is_some_and(|code| !code.is_empty());
        let is_ide = self
            .categories
            .as_ref()
            .is_some_and(|categories| categories.contains(IDE_CATEGORY));
        has_code && is_ide
    }

    pub fn code(&self) -> &str {
        self.product_code.as_deref().unwrap_or_default()
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// Substring match on name, code, or description.
    pub fn matches(&self, query: &str) -> bool {
        self.name.contains(query) || self.code().contains(query) || self.description().contains(query)
    }
}

/// Keeps only well-formed IDE entries.
pub fn ide_products(products: Vec<ProductSummary>) -> Vec<ProductSummary> {
    products.into_iter().filter(ProductSummary::is_ide).collect()
}

/// Release channel. Entries without a `type` are never taken for stable.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseType {
    Release,
    Eap,
    Rc,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Download {
    pub link: String,
}

impl Download {
    /// Final path segment of the link, used as the cached archive name.
    pub fn file_name(&self) -> &str {
        let path = self.link.split(['?', '#']).next().unwrap_or_default();
        path.rsplit('/').next().unwrap_or_default()
    }
}

/// One published version of a product.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Release {
    pub version: String,
    #[serde(rename = "type", default)]
    pub release_type: ReleaseType,
    #[serde(default)]
    pub downloads: BTreeMap<String, Download>,
    #[serde(rename = "notesLink", default)]
    pub notes_link: Option<String>,
}

impl Release {
    pub fn download_for(&self, platform: &str) -> Option<&Download> {
        self.downloads.get(platform)
    }
}

/// Envelope of `/products?code=X&fields=releases`.
#[derive(Deserialize, Debug, Default)]
pub(crate) struct ProductReleases {
    #[serde(default)]
    pub releases: Vec<Release>,
}

//! Wire types for the catalog/auth API.

use serde::{Deserialize, Serialize};
use storefront_types::{CatalogResult, Item};

/// Login request body.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// A page of products as returned by every listing endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogPage {
    #[serde(default)]
    pub products: Vec<Item>,
    #[serde(default)]
    pub total: u64,
}

impl From<CatalogPage> for CatalogResult {
    fn from(page: CatalogPage) -> Self {
        CatalogResult::new(page.products, page.total)
    }
}

/// Entry of the category list. The endpoint returns plain slugs; the richer
/// `/products/categories` shape is accepted too.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CategoryEntry {
    Slug(String),
    Detailed { slug: String },
}

impl CategoryEntry {
    pub fn into_slug(self) -> String {
        match self {
            CategoryEntry::Slug(slug) | CategoryEntry::Detailed { slug } => slug,
        }
    }
}

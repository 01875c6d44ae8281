//! Derivation of the remote listing request from a catalog query.
//!
//! The remote API pages only the unfiltered listing. Category and search
//! endpoints return their full match set, so the page index is ignored on
//! those paths.

use std::fmt;

use storefront_types::CatalogQuery;

/// Shape of the remote request for a given query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogRequest {
    /// `GET /products?limit&skip`
    List { limit: u32, skip: u64 },
    /// `GET /products/category/{category}[?q=term]`
    Category {
        category: String,
        term: Option<String>,
    },
    /// `GET /products?category=a,b[&q=term]`
    Categories {
        categories: Vec<String>,
        term: Option<String>,
    },
    /// `GET /products/search?q=term`
    Search { term: String },
}

/// Derives the request for `query`. Deterministic: equal inputs always give
/// an equal request.
pub fn derive_request(query: &CatalogQuery, page_size: u32) -> CatalogRequest {
    let term = query.effective_term().map(str::to_string);
    match (query.categories(), term) {
        ([], None) => CatalogRequest::List {
            limit: page_size,
            skip: u64::from(query.page().saturating_sub(1)) * u64::from(page_size),
        },
        ([], Some(term)) => CatalogRequest::Search { term },
        ([category], term) => CatalogRequest::Category {
            category: category.clone(),
            term,
        },
        (categories, term) => CatalogRequest::Categories {
            categories: categories.to_vec(),
            term,
        },
    }
}

impl CatalogRequest {
    /// Path segments below the API base URL.
    pub fn path_segments(&self) -> Vec<&str> {
        match self {
            CatalogRequest::List { .. } | CatalogRequest::Categories { .. } => vec!["products"],
            CatalogRequest::Category { category, .. } => {
                vec!["products", "category", category.as_str()]
            }
            CatalogRequest::Search { .. } => vec!["products", "search"],
        }
    }

    /// Query-string parameters, unencoded.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            CatalogRequest::List { limit, skip } => {
                vec![("limit", limit.to_string()), ("skip", skip.to_string())]
            }
            CatalogRequest::Category { term, .. } => term_pair(term.as_deref()),
            CatalogRequest::Categories { categories, term } => {
                let mut pairs = vec![("category", categories.join(","))];
                pairs.extend(term_pair(term.as_deref()));
                pairs
            }
            CatalogRequest::Search { term } => vec![("q", term.clone())],
        }
    }

    /// True for every request other than the plain paginated listing.
    pub fn is_filtered(&self) -> bool {
        !matches!(self, CatalogRequest::List { .. })
    }

    /// Whether the remote endpoint honours the page index.
    pub fn is_paginated(&self) -> bool {
        matches!(self, CatalogRequest::List { .. })
    }
}

fn term_pair(term: Option<&str>) -> Vec<(&'static str, String)> {
    term.map(|t| vec![("q", t.to_string())]).unwrap_or_default()
}

impl fmt::Display for CatalogRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.path_segments().join("/"))?;
        for (i, (key, value)) in self.query_pairs().iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{key}={value}")?;
        }
        Ok(())
    }
}

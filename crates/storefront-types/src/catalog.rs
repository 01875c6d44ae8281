//! Catalog query state and fetched results.

use serde::{Deserialize, Serialize};

use crate::item::{Item, ItemId};

/// First page index; pages are 1-based.
pub const FIRST_PAGE: u32 = 1;

/// The user's current catalog query: free-text term, selected category
/// facets and page.
///
/// Any change to the term or the categories puts the query back on the
/// first page. Fields are private so that invariant cannot be bypassed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogQuery {
    term: String,
    categories: Vec<String>,
    page: u32,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            term: String::new(),
            categories: Vec::new(),
            page: FIRST_PAGE,
        }
    }
}

impl CatalogQuery {
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Selected categories in selection order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// The term with surrounding whitespace removed, or `None` when blank.
    pub fn effective_term(&self) -> Option<&str> {
        let trimmed = self.term.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    pub fn set_term(&mut self, term: impl Into<String>) {
        self.term = term.into();
        self.page = FIRST_PAGE;
    }

    /// Flips the selection state of each given category.
    pub fn toggle_categories<I, S>(&mut self, categories: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for category in categories {
            let category = category.into();
            if let Some(pos) = self.categories.iter().position(|c| *c == category) {
                self.categories.remove(pos);
            } else {
                self.categories.push(category);
            }
        }
        self.page = FIRST_PAGE;
    }

    /// Replaces the whole selection (checkbox-group semantics). Duplicates are
    /// dropped, first occurrence wins.
    pub fn set_categories<I, S>(&mut self, categories: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories.clear();
        for category in categories {
            let category = category.into();
            if !self.categories.contains(&category) {
                self.categories.push(category);
            }
        }
        self.page = FIRST_PAGE;
    }

    /// Moves to `page`, clamped to the first page. Term and categories are
    /// left alone.
    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(FIRST_PAGE);
    }
}

/// The item list currently shown, with the server-reported total.
///
/// `total` is approximate after local creates and deletes, which do not
/// adjust it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogResult {
    pub items: Vec<Item>,
    pub total: u64,
}

impl CatalogResult {
    pub fn new(items: Vec<Item>, total: u64) -> Self {
        Self { items, total }
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

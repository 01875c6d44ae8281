//! Catalog query engine.
//!
//! Owns the compound query, the current result list and the category list.
//! Every query change hands back a [`FetchTicket`] describing the request to
//! issue. Results are applied through [`CatalogQueryEngine::complete`], which
//! drops any ticket superseded by a later query change, so an older fetch that
//! resolves last can never overwrite a newer result.

use std::fmt;

use storefront_types::{CatalogQuery, CatalogResult};
use tracing::{debug, warn};

use super::request::{CatalogRequest, derive_request};
use crate::api::{ApiClient, ApiResult, CatalogPage};

/// A request issued for a specific query generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    request: CatalogRequest,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn request(&self) -> &CatalogRequest {
        &self.request
    }
}

/// How a completed fetch was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The result list was replaced.
    Applied,
    /// A newer ticket was issued meanwhile; the response was dropped.
    Stale,
}

/// A catalog read failed. The previous result is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchError;

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to fetch products")
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone)]
pub struct CatalogQueryEngine {
    query: CatalogQuery,
    result: CatalogResult,
    categories: Vec<String>,
    categories_loaded: bool,
    page_size: u32,
    generation: u64,
}

impl CatalogQueryEngine {
    pub fn new(page_size: u32) -> Self {
        Self::with_query(page_size, CatalogQuery::default())
    }

    /// Starts from an existing query, e.g. one assembled from CLI flags.
    pub fn with_query(page_size: u32, query: CatalogQuery) -> Self {
        Self {
            query,
            result: CatalogResult::default(),
            categories: Vec::new(),
            categories_loaded: false,
            page_size: page_size.max(1),
            generation: 0,
        }
    }

    pub fn query(&self) -> &CatalogQuery {
        &self.query
    }

    pub fn result(&self) -> &CatalogResult {
        &self.result
    }

    /// Mutable access for in-place reconciliation after mutations.
    pub fn result_mut(&mut self) -> &mut CatalogResult {
        &mut self.result
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of pages the unfiltered listing spans, at least one.
    pub fn page_count(&self) -> u32 {
        let pages = self.result.total.div_ceil(u64::from(self.page_size));
        u32::try_from(pages).unwrap_or(u32::MAX).max(1)
    }

    /// The request the current query derives to.
    pub fn current_request(&self) -> CatalogRequest {
        derive_request(&self.query, self.page_size)
    }

    /// Sets the search term (page resets to 1) and returns the fetch to issue.
    pub fn set_term(&mut self, term: impl Into<String>) -> FetchTicket {
        self.query.set_term(term);
        self.issue()
    }

    /// Flips the given categories (page resets to 1).
    pub fn toggle_categories<I, S>(&mut self, categories: I) -> FetchTicket
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query.toggle_categories(categories);
        self.issue()
    }

    /// Replaces the selected categories (page resets to 1).
    pub fn set_categories<I, S>(&mut self, categories: I) -> FetchTicket
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query.set_categories(categories);
        self.issue()
    }

    /// Moves to another page; term and categories are untouched.
    pub fn set_page(&mut self, page: u32) -> FetchTicket {
        self.query.set_page(page);
        self.issue()
    }

    /// Issues a ticket for the current query, superseding earlier ones.
    pub fn issue(&mut self) -> FetchTicket {
        self.generation += 1;
        FetchTicket {
            generation: self.generation,
            request: self.current_request(),
        }
    }

    /// Applies the response for `ticket`.
    ///
    /// # Errors
    /// Returns [`FetchError`] when the response for the latest ticket is a
    /// failure. The result list and the query are left as they were.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        response: ApiResult<CatalogPage>,
    ) -> Result<FetchOutcome, FetchError> {
        if ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                latest = self.generation,
                "dropping superseded catalog response"
            );
            return Ok(FetchOutcome::Stale);
        }

        match response {
            Ok(page) => {
                self.result = page.into();
                debug!(
                    items = self.result.items.len(),
                    total = self.result.total,
                    "catalog result replaced"
                );
                Ok(FetchOutcome::Applied)
            }
            Err(err) => {
                warn!(error = %err, request = %ticket.request, "catalog fetch failed");
                Err(FetchError)
            }
        }
    }

    /// Issues `ticket` against the API and applies the response.
    ///
    /// # Errors
    /// See [`CatalogQueryEngine::complete`].
    pub async fn run(
        &mut self,
        api: &ApiClient,
        ticket: FetchTicket,
    ) -> Result<FetchOutcome, FetchError> {
        let response = api.fetch_catalog(ticket.request()).await;
        self.complete(&ticket, response)
    }

    /// Re-fetches the current query.
    ///
    /// # Errors
    /// See [`CatalogQueryEngine::complete`].
    pub async fn refresh(&mut self, api: &ApiClient) -> Result<FetchOutcome, FetchError> {
        let ticket = self.issue();
        self.run(api, ticket).await
    }

    /// Loads the category list once; later calls are no-ops.
    ///
    /// # Errors
    /// Returns [`FetchError`] if the list cannot be fetched. A later call
    /// retries.
    pub async fn load_categories(&mut self, api: &ApiClient) -> Result<(), FetchError> {
        if self.categories_loaded {
            return Ok(());
        }
        match api.category_list().await {
            Ok(categories) => {
                self.categories = categories;
                self.categories_loaded = true;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "category list fetch failed");
                Err(FetchError)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::ApiError;

    fn page(titles: &[&str], total: u64) -> CatalogPage {
        let products: Vec<_> = titles
            .iter()
            .enumerate()
            .map(|(i, title)| json!({"id": i + 1, "title": title, "price": 1}))
            .collect();
        serde_json::from_value(json!({"products": products, "total": total})).unwrap()
    }

    fn titles(engine: &CatalogQueryEngine) -> Vec<&str> {
        engine
            .result()
            .items
            .iter()
            .map(|item| item.title.as_str())
            .collect()
    }

    #[test]
    fn test_filter_changes_reset_page() {
        let mut engine = CatalogQueryEngine::new(10);
        engine.set_page(4);

        let ticket = engine.set_term("phone");
        assert_eq!(engine.query().page(), 1);
        assert_eq!(
            ticket.request(),
            &CatalogRequest::Search {
                term: "phone".to_string()
            }
        );

        engine.set_page(3);
        engine.toggle_categories(["laptops"]);
        assert_eq!(engine.query().page(), 1);
    }

    #[test]
    fn test_set_page_keeps_filters() {
        let mut engine = CatalogQueryEngine::new(10);
        engine.set_term("phone");
        engine.toggle_categories(["smartphones"]);

        engine.set_page(2);

        assert_eq!(engine.query().term(), "phone");
        assert_eq!(engine.query().categories(), ["smartphones"]);
        assert_eq!(engine.query().page(), 2);
    }

    #[test]
    fn test_success_replaces_result_wholesale() {
        let mut engine = CatalogQueryEngine::new(10);
        let first = engine.issue();
        engine.complete(&first, Ok(page(&["a", "b"], 2))).unwrap();

        let second = engine.set_term("c");
        let outcome = engine.complete(&second, Ok(page(&["c"], 1))).unwrap();

        assert_eq!(outcome, FetchOutcome::Applied);
        assert_eq!(titles(&engine), vec!["c"]);
        assert_eq!(engine.result().total, 1);
    }

    #[test]
    fn test_failure_keeps_previous_result_and_query() {
        let mut engine = CatalogQueryEngine::new(10);
        let first = engine.issue();
        engine.complete(&first, Ok(page(&["a"], 1))).unwrap();

        let ticket = engine.set_term("zzz");
        let err = engine
            .complete(&ticket, Err(ApiError::http_status(500, "")))
            .unwrap_err();

        assert_eq!(err, FetchError);
        assert_eq!(titles(&engine), vec!["a"]);
        assert_eq!(engine.query().term(), "zzz");
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut engine = CatalogQueryEngine::new(10);
        let older = engine.set_term("ph");
        let newer = engine.set_term("phone");

        let applied = engine.complete(&newer, Ok(page(&["phone"], 1))).unwrap();
        let late = engine.complete(&older, Ok(page(&["ph-old"], 9))).unwrap();

        assert_eq!(applied, FetchOutcome::Applied);
        assert_eq!(late, FetchOutcome::Stale);
        assert_eq!(titles(&engine), vec!["phone"]);
    }

    #[test]
    fn test_stale_failure_is_not_reported() {
        let mut engine = CatalogQueryEngine::new(10);
        let older = engine.set_page(2);
        let _newer = engine.set_page(3);

        let outcome = engine
            .complete(&older, Err(ApiError::http_status(500, "")))
            .unwrap();
        assert_eq!(outcome, FetchOutcome::Stale);
    }

    #[test]
    fn test_tickets_are_monotonic() {
        let mut engine = CatalogQueryEngine::new(10);
        let a = engine.issue();
        let b = engine.set_page(2);
        assert!(b.generation() > a.generation());
    }

    #[test]
    fn test_page_count() {
        let mut engine = CatalogQueryEngine::new(10);
        assert_eq!(engine.page_count(), 1);

        let ticket = engine.issue();
        engine.complete(&ticket, Ok(page(&["a"], 194))).unwrap();
        assert_eq!(engine.page_count(), 20);
    }

    #[test]
    fn test_with_query_uses_given_state() {
        let mut query = CatalogQuery::default();
        query.set_page(3);
        let engine = CatalogQueryEngine::with_query(10, query);

        assert_eq!(
            engine.current_request(),
            CatalogRequest::List {
                limit: 10,
                skip: 20
            }
        );
    }
}

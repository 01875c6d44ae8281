//! Application shell wiring session, routing and catalog together.
//!
//! Every handler runs to completion on the caller's task. Component errors
//! are turned into [`Notice`]s here and go no further; handlers report only
//! the resulting view or whether the action took effect.

use std::sync::Arc;

use storefront_types::{CatalogQuery, Item, ItemFields, ItemId, Session, View};

use crate::api::ApiClient;
use crate::auth::{AuthGateway, Navigate};
use crate::catalog::{CatalogQueryEngine, FetchTicket, MutationCoordinator};
use crate::notice::Notice;
use crate::routes::Navigator;
use crate::session::SessionHandle;

const FETCH_FAILED: &str = "Failed to fetch products. Please try again.";
const FILTER_FAILED: &str = "Failed to filter products. Please try again.";
const CATEGORIES_FAILED: &str = "Failed to fetch categories. Please try again.";
const NOT_SIGNED_IN: &str = "Not signed in.";

pub struct App {
    api: ApiClient,
    session: SessionHandle,
    auth: AuthGateway,
    mutations: MutationCoordinator,
    navigator: Navigator,
    catalog: Option<CatalogQueryEngine>,
    notices: Vec<Notice>,
    page_size: u32,
}

impl App {
    pub fn new(session: SessionHandle, api: ApiClient, page_size: u32) -> Self {
        let navigator = Navigator::new(&session);
        Self {
            auth: AuthGateway::new(Arc::clone(&session), api.clone()),
            mutations: MutationCoordinator::new(api.clone()),
            api,
            session,
            navigator,
            catalog: None,
            notices: Vec::new(),
            page_size,
        }
    }

    pub fn current_view(&self) -> View {
        self.navigator.current()
    }

    pub fn session(&self) -> Option<Session> {
        self.session.get()
    }

    /// Catalog state, present only while the catalog view is shown.
    pub fn catalog(&self) -> Option<&CatalogQueryEngine> {
        self.catalog.as_ref()
    }

    pub fn auth(&self) -> &AuthGateway {
        &self.auth
    }

    /// Takes all pending notices.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Opens `path` with a fresh catalog query.
    pub async fn open(&mut self, path: &str) -> View {
        self.open_with(path, CatalogQuery::default()).await
    }

    /// Opens `path`; if it lands on the catalog view, `query` seeds it.
    pub async fn open_with(&mut self, path: &str, query: CatalogQuery) -> View {
        let decision = self.navigator.navigate(path);
        self.enter(decision.view(), query).await
    }

    /// Follows session changes made outside this shell (e.g. another holder
    /// of the session handle clearing it).
    pub async fn sync(&mut self) -> View {
        match self.navigator.sync() {
            Some(decision) => self.enter(decision.view(), CatalogQuery::default()).await,
            None => self.current_view(),
        }
    }

    pub async fn login(&mut self, username: &str, password: &str) -> View {
        match self.auth.login(username, password).await {
            Ok(Navigate(view)) => {
                let decision = self.navigator.go(view);
                self.enter(decision.view(), CatalogQuery::default()).await
            }
            Err(err) => {
                self.notices.push(Notice::error(err.to_string()));
                self.current_view()
            }
        }
    }

    pub async fn logout(&mut self) -> View {
        let Navigate(view) = self.auth.logout();
        let decision = self.navigator.go(view);
        self.enter(decision.view(), CatalogQuery::default()).await
    }

    pub async fn set_term(&mut self, term: &str) -> bool {
        self.refetch(|engine| engine.set_term(term)).await
    }

    pub async fn toggle_categories(&mut self, categories: &[String]) -> bool {
        self.refetch(|engine| engine.toggle_categories(categories.iter().cloned()))
            .await
    }

    pub async fn set_categories(&mut self, categories: &[String]) -> bool {
        self.refetch(|engine| engine.set_categories(categories.iter().cloned()))
            .await
    }

    pub async fn set_page(&mut self, page: u32) -> bool {
        self.refetch(|engine| engine.set_page(page)).await
    }

    pub async fn create(&mut self, fields: &ItemFields) -> Option<Item> {
        if !self.catalog_reachable().await {
            return None;
        }
        let engine = self.catalog.as_mut()?;
        match self.mutations.create(engine.result_mut(), fields).await {
            Ok(item) => {
                self.notices
                    .push(Notice::success("Product added successfully."));
                Some(item)
            }
            Err(err) => {
                self.notices.push(Notice::error(err.to_string()));
                None
            }
        }
    }

    pub async fn update(&mut self, id: ItemId, fields: &ItemFields) -> Option<Item> {
        if !self.catalog_reachable().await {
            return None;
        }
        let engine = self.catalog.as_mut()?;
        match self.mutations.update(engine.result_mut(), id, fields).await {
            Ok(item) => {
                self.notices
                    .push(Notice::success("Product updated successfully."));
                Some(item)
            }
            Err(err) => {
                self.notices.push(Notice::error(err.to_string()));
                None
            }
        }
    }

    pub async fn delete(&mut self, id: ItemId) -> bool {
        if !self.catalog_reachable().await {
            return false;
        }
        let Some(engine) = self.catalog.as_mut() else {
            return false;
        };
        match self.mutations.delete(engine.result_mut(), id).await {
            Ok(()) => {
                self.notices
                    .push(Notice::success("Product deleted successfully."));
                true
            }
            Err(err) => {
                self.notices.push(Notice::error(err.to_string()));
                false
            }
        }
    }

    async fn enter(&mut self, view: View, query: CatalogQuery) -> View {
        match view {
            View::Login => self.catalog = None,
            View::Catalog if self.catalog.is_none() => {
                let mut engine = CatalogQueryEngine::with_query(self.page_size, query);
                if engine.load_categories(&self.api).await.is_err() {
                    self.notices.push(Notice::error(CATEGORIES_FAILED));
                }
                let ticket = engine.issue();
                let message = failure_message(&ticket);
                if engine.run(&self.api, ticket).await.is_err() {
                    self.notices.push(Notice::error(message));
                }
                self.catalog = Some(engine);
            }
            View::Catalog => {}
        }
        view
    }

    async fn refetch<F>(&mut self, change: F) -> bool
    where
        F: FnOnce(&mut CatalogQueryEngine) -> FetchTicket,
    {
        if !self.catalog_reachable().await {
            return false;
        }
        let Some(engine) = self.catalog.as_mut() else {
            return false;
        };
        let ticket = change(engine);
        let message = failure_message(&ticket);
        match engine.run(&self.api, ticket).await {
            Ok(_) => true,
            Err(_) => {
                self.notices.push(Notice::error(message));
                false
            }
        }
    }

    /// Whether the catalog view is (still) shown after following the session.
    async fn catalog_reachable(&mut self) -> bool {
        self.sync().await;
        if self.catalog.is_none() {
            self.notices.push(Notice::error(NOT_SIGNED_IN));
            return false;
        }
        true
    }
}

fn failure_message(ticket: &FetchTicket) -> &'static str {
    if ticket.request().is_filtered() {
        FILTER_FAILED
    } else {
        FETCH_FAILED
    }
}

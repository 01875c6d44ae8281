//! CLI command handlers.

pub mod auth;
pub mod browse;
pub mod config;
pub mod products;

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use storefront_core::api::{ApiClient, ApiConfig};
use storefront_core::app::App;
use storefront_core::blob::FileBlobStore;
use storefront_core::config::{Config, paths};
use storefront_core::session::{SessionHandle, SessionStore};
use storefront_types::{CatalogQuery, View};
use tracing::debug;

/// Everything a command needs: loaded config, API client and session store.
pub struct Services {
    pub config: Config,
    pub api: ApiClient,
    pub session: SessionHandle,
}

impl Services {
    pub fn load() -> Result<Self> {
        let config = Config::load().context("load config")?;
        let api = ApiClient::new(ApiConfig::from_config(&config)?)?;
        let blob = FileBlobStore::new(paths::state_dir());
        let session = SessionStore::handle(Arc::new(blob));
        debug!(
            base_url = %api.base_url(),
            signed_in = session.is_authenticated(),
            "services ready"
        );
        Ok(Self {
            config,
            api,
            session,
        })
    }

    pub fn app(&self) -> App {
        App::new(
            Arc::clone(&self.session),
            self.api.clone(),
            self.config.page_size(),
        )
    }

    /// Builds the app and opens the catalog, failing if the route guard
    /// sends us to the login view instead.
    pub async fn catalog_app(&self, query: CatalogQuery) -> Result<App> {
        let mut app = self.app();
        if app.open_with(View::Catalog.path(), query).await == View::Login {
            bail!("Not logged in. Run `storefront login` first.");
        }
        Ok(app)
    }
}

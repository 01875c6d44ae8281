//! HTTP client for the remote catalog/auth API.

mod error;
mod types;

use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use storefront_types::{Item, ItemFields, ItemId};
use tracing::debug;
use url::Url;

pub use self::error::{ApiError, ApiErrorKind, ApiResult};
pub use self::types::{CatalogPage, CategoryEntry, LoginRequest};
use crate::catalog::CatalogRequest;
use crate::config::Config;

/// Standard User-Agent header for storefront API requests.
pub const USER_AGENT: &str = concat!("storefront/", env!("CARGO_PKG_VERSION"));

/// When set to `1`, refuses to build a client that targets the production host.
pub const BLOCK_REAL_API_ENV: &str = "STOREFRONT_BLOCK_REAL_API";

const PRODUCTION_HOST: &str = "dummyjson.com";

/// Connection settings for [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
    pub timeout: Option<Duration>,
}

impl ApiConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: None,
        }
    }

    /// Builds the connection settings from loaded configuration.
    ///
    /// Base URL resolution order:
    /// 1. `STOREFRONT_BASE_URL` env var (if set and non-empty)
    /// 2. `base_url` in config.toml
    /// 3. Default: `https://dummyjson.com`
    ///
    /// # Errors
    /// Returns an error if the resolved base URL is invalid.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            base_url: config.effective_base_url()?,
            timeout: config.request_timeout(),
        })
    }
}

/// Catalog/auth API client.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: reqwest::Client,
}

impl ApiClient {
    /// Creates a new client.
    ///
    /// # Errors
    /// - In unit tests, or when `STOREFRONT_BLOCK_REAL_API=1`, fails if the
    ///   base URL points at the production API. Point `STOREFRONT_BASE_URL`
    ///   at a mock server (e.g., wiremock) instead.
    /// - Fails if the HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self> {
        if blocks_real_api() && targets_production(&config.base_url) {
            bail!(
                "Refusing to use the production API while {BLOCK_REAL_API_ENV}=1 or under test.\n\
                 Set {} to a mock server. Found base_url: {}",
                Config::BASE_URL_ENV,
                config.base_url
            );
        }

        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { config, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    /// `POST /auth/login`. Returns the raw response body.
    ///
    /// # Errors
    /// Returns an error on transport failure, non-2xx status or a non-JSON body.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<Value> {
        let url = self.endpoint(&["auth", "login"])?;
        debug!(method = "POST", %url, "api request");
        let request = self
            .http
            .post(url)
            .json(&LoginRequest { username, password });
        self.send_json(request, "login").await
    }

    /// Issues the listing request derived from a catalog query.
    ///
    /// # Errors
    /// Returns an error on transport failure, non-2xx status or an unexpected body.
    pub async fn fetch_catalog(&self, request: &CatalogRequest) -> ApiResult<CatalogPage> {
        let url = self.endpoint(&request.path_segments())?;
        let query = request.query_pairs();
        debug!(method = "GET", %url, request = %request, "api request");
        self.send_json(self.http.get(url).query(&query), "catalog")
            .await
    }

    /// `GET /products/category-list`.
    ///
    /// # Errors
    /// Returns an error on transport failure, non-2xx status or an unexpected body.
    pub async fn category_list(&self) -> ApiResult<Vec<String>> {
        let url = self.endpoint(&["products", "category-list"])?;
        debug!(method = "GET", %url, "api request");
        let entries: Vec<CategoryEntry> = self
            .send_json(self.http.get(url), "category list")
            .await?;
        Ok(entries.into_iter().map(CategoryEntry::into_slug).collect())
    }

    /// `POST /products/add`. Returns the created item.
    ///
    /// # Errors
    /// Returns an error on transport failure, non-2xx status or an unexpected body.
    pub async fn add_product(&self, fields: &ItemFields) -> ApiResult<Item> {
        let url = self.endpoint(&["products", "add"])?;
        debug!(method = "POST", %url, "api request");
        self.send_json(self.http.post(url).json(fields), "add product")
            .await
    }

    /// `PUT /products/{id}`. Returns the (possibly partial) updated fields.
    ///
    /// # Errors
    /// Returns an error on transport failure, non-2xx status or a non-object body.
    pub async fn update_product(
        &self,
        id: ItemId,
        fields: &ItemFields,
    ) -> ApiResult<Map<String, Value>> {
        let id = id.to_string();
        let url = self.endpoint(&["products", &id])?;
        debug!(method = "PUT", %url, "api request");
        self.send_json(self.http.put(url).json(fields), "update product")
            .await
    }

    /// `DELETE /products/{id}`. Returns the response status code.
    ///
    /// # Errors
    /// Returns an error on transport failure or non-2xx status.
    pub async fn delete_product(&self, id: ItemId) -> ApiResult<u16> {
        let id = id.to_string();
        let url = self.endpoint(&["products", &id])?;
        debug!(method = "DELETE", %url, "api request");
        let response = self.send(self.http.delete(url)).await?;
        Ok(response.status().as_u16())
    }

    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ApiError::parse(format!(
                    "base URL cannot have paths: {}",
                    self.config.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|err| ApiError::from_reqwest(&err))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::http_status(status.as_u16(), &body));
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> ApiResult<T> {
        let response = self.send(request).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|err| ApiError::from_reqwest(&err))?;
        serde_json::from_slice(&bytes)
            .map_err(|err| ApiError::parse(format!("invalid {what} response: {err}")))
    }
}

fn blocks_real_api() -> bool {
    cfg!(test) || std::env::var(BLOCK_REAL_API_ENV).is_ok_and(|v| v == "1")
}

fn targets_production(url: &Url) -> bool {
    url.host_str()
        .is_some_and(|host| host == PRODUCTION_HOST || host.ends_with(".dummyjson.com"))
}

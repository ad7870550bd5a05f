//! Client for the Search API.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::apis::{absent_on, segment};
use crate::clients::{ApiError, HttpClient, HttpMethod, HttpRequest, PagedIter, QueryParams};
use crate::config::ClientConfig;
use crate::context::RequestContext;
use crate::error::ConfigError;

const CLIENT_NAME: &str = "SearchApiClient";

/// Index used when a call does not name one.
pub const DEFAULT_SEARCH_INDEX: &str = "g-cloud";

const PAGE_KEYS: &[&str] = &["services", "documents"];

/// A service search.
///
/// Filters are sent as `filter_{name}` parameters, repeated once per value.
///
/// # Example
///
/// ```rust
/// use dm_api_client::SearchQuery;
///
/// let query = SearchQuery::new()
///     .q("email")
///     .page(2)
///     .filter("lot", ["cloud-software"]);
///
/// assert_eq!(query.index(), "g-cloud");
/// assert_eq!(
///     query.params().pairs(),
///     vec![
///         ("q".to_string(), "email".to_string()),
///         ("page".to_string(), "2".to_string()),
///         ("filter_lot".to_string(), "cloud-software".to_string()),
///     ]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    index: String,
    q: Option<String>,
    page: Option<u32>,
    filters: Vec<(String, Vec<String>)>,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            index: DEFAULT_SEARCH_INDEX.to_string(),
            q: None,
            page: None,
            filters: Vec::new(),
        }
    }
}

impl SearchQuery {
    /// Creates a query against the default index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Searches `index` instead of the default.
    #[must_use]
    pub fn in_index(mut self, index: impl Into<String>) -> Self {
        self.index = index.into();
        self
    }

    /// Sets the free-text query.
    #[must_use]
    pub fn q(mut self, q: impl Into<String>) -> Self {
        self.q = Some(q.into());
        self
    }

    /// Sets the page number. Page 0 is not sent.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Adds a filter.
    #[must_use]
    pub fn filter<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters
            .push((name.into(), values.into_iter().map(Into::into).collect()));
        self
    }

    /// The index searched.
    #[must_use]
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Query parameters for this search.
    #[must_use]
    pub fn params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        if let Some(q) = &self.q {
            params.push("q", q);
        }
        if let Some(page) = self.page.filter(|page| *page > 0) {
            params.push("page", page);
        }
        for (name, values) in &self.filters {
            params.push(format!("filter_{name}"), values.clone());
        }
        params
    }
}

/// Client for the Search API.
///
/// # Example
///
/// ```rust,ignore
/// use dm_api_client::{SearchApiClient, SearchQuery};
///
/// let search = SearchApiClient::new(config)?;
/// search.index("1234", service_json, "g-cloud-12", false).await?;
///
/// let results = search
///     .search_services(&SearchQuery::new().in_index("g-cloud-12").q("email"))
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct SearchApiClient {
    http_client: HttpClient,
}

// Verify SearchApiClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SearchApiClient>();
};

impl SearchApiClient {
    /// Creates a Search API client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TransportBuild`] if the HTTP transport cannot
    /// be created.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            http_client: HttpClient::named(CLIENT_NAME, config)?,
        })
    }

    /// Attaches an ambient request context.
    #[must_use]
    pub fn with_context(self, context: Arc<dyn RequestContext>) -> Self {
        Self {
            http_client: self.http_client.with_context(context),
        }
    }

    /// Returns a client bound to a replacement configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TransportBuild`] if the HTTP transport cannot
    /// be created.
    pub fn configure(&self, config: ClientConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            http_client: self.http_client.with_config(config)?,
        })
    }

    /// Returns the underlying request executor.
    #[must_use]
    pub const fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    /// Fetches the Search API health payload.
    pub async fn get_status(&self) -> Option<Value> {
        self.http_client.get_status().await
    }

    fn service_path(index: &str, path: &str) -> String {
        format!("/{}/services/{path}", segment(index))
    }

    /// Creates an index.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn create_index(&self, index_name: &str) -> Result<Option<Value>, ApiError> {
        self.http_client
            .put(&format!("/{}", segment(index_name)), json!({ "type": "index" }))
            .await
    }

    /// Points `alias_name` at `target_index`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn set_alias(
        &self,
        alias_name: &str,
        target_index: &str,
    ) -> Result<Option<Value>, ApiError> {
        self.http_client
            .put(
                &format!("/{}", segment(alias_name)),
                json!({ "type": "alias", "target": target_index }),
            )
            .await
    }

    /// Indexes a service document.
    ///
    /// With `wait_for_response` false the document is dispatched without
    /// waiting for the API to answer, and `Ok(None)` is returned once it has
    /// been sent.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn index(
        &self,
        service_id: &str,
        service: Value,
        index: &str,
        wait_for_response: bool,
    ) -> Result<Option<Value>, ApiError> {
        let request = HttpRequest::builder(
            HttpMethod::Put,
            Self::service_path(index, &segment(service_id)),
        )
        .body(json!({ "service": service }))
        .wait_for_response(wait_for_response)
        .build();

        self.http_client.request(request).await
    }

    /// Removes a service document, or returns `None` if it was not indexed.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for failures other than 404.
    pub async fn delete(&self, service_id: &str, index: &str) -> Result<Option<Value>, ApiError> {
        let result = self
            .http_client
            .delete(&Self::service_path(index, &segment(service_id)), None)
            .await;
        absent_on(result, &[404])
    }

    /// Runs one page of a service search.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn search_services(&self, query: &SearchQuery) -> Result<Option<Value>, ApiError> {
        self.http_client
            .get(&Self::service_path(query.index(), "search"), query.params())
            .await
    }

    /// Iterates over every result of a service search.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the first page cannot be fetched.
    pub async fn search_services_iter(
        &self,
        query: &SearchQuery,
    ) -> Result<PagedIter<'_>, ApiError> {
        let first_page = self.search_services(query).await?;
        Ok(PagedIter::new(&self.http_client, first_page, PAGE_KEYS))
    }
}

//! # Digital Marketplace API client
//!
//! An async client library for the Digital Marketplace backend HTTP APIs
//! (Data, Search and Antivirus).
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//! - Validated newtypes for the base URL and the bearer token
//! - A request executor, [`HttpClient`], with bounded retries, exponential
//!   backoff, fire-and-forget dispatch and structured logging
//! - Lazy iteration over paginated list endpoints via [`PagedIter`]
//! - Resource clients: [`DataApiClient`], [`SearchApiClient`] and
//!   [`AntivirusApiClient`]
//!
//! ## Quick Start
//!
//! ```rust
//! use dm_api_client::{AuthToken, BaseUrl, ClientConfig, RetryPolicy};
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("http://localhost:5000").unwrap())
//!     .auth_token(AuthToken::new("myToken"))
//!     .retry(RetryPolicy::default().with_retries(3))
//!     .build();
//!
//! assert!(config.enabled());
//! ```
//!
//! ## Making Requests
//!
//! ```rust,ignore
//! use dm_api_client::{DataApiClient, ServiceFilter};
//!
//! let data = DataApiClient::new(config)?;
//!
//! // A single page
//! let page = data.find_services(&ServiceFilter::default()).await?;
//!
//! // Every page, fetched lazily
//! let mut services = data.find_services_iter(&ServiceFilter::default()).await?;
//! while let Some(service) = services.next().await? {
//!     println!("{}", service["id"]);
//! }
//! ```
//!
//! ## Errors
//!
//! Every remote call returns `Result<Option<serde_json::Value>, ApiError>`.
//! `Ok(None)` means the client is disabled or a fire-and-forget request was
//! dispatched. See [`ApiError`] for the failure categories.
//!
//! ## Logging
//!
//! Requests are logged through [`tracing`]. The library never installs a
//! subscriber; applications choose how events are collected.
//!
//! ## Design Principles
//!
//! - **No global state**: configuration is passed explicitly
//! - **Fail-fast validation**: newtypes validate on construction
//! - **Thread-safe**: all public types are `Send + Sync`
//! - **Async-first**: designed for use with the Tokio runtime

pub mod apis;
pub mod audit;
pub mod clients;
pub mod config;
pub mod context;
pub mod error;

// Re-export public types at crate root for convenience
pub use config::{
    AuthToken, BaseUrl, ClientConfig, ClientConfigBuilder, Timeouts, DEFAULT_CONNECT_TIMEOUT,
    DEFAULT_READ_TIMEOUT,
};
pub use error::ConfigError;

// Re-export executor types
pub use clients::{
    build_url, ApiError, ErrorMessage, HttpClient, HttpError, HttpMethod, HttpRequest,
    HttpRequestBuilder, InvalidResponseError, OutgoingHeaders, PageLinks, PagedIter, QueryParams,
    QueryValue, RetryPolicy, TransportFailure, UsageError, SDK_VERSION,
};

// Re-export resource clients
pub use apis::{
    AntivirusApiClient, AuditEventFilter, BriefFilter, DataApiClient, ProjectFilter,
    ProjectSearchFilter, SearchApiClient, SearchQuery, ServiceFilter, SupplierFilter, UserFilter,
    UserLookup, DEFAULT_SEARCH_INDEX,
};

pub use audit::AuditType;
pub use context::{RequestContext, StaticContext};

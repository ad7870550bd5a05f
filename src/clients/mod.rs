//! HTTP request execution for the marketplace APIs.
//!
//! This module provides the engine every API client is built on. It turns a
//! logical operation into a reliable HTTP exchange and normalises the
//! outcome into a decoded JSON value or an [`ApiError`].
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`HttpClient`]: The async request executor
//! - [`HttpRequest`]: A request to be sent to an API
//! - [`HttpMethod`]: Supported HTTP methods
//! - [`QueryParams`] and [`QueryValue`]: Query string parameters
//! - [`RetryPolicy`]: Bounded retries with exponential backoff
//! - [`PagedIter`]: Lazy iteration over paginated list endpoints
//! - [`OutgoingHeaders`]: Case-insensitive header assembly
//!
//! # Example
//!
//! ```rust,ignore
//! use dm_api_client::{HttpClient, HttpRequest, HttpMethod, ClientConfig, BaseUrl, AuthToken};
//!
//! let config = ClientConfig::new(BaseUrl::new("http://localhost:5000")?, AuthToken::new("tok"));
//! let client = HttpClient::new(config)?;
//!
//! let request = HttpRequest::builder(HttpMethod::Get, "/widgets")
//!     .query_param("active", true)
//!     .build();
//!
//! let widgets = client.request(request).await?;
//! ```
//!
//! # Retry Behavior
//!
//! - **Connection failures**: retried
//! - **Read failures**: retried, unless the request is fire-and-forget
//! - **500, 502, 503, 504**: retried
//! - **Other responses (including every 4xx)**: returned immediately
//!
//! A call makes at most `retries + 1` attempts. The sleep before retry `n`
//! is `backoff_factor * 2^(n-1)` seconds, capped at two minutes.

mod errors;
mod headers;
mod http_client;
mod http_request;
mod pagination;
mod retry;
mod url;

pub use errors::{
    ApiError, ErrorMessage, HttpError, InvalidResponseError, UsageError, INVALID_JSON_MESSAGE,
    REQUEST_ERROR_MESSAGE, REQUEST_ERROR_STATUS_CODE,
};
pub use headers::OutgoingHeaders;
pub use http_client::{HttpClient, FIRE_AND_FORGET_READ_TIMEOUT, SDK_VERSION, USER_AGENT_PRODUCT};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder, QueryParams, QueryValue};
pub use pagination::{PageLinks, PagedIter};
pub use retry::{
    RetryPolicy, TransportFailure, DEFAULT_BACKOFF_FACTOR, DEFAULT_FORCE_STATUS_CODES,
    DEFAULT_MAX_BACKOFF, DEFAULT_RETRIES,
};
pub use url::build_url;

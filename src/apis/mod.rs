//! Resource clients for the marketplace APIs.
//!
//! Each client is a thin shaping layer over [`HttpClient`](crate::HttpClient):
//! it builds paths, query parameters and JSON bodies for one API and leaves
//! transport, retries and error handling to the executor.
//!
//! - [`DataApiClient`]: suppliers, users, services, frameworks, briefs,
//!   agreements, audit events and direct award projects
//! - [`SearchApiClient`]: search indexes and service search
//! - [`AntivirusApiClient`]: document scanning
//!
//! # Example
//!
//! ```rust,ignore
//! use dm_api_client::{DataApiClient, ClientConfig, BaseUrl, AuthToken, SupplierFilter};
//!
//! let config = ClientConfig::new(BaseUrl::new("http://localhost:5000")?, AuthToken::new("tok"));
//! let data = DataApiClient::new(config)?;
//!
//! let mut suppliers = data
//!     .find_suppliers_iter(&SupplierFilter { prefix: Some("a".into()), ..Default::default() })
//!     .await?;
//! while let Some(supplier) = suppliers.next().await? {
//!     println!("{}", supplier["name"]);
//! }
//! ```

mod antivirus;
mod data;
mod search;

use std::borrow::Cow;

use serde::Serialize;
use serde_json::Value;

use crate::clients::{ApiError, QueryParams, UsageError};

pub use antivirus::AntivirusApiClient;
pub use data::{
    AuditEventFilter, BriefFilter, DataApiClient, ProjectFilter, ProjectSearchFilter,
    ServiceFilter, SupplierFilter, UserFilter, UserLookup,
};
pub use search::{SearchApiClient, SearchQuery, DEFAULT_SEARCH_INDEX};

/// Percent-encodes a caller-supplied path segment.
fn segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

/// Converts a filter struct into query parameters.
fn filter_query<T: Serialize>(filter: &T) -> Result<QueryParams, ApiError> {
    QueryParams::from_serializable(filter).map_err(|e| {
        UsageError::InvalidFilter {
            reason: e.to_string(),
        }
        .into()
    })
}

/// Maps a response with one of `statuses` to `Ok(None)`.
fn absent_on(
    result: Result<Option<Value>, ApiError>,
    statuses: &[u16],
) -> Result<Option<Value>, ApiError> {
    match result {
        Err(ApiError::Http(error)) if statuses.contains(&error.status_code) => Ok(None),
        other => other,
    }
}

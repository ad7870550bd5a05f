//! Request URL construction.

use reqwest::Url;

use crate::clients::http_request::QueryParams;
use crate::config::BaseUrl;
use crate::error::ConfigError;

/// Resolves `path` against `base_url` and appends `query`.
///
/// `path` may be relative (`/suppliers`) or absolute, such as a `next` page
/// link returned by the API. Either way the resolved URL takes its scheme,
/// credentials, host and port from `base_url`, so a link advertising a
/// different scheme or host can never redirect the client.
///
/// # Errors
///
/// Returns [`ConfigError::MissingBaseUrl`] if no base URL is configured, or
/// [`ConfigError::InvalidUrl`] if `path` cannot be joined onto it.
///
/// # Example
///
/// ```rust
/// use dm_api_client::{build_url, BaseUrl, QueryParams};
///
/// let base = BaseUrl::new("http://api.example/").unwrap();
/// let url = build_url(
///     Some(&base),
///     "https://elsewhere.example/widgets?page=2",
///     &QueryParams::new().with("active", true),
/// )
/// .unwrap();
///
/// assert_eq!(url.as_str(), "http://api.example/widgets?page=2&active=true");
/// ```
pub fn build_url(
    base_url: Option<&BaseUrl>,
    path: &str,
    query: &QueryParams,
) -> Result<Url, ConfigError> {
    build_url_for("HttpClient", base_url, path, query)
}

pub(crate) fn build_url_for(
    client: &'static str,
    base_url: Option<&BaseUrl>,
    path: &str,
    query: &QueryParams,
) -> Result<Url, ConfigError> {
    let base = base_url.ok_or(ConfigError::MissingBaseUrl { client })?;
    let base = base.url();

    let invalid = |reason: &str| ConfigError::InvalidUrl {
        url: path.to_string(),
        reason: reason.to_string(),
    };

    let mut url = base.join(path).map_err(|e| invalid(&e.to_string()))?;

    url.set_scheme(base.scheme())
        .map_err(|()| invalid("cannot apply base URL scheme"))?;
    url.set_host(base.host_str())
        .map_err(|e| invalid(&e.to_string()))?;
    url.set_port(base.port())
        .map_err(|()| invalid("cannot apply base URL port"))?;
    url.set_username(base.username())
        .map_err(|()| invalid("cannot apply base URL credentials"))?;
    url.set_password(base.password())
        .map_err(|()| invalid("cannot apply base URL credentials"))?;

    let pairs = query.pairs();
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }

    Ok(url)
}

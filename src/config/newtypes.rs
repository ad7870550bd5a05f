//! Validated newtype wrappers for configuration values.
//!
//! These wrappers validate their contents on construction so that a client
//! configuration can never hold a malformed base URL, and keep the bearer
//! token out of debug output.

use crate::error::ConfigError;
use reqwest::Url;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated API base URL.
///
/// Every request path is resolved against this URL, and the resolved URL
/// always keeps this URL's scheme and network location.
///
/// # Accepted Formats
///
/// Absolute `http` or `https` URLs with a host, e.g. `http://localhost:5000`
/// or `https://api.example.gov.uk/v2/`.
///
/// # Example
///
/// ```rust
/// use dm_api_client::BaseUrl;
///
/// let base = BaseUrl::new("https://api.example.gov.uk").unwrap();
/// assert_eq!(base.scheme(), "https");
/// assert_eq!(base.host_str(), Some("api.example.gov.uk"));
///
/// assert!(BaseUrl::new("ftp://files.example").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl {
    raw: String,
    url: Url,
}

impl BaseUrl {
    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL is empty, cannot be
    /// parsed, has no host, or does not use the `http`/`https` scheme.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = url.into();
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: raw.clone(),
            reason,
        };

        if raw.trim().is_empty() {
            return Err(invalid("URL is empty".to_string()));
        }

        let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        if url.host_str().is_none() {
            return Err(invalid("URL has no host".to_string()));
        }

        Ok(Self { raw, url })
    }

    /// Returns the base URL exactly as it was configured.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the parsed URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the URL scheme (`http` or `https`).
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    /// Returns the host name.
    #[must_use]
    pub fn host_str(&self) -> Option<&str> {
        self.url.host_str()
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for BaseUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for BaseUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(de::Error::custom)
    }
}

/// A bearer token used to authenticate against an API.
///
/// The `Debug` implementation masks the token so it cannot leak into logs.
///
/// # Example
///
/// ```rust
/// use dm_api_client::AuthToken;
///
/// let token = AuthToken::new("my-token");
/// assert_eq!(token.as_ref(), "my-token");
/// assert_eq!(format!("{:?}", token), "AuthToken(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wraps a bearer token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the `Authorization` header value for this token.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl AsRef<str> for AuthToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(*****)")
    }
}

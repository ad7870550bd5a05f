//! Configuration types for the Digital Marketplace API client.
//!
//! The host application owns loading settings (from environment variables,
//! application config, and so on). It hands the values to the client through
//! [`ClientConfig`], which is immutable once built and safe to share between
//! tasks.
//!
//! # Overview
//!
//! - [`ClientConfig`]: base URL, bearer token, enabled flag, timeouts, retry
//!   policy and log-correlation settings
//! - [`ClientConfigBuilder`]: a builder for constructing [`ClientConfig`]
//! - [`Timeouts`]: connect and read timeouts for one request attempt
//! - [`BaseUrl`]: a validated API base URL
//! - [`AuthToken`]: a bearer token with masked debug output
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use dm_api_client::{ClientConfig, BaseUrl, AuthToken};
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("http://localhost:5000").unwrap())
//!     .auth_token(AuthToken::new("myToken"))
//!     .timeout(Duration::from_secs(10))
//!     .build();
//!
//! assert!(config.enabled());
//! ```

mod newtypes;

pub use newtypes::{AuthToken, BaseUrl};

use std::time::Duration;

use crate::clients::RetryPolicy;

/// Default connect timeout for one request attempt.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default read timeout for one request attempt.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(45);

/// Connect and read timeouts applied to every request attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timeouts {
    /// Maximum time allowed to establish a connection.
    pub connect: Duration,
    /// Maximum time allowed between reads once the request has been sent.
    pub read: Duration,
}

impl Timeouts {
    /// Creates a timeout pair.
    #[must_use]
    pub const fn new(connect: Duration, read: Duration) -> Self {
        Self { connect, read }
    }

    /// Uses the same duration for both the connect and read phase.
    #[must_use]
    pub const fn uniform(timeout: Duration) -> Self {
        Self {
            connect: timeout,
            read: timeout,
        }
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECT_TIMEOUT, DEFAULT_READ_TIMEOUT)
    }
}

/// Configuration for one API client.
///
/// # Disabled clients
///
/// When `enabled` is `false` every request returns `Ok(None)` without any
/// network I/O. Hosts use this to switch off an optional API (for example
/// search) in environments where it does not exist.
///
/// # Thread Safety
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    base_url: Option<BaseUrl>,
    auth_token: Option<AuthToken>,
    enabled: bool,
    timeouts: Timeouts,
    retry: RetryPolicy,
    default_user: Option<String>,
    span_id_headers: Vec<String>,
    request_id_header: Option<String>,
    user_agent_prefix: Option<String>,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Shorthand for a config with a base URL and token and defaults elsewhere.
    #[must_use]
    pub fn new(base_url: BaseUrl, auth_token: AuthToken) -> Self {
        Self::builder()
            .base_url(base_url)
            .auth_token(auth_token)
            .build()
    }

    /// Returns the base URL, if configured.
    #[must_use]
    pub const fn base_url(&self) -> Option<&BaseUrl> {
        self.base_url.as_ref()
    }

    /// Returns the bearer token, if configured.
    #[must_use]
    pub const fn auth_token(&self) -> Option<&AuthToken> {
        self.auth_token.as_ref()
    }

    /// Returns whether requests are sent at all.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the per-attempt timeouts.
    #[must_use]
    pub const fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    /// Returns the retry policy.
    #[must_use]
    pub const fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Returns the user recorded as `updated_by` when a call supplies none.
    #[must_use]
    pub fn default_user(&self) -> Option<&str> {
        self.default_user.as_deref()
    }

    /// Returns the ordered header names consulted for the log span id.
    #[must_use]
    pub fn span_id_headers(&self) -> &[String] {
        &self.span_id_headers
    }

    /// Returns the header name that carries a legacy request id.
    #[must_use]
    pub fn request_id_header(&self) -> Option<&str> {
        self.request_id_header.as_deref()
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for constructing [`ClientConfig`] instances.
///
/// # Defaults
///
/// - `base_url`: `None` (requests fail with a configuration error)
/// - `auth_token`: `None`
/// - `enabled`: `true`
/// - `timeouts`: 15 s connect, 45 s read
/// - `retry`: [`RetryPolicy::default`]
/// - `default_user`, `request_id_header`, `user_agent_prefix`: `None`
/// - `span_id_headers`: empty
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use dm_api_client::{ClientConfig, BaseUrl, AuthToken, RetryPolicy};
///
/// let config = ClientConfig::builder()
///     .base_url(BaseUrl::new("https://search-api.example").unwrap())
///     .auth_token(AuthToken::new("token"))
///     .enabled(false)
///     .timeouts(Duration::from_secs(2), Duration::from_secs(30))
///     .retry(RetryPolicy::default().with_retries(2))
///     .span_id_headers(["X-B3-SpanId", "X-Span-Id"])
///     .build();
///
/// assert!(!config.enabled());
/// assert_eq!(config.retry().retries, 2);
/// ```
#[derive(Debug)]
pub struct ClientConfigBuilder {
    base_url: Option<BaseUrl>,
    auth_token: Option<AuthToken>,
    enabled: bool,
    timeouts: Timeouts,
    retry: RetryPolicy,
    default_user: Option<String>,
    span_id_headers: Vec<String>,
    request_id_header: Option<String>,
    user_agent_prefix: Option<String>,
}

impl Default for ClientConfigBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            auth_token: None,
            enabled: true,
            timeouts: Timeouts::default(),
            retry: RetryPolicy::default(),
            default_user: None,
            span_id_headers: Vec::new(),
            request_id_header: None,
            user_agent_prefix: None,
        }
    }
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: BaseUrl) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Sets the bearer token.
    #[must_use]
    pub fn auth_token(mut self, token: AuthToken) -> Self {
        self.auth_token = Some(token);
        self
    }

    /// Enables or disables all network access for the client.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Uses one duration for both connect and read timeouts.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeouts = Timeouts::uniform(timeout);
        self
    }

    /// Sets separate connect and read timeouts.
    #[must_use]
    pub const fn timeouts(mut self, connect: Duration, read: Duration) -> Self {
        self.timeouts = Timeouts::new(connect, read);
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the fallback attribution user for `updated_by`.
    #[must_use]
    pub fn default_user(mut self, user: impl Into<String>) -> Self {
        self.default_user = Some(user.into());
        self
    }

    /// Sets the ordered candidate header names for the log span id.
    #[must_use]
    pub fn span_id_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.span_id_headers = headers.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the header name used to forward a legacy request id.
    #[must_use]
    pub fn request_id_header(mut self, header: impl Into<String>) -> Self {
        self.request_id_header = Some(header.into());
        self
    }

    /// Sets a prefix for the `User-Agent` header.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`ClientConfig`].
    ///
    /// A missing base URL is not rejected here so that hosts can bind it
    /// late; it is reported by the first request instead.
    #[must_use]
    pub fn build(self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url,
            auth_token: self.auth_token,
            enabled: self.enabled,
            timeouts: self.timeouts,
            retry: self.retry,
            default_user: self.default_user,
            span_id_headers: self.span_id_headers,
            request_id_header: self.request_id_header,
            user_agent_prefix: self.user_agent_prefix,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = ClientConfig::builder().build();

        assert!(config.base_url().is_none());
        assert!(config.auth_token().is_none());
        assert!(config.enabled());
        assert_eq!(config.timeouts(), Timeouts::default());
        assert_eq!(config.retry(), &RetryPolicy::default());
        assert!(config.default_user().is_none());
        assert!(config.span_id_headers().is_empty());
        assert!(config.request_id_header().is_none());
        assert!(config.user_agent_prefix().is_none());
    }

    #[test]
    fn test_uniform_timeout_sets_both_phases() {
        let config = ClientConfig::builder()
            .timeout(Duration::from_secs(3))
            .build();

        assert_eq!(config.timeouts().connect, Duration::from_secs(3));
        assert_eq!(config.timeouts().read, Duration::from_secs(3));
    }

    #[test]
    fn test_builder_with_all_optional_fields() {
        let base = BaseUrl::new("http://baseurl").unwrap();
        let config = ClientConfig::builder()
            .base_url(base.clone())
            .auth_token(AuthToken::new("auth-token"))
            .enabled(false)
            .timeouts(Duration::from_secs(1), Duration::from_secs(20))
            .retry(RetryPolicy::default().with_retries(1))
            .default_user("system")
            .span_id_headers(["X-Span-Id"])
            .request_id_header("DM-Request-ID")
            .user_agent_prefix("buyer-frontend")
            .build();

        assert_eq!(config.base_url(), Some(&base));
        assert_eq!(config.auth_token().unwrap().as_ref(), "auth-token");
        assert!(!config.enabled());
        assert_eq!(
            config.timeouts(),
            Timeouts::new(Duration::from_secs(1), Duration::from_secs(20))
        );
        assert_eq!(config.retry().retries, 1);
        assert_eq!(config.default_user(), Some("system"));
        assert_eq!(config.span_id_headers(), &["X-Span-Id".to_string()]);
        assert_eq!(config.request_id_header(), Some("DM-Request-ID"));
        assert_eq!(config.user_agent_prefix(), Some("buyer-frontend"));
    }

    #[test]
    fn test_config_debug_masks_token() {
        let config = ClientConfig::new(
            BaseUrl::new("http://baseurl").unwrap(),
            AuthToken::new("very-secret"),
        );
        let debug_str = format!("{config:?}");
        assert!(debug_str.contains("ClientConfig"));
        assert!(!debug_str.contains("very-secret"));
    }

    #[test]
    fn test_config_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ClientConfig>();
    }
}

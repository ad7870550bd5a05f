//! Request executor for the marketplace APIs.
//!
//! This module provides [`HttpClient`], which turns a logical operation
//! (method, path, body, query) into a reliable HTTP exchange: URL resolution,
//! authentication and trace headers, bounded retries, fire-and-forget
//! dispatch, response decoding and error classification.

use std::sync::Arc;
use std::task::Poll;
use std::time::{Duration, Instant};

use futures::channel::oneshot;
use futures::stream;
use reqwest::header::CONTENT_LENGTH;
use reqwest::Url;
use serde_json::Value;

use crate::clients::errors::{
    ApiError, HttpError, InvalidResponseError, UsageError, INVALID_JSON_MESSAGE,
};
use crate::clients::headers::OutgoingHeaders;
use crate::clients::http_request::{HttpMethod, HttpRequest, QueryParams};
use crate::clients::retry::TransportFailure;
use crate::clients::url::build_url_for;
use crate::config::ClientConfig;
use crate::context::RequestContext;
use crate::error::ConfigError;

/// Library version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Product token sent in the `User-Agent` header.
pub const USER_AGENT_PRODUCT: &str = "DM-API-Client";

/// How long a fire-and-forget call waits for a reply once its request has
/// been written.
pub const FIRE_AND_FORGET_READ_TIMEOUT: Duration = Duration::from_micros(100);

/// Result of the transport phase of one call.
enum Dispatch {
    /// A response arrived (possibly after retries).
    Response {
        status: reqwest::StatusCode,
        body: Vec<u8>,
    },
    /// A fire-and-forget request was written without waiting for a reply.
    Accepted,
}

/// The request executor shared by every API client.
///
/// The client handles:
/// - URL resolution that pins the configured scheme and host
/// - Default headers: `Content-Type`, bearer `Authorization`, `User-Agent`
/// - Onwards trace headers from an optional [`RequestContext`]
/// - Bounded retries with exponential backoff
/// - Fire-and-forget dispatch for latency-insensitive writes
/// - Structured request logging through `tracing`
///
/// A disabled client (see [`ClientConfig::enabled`]) returns `Ok(None)` from
/// every call without touching the network.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync` and cheap to clone; clones share the
/// underlying connection pools.
///
/// # Example
///
/// ```rust,ignore
/// use dm_api_client::{HttpClient, ClientConfig, BaseUrl, AuthToken, QueryParams};
///
/// let config = ClientConfig::new(
///     BaseUrl::new("http://localhost:5000")?,
///     AuthToken::new("myToken"),
/// );
/// let client = HttpClient::new(config)?;
///
/// let suppliers = client
///     .get("/suppliers", QueryParams::new().with("prefix", "a"))
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// Client name used in configuration errors.
    name: &'static str,
    /// Immutable configuration.
    config: Arc<ClientConfig>,
    /// Transport shared by every call.
    client: reqwest::Client,
    /// Optional ambient header source.
    context: Option<Arc<dyn RequestContext>>,
    /// Precomputed `User-Agent` value.
    user_agent: String,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new executor for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TransportBuild`] if the HTTP transport cannot
    /// be created (for example if TLS initialisation fails).
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        Self::named("HttpClient", config)
    }

    /// Creates a new executor that reports configuration errors under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TransportBuild`] if the HTTP transport cannot
    /// be created.
    pub fn named(name: &'static str, config: ClientConfig) -> Result<Self, ConfigError> {
        let timeouts = config.timeouts();
        let client = build_transport(timeouts.connect, timeouts.read)?;

        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let user_agent = format!("{user_agent_prefix}{USER_AGENT_PRODUCT}/{SDK_VERSION}");

        Ok(Self {
            name,
            config: Arc::new(config),
            client,
            context: None,
            user_agent,
        })
    }

    /// Attaches an ambient request context.
    #[must_use]
    pub fn with_context(mut self, context: Arc<dyn RequestContext>) -> Self {
        self.context = Some(context);
        self
    }

    /// Returns a new executor bound to `config`, keeping name and context.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TransportBuild`] if the HTTP transport cannot
    /// be created.
    pub fn with_config(&self, config: ClientConfig) -> Result<Self, ConfigError> {
        let mut client = Self::named(self.name, config)?;
        client.context = self.context.clone();
        Ok(client)
    }

    /// Returns the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the name used in configuration errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the `User-Agent` header value.
    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns the headers sent on every request before any context headers.
    #[must_use]
    pub fn default_headers(&self) -> OutgoingHeaders {
        let token = self.config.auth_token().map_or("", |token| token.as_ref());
        let mut headers = OutgoingHeaders::new();
        headers.set("Content-Type", "application/json");
        headers.set("Authorization", format!("Bearer {token}"));
        headers.set("User-Agent", self.user_agent.clone());
        headers
    }

    /// Assembles every header for `request`.
    ///
    /// Order, later wins: defaults, ambient onwards headers (or the legacy
    /// request id), then the request's own extra headers.
    #[must_use]
    pub fn outgoing_headers(&self, request: &HttpRequest) -> OutgoingHeaders {
        let mut headers = self.default_headers();

        if let Some(context) = &self.context {
            if let Some(onwards) = context.onwards_request_headers() {
                headers.merge(onwards);
            } else if let (Some(request_id), Some(header)) =
                (context.request_id(), self.config.request_id_header())
            {
                headers.set(header, request_id);
            }
        }

        headers.merge(request.extra_headers.iter().cloned());
        headers
    }

    /// Picks the log span id from assembled headers.
    ///
    /// The first configured span id header present with a non-empty value
    /// wins.
    #[must_use]
    pub fn span_id(&self, headers: &OutgoingHeaders) -> Option<String> {
        headers
            .first_present(self.config.span_id_headers())
            .map(str::to_owned)
    }

    /// Resolves `path` and `query` against the configured base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the base URL is missing or the path cannot
    /// be resolved.
    pub fn build_url(&self, path: &str, query: &QueryParams) -> Result<Url, ConfigError> {
        build_url_for(self.name, self.config.base_url(), path, query)
    }

    /// Sends a request and decodes the JSON response.
    ///
    /// Returns `Ok(None)` when the client is disabled, or when a
    /// fire-and-forget request was dispatched without waiting for a reply.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Configuration`] if the base URL is missing, before any I/O
    /// - [`ApiError::Http`] for non-2xx responses and transport failures,
    ///   once retries are exhausted
    /// - [`ApiError::InvalidResponse`] if a 2xx body is not JSON
    pub async fn request(&self, request: HttpRequest) -> Result<Option<Value>, ApiError> {
        if !self.config.enabled() {
            return Ok(None);
        }

        let url = self.build_url(&request.path, &request.query)?;
        let headers = self.outgoing_headers(&request);
        let span_id = self.span_id(&headers);
        let method = request.http_method;

        tracing::debug!(
            method = %method,
            url = %url,
            child_span_id = span_id.as_deref(),
            "API request {} {}",
            method,
            url
        );

        let start = Instant::now();
        let dispatched = self.send(&request, &url, &headers).await;
        let elapsed = start.elapsed().as_secs_f64();

        let (status, body) = match dispatched {
            Ok(Dispatch::Response { status, body }) => (status, body),
            Ok(Dispatch::Accepted) => {
                tracing::debug!(
                    api_method = %method,
                    api_url = %url,
                    api_time = elapsed,
                    child_span_id = span_id.as_deref(),
                    "API {} request on {} dispatched without waiting for response",
                    method,
                    url
                );
                return Ok(None);
            }
            Err(error) => {
                log_failure(method, &url, &error, elapsed, span_id.as_deref());
                return Err(error.into());
            }
        };

        // Redirects are followed by the transport, so anything left that is
        // not 2xx, including 304, is a failure.
        if !status.is_success() {
            let error = error_from_response(status, &body, &url);
            log_failure(method, &url, &error, elapsed, span_id.as_deref());
            return Err(error.into());
        }

        tracing::info!(
            api_method = %method,
            api_url = %url,
            api_status = status.as_u16(),
            api_time = elapsed,
            child_span_id = span_id.as_deref(),
            "API {} request on {} finished in {:.3}s",
            method,
            url,
            elapsed
        );

        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|_| {
                InvalidResponseError {
                    status_code: status.as_u16(),
                    message: INVALID_JSON_MESSAGE.to_string(),
                }
                .into()
            })
    }

    /// Runs the attempts for one call, applying the retry policy.
    async fn send(
        &self,
        request: &HttpRequest,
        url: &Url,
        headers: &OutgoingHeaders,
    ) -> Result<Dispatch, HttpError> {
        let policy = self.config.retry();
        let body = request
            .body
            .as_ref()
            .map(|body| body.to_string().into_bytes());

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;

            let mut builder = self
                .client
                .request(request.http_method.into(), url.clone());
            for (name, value) in headers.iter() {
                builder = builder.header(name, value);
            }

            let outcome = if request.wait_for_response {
                exchange(builder, body.clone()).await.map(Dispatch::from)
            } else {
                fire_and_forget(builder, body.clone().unwrap_or_default()).await
            };

            match outcome {
                Ok(Dispatch::Response { status, .. })
                    if policy.is_forced_status(status.as_u16())
                        && policy.has_attempts_left(attempt) =>
                {
                    let delay = policy.delay_for(attempt);
                    tracing::debug!(
                        attempt,
                        status = status.as_u16(),
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Retrying {} {} after status {}",
                        request.http_method,
                        url,
                        status.as_u16()
                    );
                    tokio::time::sleep(delay).await;
                }
                Ok(dispatch) => return Ok(dispatch),
                Err(error) => {
                    let failure = TransportFailure::classify(&error);
                    if !policy.should_retry_transport(failure, attempt) {
                        return Err(HttpError::from_transport(&error));
                    }

                    let delay = policy.delay_for(attempt);
                    tracing::debug!(
                        attempt,
                        failure = ?failure,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Retrying {} {} after transport error: {}",
                        request.http_method,
                        url,
                        error
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Sends a GET request.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn get(&self, path: &str, query: QueryParams) -> Result<Option<Value>, ApiError> {
        self.request(HttpRequest::builder(HttpMethod::Get, path).query(query).build())
            .await
    }

    /// Sends a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn post(&self, path: &str, body: Value) -> Result<Option<Value>, ApiError> {
        self.request(HttpRequest::builder(HttpMethod::Post, path).body(body).build())
            .await
    }

    /// Sends a PUT request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn put(&self, path: &str, body: Value) -> Result<Option<Value>, ApiError> {
        self.request(HttpRequest::builder(HttpMethod::Put, path).body(body).build())
            .await
    }

    /// Sends a PATCH request with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn patch(&self, path: &str, body: Value) -> Result<Option<Value>, ApiError> {
        self.request(HttpRequest::builder(HttpMethod::Patch, path).body(body).build())
            .await
    }

    /// Sends a DELETE request, optionally with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn delete(&self, path: &str, body: Option<Value>) -> Result<Option<Value>, ApiError> {
        self.request(
            HttpRequest::builder(HttpMethod::Delete, path)
                .maybe_body(body)
                .build(),
        )
        .await
    }

    /// Sends a POST request with `updated_by` merged into the body.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError`] if no user is given or configured, or the body
    /// is not a JSON object; otherwise see [`HttpClient::request`].
    pub async fn post_with_updated_by(
        &self,
        path: &str,
        body: Value,
        user: Option<&str>,
    ) -> Result<Option<Value>, ApiError> {
        let body = self.with_updated_by(HttpMethod::Post, path, body, user)?;
        self.post(path, body).await
    }

    /// Sends a PUT request with `updated_by` merged into the body.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::post_with_updated_by`].
    pub async fn put_with_updated_by(
        &self,
        path: &str,
        body: Value,
        user: Option<&str>,
    ) -> Result<Option<Value>, ApiError> {
        let body = self.with_updated_by(HttpMethod::Put, path, body, user)?;
        self.put(path, body).await
    }

    /// Sends a PATCH request with `updated_by` merged into the body.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::post_with_updated_by`].
    pub async fn patch_with_updated_by(
        &self,
        path: &str,
        body: Value,
        user: Option<&str>,
    ) -> Result<Option<Value>, ApiError> {
        let body = self.with_updated_by(HttpMethod::Patch, path, body, user)?;
        self.patch(path, body).await
    }

    /// Sends a DELETE request with `updated_by` merged into the body.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::post_with_updated_by`].
    pub async fn delete_with_updated_by(
        &self,
        path: &str,
        body: Value,
        user: Option<&str>,
    ) -> Result<Option<Value>, ApiError> {
        let body = self.with_updated_by(HttpMethod::Delete, path, body, user)?;
        self.delete(path, Some(body)).await
    }

    /// Merges `updated_by` into a JSON object body.
    ///
    /// Falls back to the configured default user when `user` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::MissingUpdatedBy`] if no non-empty user is
    /// available, or [`UsageError::BodyNotObject`] for non-object bodies.
    pub fn with_updated_by(
        &self,
        method: HttpMethod,
        path: &str,
        body: Value,
        user: Option<&str>,
    ) -> Result<Value, UsageError> {
        let user = user
            .or_else(|| self.config.default_user())
            .filter(|user| !user.is_empty())
            .ok_or_else(|| UsageError::MissingUpdatedBy {
                method: method.to_string(),
                path: path.to_string(),
            })?;

        match body {
            Value::Object(mut map) => {
                map.insert("updated_by".to_string(), Value::String(user.to_string()));
                Ok(Value::Object(map))
            }
            _ => Err(UsageError::BodyNotObject {
                path: path.to_string(),
            }),
        }
    }

    /// Fetches the API health payload from `{base_url}/_status`.
    ///
    /// This never fails. When the call errors, the decoded error body is
    /// returned if there was one, otherwise
    /// `{"status": "error", "message": ...}`. Returns `None` only for a
    /// disabled client.
    pub async fn get_status(&self) -> Option<Value> {
        let path = self.config.base_url().map_or_else(
            || "/_status".to_string(),
            |base| format!("{}/_status", base.as_str().trim_end_matches('/')),
        );

        match self.get(&path, QueryParams::new()).await {
            Ok(status) => status,
            Err(ApiError::Http(HttpError {
                body: Some(body), ..
            })) => Some(body),
            Err(error) => Some(serde_json::json!({
                "status": "error",
                "message": error.message(),
            })),
        }
    }
}

impl From<(reqwest::StatusCode, Vec<u8>)> for Dispatch {
    fn from((status, body): (reqwest::StatusCode, Vec<u8>)) -> Self {
        Self::Response { status, body }
    }
}

/// Sends one request and reads the whole response.
async fn exchange(
    builder: reqwest::RequestBuilder,
    body: Option<Vec<u8>>,
) -> Result<(reqwest::StatusCode, Vec<u8>), reqwest::Error> {
    let builder = match body {
        Some(body) => builder.body(body),
        None => builder,
    };
    let response = builder.send().await?;
    let status = response.status();
    let body = response.bytes().await?;
    Ok((status, body.to_vec()))
}

/// Sends one request, waiting for the reply only until it has been written.
///
/// The body is streamed so the point where the transport has taken all of it
/// is observable. From there the reply gets [`FIRE_AND_FORGET_READ_TIMEOUT`];
/// if it is not back by then the exchange finishes on a background task and
/// the call reports [`Dispatch::Accepted`]. Failures before the body is
/// written are returned for the retry policy. Failures after it are treated
/// as accepted.
async fn fire_and_forget(
    builder: reqwest::RequestBuilder,
    body: Vec<u8>,
) -> Result<Dispatch, reqwest::Error> {
    let (written_tx, written_rx) = oneshot::channel::<()>();
    let mut written_tx = Some(written_tx);
    let content_length = body.len();
    let mut chunk = Some(body).filter(|bytes| !bytes.is_empty());

    let body_stream = stream::poll_fn(move |_| {
        if let Some(bytes) = chunk.take() {
            return Poll::Ready(Some(Ok::<_, std::io::Error>(bytes)));
        }
        if let Some(tx) = written_tx.take() {
            let _ = tx.send(());
        }
        Poll::Ready(None)
    });

    let builder = builder
        .header(CONTENT_LENGTH, content_length.to_string())
        .body(reqwest::Body::wrap_stream(body_stream));
    let mut pending = Box::pin(exchange(builder, None));

    tokio::select! {
        biased;
        finished = &mut pending => return finished.map(Dispatch::from),
        written = written_rx => {
            // The body was dropped unsent, so the exchange is about to fail.
            if written.is_err() {
                return pending.await.map(Dispatch::from);
            }
        }
    }

    match tokio::time::timeout(FIRE_AND_FORGET_READ_TIMEOUT, &mut pending).await {
        Ok(Ok(response)) => Ok(Dispatch::from(response)),
        Ok(Err(error)) => {
            tracing::debug!(error = %error, "Fire-and-forget request failed after dispatch");
            Ok(Dispatch::Accepted)
        }
        Err(_) => {
            tokio::spawn(async move {
                if let Err(error) = pending.await {
                    tracing::debug!(error = %error, "Fire-and-forget request failed after dispatch");
                }
            });
            Ok(Dispatch::Accepted)
        }
    }
}

fn build_transport(connect: Duration, read: Duration) -> Result<reqwest::Client, ConfigError> {
    reqwest::Client::builder()
        .use_rustls_tls()
        .connect_timeout(connect)
        .read_timeout(read)
        .build()
        .map_err(|e| ConfigError::TransportBuild {
            reason: e.to_string(),
        })
}

fn error_from_response(status: reqwest::StatusCode, body: &[u8], url: &Url) -> HttpError {
    let code = status.as_u16();
    let kind = if status.is_server_error() {
        "Server"
    } else {
        "Client"
    };
    let reason = status.canonical_reason().unwrap_or("Unknown");
    let fallback = format!("{code} {kind} Error: {reason} for url: {url}");
    let body = serde_json::from_slice::<Value>(body).ok();

    HttpError::from_response(code, body, fallback)
}

fn log_failure(
    method: HttpMethod,
    url: &Url,
    error: &HttpError,
    elapsed: f64,
    span_id: Option<&str>,
) {
    if error.is_not_found() {
        tracing::info!(
            api_method = %method,
            api_url = %url,
            api_status = error.status_code,
            api_error = %error.message,
            api_time = elapsed,
            child_span_id = span_id,
            "API {} request on {} failed with {} '{}'",
            method,
            url,
            error.status_code,
            error.message
        );
    } else {
        tracing::warn!(
            api_method = %method,
            api_url = %url,
            api_status = error.status_code,
            api_error = %error.message,
            api_time = elapsed,
            child_span_id = span_id,
            "API {} request on {} failed with {} '{}'",
            method,
            url,
            error.status_code,
            error.message
        );
    }
}

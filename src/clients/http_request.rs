//! Outgoing request types.
//!
//! This module provides the [`HttpRequest`] descriptor and its builder, plus
//! [`QueryParams`], an ordered query-string builder that drops `None` values.

use std::fmt;

use serde::Serialize;

/// HTTP methods used by the marketplace APIs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating and updating resources.
    Post,
    /// HTTP PUT method for replacing resources.
    Put,
    /// HTTP PATCH method for partial updates.
    Patch,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    /// Returns the upper-case method name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Returns `true` for methods that change server state.
    #[must_use]
    pub const fn is_mutating(&self) -> bool {
        !matches!(self, Self::Get)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Patch => Self::PATCH,
            HttpMethod::Delete => Self::DELETE,
        }
    }
}

/// A single query parameter value.
///
/// `Null` values are never serialized. Lists repeat the parameter name once
/// per element.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryValue {
    /// Omitted from the query string.
    Null,
    /// Serialized as `true` or `false`.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating point number.
    Float(f64),
    /// A string, percent-encoded on serialization.
    Str(String),
    /// Repeated as `key=a&key=b`.
    List(Vec<QueryValue>),
}

impl QueryValue {
    fn render(&self) -> Option<String> {
        match self {
            Self::Null | Self::List(_) => None,
            Self::Bool(b) => Some(b.to_string()),
            Self::Int(i) => Some(i.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::Str(s) => Some(s.clone()),
        }
    }

    fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map_or_else(|| n.as_f64().map_or(Self::Null, Self::Float), Self::Int),
            serde_json::Value::String(s) => Self::Str(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from_json).collect())
            }
            serde_json::Value::Object(_) => Self::Str(value.to_string()),
        }
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u64> for QueryValue {
    fn from(value: u64) -> Self {
        i64::try_from(value).map_or_else(|_| Self::Str(value.to_string()), Self::Int)
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for QueryValue {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl<T: Into<Self>> From<Vec<T>> for QueryValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Ordered query parameters.
///
/// # Example
///
/// ```rust
/// use dm_api_client::QueryParams;
///
/// let params = QueryParams::new()
///     .with("framework", "g-cloud-12")
///     .with("page", Some(2))
///     .with("lot", None::<&str>)
///     .with("status", vec!["live", "disabled"]);
///
/// assert_eq!(
///     params.pairs(),
///     vec![
///         ("framework".to_string(), "g-cloud-12".to_string()),
///         ("page".to_string(), "2".to_string()),
///         ("status".to_string(), "live".to_string()),
///         ("status".to_string(), "disabled".to_string()),
///     ]
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryParams(Vec<(String, QueryValue)>);

impl QueryParams {
    /// Creates an empty parameter list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Builds parameters from a serializable filter struct.
    ///
    /// Parameters come out sorted by their serialized key, not in field
    /// declaration order. Fields serializing to `null` are dropped.
    /// Non-object values produce an empty list.
    ///
    /// # Errors
    ///
    /// Returns the serialization error if `params` cannot be represented as JSON.
    pub fn from_serializable<T: Serialize>(params: &T) -> Result<Self, serde_json::Error> {
        let value = serde_json::to_value(params)?;
        let mut query = Self::new();
        if let serde_json::Value::Object(map) = value {
            for (key, val) in map {
                query.push(key, QueryValue::from_json(val));
            }
        }
        Ok(query)
    }

    /// Appends a parameter.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.0.push((key.into(), value.into()));
    }

    /// Appends a parameter, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.push(key, value);
        self
    }

    /// Appends every parameter from `other`.
    pub fn extend(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    /// Returns `true` if no parameter would be serialized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs().is_empty()
    }

    /// Returns the raw entries, including `Null` values.
    #[must_use]
    pub fn entries(&self) -> &[(String, QueryValue)] {
        &self.0
    }

    /// Flattens the parameters into serialized key/value pairs.
    ///
    /// `Null` values (including nulls inside lists) are omitted and lists are
    /// expanded into one pair per element.
    #[must_use]
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (key, value) in &self.0 {
            match value {
                QueryValue::List(items) => {
                    for item in items {
                        if let Some(rendered) = item.render() {
                            pairs.push((key.clone(), rendered));
                        }
                    }
                }
                other => {
                    if let Some(rendered) = other.render() {
                        pairs.push((key.clone(), rendered));
                    }
                }
            }
        }
        pairs
    }
}

impl<K: Into<String>, V: Into<QueryValue>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// An outgoing request descriptor.
///
/// Use [`HttpRequest::builder`] to construct requests.
///
/// # Example
///
/// ```rust
/// use dm_api_client::{HttpRequest, HttpMethod};
/// use serde_json::json;
///
/// let request = HttpRequest::builder(HttpMethod::Put, "/g-cloud/services/123")
///     .body(json!({"service": {"id": "123"}}))
///     .wait_for_response(false)
///     .build();
///
/// assert!(!request.wait_for_response);
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// A path relative to the base URL, or an absolute URL such as a page link.
    pub path: String,
    /// The JSON body, if any.
    pub body: Option<serde_json::Value>,
    /// Query parameters appended to the resolved URL.
    pub query: QueryParams,
    /// Headers added to this request only, applied after all other headers.
    pub extra_headers: Vec<(String, String)>,
    /// When `false`, the request is dispatched without waiting for the response.
    pub wait_for_response: bool,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, path)
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    http_method: HttpMethod,
    path: String,
    body: Option<serde_json::Value>,
    query: QueryParams,
    extra_headers: Vec<(String, String)>,
    wait_for_response: bool,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            http_method: method,
            path: path.into(),
            body: None,
            query: QueryParams::new(),
            extra_headers: Vec::new(),
            wait_for_response: true,
        }
    }

    /// Sets the JSON request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<serde_json::Value>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets an optional JSON request body.
    #[must_use]
    pub fn maybe_body(mut self, body: Option<serde_json::Value>) -> Self {
        self.body = body;
        self
    }

    /// Replaces all query parameters.
    #[must_use]
    pub fn query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Adds a single query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.query.push(key, value);
        self
    }

    /// Adds a header for this request only.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((key.into(), value.into()));
        self
    }

    /// Chooses between waiting for the response (default) and fire-and-forget.
    #[must_use]
    pub const fn wait_for_response(mut self, wait: bool) -> Self {
        self.wait_for_response = wait;
        self
    }

    /// Builds the [`HttpRequest`].
    #[must_use]
    pub fn build(self) -> HttpRequest {
        HttpRequest {
            http_method: self.http_method,
            path: self.path,
            body: self.body,
            query: self.query,
            extra_headers: self.extra_headers,
            wait_for_response: self.wait_for_response,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Post.to_string(), "POST");
        assert_eq!(HttpMethod::Put.to_string(), "PUT");
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_only_get_is_not_mutating() {
        assert!(!HttpMethod::Get.is_mutating());
        assert!(HttpMethod::Patch.is_mutating());
        assert!(HttpMethod::Delete.is_mutating());
    }

    #[test]
    fn test_builder_defaults() {
        let request = HttpRequest::builder(HttpMethod::Get, "/suppliers").build();

        assert_eq!(request.http_method, HttpMethod::Get);
        assert_eq!(request.path, "/suppliers");
        assert!(request.body.is_none());
        assert!(request.query.is_empty());
        assert!(request.extra_headers.is_empty());
        assert!(request.wait_for_response);
    }

    #[test]
    fn test_builder_with_all_options() {
        let request = HttpRequest::builder(HttpMethod::Post, "/briefs")
            .body(json!({"briefs": {}}))
            .query_param("page", 2)
            .header("X-Custom", "yes")
            .wait_for_response(false)
            .build();

        assert_eq!(request.body, Some(json!({"briefs": {}})));
        assert_eq!(
            request.query.pairs(),
            vec![("page".to_string(), "2".to_string())]
        );
        assert_eq!(
            request.extra_headers,
            vec![("X-Custom".to_string(), "yes".to_string())]
        );
        assert!(!request.wait_for_response);
    }

    #[test]
    fn test_query_params_drop_null_values() {
        let params = QueryParams::new()
            .with("q", "cloud")
            .with("page", None::<u32>)
            .with("filter_lot", vec![Some("cloud-hosting"), None]);

        assert_eq!(
            params.pairs(),
            vec![
                ("q".to_string(), "cloud".to_string()),
                ("filter_lot".to_string(), "cloud-hosting".to_string()),
            ]
        );
        assert_eq!(params.entries().len(), 3);
    }

    #[test]
    fn test_query_params_all_null_is_empty() {
        let params = QueryParams::new().with("page", None::<u32>);
        assert!(params.is_empty());
    }

    #[test]
    fn test_query_params_render_booleans_lowercase() {
        let params = QueryParams::new().with("acknowledged", false).with("latest_first", true);
        assert_eq!(
            params.pairs(),
            vec![
                ("acknowledged".to_string(), "false".to_string()),
                ("latest_first".to_string(), "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_params_from_serializable_skips_none() {
        #[derive(Serialize)]
        struct Filter {
            framework: Option<String>,
            page: Option<u32>,
            #[serde(rename = "audit-date")]
            audit_date: Option<String>,
        }

        let params = QueryParams::from_serializable(&Filter {
            framework: Some("g-cloud-12".to_string()),
            page: None,
            audit_date: Some("2024-01-01".to_string()),
        })
        .unwrap();

        assert_eq!(
            params.pairs(),
            vec![
                ("audit-date".to_string(), "2024-01-01".to_string()),
                ("framework".to_string(), "g-cloud-12".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_params_from_serializable_sorts_keys() {
        #[derive(Serialize)]
        struct Filter {
            zeta: u32,
            alpha: u32,
            middle: u32,
        }

        let params = QueryParams::from_serializable(&Filter {
            zeta: 1,
            alpha: 2,
            middle: 3,
        })
        .unwrap();
        let keys: Vec<String> = params.pairs().into_iter().map(|(key, _)| key).collect();

        assert_eq!(keys, vec!["alpha", "middle", "zeta"]);
    }

    #[test]
    fn test_query_params_from_iterator() {
        let params: QueryParams = vec![("a", "1"), ("b", "2")].into_iter().collect();
        assert_eq!(params.pairs().len(), 2);
    }
}

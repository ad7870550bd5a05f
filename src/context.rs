//! Ambient request context.
//!
//! A host application that is itself serving a request usually wants its
//! outgoing API calls to carry the same trace headers. It does so by handing
//! the client a [`RequestContext`]. The client only reads from it.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use dm_api_client::{RequestContext, StaticContext};
//!
//! let context = StaticContext::new()
//!     .header("X-B3-TraceId", "1234")
//!     .header("X-B3-SpanId", "5678");
//!
//! let context: Arc<dyn RequestContext> = Arc::new(context);
//! assert_eq!(context.onwards_request_headers().unwrap().len(), 2);
//! ```

use std::fmt;

/// A read-only source of headers for outgoing requests.
///
/// Both methods default to supplying nothing, so implementors only override
/// what their environment provides.
pub trait RequestContext: Send + Sync {
    /// Headers to forward on every outgoing request, if any.
    fn onwards_request_headers(&self) -> Option<Vec<(String, String)>> {
        None
    }

    /// A legacy single request id.
    ///
    /// Only used when [`onwards_request_headers`](Self::onwards_request_headers)
    /// returns `None` and the client configuration names a request id header.
    fn request_id(&self) -> Option<String> {
        None
    }
}

impl fmt::Debug for dyn RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RequestContext")
    }
}

/// A [`RequestContext`] holding a fixed set of headers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaticContext {
    headers: Vec<(String, String)>,
    request_id: Option<String>,
}

impl StaticContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an onwards header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets a legacy request id.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

impl RequestContext for StaticContext {
    fn onwards_request_headers(&self) -> Option<Vec<(String, String)>> {
        if self.headers.is_empty() {
            None
        } else {
            Some(self.headers.clone())
        }
    }

    fn request_id(&self) -> Option<String> {
        self.request_id.clone()
    }
}

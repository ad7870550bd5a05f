//! Error types for remote API calls.
//!
//! Every remote call reports failure through [`ApiError`]:
//!
//! - [`HttpError`]: the call failed after retries were exhausted, either with
//!   a non-2xx response or with no response at all
//! - [`InvalidResponseError`]: a 2xx response whose body was not JSON
//! - [`ConfigError`]: the client is not configured well enough to send
//!   anything
//! - [`UsageError`]: the caller supplied an invalid combination of
//!   arguments
//!
//! # Example
//!
//! ```rust,ignore
//! use dm_api_client::ApiError;
//!
//! match client.get_brief(1234).await {
//!     Ok(Some(brief)) => println!("{}", brief["briefs"]["title"]),
//!     Ok(None) => println!("client disabled"),
//!     Err(ApiError::Http(e)) if e.status_code == 404 => println!("no such brief"),
//!     Err(e) => eprintln!("failed: {e}"),
//! }
//! ```

use std::fmt;

use thiserror::Error;

use crate::error::ConfigError;

/// Status code reported when a request failed without any HTTP response.
pub const REQUEST_ERROR_STATUS_CODE: u16 = 503;

/// Message reported when nothing more specific is known about a failure.
pub const REQUEST_ERROR_MESSAGE: &str = "Unknown request failure in dm-api-client";

/// Message carried by [`InvalidResponseError`] for undecodable bodies.
pub const INVALID_JSON_MESSAGE: &str = "No JSON object could be decoded";

/// The message of a failed call.
///
/// APIs usually return a string in the `error` field of the body, but some
/// validation failures return an object keyed by field name.
#[derive(Clone, Debug, PartialEq)]
pub enum ErrorMessage {
    /// A human-readable message.
    Text(String),
    /// A structured message taken verbatim from the response body.
    Structured(serde_json::Value),
}

impl ErrorMessage {
    /// Returns the text when this is a [`ErrorMessage::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Structured(_) => None,
        }
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Structured(value) => write!(f, "{value}"),
        }
    }
}

impl From<String> for ErrorMessage {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for ErrorMessage {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// A remote call that ultimately failed.
///
/// `status_code` is the real HTTP status when a response was received, or
/// [`REQUEST_ERROR_STATUS_CODE`] when the transport failed before one arrived.
#[derive(Clone, Debug, Error)]
#[error("{message} (status: {status_code})")]
pub struct HttpError {
    /// The HTTP status code, or 503 for transport failures.
    pub status_code: u16,
    /// The server-supplied `error` field, or a synthesized description.
    pub message: ErrorMessage,
    /// The decoded response body, when the response carried JSON.
    pub body: Option<serde_json::Value>,
}

impl HttpError {
    /// Builds an error from a non-2xx response.
    ///
    /// The message is the body's `error` field when present, otherwise
    /// `fallback`.
    #[must_use]
    pub fn from_response(status_code: u16, body: Option<serde_json::Value>, fallback: String) -> Self {
        let message = match body.as_ref().and_then(|b| b.get("error")) {
            Some(serde_json::Value::String(text)) => ErrorMessage::Text(text.clone()),
            Some(serde_json::Value::Null) | None => ErrorMessage::Text(non_empty(fallback)),
            Some(other) => ErrorMessage::Structured(other.clone()),
        };

        Self {
            status_code,
            message,
            body,
        }
    }

    /// Builds an error for a transport failure that produced no response.
    #[must_use]
    pub fn from_transport(error: &reqwest::Error) -> Self {
        Self {
            status_code: REQUEST_ERROR_STATUS_CODE,
            message: ErrorMessage::Text(non_empty(format!("{error}\n{error:?}"))),
            body: None,
        }
    }

    /// Returns `true` for a 404 response.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        self.status_code == 404
    }
}

fn non_empty(message: String) -> String {
    if message.trim().is_empty() {
        REQUEST_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}

/// A successful response whose body could not be decoded as JSON.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message} (status: {status_code})")]
pub struct InvalidResponseError {
    /// The HTTP status code of the response.
    pub status_code: u16,
    /// Description of the decoding failure.
    pub message: String,
}

/// Invalid arguments detected before any request was sent.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    /// Two filters that cannot be combined were both supplied.
    #[error("Cannot get {resource} by both {first} and {second}")]
    ConflictingArguments {
        /// The resource being looked up.
        resource: &'static str,
        /// The first argument.
        first: &'static str,
        /// The second argument.
        second: &'static str,
    },

    /// None of the identifying arguments was supplied.
    #[error("Either {first} or {second} must be set")]
    MissingIdentifier {
        /// The first accepted argument.
        first: &'static str,
        /// The second accepted argument.
        second: &'static str,
    },

    /// A mutating call needs an acting user and none was given or configured.
    #[error("A user must be supplied for {method} {path} to record updated_by")]
    MissingUpdatedBy {
        /// The HTTP method of the call.
        method: String,
        /// The request path.
        path: String,
    },

    /// `updated_by` can only be merged into a JSON object body.
    #[error("Request body for {path} must be a JSON object to record updated_by")]
    BodyNotObject {
        /// The request path.
        path: String,
    },

    /// A filter struct could not be turned into query parameters.
    #[error("Invalid filter: {reason}")]
    InvalidFilter {
        /// The serialization failure.
        reason: String,
    },

    /// An audit type string outside the known set.
    #[error("Unknown audit type '{value}'")]
    UnknownAuditType {
        /// The rejected value.
        value: String,
    },
}

/// Unified error type for every client operation.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The client is missing required configuration.
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    /// The remote call failed.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The remote call succeeded but returned an undecodable body.
    #[error(transparent)]
    InvalidResponse(#[from] InvalidResponseError),

    /// The caller supplied invalid arguments.
    #[error(transparent)]
    Usage(#[from] UsageError),
}

impl ApiError {
    /// Returns the HTTP status code for remote failures.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http(e) => Some(e.status_code),
            Self::InvalidResponse(e) => Some(e.status_code),
            Self::Configuration(_) | Self::Usage(_) => None,
        }
    }

    /// Returns a human-readable message for the failure.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Http(e) => e.message.to_string(),
            Self::InvalidResponse(e) => e.message.clone(),
            Self::Configuration(e) => e.to_string(),
            Self::Usage(e) => e.to_string(),
        }
    }

    /// Returns `true` if the remote API answered 404.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_not_found())
    }
}

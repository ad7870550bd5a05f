//! Configuration error types for the Digital Marketplace API client.
//!
//! Configuration problems are always detected before any network I/O takes
//! place. They are fatal to the call that discovers them and are never
//! retried.
//!
//! # Example
//!
//! ```rust
//! use dm_api_client::{BaseUrl, ConfigError};
//!
//! let result = BaseUrl::new("not a url");
//! assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
//! ```

use thiserror::Error;

/// Errors raised when a client is missing, or has malformed, configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The client has no base URL to resolve request paths against.
    #[error("{client} has no URL configured")]
    MissingBaseUrl {
        /// The name of the client that attempted the request.
        client: &'static str,
    },

    /// The configured base URL could not be parsed or uses an unsupported scheme.
    #[error("Invalid base URL '{url}': {reason}. Expected an absolute http or https URL.")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
        /// Why the URL was rejected.
        reason: String,
    },

    /// A request path could not be resolved into a valid URL.
    #[error("Cannot build request URL from '{url}': {reason}")]
    InvalidUrl {
        /// The path or URL that failed to resolve.
        url: String,
        /// Why resolution failed.
        reason: String,
    },

    /// The underlying HTTP transport could not be constructed.
    #[error("Failed to create HTTP transport: {reason}")]
    TransportBuild {
        /// The reason reported by the transport.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_base_url_names_the_client() {
        let error = ConfigError::MissingBaseUrl {
            client: "DataApiClient",
        };
        assert_eq!(error.to_string(), "DataApiClient has no URL configured");
    }

    #[test]
    fn test_invalid_base_url_error_message() {
        let error = ConfigError::InvalidBaseUrl {
            url: "ftp://files".to_string(),
            reason: "unsupported scheme 'ftp'".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("ftp://files"));
        assert!(message.contains("unsupported scheme"));
        assert!(message.contains("http or https"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::TransportBuild {
            reason: "tls".to_string(),
        };
        let _: &dyn std::error::Error = &error;
    }
}

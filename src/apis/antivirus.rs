//! Client for the Antivirus API.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::clients::{ApiError, HttpClient};
use crate::config::ClientConfig;
use crate::context::RequestContext;
use crate::error::ConfigError;

const CLIENT_NAME: &str = "AntivirusApiClient";

/// Client for the Antivirus API.
#[derive(Debug, Clone)]
pub struct AntivirusApiClient {
    http_client: HttpClient,
}

// Verify AntivirusApiClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AntivirusApiClient>();
};

impl AntivirusApiClient {
    /// Creates an Antivirus API client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TransportBuild`] if the HTTP transport cannot
    /// be created.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            http_client: HttpClient::named(CLIENT_NAME, config)?,
        })
    }

    /// Attaches an ambient request context.
    #[must_use]
    pub fn with_context(self, context: Arc<dyn RequestContext>) -> Self {
        Self {
            http_client: self.http_client.with_context(context),
        }
    }

    /// Returns a client bound to a replacement configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TransportBuild`] if the HTTP transport cannot
    /// be created.
    pub fn configure(&self, config: ClientConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            http_client: self.http_client.with_config(config)?,
        })
    }

    /// Returns the underlying request executor.
    #[must_use]
    pub const fn http_client(&self) -> &HttpClient {
        &self.http_client
    }

    /// Fetches the Antivirus API health payload.
    pub async fn get_status(&self) -> Option<Value> {
        self.http_client.get_status().await
    }

    /// Scans a version of an S3 object and tags it with the result.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn scan_and_tag_s3_object(
        &self,
        bucket_name: &str,
        object_key: &str,
        object_version_id: &str,
    ) -> Result<Option<Value>, ApiError> {
        self.http_client
            .put(
                "/scan/s3-object",
                json!({
                    "bucketName": bucket_name,
                    "objectKey": object_key,
                    "objectVersionId": object_version_id,
                }),
            )
            .await
    }
}

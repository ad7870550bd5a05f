//! Client for the Data API.
//!
//! [`DataApiClient`] groups its operations by resource, one submodule per
//! resource, each adding an `impl DataApiClient` block.

mod agreements;
mod audit_events;
mod briefs;
mod direct_award;
mod frameworks;
mod services;
mod suppliers;
mod users;

use std::sync::Arc;

use serde_json::Value;

use crate::clients::HttpClient;
use crate::config::ClientConfig;
use crate::context::RequestContext;
use crate::error::ConfigError;

pub use audit_events::AuditEventFilter;
pub use briefs::BriefFilter;
pub use direct_award::{ProjectFilter, ProjectSearchFilter};
pub use services::ServiceFilter;
pub use suppliers::SupplierFilter;
pub use users::{UserFilter, UserLookup};

const CLIENT_NAME: &str = "DataApiClient";

/// Client for the Data API.
///
/// # Example
///
/// ```rust,ignore
/// use dm_api_client::{DataApiClient, ClientConfig, BaseUrl, AuthToken};
///
/// let data = DataApiClient::new(ClientConfig::new(
///     BaseUrl::new("http://localhost:5000")?,
///     AuthToken::new("myToken"),
/// ))?;
///
/// if let Some(service) = data.get_service(1_234_567_890).await? {
///     println!("{}", service["services"]["serviceName"]);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DataApiClient {
    http_client: HttpClient,
}

// Verify DataApiClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DataApiClient>();
};

impl DataApiClient {
    /// Creates a Data API client.
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

    /// Fetches the Data API health payload.
    pub async fn get_status(&self) -> Option<Value> {
        self.http_client.get_status().await
    }
}

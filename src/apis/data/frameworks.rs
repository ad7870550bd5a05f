//! Framework operations.

use serde_json::{json, Value};

use super::DataApiClient;
use crate::apis::segment;
use crate::clients::{ApiError, QueryParams};

impl DataApiClient {
    /// Lists every framework.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn find_frameworks(&self) -> Result<Option<Value>, ApiError> {
        self.http_client.get("/frameworks", QueryParams::new()).await
    }

    /// Fetches a framework by slug.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn get_framework(&self, slug: &str) -> Result<Option<Value>, ApiError> {
        self.http_client
            .get(&format!("/frameworks/{}", segment(slug)), QueryParams::new())
            .await
    }

    /// Updates a framework.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if no user is available or the request fails.
    pub async fn update_framework(
        &self,
        framework_slug: &str,
        data: Value,
        user: Option<&str>,
    ) -> Result<Option<Value>, ApiError> {
        self.http_client
            .post_with_updated_by(
                &format!("/frameworks/{}", segment(framework_slug)),
                json!({ "frameworks": data }),
                user,
            )
            .await
    }
}

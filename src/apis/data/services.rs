//! Live service operations.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::DataApiClient;
use crate::apis::{absent_on, filter_query, segment};
use crate::clients::{ApiError, PagedIter, QueryParams};

const PAGE_KEYS: &[&str] = &["services"];

/// Filters for [`DataApiClient::find_services`].
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ServiceFilter {
    /// Only services of this supplier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<u64>,

    /// Only services on this framework.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,

    /// Only services in this lot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lot: Option<String>,

    /// Only services with this status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl DataApiClient {
    /// Fetches a service, or `None` if there is no such service.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for failures other than 404.
    pub async fn get_service(&self, service_id: u64) -> Result<Option<Value>, ApiError> {
        let result = self
            .http_client
            .get(&format!("/services/{service_id}"), QueryParams::new())
            .await;
        absent_on(result, &[404])
    }

    /// Lists one page of services.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn find_services(&self, filter: &ServiceFilter) -> Result<Option<Value>, ApiError> {
        self.http_client
            .get("/services", filter_query(filter)?)
            .await
    }

    /// Iterates over every service matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the first page cannot be fetched.
    pub async fn find_services_iter(
        &self,
        filter: &ServiceFilter,
    ) -> Result<PagedIter<'_>, ApiError> {
        let first_page = self.find_services(filter).await?;
        Ok(PagedIter::new(&self.http_client, first_page, PAGE_KEYS))
    }

    /// Updates a live service.
    ///
    /// `wait_for_index` asks the API to finish reindexing before answering.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if no user is available or the request fails.
    pub async fn update_service(
        &self,
        service_id: u64,
        service: Value,
        user: Option<&str>,
        user_role: Option<&str>,
        wait_for_index: bool,
    ) -> Result<Option<Value>, ApiError> {
        let mut path = format!("/services/{service_id}?wait-for-index={wait_for_index}");
        if let Some(role) = user_role.filter(|role| !role.is_empty()) {
            path.push_str(&format!("&user-role={}", segment(role)));
        }

        self.http_client
            .post_with_updated_by(&path, json!({ "services": service }), user)
            .await
    }

    /// Changes a live service's status.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if no user is available or the request fails.
    pub async fn update_service_status(
        &self,
        service_id: u64,
        status: &str,
        user: Option<&str>,
        wait_for_index: bool,
    ) -> Result<Option<Value>, ApiError> {
        self.http_client
            .post_with_updated_by(
                &format!(
                    "/services/{service_id}/status/{}?wait-for-index={wait_for_index}",
                    segment(status)
                ),
                json!({}),
                user,
            )
            .await
    }
}

//! Audit event operations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::DataApiClient;
use crate::apis::filter_query;
use crate::audit::AuditType;
use crate::clients::{ApiError, PagedIter, QueryParams};

const PAGE_KEYS: &[&str] = &["auditEvents"];

/// Filters for [`DataApiClient::find_audit_events`].
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AuditEventFilter {
    /// Only events of this type.
    #[serde(rename = "audit-type", skip_serializing_if = "Option::is_none")]
    pub audit_type: Option<AuditType>,

    /// Only events recorded on this date.
    #[serde(rename = "audit-date", skip_serializing_if = "Option::is_none")]
    pub audit_date: Option<NaiveDate>,

    /// Page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,

    /// Filter on acknowledgement state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acknowledged: Option<String>,

    /// Type of the audited object, e.g. `suppliers`.
    #[serde(rename = "object-type", skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,

    /// Id of the audited object.
    #[serde(rename = "object-id", skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,

    /// Newest events first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_first: Option<bool>,

    /// Only the earliest matching event for each object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earliest_for_each_object: Option<bool>,

    /// Only events recorded for this user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Only events whose data names this supplier.
    #[serde(rename = "data-supplier-id", skip_serializing_if = "Option::is_none")]
    pub data_supplier_id: Option<u64>,
}

impl DataApiClient {
    /// Lists one page of audit events.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn find_audit_events(
        &self,
        filter: &AuditEventFilter,
    ) -> Result<Option<Value>, ApiError> {
        self.http_client
            .get("/audit-events", filter_query(filter)?)
            .await
    }

    /// Iterates over every audit event matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the first page cannot be fetched.
    pub async fn find_audit_events_iter(
        &self,
        filter: &AuditEventFilter,
    ) -> Result<PagedIter<'_>, ApiError> {
        let first_page = self.find_audit_events(filter).await?;
        Ok(PagedIter::new(&self.http_client, first_page, PAGE_KEYS))
    }

    /// Fetches a single audit event.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn get_audit_event(&self, audit_event_id: u64) -> Result<Option<Value>, ApiError> {
        self.http_client
            .get(&format!("/audit-events/{audit_event_id}"), QueryParams::new())
            .await
    }

    /// Records an audit event.
    ///
    /// `data` defaults to an empty object.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn create_audit_event(
        &self,
        audit_type: AuditType,
        user: Option<&str>,
        data: Option<Value>,
        object_type: Option<&str>,
        object_id: Option<u64>,
    ) -> Result<Option<Value>, ApiError> {
        let mut payload = Map::new();
        payload.insert("type".to_string(), json!(audit_type.as_str()));
        payload.insert(
            "data".to_string(),
            data.unwrap_or_else(|| Value::Object(Map::new())),
        );
        if let Some(user) = user {
            payload.insert("user".to_string(), json!(user));
        }
        if let Some(object_type) = object_type {
            payload.insert("objectType".to_string(), json!(object_type));
        }
        if let Some(object_id) = object_id {
            payload.insert("objectId".to_string(), json!(object_id));
        }

        self.http_client
            .post("/audit-events", json!({ "auditEvents": payload }))
            .await
    }

    /// Marks an audit event as acknowledged.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if no user is available or the request fails.
    pub async fn acknowledge_audit_event(
        &self,
        audit_event_id: u64,
        user: Option<&str>,
    ) -> Result<Option<Value>, ApiError> {
        self.http_client
            .post_with_updated_by(
                &format!("/audit-events/{audit_event_id}/acknowledge"),
                json!({}),
                user,
            )
            .await
    }
}

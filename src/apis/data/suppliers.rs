//! Supplier operations.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::DataApiClient;
use crate::apis::{filter_query, segment};
use crate::clients::{ApiError, PagedIter, QueryParams};

const PAGE_KEYS: &[&str] = &["suppliers"];

/// Filters for [`DataApiClient::find_suppliers`].
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SupplierFilter {
    /// Name prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Name search.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Only suppliers with services on this framework.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,

    /// DUNS number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duns_number: Option<String>,

    /// Companies House registration number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_registration_number: Option<String>,
}

impl DataApiClient {
    /// Lists one page of suppliers.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn find_suppliers(&self, filter: &SupplierFilter) -> Result<Option<Value>, ApiError> {
        self.http_client
            .get("/suppliers", filter_query(filter)?)
            .await
    }

    /// Iterates over every supplier matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the first page cannot be fetched.
    pub async fn find_suppliers_iter(
        &self,
        filter: &SupplierFilter,
    ) -> Result<PagedIter<'_>, ApiError> {
        let first_page = self.find_suppliers(filter).await?;
        Ok(PagedIter::new(&self.http_client, first_page, PAGE_KEYS))
    }

    /// Fetches a supplier.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn get_supplier(&self, supplier_id: u64) -> Result<Option<Value>, ApiError> {
        self.http_client
            .get(&format!("/suppliers/{supplier_id}"), QueryParams::new())
            .await
    }

    /// Creates a supplier.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn create_supplier(&self, supplier: Value) -> Result<Option<Value>, ApiError> {
        self.http_client
            .post("/suppliers", json!({ "suppliers": supplier }))
            .await
    }

    /// Updates supplier details.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if no user is available or the request fails.
    pub async fn update_supplier(
        &self,
        supplier_id: u64,
        supplier: Value,
        user: Option<&str>,
    ) -> Result<Option<Value>, ApiError> {
        self.http_client
            .post_with_updated_by(
                &format!("/suppliers/{supplier_id}"),
                json!({ "suppliers": supplier }),
                user,
            )
            .await
    }

    /// Updates one of a supplier's contacts.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if no user is available or the request fails.
    pub async fn update_contact_information(
        &self,
        supplier_id: u64,
        contact_id: u64,
        contact: Value,
        user: Option<&str>,
    ) -> Result<Option<Value>, ApiError> {
        self.http_client
            .post_with_updated_by(
                &format!("/suppliers/{supplier_id}/contact-information/{contact_id}"),
                json!({ "contactInformation": contact }),
                user,
            )
            .await
    }

    /// Registers a supplier's interest in a framework.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if no user is available or the request fails.
    pub async fn register_framework_interest(
        &self,
        supplier_id: u64,
        framework_slug: &str,
        user: Option<&str>,
    ) -> Result<Option<Value>, ApiError> {
        self.http_client
            .put_with_updated_by(
                &format!("/suppliers/{supplier_id}/frameworks/{}", segment(framework_slug)),
                json!({}),
                user,
            )
            .await
    }

    /// Fetches a supplier's declaration for a framework.
    ///
    /// Returns `{"declaration": ...}` extracted from the framework interest.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn get_supplier_declaration(
        &self,
        supplier_id: u64,
        framework_slug: &str,
    ) -> Result<Option<Value>, ApiError> {
        let interest = self
            .http_client
            .get(
                &format!("/suppliers/{supplier_id}/frameworks/{}", segment(framework_slug)),
                QueryParams::new(),
            )
            .await?;

        Ok(interest.map(|interest| {
            let declaration = interest
                .pointer("/frameworkInterest/declaration")
                .cloned()
                .unwrap_or(Value::Null);
            json!({ "declaration": declaration })
        }))
    }

    /// Replaces a supplier's declaration for a framework.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if no user is available or the request fails.
    pub async fn set_supplier_declaration(
        &self,
        supplier_id: u64,
        framework_slug: &str,
        declaration: Value,
        user: Option<&str>,
    ) -> Result<Option<Value>, ApiError> {
        self.http_client
            .put_with_updated_by(
                &format!(
                    "/suppliers/{supplier_id}/frameworks/{}/declaration",
                    segment(framework_slug)
                ),
                json!({ "declaration": declaration }),
                user,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_omits_unset_fields() {
        let filter = SupplierFilter {
            prefix: Some("a".to_string()),
            framework: Some("g-cloud-12".to_string()),
            ..Default::default()
        };
        let pairs = filter_query(&filter).unwrap().pairs();
        assert_eq!(
            pairs,
            vec![
                ("framework".to_string(), "g-cloud-12".to_string()),
                ("prefix".to_string(), "a".to_string()),
            ]
        );
    }
}

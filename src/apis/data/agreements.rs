//! Framework agreement operations.

use serde_json::{json, Value};

use super::DataApiClient;
use crate::clients::{ApiError, QueryParams};

impl DataApiClient {
    /// Fetches a framework agreement.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn get_framework_agreement(
        &self,
        framework_agreement_id: u64,
    ) -> Result<Option<Value>, ApiError> {
        self.http_client
            .get(
                &format!("/agreements/{framework_agreement_id}"),
                QueryParams::new(),
            )
            .await
    }

    /// Creates a framework agreement for a supplier.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if no user is available or the request fails.
    pub async fn create_framework_agreement(
        &self,
        supplier_id: u64,
        framework_slug: &str,
        user: Option<&str>,
    ) -> Result<Option<Value>, ApiError> {
        self.http_client
            .post_with_updated_by(
                "/agreements",
                json!({
                    "agreement": {
                        "supplierId": supplier_id,
                        "frameworkSlug": framework_slug,
                    }
                }),
                user,
            )
            .await
    }

    /// Signs a framework agreement.
    ///
    /// `signed_agreement_details` is sent only when given.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if no user is available or the request fails.
    pub async fn sign_framework_agreement(
        &self,
        framework_agreement_id: u64,
        user: Option<&str>,
        signed_agreement_details: Option<Value>,
    ) -> Result<Option<Value>, ApiError> {
        let body = signed_agreement_details.map_or_else(
            || json!({}),
            |details| json!({ "agreement": { "signedAgreementDetails": details } }),
        );

        self.http_client
            .post_with_updated_by(
                &format!("/agreements/{framework_agreement_id}/sign"),
                body,
                user,
            )
            .await
    }
}

//! Buyer brief operations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::DataApiClient;
use crate::apis::filter_query;
use crate::clients::{ApiError, PagedIter, QueryParams};

const PAGE_KEYS: &[&str] = &["briefs"];

/// Filters for [`DataApiClient::find_briefs`].
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct BriefFilter {
    /// Only briefs owned by this user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,

    /// Only briefs with these statuses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Vec<String>>,

    /// Only briefs on this framework.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,

    /// Only briefs in this lot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lot: Option<String>,

    /// Page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Exclude briefs created by automated users.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub human: Option<bool>,

    /// Include owning users in the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_users: Option<bool>,

    /// Include clarification questions in the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_clarification_questions: Option<bool>,

    /// Only briefs that closed on this date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_on: Option<NaiveDate>,

    /// Only briefs withdrawn on this date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub withdrawn_on: Option<NaiveDate>,

    /// Only briefs cancelled on this date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_on: Option<NaiveDate>,

    /// Only briefs marked unsuccessful on this date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unsuccessful_on: Option<NaiveDate>,
}

impl DataApiClient {
    /// Creates a brief on a framework lot.
    ///
    /// `page_questions` names the questions being answered, so the API only
    /// validates those.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if no user is available or the request fails.
    pub async fn create_brief(
        &self,
        framework_slug: &str,
        lot_slug: &str,
        user_id: u64,
        data: Value,
        updated_by: Option<&str>,
        page_questions: &[&str],
    ) -> Result<Option<Value>, ApiError> {
        let mut brief = match data {
            Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        brief.insert("frameworkSlug".to_string(), json!(framework_slug));
        brief.insert("lot".to_string(), json!(lot_slug));
        brief.insert("userId".to_string(), json!(user_id));

        self.http_client
            .post_with_updated_by(
                "/briefs",
                json!({ "briefs": brief, "page_questions": page_questions }),
                updated_by,
            )
            .await
    }

    /// Fetches a brief.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn get_brief(&self, brief_id: u64) -> Result<Option<Value>, ApiError> {
        self.http_client
            .get(&format!("/briefs/{brief_id}"), QueryParams::new())
            .await
    }

    /// Lists one page of briefs.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn find_briefs(&self, filter: &BriefFilter) -> Result<Option<Value>, ApiError> {
        self.http_client.get("/briefs", filter_query(filter)?).await
    }

    /// Iterates over every brief matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the first page cannot be fetched.
    pub async fn find_briefs_iter(&self, filter: &BriefFilter) -> Result<PagedIter<'_>, ApiError> {
        let first_page = self.find_briefs(filter).await?;
        Ok(PagedIter::new(&self.http_client, first_page, PAGE_KEYS))
    }

    /// Publishes a draft brief.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if no user is available or the request fails.
    pub async fn publish_brief(
        &self,
        brief_id: u64,
        user: Option<&str>,
    ) -> Result<Option<Value>, ApiError> {
        self.http_client
            .post_with_updated_by(&format!("/briefs/{brief_id}/publish"), json!({}), user)
            .await
    }

    /// Deletes a draft brief.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if no user is available or the request fails.
    pub async fn delete_brief(
        &self,
        brief_id: u64,
        user: Option<&str>,
    ) -> Result<Option<Value>, ApiError> {
        self.http_client
            .delete_with_updated_by(&format!("/briefs/{brief_id}"), json!({}), user)
            .await
    }
}

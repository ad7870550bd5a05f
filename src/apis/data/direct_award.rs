//! Direct award project operations.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::DataApiClient;
use crate::apis::filter_query;
use crate::clients::{ApiError, PagedIter, QueryParams};

const PROJECT_PAGE_KEYS: &[&str] = &["projects"];
const SEARCH_PAGE_KEYS: &[&str] = &["searches"];

/// Filters for [`DataApiClient::find_direct_award_projects`].
#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    /// Only projects owned by this user.
    #[serde(rename = "user-id", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,

    /// Filter on whether an outcome was recorded.
    #[serde(rename = "having-outcome", skip_serializing_if = "Option::is_none")]
    pub having_outcome: Option<bool>,

    /// Filter on lock state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,

    /// Page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Newest projects first.
    #[serde(rename = "latest-first", skip_serializing_if = "Option::is_none")]
    pub latest_first: Option<bool>,

    /// Embed project users in the response; sent as `include=users`.
    #[serde(
        rename = "include",
        skip_serializing_if = "std::ops::Not::not",
        serialize_with = "serialize_include_users"
    )]
    pub with_users: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_include_users<S: serde::Serializer>(_: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str("users")
}

/// Filters for [`DataApiClient::find_direct_award_project_searches`].
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProjectSearchFilter {
    /// Only searches saved by this user.
    #[serde(rename = "user-id", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,

    /// Page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Only the active search.
    #[serde(rename = "only-active", skip_serializing_if = "Option::is_none")]
    pub only_active: Option<bool>,
}

impl DataApiClient {
    /// Lists one page of direct award projects.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn find_direct_award_projects(
        &self,
        filter: &ProjectFilter,
    ) -> Result<Option<Value>, ApiError> {
        self.http_client
            .get("/direct-award/projects", filter_query(filter)?)
            .await
    }

    /// Iterates over every project matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the first page cannot be fetched.
    pub async fn find_direct_award_projects_iter(
        &self,
        filter: &ProjectFilter,
    ) -> Result<PagedIter<'_>, ApiError> {
        let first_page = self.find_direct_award_projects(filter).await?;
        Ok(PagedIter::new(&self.http_client, first_page, PROJECT_PAGE_KEYS))
    }

    /// Fetches a project.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn get_direct_award_project(&self, project_id: u64) -> Result<Option<Value>, ApiError> {
        self.http_client
            .get(
                &format!("/direct-award/projects/{project_id}"),
                QueryParams::new(),
            )
            .await
    }

    /// Creates a project owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if no user is available or the request fails.
    pub async fn create_direct_award_project(
        &self,
        user_id: u64,
        user_email: Option<&str>,
        project_name: &str,
    ) -> Result<Option<Value>, ApiError> {
        self.http_client
            .post_with_updated_by(
                "/direct-award/projects",
                json!({ "project": { "name": project_name, "userId": user_id } }),
                user_email,
            )
            .await
    }

    /// Lists one page of searches saved to a project.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn find_direct_award_project_searches(
        &self,
        project_id: u64,
        filter: &ProjectSearchFilter,
    ) -> Result<Option<Value>, ApiError> {
        self.http_client
            .get(
                &format!("/direct-award/projects/{project_id}/searches"),
                filter_query(filter)?,
            )
            .await
    }

    /// Iterates over every search saved to a project.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the first page cannot be fetched.
    pub async fn find_direct_award_project_searches_iter(
        &self,
        project_id: u64,
        filter: &ProjectSearchFilter,
    ) -> Result<PagedIter<'_>, ApiError> {
        let first_page = self
            .find_direct_award_project_searches(project_id, filter)
            .await?;
        Ok(PagedIter::new(&self.http_client, first_page, SEARCH_PAGE_KEYS))
    }

    /// Saves a search to a project.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if no user is available or the request fails.
    pub async fn create_direct_award_project_search(
        &self,
        user_id: u64,
        user_email: Option<&str>,
        project_id: u64,
        search_url: &str,
    ) -> Result<Option<Value>, ApiError> {
        self.http_client
            .post_with_updated_by(
                &format!("/direct-award/projects/{project_id}/searches"),
                json!({ "search": { "searchUrl": search_url, "userId": user_id } }),
                user_email,
            )
            .await
    }

    /// Locks a project so its saved search can no longer change.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if no user is available or the request fails.
    pub async fn lock_direct_award_project(
        &self,
        user_email: Option<&str>,
        project_id: u64,
    ) -> Result<Option<Value>, ApiError> {
        self.http_client
            .post_with_updated_by(
                &format!("/direct-award/projects/{project_id}/lock"),
                json!({}),
                user_email,
            )
            .await
    }
}

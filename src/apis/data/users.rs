//! User operations.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::DataApiClient;
use crate::apis::{absent_on, filter_query};
use crate::clients::{ApiError, PagedIter, QueryParams, UsageError};

const PAGE_KEYS: &[&str] = &["users"];

/// Updater recorded when a password is changed outside a session.
const ANONYMOUS_UPDATER: &str = "no logged-in user";

/// Filters for [`DataApiClient::find_users`].
///
/// `supplier_id` and `role` cannot be combined.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Only users belonging to this supplier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<u64>,

    /// Only users with this role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Filter on personal data removal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_data_removed: Option<bool>,

    /// Filter on user research opt-in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_research_opted_in: Option<bool>,
}

/// How to identify a single user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLookup {
    /// By numeric id.
    Id(u64),
    /// By email address.
    EmailAddress(String),
}

impl UserLookup {
    /// Builds a lookup from optional identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError`] if both or neither identifier is given.
    pub fn from_parts(
        user_id: Option<u64>,
        email_address: Option<&str>,
    ) -> Result<Self, UsageError> {
        match (user_id, email_address) {
            (Some(_), Some(_)) => Err(UsageError::ConflictingArguments {
                resource: "user",
                first: "user_id",
                second: "email_address",
            }),
            (Some(id), None) => Ok(Self::Id(id)),
            (None, Some(email)) => Ok(Self::EmailAddress(email.to_string())),
            (None, None) => Err(UsageError::MissingIdentifier {
                first: "user_id",
                second: "email_address",
            }),
        }
    }
}

impl DataApiClient {
    /// Creates a user.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the request fails.
    pub async fn create_user(&self, user: Value) -> Result<Option<Value>, ApiError> {
        self.http_client
            .post("/users", json!({ "users": user }))
            .await
    }

    /// Lists one page of users.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::ConflictingArguments`] if both `supplier_id` and
    /// `role` are set, or [`ApiError`] if the request fails.
    pub async fn find_users(&self, filter: &UserFilter) -> Result<Option<Value>, ApiError> {
        if filter.supplier_id.is_some() && filter.role.is_some() {
            return Err(UsageError::ConflictingArguments {
                resource: "users",
                first: "supplier_id",
                second: "role",
            }
            .into());
        }

        self.http_client.get("/users", filter_query(filter)?).await
    }

    /// Iterates over every user matching `filter`.
    ///
    /// # Errors
    ///
    /// See [`DataApiClient::find_users`].
    pub async fn find_users_iter(&self, filter: &UserFilter) -> Result<PagedIter<'_>, ApiError> {
        let first_page = self.find_users(filter).await?;
        Ok(PagedIter::new(&self.http_client, first_page, PAGE_KEYS))
    }

    /// Fetches a single user, or `None` if there is no such user.
    ///
    /// Lookups by email return a `users` list; its first entry is unwrapped
    /// so both lookups return the same shape.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for failures other than 404.
    pub async fn get_user(&self, lookup: UserLookup) -> Result<Option<Value>, ApiError> {
        let result = match &lookup {
            UserLookup::Id(user_id) => {
                self.http_client
                    .get(&format!("/users/{user_id}"), QueryParams::new())
                    .await
            }
            UserLookup::EmailAddress(email) => {
                self.http_client
                    .get("/users", QueryParams::new().with("email_address", email))
                    .await
            }
        };

        Ok(absent_on(result, &[404])?.map(|mut user| {
            if let Some(users) = user.get_mut("users") {
                if let Some(first) = users.as_array().and_then(|list| list.first()).cloned() {
                    *users = first;
                }
            }
            user
        }))
    }

    /// Checks a user's credentials.
    ///
    /// Returns `None` when the API rejects the credentials (400, 403 or 404)
    /// or answers with an empty body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for any other failure.
    pub async fn authenticate_user(
        &self,
        email_address: &str,
        password: &str,
    ) -> Result<Option<Value>, ApiError> {
        let result = self
            .http_client
            .post(
                "/users/auth",
                json!({
                    "authUsers": {
                        "emailAddress": email_address,
                        "password": password,
                    }
                }),
            )
            .await;

        Ok(absent_on(result, &[400, 403, 404])?.filter(|response| !is_empty_json(response)))
    }

    /// Changes a user's password.
    ///
    /// Returns `Ok(true)` if the API accepted the change and `Ok(false)` if
    /// it answered with an error.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] for failures other than an HTTP error, such as a
    /// missing base URL.
    pub async fn update_user_password(
        &self,
        user_id: u64,
        new_password: &str,
        updater: Option<&str>,
    ) -> Result<bool, ApiError> {
        let result = self
            .http_client
            .post_with_updated_by(
                &format!("/users/{user_id}"),
                json!({ "users": { "password": new_password } }),
                Some(updater.unwrap_or(ANONYMOUS_UPDATER)),
            )
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(ApiError::Http(error)) => {
                tracing::debug!(user_id, error = %error, "Password update failed");
                Ok(false)
            }
            Err(error) => Err(error),
        }
    }
}

fn is_empty_json(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_rejects_both_identifiers() {
        let result = UserLookup::from_parts(Some(1), Some("a@example.com"));
        assert!(matches!(result, Err(UsageError::ConflictingArguments { .. })));
    }

    #[test]
    fn test_lookup_requires_an_identifier() {
        let result = UserLookup::from_parts(None, None);
        assert!(matches!(result, Err(UsageError::MissingIdentifier { .. })));
    }

    #[test]
    fn test_lookup_from_single_identifier() {
        assert_eq!(UserLookup::from_parts(Some(7), None), Ok(UserLookup::Id(7)));
        assert_eq!(
            UserLookup::from_parts(None, Some("a@example.com")),
            Ok(UserLookup::EmailAddress("a@example.com".to_string()))
        );
    }

    #[test]
    fn test_empty_json_detection() {
        assert!(is_empty_json(&json!({})));
        assert!(is_empty_json(&Value::Null));
        assert!(!is_empty_json(&json!({"users": {}})));
    }
}

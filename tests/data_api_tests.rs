//! Integration tests for the Data API client.

use dm_api_client::{
    ApiError, AuditEventFilter, AuditType, AuthToken, BaseUrl, BriefFilter, ClientConfig,
    ConfigError, DataApiClient, ProjectFilter, RetryPolicy, ServiceFilter, SupplierFilter,
    UsageError, UserFilter, UserLookup,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_client(server: &MockServer) -> DataApiClient {
    let config = ClientConfig::builder()
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .auth_token(AuthToken::new("tok"))
        .retry(RetryPolicy::none())
        .build();
    DataApiClient::new(config).unwrap()
}

// ============================================================================
// Audit events
// ============================================================================

#[tokio::test]
async fn test_find_audit_events_sends_filters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/audit-events"))
        .and(query_param("audit-type", "update_service"))
        .and(query_param("latest_first", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"auditEvents": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let filter = AuditEventFilter {
        audit_type: Some(AuditType::UpdateService),
        latest_first: Some(true),
        ..Default::default()
    };

    let result = client.find_audit_events(&filter).await.unwrap();
    assert_eq!(result, Some(json!({"auditEvents": []})));
}

#[tokio::test]
async fn test_create_audit_event_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/audit-events"))
        .and(body_json(json!({
            "auditEvents": {
                "type": "contact_update",
                "data": {},
                "user": "admin@example.com",
                "objectType": "suppliers",
                "objectId": 123
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"auditEvents": {"id": 1}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    client
        .create_audit_event(
            AuditType::ContactUpdate,
            Some("admin@example.com"),
            None,
            Some("suppliers"),
            Some(123),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_find_audit_events_iter_follows_links() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/audit-events"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "auditEvents": [{"id": 3}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/audit-events"))
        .and(query_param_is_missing("page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "auditEvents": [{"id": 1}, {"id": 2}],
            "links": {"next": format!("{}/audit-events?page=2", server.uri())}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let events = client
        .find_audit_events_iter(&AuditEventFilter::default())
        .await
        .unwrap()
        .collect_all()
        .await
        .unwrap();

    assert_eq!(events, vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3})]);
}

#[tokio::test]
async fn test_acknowledge_audit_event_records_user() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/audit-events/9/acknowledge"))
        .and(body_json(json!({"updated_by": "reviewer"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"auditEvents": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    client
        .acknowledge_audit_event(9, Some("reviewer"))
        .await
        .unwrap();
}

// ============================================================================
// Suppliers
// ============================================================================

#[tokio::test]
async fn test_find_suppliers_with_prefix() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/suppliers"))
        .and(query_param("prefix", "a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"suppliers": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let filter = SupplierFilter {
        prefix: Some("a".to_string()),
        ..Default::default()
    };
    client.find_suppliers(&filter).await.unwrap();
}

#[tokio::test]
async fn test_get_supplier_declaration_extracts_declaration() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/suppliers/1/frameworks/g-cloud-12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "frameworkInterest": {"declaration": {"status": "complete"}, "onFramework": true}
        })))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let declaration = client
        .get_supplier_declaration(1, "g-cloud-12")
        .await
        .unwrap();

    assert_eq!(declaration, Some(json!({"declaration": {"status": "complete"}})));
}

#[tokio::test]
async fn test_set_supplier_declaration() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/suppliers/1/frameworks/g-cloud-12/declaration"))
        .and(body_json(json!({
            "declaration": {"status": "started"},
            "updated_by": "supplier@example.com"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"declaration": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    client
        .set_supplier_declaration(
            1,
            "g-cloud-12",
            json!({"status": "started"}),
            Some("supplier@example.com"),
        )
        .await
        .unwrap();
}

// ============================================================================
// Users
// ============================================================================

#[tokio::test]
async fn test_find_users_rejects_supplier_and_role() {
    let server = MockServer::start().await;
    let client = create_test_client(&server);

    let filter = UserFilter {
        supplier_id: Some(1),
        role: Some("buyer".to_string()),
        ..Default::default()
    };
    let result = client.find_users(&filter).await;

    assert!(matches!(
        result,
        Err(ApiError::Usage(UsageError::ConflictingArguments { .. }))
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_user_by_email_unwraps_list() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("email_address", "a@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{"id": 5, "emailAddress": "a@example.com"}]
        })))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let user = client
        .get_user(UserLookup::EmailAddress("a@example.com".to_string()))
        .await
        .unwrap();

    assert_eq!(
        user,
        Some(json!({"users": {"id": 5, "emailAddress": "a@example.com"}}))
    );
}

#[tokio::test]
async fn test_get_user_not_found_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Not found"})))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    assert!(client.get_user(UserLookup::Id(404)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_authenticate_user_rejection_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/auth"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"error": "locked"})))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let result = client
        .authenticate_user("a@example.com", "hunter2")
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_authenticate_user_server_error_is_raised() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/auth"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let error = client
        .authenticate_user("a@example.com", "hunter2")
        .await
        .unwrap_err();
    assert_eq!(error.status_code(), Some(500));
}

#[tokio::test]
async fn test_update_user_password_reports_outcome() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/1"))
        .and(body_json(json!({
            "users": {"password": "new-password"},
            "updated_by": "no logged-in user"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"users": {}})))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/users/2"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "bad"})))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    assert!(client.update_user_password(1, "new-password", None).await.unwrap());
    assert!(!client.update_user_password(2, "new-password", None).await.unwrap());
}

#[tokio::test]
async fn test_update_user_password_raises_configuration_error() {
    let client = DataApiClient::new(ClientConfig::default()).unwrap();
    let result = client.update_user_password(1, "new-password", None).await;

    assert!(matches!(
        result,
        Err(ApiError::Configuration(ConfigError::MissingBaseUrl { .. }))
    ));
}

// ============================================================================
// Services
// ============================================================================

#[tokio::test]
async fn test_get_service_not_found_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services/123"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Not found"})))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    assert!(client.get_service(123).await.unwrap().is_none());
}

#[tokio::test]
async fn test_find_services_omits_unset_filters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/services"))
        .and(query_param("framework", "g-cloud-12"))
        .and(query_param_is_missing("lot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"services": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let filter = ServiceFilter {
        framework: Some("g-cloud-12".to_string()),
        ..Default::default()
    };
    client.find_services(&filter).await.unwrap();
}

#[tokio::test]
async fn test_update_service_sends_flags() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/123"))
        .and(query_param("wait-for-index", "false"))
        .and(query_param("user-role", "admin"))
        .and(body_json(json!({
            "services": {"serviceName": "New name"},
            "updated_by": "admin@example.com"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"services": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    client
        .update_service(
            123,
            json!({"serviceName": "New name"}),
            Some("admin@example.com"),
            Some("admin"),
            false,
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_service_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/services/123/status/disabled"))
        .and(query_param("wait-for-index", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"services": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    client
        .update_service_status(123, "disabled", Some("admin@example.com"), true)
        .await
        .unwrap();
}

// ============================================================================
// Frameworks, briefs, agreements, projects
// ============================================================================

#[tokio::test]
async fn test_update_framework() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/frameworks/g-cloud-12"))
        .and(body_json(json!({
            "frameworks": {"status": "live"},
            "updated_by": "admin"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"frameworks": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    client
        .update_framework("g-cloud-12", json!({"status": "live"}), Some("admin"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_brief_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/briefs"))
        .and(body_json(json!({
            "briefs": {
                "title": "A brief",
                "frameworkSlug": "digital-outcomes-and-specialists",
                "lot": "digital-specialists",
                "userId": 7
            },
            "page_questions": ["title"],
            "updated_by": "buyer@example.com"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"briefs": {"id": 1}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    client
        .create_brief(
            "digital-outcomes-and-specialists",
            "digital-specialists",
            7,
            json!({"title": "A brief"}),
            Some("buyer@example.com"),
            &["title"],
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_find_briefs_repeats_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/briefs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"briefs": []})))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let filter = BriefFilter {
        status: Some(vec!["live".to_string(), "closed".to_string()]),
        ..Default::default()
    };
    client.find_briefs(&filter).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("status=live&status=closed"));
}

#[tokio::test]
async fn test_sign_framework_agreement_without_details() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/agreements/12/sign"))
        .and(body_json(json!({"updated_by": "supplier"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"agreement": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    client
        .sign_framework_agreement(12, Some("supplier"), None)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_find_direct_award_projects_with_users() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/direct-award/projects"))
        .and(query_param("include", "users"))
        .and(query_param("user-id", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"projects": [{"id": 1}]})))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let filter = ProjectFilter {
        user_id: Some(3),
        with_users: true,
        ..Default::default()
    };
    let projects = client
        .find_direct_award_projects_iter(&filter)
        .await
        .unwrap()
        .collect_all()
        .await
        .unwrap();

    assert_eq!(projects, vec![json!({"id": 1})]);
}

#[tokio::test]
async fn test_disabled_data_client_iter_is_empty() {
    let config = ClientConfig::builder().enabled(false).build();
    let client = DataApiClient::new(config).unwrap();

    let mut suppliers = client
        .find_suppliers_iter(&SupplierFilter::default())
        .await
        .unwrap();
    assert!(suppliers.next().await.unwrap().is_none());
    assert!(client.get_status().await.is_none());
}

#[tokio::test]
async fn test_unconfigured_data_client_names_itself() {
    let client = DataApiClient::new(ClientConfig::default()).unwrap();
    let error = client.get_brief(1).await.unwrap_err();
    assert_eq!(error.message(), "DataApiClient has no URL configured");
}

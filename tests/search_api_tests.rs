//! Integration tests for the Search and Antivirus API clients.

use std::time::Duration;

use dm_api_client::{
    AntivirusApiClient, AuthToken, BaseUrl, ClientConfig, RetryPolicy, SearchApiClient,
    SearchQuery,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_config(server: &MockServer) -> ClientConfig {
    ClientConfig::builder()
        .base_url(BaseUrl::new(server.uri()).unwrap())
        .auth_token(AuthToken::new("search-token"))
        .retry(RetryPolicy::none())
        .build()
}

#[tokio::test]
async fn test_create_index() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/g-cloud-12"))
        .and(body_json(json!({"type": "index"})))
        .and(header("Authorization", "Bearer search-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "acknowledged"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = SearchApiClient::new(create_test_config(&server)).unwrap();
    client.create_index("g-cloud-12").await.unwrap();
}

#[tokio::test]
async fn test_set_alias() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/g-cloud"))
        .and(body_json(json!({"type": "alias", "target": "g-cloud-12-2024"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "acknowledged"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = SearchApiClient::new(create_test_config(&server)).unwrap();
    client.set_alias("g-cloud", "g-cloud-12-2024").await.unwrap();
}

#[tokio::test]
async fn test_index_waits_for_response() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/g-cloud/services/12345"))
        .and(body_json(json!({"service": {"id": "12345"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "acknowledged"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = SearchApiClient::new(create_test_config(&server)).unwrap();
    let result = client
        .index("12345", json!({"id": "12345"}), "g-cloud", true)
        .await
        .unwrap();

    assert_eq!(result, Some(json!({"message": "acknowledged"})));
}

#[tokio::test]
async fn test_index_without_waiting_returns_none() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/g-cloud/services/12345"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "acknowledged"}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = SearchApiClient::new(create_test_config(&server)).unwrap();
    let result = client
        .index("12345", json!({"id": "12345"}), "g-cloud", false)
        .await
        .unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn test_delete_missing_document_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/g-cloud/services/12345"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Not found"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = SearchApiClient::new(create_test_config(&server)).unwrap();
    assert!(client.delete("12345", "g-cloud").await.unwrap().is_none());
}

#[tokio::test]
async fn test_delete_server_error_is_raised() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "bad index"})))
        .mount(&server)
        .await;

    let client = SearchApiClient::new(create_test_config(&server)).unwrap();
    let error = client.delete("12345", "g-cloud").await.unwrap_err();
    assert_eq!(error.status_code(), Some(400));
}

#[tokio::test]
async fn test_search_services_sends_filters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/g-cloud-12/services/search"))
        .and(query_param("q", "email"))
        .and(query_param("filter_lot", "cloud-software"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"documents": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = SearchApiClient::new(create_test_config(&server)).unwrap();
    let query = SearchQuery::new()
        .in_index("g-cloud-12")
        .q("email")
        .filter("lot", ["cloud-software"]);

    client.search_services(&query).await.unwrap();
}

#[tokio::test]
async fn test_search_services_iter_accepts_documents_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/g-cloud/services/search"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "services": [{"id": "c"}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/g-cloud/services/search"))
        .and(query_param("q", "email"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [{"id": "a"}, {"id": "b"}],
            "links": {"next": "/g-cloud/services/search?page=2"}
        })))
        .mount(&server)
        .await;

    let client = SearchApiClient::new(create_test_config(&server)).unwrap();
    let results = client
        .search_services_iter(&SearchQuery::new().q("email"))
        .await
        .unwrap()
        .collect_all()
        .await
        .unwrap();

    assert_eq!(
        results,
        vec![json!({"id": "a"}), json!({"id": "b"}), json!({"id": "c"})]
    );
}

#[tokio::test]
async fn test_search_status_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/_status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;

    let client = SearchApiClient::new(create_test_config(&server)).unwrap();
    assert_eq!(client.get_status().await, Some(json!({"status": "ok"})));
}

#[tokio::test]
async fn test_scan_and_tag_s3_object() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/scan/s3-object"))
        .and(body_json(json!({
            "bucketName": "documents",
            "objectKey": "g-cloud-12/1/pricing.pdf",
            "objectVersionId": "v1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"avStatus": {"result": "pass"}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = AntivirusApiClient::new(create_test_config(&server)).unwrap();
    let result = client
        .scan_and_tag_s3_object("documents", "g-cloud-12/1/pricing.pdf", "v1")
        .await
        .unwrap();

    assert_eq!(result, Some(json!({"avStatus": {"result": "pass"}})));
}

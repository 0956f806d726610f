//! Remote data gateway tests against a mock backend

mod common;

use common::{envelope, error_body, inventory_json, item_json, user, TOKEN};
use ferp::api::{ApiClient, ApiError, UploadFile};
use ferp::core::role::Role;
use ferp::core::session::{Session, SessionHandle};
use ferp::core::workflow::WorkflowEngine;
use ferp::entities::sample_request::FabricItem;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn signed_in() -> SessionHandle {
    SessionHandle::new(Session::signed_in(user(Role::Admin), TOKEN))
}

fn stats_body() -> serde_json::Value {
    envelope(json!({
        "totalSampleRequests": 42,
        "pendingSamples": 7,
        "sentToday": 3,
        "approvalRatePercentage": 61.5
    }))
}

// ============================================================================
// Authentication header and envelope
// ============================================================================

#[tokio::test]
async fn test_bearer_token_attached_when_signed_in() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/dashboard/stats"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stats_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri(), signed_in()).unwrap();
    let stats = client.dashboard_stats().await.unwrap();

    assert_eq!(stats.total_sample_requests, 42);
    assert_eq!(stats.pending_samples, 7);
    assert!((stats.approval_rate_percentage - 61.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_no_authorization_header_when_signed_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/dashboard/stats"))
        .and(|req: &Request| !req.headers.contains_key("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stats_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri(), SessionHandle::default()).unwrap();
    assert!(client.dashboard_stats().await.is_ok());
}

#[tokio::test]
async fn test_inventory_limit_uses_wrapped_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/inventory"))
        .and(query_param("limit", "1000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "inventory": [inventory_json("i1", "Cotton Poplin", "Navy", 180, 120.0)]
        }))))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri(), signed_in()).unwrap();
    let items = client.list_inventory_limited(1000).await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].fabric_name, "Cotton Poplin");
}

#[tokio::test]
async fn test_trailing_slash_in_base_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/dashboard/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stats_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&format!("{}/", server.uri()), signed_in()).unwrap();
    assert!(client.dashboard_stats().await.is_ok());
}

#[test]
fn test_rejects_non_http_base_url() {
    let err = ApiClient::new("ftp://example.com", SessionHandle::default()).unwrap_err();
    assert!(matches!(err, ApiError::InvalidUrl(_)));
}

// ============================================================================
// Error categories
// ============================================================================

#[tokio::test]
async fn test_client_error_carries_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/buyers"))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body("Email already exists")))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri(), signed_in()).unwrap();
    let form = ferp::entities::buyer::BuyerForm::default();
    let err = client.create_buyer(&form).await.unwrap_err();

    assert!(matches!(err, ApiError::Client { status: 400, .. }));
    assert_eq!(err.server_message(), Some("Email already exists"));
    assert_eq!(err.message_or("Failed to create buyer"), "Email already exists");
}

#[tokio::test]
async fn test_server_error_without_body_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/inventory/i9"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri(), signed_in()).unwrap();
    let err = client.get_inventory("i9").await.unwrap_err();

    assert!(matches!(err, ApiError::Server { status: 503, .. }));
    assert_eq!(err.server_message(), None);
    assert_eq!(err.message_or("Failed to save inventory"), "Failed to save inventory");
}

#[tokio::test]
async fn test_unauthorized_ends_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/buyers/active"))
        .respond_with(ResponseTemplate::new(401).set_body_json(error_body("Token expired")))
        .mount(&server)
        .await;

    let session = signed_in();
    let client = ApiClient::new(&server.uri(), session.clone()).unwrap();
    let err = client.active_buyers().await.unwrap_err();

    assert!(err.is_unauthenticated());
    assert!(!session.is_authenticated());
    assert!(session.snapshot().user().is_none());
}

#[tokio::test]
async fn test_undecodable_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/dashboard/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri(), signed_in()).unwrap();
    let err = client.dashboard_stats().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let client = ApiClient::new("http://127.0.0.1:1", signed_in()).unwrap();
    let err = client.dashboard_stats().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}

// ============================================================================
// Writes
// ============================================================================

#[tokio::test]
async fn test_item_status_patch_body() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/sample-requests/r1/items/it1/status"))
        .and(body_json(json!({ "status": "SENT" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "message": "Updated" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let item: FabricItem =
        serde_json::from_value(item_json("it1", "Cotton Poplin", "IN_SAMPLING", 120.0)).unwrap();
    let transition = WorkflowEngine::new(Some(Role::SamplingHead))
        .plan_advance(&item)
        .unwrap()
        .confirm(true)
        .unwrap();

    let client = ApiClient::new(&server.uri(), signed_in()).unwrap();
    let message = client.update_item_status("r1", &transition).await.unwrap();
    assert_eq!(message.as_deref(), Some("Updated"));
}

#[tokio::test]
async fn test_record_ids_are_path_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/buyers/b1%3Fall=true%23x"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "message": "Buyer deleted" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri(), signed_in()).unwrap();
    let message = client.delete_buyer("b1?all=true#x").await.unwrap();
    assert_eq!(message.as_deref(), Some("Buyer deleted"));

    let err = client.delete_buyer("..").await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidId(_)));
}

#[tokio::test]
async fn test_delete_returns_message() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/buyers/b1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": true, "message": "Buyer deleted" })),
        )
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri(), signed_in()).unwrap();
    let message = client.delete_buyer("b1").await.unwrap();
    assert_eq!(message.as_deref(), Some("Buyer deleted"));
}

#[tokio::test]
async fn test_upload_sends_all_files_in_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .and(|req: &Request| {
            let body = String::from_utf8_lossy(&req.body);
            body.contains("name=\"files\"")
                && body.contains("filename=\"swatch.png\"")
                && body.contains("filename=\"techpack.pdf\"")
        })
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            "https://cdn.example/swatch.png",
            "https://cdn.example/techpack.pdf"
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri(), signed_in()).unwrap();
    let urls = client
        .upload(vec![
            UploadFile::new("swatch.png", b"png-bytes".to_vec()),
            UploadFile::new("techpack.pdf", b"pdf-bytes".to_vec()),
        ])
        .await
        .unwrap();

    assert_eq!(
        urls,
        vec![
            "https://cdn.example/swatch.png".to_string(),
            "https://cdn.example/techpack.pdf".to_string()
        ]
    );
}

#[tokio::test]
async fn test_upload_accepts_wrapped_urls() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "urls": ["https://cdn.example/a.jpg"]
        }))))
        .mount(&server)
        .await;

    let client = ApiClient::new(&server.uri(), signed_in()).unwrap();
    let urls = client
        .upload(vec![UploadFile::new("a.jpg", vec![1, 2, 3])])
        .await
        .unwrap();
    assert_eq!(urls, vec!["https://cdn.example/a.jpg".to_string()]);
}

//! Liveness, readiness, docs and cross-cutting response headers.

mod helpers;

use helpers::storage::FailingStorage;
use helpers::{setup_test_app, setup_test_app_with};
use qrdrop_core::constants::MSG_SERVER_RUNNING;
use qrdrop_storage::Storage;
use std::sync::Arc;

#[tokio::test]
async fn test_root_reports_server_running() {
    let app = setup_test_app().await;

    let response = app.server.get("/").await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.text(), MSG_SERVER_RUNNING);
}

#[tokio::test]
async fn test_health_reports_backend() {
    let app = setup_test_app().await;

    let response = app.server.get("/health").await;

    assert_eq!(response.status_code(), 200);
    let json: serde_json::Value = response.json();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "qrdrop-api");
    assert_eq!(json["storage_backend"], "local");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_readiness_with_local_storage() {
    let app = setup_test_app().await;

    let response = app.server.get("/health/ready").await;

    assert_eq!(response.status_code(), 200);
    let json: serde_json::Value = response.json();
    assert_eq!(json["status"], "ready");
}

#[tokio::test]
async fn test_readiness_fails_when_storage_is_down() {
    let storage: Arc<dyn Storage> = FailingStorage::new();
    let app = setup_test_app_with(|_| {}, move |_| storage).await;

    let response = app.server.get("/health/ready").await;

    assert_eq!(response.status_code(), 503);
    let json: serde_json::Value = response.json();
    assert_eq!(json["status"], "not_ready");
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let app = setup_test_app().await;

    let response = app.server.get("/").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("X-Request-ID header missing")
        .to_str()
        .unwrap();
    assert!(uuid::Uuid::parse_str(request_id).is_ok());
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let app = setup_test_app().await;

    let response = app
        .server
        .get("/health")
        .add_header("X-Request-ID", "trace-abc-123")
        .await;

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "trace-abc-123"
    );
}

#[tokio::test]
async fn test_security_headers_present() {
    let app = setup_test_app().await;

    let response = app.server.get("/").await;

    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
    assert!(response.headers().get("strict-transport-security").is_none());
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = setup_test_app().await;

    let response = app
        .server
        .get("/")
        .add_header("Origin", "https://frontend.example.com")
        .await;

    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = setup_test_app().await;

    let response = app.server.get("/api/openapi.json").await;

    assert_eq!(response.status_code(), 200);
    let json: serde_json::Value = response.json();
    assert!(json["paths"]["/upload"]["post"].is_object());
}

#[tokio::test]
async fn test_upload_page_is_served() {
    let app = setup_test_app().await;

    let page = app.server.get("/index.html").await;
    assert_eq!(page.status_code(), 200);
    assert!(page.text().contains("id=\"drop-zone\""));

    let script = app.server.get("/app.js").await;
    assert_eq!(script.status_code(), 200);
    assert!(script.text().contains("'/upload'"));
}

#[tokio::test]
async fn test_static_dir_can_be_overridden() {
    let static_dir = tempfile::tempdir().unwrap();
    std::fs::write(static_dir.path().join("index.html"), "custom page").unwrap();
    let path = static_dir.path().to_string_lossy().to_string();

    let app = setup_test_app_with(move |config| config.base.static_dir = Some(path), |s| s).await;

    let response = app.server.get("/index.html").await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.text(), "custom page");
    assert_eq!(app.server.get("/app.js").await.status_code(), 404);
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let app = setup_test_app().await;

    let response = app.server.get("/no-such-page.html").await;

    assert_eq!(response.status_code(), 404);
}

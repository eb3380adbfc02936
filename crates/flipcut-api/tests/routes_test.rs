//! Service-level route tests: health, docs, fallback and middleware.

mod helpers;

use flipcut_api::setup::routes;
use flipcut_core::{BaseConfig, Config, ProcessingConfig};
use helpers::mocks::{MockRemover, MockStorage};
use helpers::setup_test_app;
use std::sync::Arc;

fn app() -> helpers::TestApp {
    setup_test_app(Arc::new(MockRemover::echo()), Arc::new(MockStorage::new()))
}

#[tokio::test]
async fn test_health_check() {
    let app = app();

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "OK");
    assert_eq!(body["message"], "Image Processing Service is running");
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = app();

    let response = app.client().get("/api/videos").await;

    assert_eq!(response.status_code(), 404);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Route not found");
}

#[tokio::test]
async fn test_openapi_spec_is_served() {
    let app = app();

    let response = app.client().get("/api/openapi.json").await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert!(body["paths"]["/api/images/upload"].is_object());
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = app();

    let response = app
        .client()
        .get("/health")
        .add_header("x-request-id", "req-123")
        .await;

    assert_eq!(response.header("x-request-id"), "req-123");
}

#[tokio::test]
async fn test_security_headers_are_set() {
    let app = app();

    let response = app.client().get("/health").await;

    assert_eq!(response.header("x-content-type-options"), "nosniff");
}

#[test]
fn test_wildcard_origin_rejected_in_production() {
    let config = ProcessingConfig {
        base: BaseConfig {
            cors_origins: vec!["*".to_string()],
            environment: "production".to_string(),
            ..BaseConfig::default()
        },
        ..helpers::test_config()
    };
    let config = Config::new(config);
    let state = flipcut_api::setup::services::initialize_services(
        &config,
        Arc::new(MockRemover::echo()),
        Arc::new(MockStorage::new()),
    );

    assert!(routes::setup_routes(&config, state).is_err());
}

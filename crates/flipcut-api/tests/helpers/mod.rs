//! Test helpers: build the router around mock collaborators.
//!
//! Run with: `cargo test -p flipcut-api`

#![allow(dead_code)]

pub mod fixtures;
pub mod mocks;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use flipcut_api::constants;
use flipcut_api::setup::{routes, services};
use flipcut_api::state::AppState;
use flipcut_core::{Config, ProcessingConfig, RetryPolicy};
use flipcut_services::BackgroundRemover;
use flipcut_storage::Storage;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use mocks::{MockRemover, MockStorage};

/// API path under the image prefix (e.g. `/api/images/upload`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Configuration with millisecond retry delays.
pub fn test_config() -> ProcessingConfig {
    ProcessingConfig {
        removal_retry_policy: RetryPolicy::new(Duration::from_millis(1), 3),
        delete_retry_policy: RetryPolicy::new(Duration::from_millis(1), 3),
        ..ProcessingConfig::default()
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn build_app(
    config: ProcessingConfig,
    remover: Arc<dyn BackgroundRemover>,
    storage: Arc<dyn Storage>,
) -> TestApp {
    let config = Config::new(config);
    let state = services::initialize_services(&config, remover, storage);
    let app = routes::setup_routes(&config, state.clone()).expect("Failed to build routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp { server, state }
}

/// Test app with the default config and the given mocks.
pub fn setup_test_app(remover: Arc<MockRemover>, storage: Arc<MockStorage>) -> TestApp {
    build_app(test_config(), remover, storage)
}

pub fn image_part(data: Vec<u8>, file_name: &str, mime_type: &str) -> Part {
    Part::bytes(bytes::Bytes::from(data))
        .file_name(file_name.to_string())
        .mime_type(mime_type.to_string())
}

pub fn png_form() -> MultipartForm {
    MultipartForm::new().add_part(
        constants::IMAGE_FIELD,
        image_part(fixtures::create_test_png(8, 8), "cat.png", "image/png"),
    )
}

/// Upload `form` and return the accepted image id.
pub async fn upload(client: &TestServer, form: MultipartForm) -> Uuid {
    let response = client.post(&api_path("/upload")).multipart(form).await;
    assert_eq!(response.status_code(), 202, "{}", response.text());

    let body: serde_json::Value = response.json();
    Uuid::parse_str(body["imageId"].as_str().expect("Expected 'imageId'"))
        .expect("Invalid UUID in upload response")
}

pub async fn get_status(client: &TestServer, id: Uuid) -> TestResponse {
    client.get(&api_path(&format!("/{}/status", id))).await
}

/// Poll the status endpoint until the item reaches a terminal state.
pub async fn wait_for_terminal(client: &TestServer, id: Uuid) -> serde_json::Value {
    for _ in 0..500 {
        let body: serde_json::Value = get_status(client, id).await.json();
        match body["status"].as_str() {
            Some("completed") | Some("failed") => return body,
            _ => tokio::time::sleep(Duration::from_millis(10)).await,
        }
    }
    panic!("Image {} did not reach a terminal state", id);
}

//! Health check handler

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(super) struct HealthCheckResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// Liveness probe: the process is up and serving requests.
pub(super) async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthCheckResponse {
            status: "OK",
            message: "Image Processing Service is running",
        }),
    )
}

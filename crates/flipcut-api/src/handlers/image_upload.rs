use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use flipcut_core::{models::UploadImageResponse, AppError};
use flipcut_processing::AcceptedUpload;

use crate::constants::status_url;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::extract_image_file;

/// Accept an image and start processing it in the background.
///
/// Responds once the work item is recorded; the outcome is reported by the
/// status endpoint.
#[utoipa::path(
    post,
    path = "/api/images/upload",
    tag = "images",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 202, description = "Upload accepted, processing started", body = UploadImageResponse),
        (status = 400, description = "Missing or invalid image", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_image"))]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let file = extract_image_file(multipart)
        .await?
        .ok_or_else(|| AppError::BadRequest("No image file provided".to_string()))?;

    state
        .validator
        .validate_all(&file.file_name, &file.content_type, file.data.len())?;

    let handle = state
        .orchestrator
        .accept(AcceptedUpload {
            data: file.data,
            original_name: file.file_name,
            mime_type: file.content_type,
        })
        .await?;

    // The pipeline keeps running detached once the handle is dropped.
    let id = handle.item.id;

    Ok((
        StatusCode::ACCEPTED,
        Json(UploadImageResponse {
            success: true,
            image_id: id,
            message: "Image upload started. Check status for completion.".to_string(),
            status_url: status_url(&id),
        }),
    ))
}

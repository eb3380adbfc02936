use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use flipcut_core::{models::DeleteImageResponse, AppError};
use uuid::Uuid;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::image_id::parse_image_id;

/// Delete an image locally and, best effort, from remote storage.
///
/// A failed remote delete is reported in the body, never as an error status.
#[utoipa::path(
    delete,
    path = "/api/images/{id}",
    tag = "images",
    params(
        ("id" = Uuid, Path, description = "Image ID")
    ),
    responses(
        (status = 200, description = "Image deleted", body = DeleteImageResponse),
        (status = 404, description = "Image not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(image_id = %id, operation = "delete_image"))]
pub async fn delete_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteImageResponse>, HttpAppError> {
    let outcome = state
        .orchestrator
        .delete_item(parse_image_id(&id)?)
        .await?
        .ok_or_else(|| AppError::NotFound("Image not found".to_string()))?;

    Ok(Json(DeleteImageResponse::new(outcome.success, outcome.error)))
}

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use flipcut_core::{AppError, ItemStatus};
use flipcut_db::WorkItemRepository;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::image_id::parse_image_id;

/// Body returned while an image is still processing or has failed.
#[derive(Debug, Serialize, ToSchema)]
pub struct NotCompletedResponse {
    pub error: String,
    pub status: ItemStatus,
}

/// Redirect to the hosted image once processing has completed.
#[utoipa::path(
    get,
    path = "/api/images/{id}",
    tag = "images",
    params(
        ("id" = Uuid, Path, description = "Image ID")
    ),
    responses(
        (status = 302, description = "Redirect to the public URL"),
        (status = 400, description = "Processing not completed", body = NotCompletedResponse),
        (status = 404, description = "Image or URL not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(image_id = %id))]
pub async fn get_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, HttpAppError> {
    let item = state
        .orchestrator
        .items()
        .get(parse_image_id(&id)?)
        .await?
        .ok_or_else(|| AppError::NotFound("Image not found".to_string()))?;

    if item.status != ItemStatus::Completed {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(NotCompletedResponse {
                error: "Image processing not completed".to_string(),
                status: item.status,
            }),
        )
            .into_response());
    }

    let public_url = item
        .public_url
        .ok_or_else(|| AppError::NotFound("Image URL not available".to_string()))?;

    Ok((StatusCode::FOUND, [(header::LOCATION, public_url)]).into_response())
}

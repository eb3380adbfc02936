use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use flipcut_core::{models::ImageStatusResponse, AppError};
use flipcut_db::WorkItemRepository;
use uuid::Uuid;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::image_id::parse_image_id;

#[utoipa::path(
    get,
    path = "/api/images/{id}/status",
    tag = "images",
    params(
        ("id" = Uuid, Path, description = "Image ID")
    ),
    responses(
        (status = 200, description = "Current processing state", body = ImageStatusResponse),
        (status = 404, description = "Image not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(image_id = %id))]
pub async fn get_image_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ImageStatusResponse>, HttpAppError> {
    let item = state
        .orchestrator
        .items()
        .get(parse_image_id(&id)?)
        .await?
        .ok_or_else(|| AppError::NotFound("Image not found".to_string()))?;

    Ok(Json(ImageStatusResponse::from(item)))
}

/// List every tracked image, newest first.
#[utoipa::path(
    get,
    path = "/api/images",
    tag = "images",
    responses(
        (status = 200, description = "All tracked images", body = Vec<ImageStatusResponse>)
    )
)]
pub async fn list_images(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ImageStatusResponse>>, HttpAppError> {
    let items = state.orchestrator.items().list_all().await?;

    Ok(Json(
        items.into_iter().map(ImageStatusResponse::from).collect(),
    ))
}

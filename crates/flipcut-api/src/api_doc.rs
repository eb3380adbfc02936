//! OpenAPI documentation served at `/api/openapi.json`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use flipcut_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Flipcut API",
        version = "0.1.0",
        description = "Image processing service: uploads are stripped of their background, mirrored horizontally and published to cloud storage. Processing is asynchronous; poll the status endpoint for the outcome."
    ),
    paths(
        handlers::image_upload::upload_image,
        handlers::image_status::get_image_status,
        handlers::image_status::list_images,
        handlers::image_get::get_image,
        handlers::image_delete::delete_image,
    ),
    components(schemas(
        models::UploadImageResponse,
        models::ImageStatusResponse,
        models::DeleteImageResponse,
        models::ItemStatus,
        handlers::image_get::NotCompletedResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "images", description = "Image upload and processing")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

//! Multipart upload extraction

use axum::extract::Multipart;
use bytes::Bytes;
use flipcut_core::AppError;

use crate::constants::{IMAGE_FIELD, IMAGE_FIELD_ALIAS};
use crate::error::HttpAppError;

/// File part of an upload request.
#[derive(Debug)]
pub struct UploadedFile {
    pub data: Bytes,
    pub file_name: String,
    pub content_type: String,
}

fn is_image_field(name: &str) -> bool {
    name == IMAGE_FIELD || name == IMAGE_FIELD_ALIAS
}

/// Extract the single image field from a multipart form.
///
/// Returns `Ok(None)` when no image field is present. Non-file fields are
/// skipped; a second image field is rejected.
pub async fn extract_image_file(
    mut multipart: Multipart,
) -> Result<Option<UploadedFile>, HttpAppError> {
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name() else {
            continue;
        };
        if !is_image_field(name) {
            tracing::debug!(field = %name, "Ignoring multipart field");
            continue;
        }

        if file.is_some() {
            return Err(AppError::BadRequest(
                "Only one image file may be uploaded per request".to_string(),
            )
            .into());
        }

        let file_name = field.file_name().unwrap_or("unknown").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field.bytes().await?;

        file = Some(UploadedFile {
            data,
            file_name,
            content_type,
        });
    }

    Ok(file)
}

//! API constants

/// Mount point of the image routes
pub const API_PREFIX: &str = "/api/images";

/// Multipart field carrying the uploaded file
pub const IMAGE_FIELD: &str = "image";

/// Accepted alias of [`IMAGE_FIELD`]
pub const IMAGE_FIELD_ALIAS: &str = "file";

/// Headroom added to the request body limit for multipart framing
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the status URL returned for an accepted upload.
pub fn status_url(id: &uuid::Uuid) -> String {
    format!("{}/{}/status", API_PREFIX, id)
}

//! Shared identifier handling for storage backends.

use crate::traits::{StorageError, StorageResult};

/// Reject identifiers that could address something outside the backend's namespace.
pub fn validate_object_id(id: &str) -> StorageResult<()> {
    if id.is_empty() {
        return Err(StorageError::InvalidKey("Object id is empty".to_string()));
    }
    if id.contains("..") || id.starts_with('/') || id.contains('\\') {
        return Err(StorageError::InvalidKey(
            "Object id contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

/// File name of a processed image stored under `id`.
///
/// Processed images are always JPEG.
#[cfg(feature = "storage-local")]
pub fn object_file_name(id: &str) -> String {
    format!("{}.jpg", id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_traversal() {
        assert!(validate_object_id("../etc/passwd").is_err());
        assert!(validate_object_id("/abs").is_err());
        assert!(validate_object_id("a\\b").is_err());
        assert!(validate_object_id("").is_err());
    }

    #[test]
    fn test_accepts_folder_qualified_ids() {
        assert!(validate_object_id("image-processing-service/abc").is_ok());
        assert!(validate_object_id("3f2b7c1e-0000-4000-8000-000000000000").is_ok());
    }
}

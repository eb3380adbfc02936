#[cfg(feature = "storage-cloudinary")]
use crate::{CloudinarySettings, CloudinaryStorage};
#[cfg(feature = "storage-local")]
use crate::LocalStorage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use flipcut_core::Config;
use std::sync::Arc;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend() {
        #[cfg(feature = "storage-cloudinary")]
        StorageBackend::Cloudinary => {
            let required = |value: Option<&str>, name: &str| {
                value
                    .map(String::from)
                    .ok_or_else(|| StorageError::ConfigError(format!("{} not configured", name)))
            };

            let settings = CloudinarySettings {
                api_url: config.cloudinary_api_url().to_string(),
                cloud_name: required(config.cloudinary_cloud_name(), "CLOUDINARY_CLOUD_NAME")?,
                api_key: required(config.cloudinary_api_key(), "CLOUDINARY_API_KEY")?,
                api_secret: required(config.cloudinary_api_secret(), "CLOUDINARY_API_SECRET")?,
                folder: config.cloudinary_folder().to_string(),
                max_dimension: config.max_image_dimension(),
                signature_algorithm: config.cloudinary_signature_algorithm(),
            };

            let storage = CloudinaryStorage::new(settings)?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-cloudinary"))]
        StorageBackend::Cloudinary => Err(StorageError::ConfigError(
            "Cloudinary storage backend not available (storage-cloudinary feature not enabled)"
                .to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config
                .local_storage_path()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
                })?;
            let base_url = config
                .local_storage_base_url()
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
                })?;

            let storage = LocalStorage::new(base_path, base_url).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}

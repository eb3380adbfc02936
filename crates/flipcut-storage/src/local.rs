use crate::keys::{object_file_name, validate_object_id};
use crate::traits::{Storage, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
///
/// Stands in for the remote provider in development: objects are written as
/// `{base_path}/{id}.jpg` and served from `{base_url}/{id}.jpg`.
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/flipcut/media")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:3000/media")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert an object id to its filesystem path, refusing ids that escape the base directory.
    fn id_to_path(&self, id: &str) -> StorageResult<PathBuf> {
        validate_object_id(id)?;
        let path = self.base_path.join(object_file_name(id));

        if path.parent() != Some(self.base_path.as_path()) {
            // Ids with a separator would land in a subdirectory; keep the layout flat.
            return Err(StorageError::InvalidKey(
                "Object id resolves outside storage directory".to_string(),
            ));
        }

        Ok(path)
    }

    /// Generate public URL for file
    fn generate_url(&self, id: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            object_file_name(id)
        )
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload(&self, desired_id: &str, data: Bytes) -> StorageResult<StoredObject> {
        let path = self.id_to_path(desired_id)?;
        let size = data.len();
        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        let url = self.generate_url(desired_id);

        tracing::info!(
            path = %path.display(),
            storage_id = %desired_id,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(StoredObject {
            storage_id: desired_id.to_string(),
            public_url: url,
        })
    }

    async fn delete(&self, storage_id: &str) -> StorageResult<()> {
        let path = self.id_to_path(storage_id)?;
        let start = std::time::Instant::now();

        match fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(StorageError::IoError(e)),
        }

        tracing::info!(
            path = %path.display(),
            storage_id = %storage_id,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage delete successful"
        );

        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

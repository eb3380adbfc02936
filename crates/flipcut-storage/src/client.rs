//! Retry-governed access to the storage backend
//!
//! Uploads fail fast: a partially applied upload is harder to reconcile than a
//! clean failure the client can resubmit. Deletes are retried and best effort:
//! their failure is reported, never raised.

use std::sync::Arc;

use bytes::Bytes;
use flipcut_core::{retry_with_policy, Config, RetryPolicy};

use crate::traits::{DeleteError, Storage, StoredObject, UploadError};
use crate::StorageBackend;

/// Result of a best-effort remote delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub success: bool,
    /// Cause of the last failed attempt, when `success` is false
    pub error: Option<String>,
}

impl DeleteOutcome {
    pub fn deleted() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(cause: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(cause.into()),
        }
    }

    /// No remote object was known, so no delete was attempted.
    pub fn not_attempted() -> Self {
        Self {
            success: false,
            error: None,
        }
    }
}

#[derive(Clone)]
pub struct StorageClient {
    storage: Arc<dyn Storage>,
    upload_policy: RetryPolicy,
    delete_policy: RetryPolicy,
}

impl StorageClient {
    pub fn new(
        storage: Arc<dyn Storage>,
        upload_policy: RetryPolicy,
        delete_policy: RetryPolicy,
    ) -> Self {
        Self {
            storage,
            upload_policy,
            delete_policy,
        }
    }

    pub fn from_config(storage: Arc<dyn Storage>, config: &Config) -> Self {
        Self::new(
            storage,
            config.upload_retry_policy(),
            config.delete_retry_policy(),
        )
    }

    pub fn backend_type(&self) -> StorageBackend {
        self.storage.backend_type()
    }

    /// Publish `data` under `desired_id`.
    #[tracing::instrument(skip(self, data), fields(size_bytes = data.len()))]
    pub async fn upload(&self, data: Bytes, desired_id: &str) -> Result<StoredObject, UploadError> {
        let storage = &self.storage;

        retry_with_policy(&self.upload_policy, "storage_upload", |_| {
            let data = data.clone();
            async move {
                storage
                    .upload(desired_id, data)
                    .await
                    .map_err(UploadError::from)
            }
        })
        .await
    }

    /// Delete an object, retrying transient failures. Never fails.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, storage_id: &str) -> DeleteOutcome {
        let storage = &self.storage;

        let result = retry_with_policy(&self.delete_policy, "storage_delete", |_| async move {
            storage.delete(storage_id).await.map_err(DeleteError::from)
        })
        .await;

        match result {
            Ok(()) => {
                tracing::info!(storage_id = %storage_id, "Remote object deleted");
                DeleteOutcome::deleted()
            }
            Err(e) => {
                tracing::warn!(
                    storage_id = %storage_id,
                    error = %e,
                    "Remote delete failed, continuing with local removal"
                );
                DeleteOutcome::failed(e.to_string())
            }
        }
    }
}

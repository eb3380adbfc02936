//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement,
//! along with the operation-specific errors the [`StorageClient`](crate::StorageClient)
//! classifies for retry.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use flipcut_core::RetryClassification;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage request timed out: {0}")]
    Timeout(String),

    #[error("Storage provider unreachable: {0}")]
    Network(String),

    #[error("Storage provider returned status {status}: {message}")]
    RemoteStatus { status: u16, message: String },

    #[error("Unexpected storage response: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Failure of a storage upload. Always fatal for the work item.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct UploadError {
    #[from]
    pub source: StorageError,
}

impl RetryClassification for UploadError {
    fn is_retryable(&self) -> bool {
        false
    }
}

/// Failure of a storage delete.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct DeleteError {
    #[from]
    pub source: StorageError,
}

impl RetryClassification for DeleteError {
    /// Timeouts, connection failures, 499 and 5xx responses may succeed on retry.
    fn is_retryable(&self) -> bool {
        match &self.source {
            StorageError::Timeout(_) | StorageError::Network(_) => true,
            StorageError::RemoteStatus { status, .. } => *status == 499 || *status >= 500,
            _ => false,
        }
    }
}

/// An object stored by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Backend handle of the object; required to delete it
    pub storage_id: String,
    /// Publicly reachable URL of the object
    pub public_url: String,
}

/// Storage abstraction trait
///
/// All storage backends (Cloudinary, local filesystem) must implement this trait.
/// The pipeline publishes processed images through it without coupling to a
/// specific provider.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `data` under `desired_id`, returning the backend's handle and public URL.
    ///
    /// Backends may apply server-side constraints (such as a dimension clamp) as
    /// part of the request.
    async fn upload(&self, desired_id: &str, data: Bytes) -> StorageResult<StoredObject>;

    /// Delete an object by the storage id returned from [`Storage::upload`].
    ///
    /// Deleting an object that does not exist succeeds.
    async fn delete(&self, storage_id: &str) -> StorageResult<()>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

//! Doubles for the remote collaborators.

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use flipcut_services::{BackgroundRemover, RemovalError};
use flipcut_storage::{Storage, StorageBackend, StorageError, StorageResult, StoredObject};
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::Semaphore;

pub const CDN_BASE: &str = "https://cdn.test/flipcut";

/// Background remover returning its input unchanged, optionally held until
/// released or failing with a fixed status.
pub struct MockRemover {
    gate: Option<Semaphore>,
    fail_with: Option<u16>,
    calls: AtomicU32,
}

impl MockRemover {
    pub fn echo() -> Self {
        Self {
            gate: None,
            fail_with: None,
            calls: AtomicU32::new(0),
        }
    }

    /// Blocks every call until [`MockRemover::release`] is called.
    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::echo()
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            fail_with: Some(status),
            ..Self::echo()
        }
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1024);
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BackgroundRemover for MockRemover {
    async fn remove_background(&self, image: Bytes, _filename: &str) -> Result<Bytes, RemovalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            let _permit = gate.acquire().await.expect("gate closed");
        }

        match self.fail_with {
            Some(status) => Err(RemovalError::from_status(status)),
            None => Ok(image),
        }
    }
}

/// Storage provider recording calls; deletes can be made to fail.
#[derive(Default)]
pub struct MockStorage {
    fail_delete: bool,
    uploads: AtomicU32,
    deletes: AtomicU32,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_delete() -> Self {
        Self {
            fail_delete: true,
            ..Self::default()
        }
    }

    pub fn uploads(&self) -> u32 {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> u32 {
        self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn upload(&self, desired_id: &str, _data: Bytes) -> StorageResult<StoredObject> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(StoredObject {
            storage_id: format!("image-processing-service/{}", desired_id),
            public_url: format!("{}/{}.jpg", CDN_BASE, desired_id),
        })
    }

    async fn delete(&self, _storage_id: &str) -> StorageResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete {
            return Err(StorageError::RemoteStatus {
                status: 503,
                message: "unavailable".to_string(),
            });
        }
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Cloudinary
    }
}

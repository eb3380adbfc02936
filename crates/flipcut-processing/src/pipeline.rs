//! Processing orchestrator: background removal → flip → publication.
//!
//! An accepted upload becomes a work item in `processing` before `accept`
//! returns. The stages then run on a detached task whose handle is handed
//! back to the caller. The task ends with exactly one terminal update of the
//! item; no stage is retried here, each client owns its own retry discipline.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use flipcut_core::{AppError, ItemStatus, WorkItem, WorkItemPatch};
use flipcut_db::WorkItemRepository;
use flipcut_services::{BackgroundRemover, RemovalError};
use flipcut_storage::{DeleteOutcome, StorageClient, UploadError};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::image::{FlipTransformer, TransformError};

/// A validated upload, ready to be processed.
#[derive(Debug, Clone)]
pub struct AcceptedUpload {
    pub data: Bytes,
    pub original_name: String,
    pub mime_type: String,
}

/// Returned by [`ProcessingOrchestrator::accept`].
///
/// The HTTP layer drops `task`; awaiting it yields the terminal status.
#[derive(Debug)]
pub struct PipelineHandle {
    pub item: WorkItem,
    pub task: JoinHandle<ItemStatus>,
}

/// Fatal failure of one pipeline stage.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error(transparent)]
    Removal(#[from] RemovalError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Upload(#[from] UploadError),
}

impl StageError {
    pub fn stage(&self) -> &'static str {
        match self {
            StageError::Removal(_) => "background_removal",
            StageError::Transform(_) => "transform",
            StageError::Upload(_) => "upload",
        }
    }
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedImage {
    pub id: Uuid,
    pub public_url: String,
    pub storage_id: String,
    pub original_size: usize,
    pub processed_size: usize,
}

#[derive(Clone)]
pub struct ProcessingOrchestrator {
    remover: Arc<dyn BackgroundRemover>,
    transformer: FlipTransformer,
    storage: StorageClient,
    items: Arc<dyn WorkItemRepository>,
}

impl ProcessingOrchestrator {
    pub fn new(
        remover: Arc<dyn BackgroundRemover>,
        transformer: FlipTransformer,
        storage: StorageClient,
        items: Arc<dyn WorkItemRepository>,
    ) -> Self {
        Self {
            remover,
            transformer,
            storage,
            items,
        }
    }

    pub fn items(&self) -> &Arc<dyn WorkItemRepository> {
        &self.items
    }

    /// Record the upload as a work item and start its pipeline.
    pub async fn accept(&self, upload: AcceptedUpload) -> Result<PipelineHandle, AppError> {
        let item = WorkItem::accepted(
            upload.original_name,
            upload.mime_type,
            upload.data.len() as u64,
        );
        self.items.save(item.clone()).await?;

        tracing::info!(
            image_id = %item.id,
            original_name = %item.original_name,
            size_bytes = item.size,
            "Upload accepted, processing started"
        );

        let orchestrator = self.clone();
        let id = item.id;
        let filename = item.original_name.clone();
        let data = upload.data;
        let task = tokio::spawn(async move { orchestrator.run(id, data, &filename).await });

        Ok(PipelineHandle { item, task })
    }

    /// Run the stages and record the terminal state of item `id`.
    #[tracing::instrument(skip(self, data, filename), fields(image_id = %id))]
    pub async fn run(&self, id: Uuid, data: Bytes, filename: &str) -> ItemStatus {
        let (status, patch) = match self.process(id, data, filename).await {
            Ok(processed) => {
                tracing::info!(
                    public_url = %processed.public_url,
                    original_size = processed.original_size,
                    processed_size = processed.processed_size,
                    "Image processing completed"
                );
                (
                    ItemStatus::Completed,
                    WorkItemPatch::completed(processed.public_url, processed.storage_id, Utc::now()),
                )
            }
            Err(e) => {
                tracing::error!(stage = e.stage(), error = %e, "Image processing failed");
                (ItemStatus::Failed, WorkItemPatch::failed(e.to_string(), Utc::now()))
            }
        };

        match self.items.update(id, patch).await {
            Ok(true) => {}
            Ok(false) => tracing::info!("Work item no longer tracked, result discarded"),
            Err(e) => tracing::error!(error = %e, "Failed to record processing result"),
        }

        status
    }

    /// Removal → flip → upload, short-circuiting on the first failure.
    pub async fn process(
        &self,
        id: Uuid,
        data: Bytes,
        filename: &str,
    ) -> Result<ProcessedImage, StageError> {
        let original_size = data.len();

        let removed = self.remover.remove_background(data, filename).await?;
        tracing::debug!(size_bytes = removed.len(), "Background removed");

        let flipped = self.transformer.flip_horizontal_blocking(removed).await?;
        let processed_size = flipped.len();

        let stored = self.storage.upload(flipped, &id.to_string()).await?;

        Ok(ProcessedImage {
            id,
            public_url: stored.public_url,
            storage_id: stored.storage_id,
            original_size,
            processed_size,
        })
    }

    /// Delete a work item and, best effort, its remote asset.
    ///
    /// Returns `None` when the item is unknown. Local removal happens
    /// whatever the remote outcome.
    pub async fn delete_item(&self, id: Uuid) -> Result<Option<DeleteOutcome>, AppError> {
        let Some(item) = self.items.get(id).await? else {
            return Ok(None);
        };

        let outcome = match item.storage_id.as_deref() {
            Some(storage_id) => self.storage.delete(storage_id).await,
            None => {
                tracing::info!(image_id = %id, status = %item.status, "No remote asset to delete");
                DeleteOutcome::not_attempted()
            }
        };

        self.items.delete(id).await?;

        tracing::info!(
            image_id = %id,
            cloud_delete_success = outcome.success,
            "Work item deleted"
        );

        Ok(Some(outcome))
    }
}

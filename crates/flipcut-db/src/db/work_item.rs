use std::collections::HashMap;
use std::sync::Arc;

use flipcut_core::{AppError, WorkItem, WorkItemPatch};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Trait for work item repository operations
///
/// Every mutation is atomic with respect to readers: a reader sees a record
/// either entirely before or entirely after an update, never in between.
#[async_trait::async_trait]
pub trait WorkItemRepository: Send + Sync {
    /// Store a new item, replacing any record with the same id.
    async fn save(&self, item: WorkItem) -> Result<(), AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<WorkItem>, AppError>;

    /// Merge `patch` into the record with `id`.
    ///
    /// Returns `false` without error when the id is unknown (the item may have
    /// been deleted while its pipeline was running) or when the record has
    /// already reached a terminal status.
    async fn update(&self, id: Uuid, patch: WorkItemPatch) -> Result<bool, AppError>;

    /// Remove the record, reporting whether it existed.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    /// All records, newest upload first.
    async fn list_all(&self) -> Result<Vec<WorkItem>, AppError>;
}

/// Process-local item store backed by a locked map.
#[derive(Clone, Default)]
pub struct InMemoryWorkItemRepository {
    items: Arc<RwLock<HashMap<Uuid, WorkItem>>>,
}

impl InMemoryWorkItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl WorkItemRepository for InMemoryWorkItemRepository {
    #[tracing::instrument(skip(self, item), fields(image_id = %item.id))]
    async fn save(&self, item: WorkItem) -> Result<(), AppError> {
        let mut items = self.items.write().await;
        items.insert(item.id, item);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<WorkItem>, AppError> {
        let items = self.items.read().await;
        Ok(items.get(&id).cloned())
    }

    #[tracing::instrument(skip(self, patch), fields(image_id = %id))]
    async fn update(&self, id: Uuid, patch: WorkItemPatch) -> Result<bool, AppError> {
        let mut items = self.items.write().await;

        let Some(item) = items.get_mut(&id) else {
            tracing::debug!("Update for unknown work item ignored");
            return Ok(false);
        };

        if item.is_terminal() {
            tracing::warn!(
                status = %item.status,
                "Update for work item in terminal state ignored"
            );
            return Ok(false);
        }

        item.apply(patch);
        Ok(true)
    }

    #[tracing::instrument(skip(self), fields(image_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut items = self.items.write().await;
        Ok(items.remove(&id).is_some())
    }

    async fn list_all(&self) -> Result<Vec<WorkItem>, AppError> {
        let items = self.items.read().await;
        let mut all: Vec<WorkItem> = items.values().cloned().collect();
        all.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(all)
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle phase of a work item.
///
/// `Uploading` only exists before the pipeline is scheduled; `Completed` and
/// `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Uploading,
    Processing,
    Completed,
    Failed,
}

impl ItemStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, ItemStatus::Completed | ItemStatus::Failed)
    }
}

impl Display for ItemStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ItemStatus::Uploading => write!(f, "uploading"),
            ItemStatus::Processing => write!(f, "processing"),
            ItemStatus::Completed => write!(f, "completed"),
            ItemStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for ItemStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "uploading" => Ok(ItemStatus::Uploading),
            "processing" => Ok(ItemStatus::Processing),
            "completed" => Ok(ItemStatus::Completed),
            "failed" => Ok(ItemStatus::Failed),
            _ => Err(anyhow::anyhow!("Invalid item status: {}", s)),
        }
    }
}

/// One uploaded image and its journey through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    pub id: Uuid,
    pub original_name: String,
    pub mime_type: String,
    pub size: u64,
    pub status: ItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
    /// Handle of the asset in remote storage, required to delete it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
}

impl WorkItem {
    /// Create an accepted item, already in `processing`.
    pub fn accepted(
        original_name: impl Into<String>,
        mime_type: impl Into<String>,
        size: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            original_name: original_name.into(),
            mime_type: mime_type.into(),
            size,
            status: ItemStatus::Processing,
            public_url: None,
            storage_id: None,
            error: None,
            uploaded_at: Utc::now(),
            processed_at: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Merge the supplied fields into this record.
    pub fn apply(&mut self, patch: WorkItemPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(public_url) = patch.public_url {
            self.public_url = Some(public_url);
        }
        if let Some(storage_id) = patch.storage_id {
            self.storage_id = Some(storage_id);
        }
        if let Some(error) = patch.error {
            self.error = Some(error);
        }
        if let Some(processed_at) = patch.processed_at {
            self.processed_at = Some(processed_at);
        }
    }
}

/// Partial update of a [`WorkItem`]; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkItemPatch {
    pub status: Option<ItemStatus>,
    pub public_url: Option<String>,
    pub storage_id: Option<String>,
    pub error: Option<String>,
    pub processed_at: Option<DateTime<Utc>>,
}

impl WorkItemPatch {
    /// Terminal success: URL, storage handle and timestamp land together.
    pub fn completed(
        public_url: impl Into<String>,
        storage_id: impl Into<String>,
        processed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            status: Some(ItemStatus::Completed),
            public_url: Some(public_url.into()),
            storage_id: Some(storage_id.into()),
            error: None,
            processed_at: Some(processed_at),
        }
    }

    /// Terminal failure with the stage's error message.
    pub fn failed(error: impl Into<String>, processed_at: DateTime<Utc>) -> Self {
        Self {
            status: Some(ItemStatus::Failed),
            error: Some(error.into()),
            processed_at: Some(processed_at),
            ..Self::default()
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_some_and(ItemStatus::is_terminal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_item_is_processing() {
        let item = WorkItem::accepted("cat.png", "image/png", 42);
        assert_eq!(item.status, ItemStatus::Processing);
        assert!(item.public_url.is_none());
        assert!(item.storage_id.is_none());
        assert!(item.processed_at.is_none());
        assert!(!item.is_terminal());
    }

    #[test]
    fn test_accepted_ids_are_unique() {
        let a = WorkItem::accepted("a.png", "image/png", 1);
        let b = WorkItem::accepted("a.png", "image/png", 1);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_apply_completed_sets_url_and_storage_id_together() {
        let mut item = WorkItem::accepted("cat.png", "image/png", 42);
        let now = Utc::now();
        item.apply(WorkItemPatch::completed("https://cdn/x.jpg", "folder/x", now));

        assert_eq!(item.status, ItemStatus::Completed);
        assert_eq!(item.public_url.as_deref(), Some("https://cdn/x.jpg"));
        assert_eq!(item.storage_id.as_deref(), Some("folder/x"));
        assert_eq!(item.processed_at, Some(now));
        assert!(item.error.is_none());
    }

    #[test]
    fn test_apply_failed_leaves_urls_absent() {
        let mut item = WorkItem::accepted("cat.png", "image/png", 42);
        item.apply(WorkItemPatch::failed("boom", Utc::now()));

        assert_eq!(item.status, ItemStatus::Failed);
        assert_eq!(item.error.as_deref(), Some("boom"));
        assert!(item.public_url.is_none());
        assert!(item.storage_id.is_none());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&ItemStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
        assert_eq!("FAILED".parse::<ItemStatus>().unwrap(), ItemStatus::Failed);
    }

    #[test]
    fn test_work_item_serializes_camel_case() {
        let item = WorkItem::accepted("cat.png", "image/png", 42);
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("originalName").is_some());
        assert!(json.get("uploadedAt").is_some());
        assert!(json.get("publicUrl").is_none());
    }

    #[test]
    fn test_patch_terminal_detection() {
        assert!(WorkItemPatch::failed("x", Utc::now()).is_terminal());
        assert!(!WorkItemPatch::default().is_terminal());
    }
}

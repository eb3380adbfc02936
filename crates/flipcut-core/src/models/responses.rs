//! Response bodies of the image HTTP API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::work_item::{ItemStatus, WorkItem};

/// Returned when an upload has been accepted for processing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadImageResponse {
    pub success: bool,
    pub image_id: Uuid,
    pub message: String,
    pub status_url: String,
}

/// Current state of a work item.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageStatusResponse {
    pub id: Uuid,
    pub status: ItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
}

impl From<WorkItem> for ImageStatusResponse {
    fn from(item: WorkItem) -> Self {
        Self {
            id: item.id,
            status: item.status,
            public_url: item.public_url,
            error: item.error,
            processed_at: item.processed_at,
        }
    }
}

/// Result of deleting a work item. `cloud_delete_success` reports the
/// best-effort remote delete; local removal always happens.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteImageResponse {
    pub success: bool,
    pub message: String,
    pub cloud_delete_success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_delete_error: Option<String>,
}

impl DeleteImageResponse {
    pub fn new(cloud_delete_success: bool, cloud_delete_error: Option<String>) -> Self {
        let message = if cloud_delete_success {
            "Image deleted successfully from cloud and local storage"
        } else {
            "Image deleted from local storage (cloud delete may have failed)"
        };

        Self {
            success: true,
            message: message.to_string(),
            cloud_delete_success,
            cloud_delete_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_response_omits_absent_fields() {
        let item = WorkItem::accepted("a.png", "image/png", 10);
        let id = item.id;
        let json = serde_json::to_value(ImageStatusResponse::from(item)).unwrap();

        assert_eq!(json["id"], id.to_string());
        assert_eq!(json["status"], "processing");
        assert!(json.get("publicUrl").is_none());
        assert!(json.get("error").is_none());
        assert!(json.get("processedAt").is_none());
    }

    #[test]
    fn test_delete_response_is_always_successful() {
        let response = DeleteImageResponse::new(false, Some("timeout".to_string()));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["cloudDeleteSuccess"], false);
        assert_eq!(json["cloudDeleteError"], "timeout");
    }
}

//! Domain models

pub mod responses;
pub mod work_item;

pub use responses::{DeleteImageResponse, ImageStatusResponse, UploadImageResponse};
pub use work_item::{ItemStatus, WorkItem, WorkItemPatch};

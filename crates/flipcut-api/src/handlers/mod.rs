pub mod image_delete;
pub mod image_get;
pub mod image_status;
pub mod image_upload;

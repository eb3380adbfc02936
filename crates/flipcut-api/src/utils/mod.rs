pub mod image_id;
pub mod upload;

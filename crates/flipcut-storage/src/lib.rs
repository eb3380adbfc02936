//! Flipcut Storage Library
//!
//! This crate provides the remote object storage abstraction used to publish
//! processed images, with Cloudinary and local filesystem backends.
//!
//! # Object identifiers
//!
//! Uploads are addressed by a desired identifier, the work item id. The backend
//! returns its own storage id for the object (for Cloudinary the folder-qualified
//! public id), which is what deletes must be addressed with.
//!
//! Identifiers must not contain `..` or a leading `/`. Validation is centralized in
//! the `keys` module so all backends stay consistent.

pub mod client;
#[cfg(feature = "storage-cloudinary")]
pub mod cloudinary;
pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use client::{DeleteOutcome, StorageClient};
#[cfg(feature = "storage-cloudinary")]
pub use cloudinary::{CloudinarySettings, CloudinaryStorage};
pub use factory::create_storage;
pub use flipcut_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use traits::{DeleteError, Storage, StorageError, StorageResult, StoredObject, UploadError};

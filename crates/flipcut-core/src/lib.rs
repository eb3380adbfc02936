//! Flipcut Core Library
//!
//! This crate provides the domain model, error types, configuration and the
//! retry policy evaluator shared by every flipcut component.

pub mod config;
pub mod error;
pub mod models;
pub mod retry;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, ProcessingConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{ItemStatus, WorkItem, WorkItemPatch};
pub use retry::{retry_with_policy, RetryClassification, RetryDecision, RetryPolicy};
pub use storage_types::{SignatureAlgorithm, StorageBackend};

//! Repository implementations for the item state store.

pub mod work_item;

pub use work_item::{InMemoryWorkItemRepository, WorkItemRepository};

//! Work item repositories
//!
//! The item state store is the only shared mutable resource of the service.
//! Callers depend on [`WorkItemRepository`]; the in-memory implementation is
//! what the server runs with, since durability across restarts is not provided.

pub mod db;

pub use db::{InMemoryWorkItemRepository, WorkItemRepository};

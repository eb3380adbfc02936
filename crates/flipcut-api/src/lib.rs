//! Flipcut API Library
//!
//! HTTP handlers and application setup for the image processing service.

mod api_doc;
pub mod constants;
mod handlers;
mod utils;

pub mod error;
pub mod setup;
pub mod state;

pub use error::ErrorResponse;

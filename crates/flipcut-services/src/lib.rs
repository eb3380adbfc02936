//! Flipcut Services Layer
//!
//! Clients for the remote services the pipeline depends on. Each client owns
//! its retry discipline and classifies its own failures once, at the call site.

pub mod services;

pub use services::{BackgroundRemover, RemovalError, RemovalErrorKind};
#[cfg(feature = "photoroom")]
pub use services::{PhotoroomClient, PhotoroomSettings};

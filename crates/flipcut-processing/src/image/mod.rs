//! Image processing module
//!
//! - Geometric operations on decoded images (orientation)
//! - The pipeline's local transform: horizontal flip with JPEG recompression (transformer)

pub mod orientation;
pub mod transformer;

pub use orientation::ImageOrientation;
pub use transformer::{FlipTransformer, TransformError};

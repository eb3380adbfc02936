//! Flipcut Processing Library
//!
//! The local image transform, upload validation and the processing
//! orchestrator that drives an accepted upload through background removal,
//! the flip and publication.

pub mod compression;
pub mod image;
pub mod pipeline;
pub mod validator;

pub use compression::{encode_jpeg, CompressionError};
pub use self::image::{FlipTransformer, ImageOrientation, TransformError};
pub use pipeline::{
    AcceptedUpload, PipelineHandle, ProcessedImage, ProcessingOrchestrator, StageError,
};
pub use validator::{MediaValidator, ValidationError};

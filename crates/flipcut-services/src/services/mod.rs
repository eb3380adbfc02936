pub mod background_removal;
#[cfg(feature = "photoroom")]
pub mod photoroom;

pub use background_removal::{BackgroundRemover, RemovalError, RemovalErrorKind};
#[cfg(feature = "photoroom")]
pub use photoroom::{PhotoroomClient, PhotoroomSettings};

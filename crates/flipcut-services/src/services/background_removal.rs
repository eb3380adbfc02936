//! Background removal contract and its failure taxonomy

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use flipcut_core::RetryClassification;
use thiserror::Error;

/// Stable classification of a segmentation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalErrorKind {
    AccessDenied,
    QuotaExhausted,
    BadInput,
    RateLimited,
    TransientServer,
    Timeout,
    /// DNS or connection failure before a response was received
    Network,
    Unknown,
}

impl RemovalErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => RemovalErrorKind::BadInput,
            402 => RemovalErrorKind::QuotaExhausted,
            403 => RemovalErrorKind::AccessDenied,
            429 => RemovalErrorKind::RateLimited,
            500 | 502 | 503 | 504 => RemovalErrorKind::TransientServer,
            _ => RemovalErrorKind::Unknown,
        }
    }

    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            RemovalErrorKind::AccessDenied
                | RemovalErrorKind::RateLimited
                | RemovalErrorKind::TransientServer
                | RemovalErrorKind::Timeout
                | RemovalErrorKind::Network
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RemovalErrorKind::AccessDenied => "access-denied",
            RemovalErrorKind::QuotaExhausted => "quota-exhausted",
            RemovalErrorKind::BadInput => "bad-input",
            RemovalErrorKind::RateLimited => "rate-limited",
            RemovalErrorKind::TransientServer => "transient-server",
            RemovalErrorKind::Timeout => "timeout",
            RemovalErrorKind::Network => "network",
            RemovalErrorKind::Unknown => "unknown",
        }
    }
}

impl Display for RemovalErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Failure of the background removal stage.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct RemovalError {
    pub kind: RemovalErrorKind,
    /// Remote status code, when a response was received
    pub status: Option<u16>,
    pub message: String,
}

impl RemovalError {
    /// Classify a non-success response from the segmentation service.
    pub fn from_status(status: u16) -> Self {
        let kind = RemovalErrorKind::from_status(status);
        let message = match kind {
            RemovalErrorKind::AccessDenied => {
                "Photoroom API access denied (403). This could be temporary - try again later or check your account at https://www.photoroom.com/api".to_string()
            }
            RemovalErrorKind::QuotaExhausted => {
                "Photoroom API credits exhausted. Please check your account.".to_string()
            }
            RemovalErrorKind::BadInput => "Invalid image format or corrupted image file.".to_string(),
            RemovalErrorKind::RateLimited => {
                "Photoroom API rate limit exceeded. Please try again later.".to_string()
            }
            RemovalErrorKind::TransientServer => format!(
                "Background removal failed: transient server error (Photoroom API returned status {})",
                status
            ),
            _ => format!(
                "Background removal failed: Photoroom API returned status {}",
                status
            ),
        };

        Self {
            kind,
            status: Some(status),
            message,
        }
    }

    pub fn timeout(after: Duration) -> Self {
        Self {
            kind: RemovalErrorKind::Timeout,
            status: None,
            message: format!(
                "Background removal request timed out after {}s. Please try again.",
                after.as_secs_f64()
            ),
        }
    }

    pub fn network(cause: impl Display) -> Self {
        Self {
            kind: RemovalErrorKind::Network,
            status: None,
            message: format!(
                "Background removal failed: segmentation service unreachable: {}",
                cause
            ),
        }
    }

    pub fn unknown(cause: impl Display) -> Self {
        Self {
            kind: RemovalErrorKind::Unknown,
            status: None,
            message: format!("Background removal failed: {}", cause),
        }
    }
}

impl RetryClassification for RemovalError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

/// Strips the background from an image.
#[async_trait]
pub trait BackgroundRemover: Send + Sync {
    /// Returns the segmented image bytes. Retries are the implementation's concern;
    /// an error returned here is final.
    async fn remove_background(&self, image: Bytes, filename: &str) -> Result<Bytes, RemovalError>;
}

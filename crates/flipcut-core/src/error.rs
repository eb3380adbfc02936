//! Application error type used at the HTTP boundary.
//!
//! Pipeline stage errors (removal, transform, upload, delete) live next to the
//! clients that produce them. They are recorded on the work item and never
//! reach a caller through this type.

use std::io;

/// Level at which an error is logged when it is turned into a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected client mistakes
    Debug,
    Warn,
    /// Faults on our side
    Error,
}

/// How an error is presented to HTTP clients.
pub trait ErrorMetadata {
    fn http_status_code(&self) -> u16;

    /// Machine-readable code, e.g. `NOT_FOUND`
    fn error_code(&self) -> &'static str;

    /// Whether repeating the same request may succeed
    fn is_recoverable(&self) -> bool;

    fn suggested_action(&self) -> Option<&'static str>;

    /// Message safe to show to clients
    fn client_message(&self) -> String;

    /// Whether details must stay out of responses
    fn is_sensitive(&self) -> bool;

    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error: {message}")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

/// Fixed presentation of one error variant.
struct Presentation {
    status: u16,
    code: &'static str,
    recoverable: bool,
    action: Option<&'static str>,
    sensitive: bool,
    level: LogLevel,
}

const fn client_fault(status: u16, code: &'static str, action: &'static str) -> Presentation {
    Presentation {
        status,
        code,
        recoverable: false,
        action: Some(action),
        sensitive: false,
        level: LogLevel::Debug,
    }
}

const INTERNAL: Presentation = Presentation {
    status: 500,
    code: "INTERNAL_ERROR",
    recoverable: true,
    action: Some("Retry after a short delay"),
    sensitive: true,
    level: LogLevel::Error,
};

impl AppError {
    fn presentation(&self) -> Presentation {
        match self {
            AppError::InvalidInput(_) => client_fault(
                400,
                "INVALID_INPUT",
                "Upload a JPEG, PNG or WebP image",
            ),
            AppError::BadRequest(_) => client_fault(
                400,
                "BAD_REQUEST",
                "Send a multipart form with a single 'image' file field",
            ),
            AppError::NotFound(_) => {
                client_fault(404, "NOT_FOUND", "Check the image id returned by the upload")
            }
            AppError::PayloadTooLarge(_) => {
                client_fault(413, "PAYLOAD_TOO_LARGE", "Reduce file size and upload again")
            }
            AppError::Internal(_) | AppError::InternalWithSource { .. } => INTERNAL,
        }
    }

    /// Variant name, shown in non-production error responses
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::BadRequest(_) => "BadRequest",
            AppError::NotFound(_) => "NotFound",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Message followed by up to five levels of its source chain.
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();
        let mut source = self.source();
        let mut depth = 0;

        while let Some(err) = source {
            if depth == 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
            depth += 1;
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        self.presentation().status
    }

    fn error_code(&self) -> &'static str {
        self.presentation().code
    }

    fn is_recoverable(&self) -> bool {
        self.presentation().recoverable
    }

    fn suggested_action(&self) -> Option<&'static str> {
        self.presentation().action
    }

    fn is_sensitive(&self) -> bool {
        self.presentation().sensitive
    }

    fn log_level(&self) -> LogLevel {
        self.presentation().level
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::PayloadTooLarge(msg) => msg.clone(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_presentation() {
        let err = AppError::NotFound("Image not found".to_string());
        assert_eq!(err.http_status_code(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert!(!err.is_recoverable());
        assert!(!err.is_sensitive());
        assert_eq!(err.client_message(), "Image not found");
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_payload_too_large_is_413() {
        let err = AppError::PayloadTooLarge("6000000 bytes".to_string());
        assert_eq!(err.http_status_code(), 413);
        assert_eq!(err.error_code(), "PAYLOAD_TOO_LARGE");
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let err = AppError::Internal("lock poisoned".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert!(err.is_sensitive());
        assert_eq!(err.client_message(), "Internal server error");
    }

    #[test]
    fn test_from_anyhow_keeps_source_chain() {
        let inner = anyhow::anyhow!("disk full").context("writing asset");
        let err = AppError::from(inner);
        assert_eq!(err.error_type(), "Internal");
        assert!(err.detailed_message().contains("Caused by"));
    }
}

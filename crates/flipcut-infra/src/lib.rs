//! Flipcut Infrastructure Library
//!
//! Cross-cutting concerns shared by the HTTP service: tracing setup and
//! response middleware.

pub mod middleware;
pub mod telemetry;

pub use middleware::{
    get_request_id, request_id_middleware, security_headers_middleware, RequestId,
    SecurityHeadersConfig,
};
pub use telemetry::{init_telemetry, shutdown_telemetry, LogFormat};

use axum::extract::State;
use axum::http::HeaderValue;
use axum::{extract::Request, middleware::Next, response::Response};

/// Settings for [`security_headers_middleware`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SecurityHeadersConfig {
    /// Send `Strict-Transport-Security`; only meaningful behind HTTPS
    pub hsts: bool,
}

impl SecurityHeadersConfig {
    pub fn for_environment(is_production: bool) -> Self {
        Self {
            hsts: is_production,
        }
    }
}

/// Security headers middleware
///
/// Adds the usual hardening headers to every response. The CSP allows the
/// API documentation page to load its viewer script from unpkg.
pub async fn security_headers_middleware(
    State(config): State<SecurityHeadersConfig>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();

    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("X-Frame-Options", HeaderValue::from_static("SAMEORIGIN"));
    headers.insert("Referrer-Policy", HeaderValue::from_static("no-referrer"));
    headers.insert(
        "Cross-Origin-Resource-Policy",
        HeaderValue::from_static("cross-origin"),
    );

    if config.hsts {
        headers.insert(
            "Strict-Transport-Security",
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }

    headers.insert(
        "Content-Security-Policy",
        HeaderValue::from_static("default-src 'self'; script-src 'self' https://unpkg.com; style-src 'self' 'unsafe-inline'; img-src 'self' data: https:; font-src 'self' data: https:; connect-src 'self'; frame-ancestors 'self'"),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::get, Router};
    use axum_test::TestServer;

    fn app(config: SecurityHeadersConfig) -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(
                config,
                security_headers_middleware,
            ))
    }

    #[tokio::test]
    async fn test_sets_hardening_headers() {
        let server = TestServer::new(app(SecurityHeadersConfig::default())).unwrap();
        let response = server.get("/").await;

        assert_eq!(response.header("x-content-type-options"), "nosniff");
        assert_eq!(response.header("x-frame-options"), "SAMEORIGIN");
        assert!(response.headers().get("content-security-policy").is_some());
        assert!(response.headers().get("strict-transport-security").is_none());
    }

    #[tokio::test]
    async fn test_hsts_only_in_production() {
        let server = TestServer::new(app(SecurityHeadersConfig::for_environment(true))).unwrap();
        let response = server.get("/").await;

        assert!(response
            .header("strict-transport-security")
            .to_str()
            .unwrap()
            .starts_with("max-age="));
    }
}

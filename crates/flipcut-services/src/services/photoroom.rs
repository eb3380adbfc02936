//! Photoroom segmentation client
//!
//! Docs: https://www.photoroom.com/api/docs/reference

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use flipcut_core::{retry_with_policy, Config, RetryPolicy};

use super::background_removal::{BackgroundRemover, RemovalError};

const USER_AGENT: &str = "ImageProcessing-Backend/1.0";

#[derive(Clone)]
pub struct PhotoroomSettings {
    pub api_url: String,
    pub api_key: String,
    /// Applied to every attempt separately
    pub timeout: Duration,
    pub retry_policy: RetryPolicy,
}

impl Debug for PhotoroomSettings {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PhotoroomSettings")
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .field("retry_policy", &self.retry_policy)
            .finish_non_exhaustive()
    }
}

pub struct PhotoroomClient {
    http_client: reqwest::Client,
    settings: PhotoroomSettings,
}

impl Debug for PhotoroomClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PhotoroomClient")
            .field("settings", &self.settings)
            .finish()
    }
}

impl PhotoroomClient {
    /// Connection failures are retryable; builder and body errors are not.
    fn transport_error(&self, err: reqwest::Error) -> RemovalError {
        if err.is_timeout() {
            RemovalError::timeout(self.settings.timeout)
        } else if err.is_connect() {
            RemovalError::network(err)
        } else {
            RemovalError::unknown(err)
        }
    }

    pub fn new(settings: PhotoroomSettings) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build Photoroom HTTP client")?;

        Ok(Self {
            http_client,
            settings,
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config
            .photoroom_api_key()
            .context("PHOTOROOM_API_KEY not configured")?;

        Self::new(PhotoroomSettings {
            api_url: config.photoroom_api_url().to_string(),
            api_key: api_key.to_string(),
            timeout: config.background_removal_timeout(),
            retry_policy: config.removal_retry_policy(),
        })
    }

    /// One request, cancelled if it outlives the per-attempt timeout.
    async fn attempt(&self, image: &Bytes, filename: &str) -> Result<Bytes, RemovalError> {
        let request = async {
            let file = reqwest::multipart::Part::bytes(image.to_vec())
                .file_name(filename.to_string());
            let form = reqwest::multipart::Form::new()
                .part("image_file", file)
                .text("size", "auto");

            let response = self
                .http_client
                .post(&self.settings.api_url)
                .header("x-api-key", &self.settings.api_key)
                .multipart(form)
                .send()
                .await
                .map_err(|e| self.transport_error(e))?;

            let status = response.status();
            if !status.is_success() {
                return Err(RemovalError::from_status(status.as_u16()));
            }

            let body = response.bytes().await.map_err(|e| self.transport_error(e))?;
            if body.is_empty() {
                return Err(RemovalError::unknown("segmentation service returned an empty body"));
            }
            Ok(body)
        };

        match tokio::time::timeout(self.settings.timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(RemovalError::timeout(self.settings.timeout)),
        }
    }
}

#[async_trait]
impl BackgroundRemover for PhotoroomClient {
    #[tracing::instrument(skip(self, image), fields(size_bytes = image.len()))]
    async fn remove_background(&self, image: Bytes, filename: &str) -> Result<Bytes, RemovalError> {
        let start = std::time::Instant::now();

        let result = retry_with_policy(
            &self.settings.retry_policy,
            "background_removal",
            |attempt| {
                tracing::debug!(attempt, "Calling segmentation service");
                self.attempt(&image, filename)
            },
        )
        .await;

        match &result {
            Ok(output) => tracing::info!(
                output_bytes = output.len(),
                duration_ms = start.elapsed().as_millis() as u64,
                "Background removed"
            ),
            Err(e) => tracing::error!(
                classification = %e.kind,
                status = e.status,
                error = %e,
                "Background removal failed"
            ),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RemovalErrorKind;

    fn settings(api_url: String) -> PhotoroomSettings {
        PhotoroomSettings {
            api_url,
            api_key: "test-key".to_string(),
            timeout: Duration::from_secs(5),
            retry_policy: RetryPolicy::new(Duration::from_millis(1), 3),
        }
    }

    fn image() -> Bytes {
        Bytes::from_static(b"\x89PNG\r\n\x1a\nfake")
    }

    #[tokio::test]
    async fn test_success_returns_segmented_bytes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/segment")
            .match_header("x-api-key", "test-key")
            .match_header("user-agent", USER_AGENT)
            .with_status(200)
            .with_header("content-type", "image/png")
            .with_body(b"segmented")
            .expect(1)
            .create_async()
            .await;

        let client = PhotoroomClient::new(settings(format!("{}/v1/segment", server.url()))).unwrap();
        let output = client.remove_background(image(), "cat.png").await.unwrap();

        mock.assert_async().await;
        assert_eq!(&output[..], b"segmented");
    }

    #[tokio::test]
    async fn test_server_errors_exhaust_retries() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/segment")
            .with_status(500)
            .expect(3)
            .create_async()
            .await;

        let client = PhotoroomClient::new(settings(format!("{}/v1/segment", server.url()))).unwrap();
        let err = client.remove_background(image(), "cat.png").await.unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.kind, RemovalErrorKind::TransientServer);
        assert_eq!(err.status, Some(500));
        assert!(err.to_string().contains("transient server error"));
    }

    #[tokio::test]
    async fn test_bad_input_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/segment")
            .with_status(400)
            .expect(1)
            .create_async()
            .await;

        let client = PhotoroomClient::new(settings(format!("{}/v1/segment", server.url()))).unwrap();
        let err = client.remove_background(image(), "cat.png").await.unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.kind, RemovalErrorKind::BadInput);
    }

    #[tokio::test]
    async fn test_access_denied_is_retried_then_reported() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/segment")
            .with_status(403)
            .expect(3)
            .create_async()
            .await;

        let client = PhotoroomClient::new(settings(format!("{}/v1/segment", server.url()))).unwrap();
        let err = client.remove_background(image(), "cat.png").await.unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.kind, RemovalErrorKind::AccessDenied);
        assert!(err.to_string().contains("access denied"));
    }

    #[tokio::test]
    async fn test_attempt_timeout_is_classified() {
        // Accepts connections (via the backlog) but never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let mut settings = settings(format!("http://{}/v1/segment", addr));
        settings.timeout = Duration::from_millis(50);
        settings.retry_policy = RetryPolicy::new(Duration::from_millis(1), 2);

        let client = PhotoroomClient::new(settings).unwrap();
        let err = client.remove_background(image(), "cat.png").await.unwrap_err();

        assert_eq!(err.kind, RemovalErrorKind::Timeout);
        drop(listener);
    }

    #[tokio::test]
    async fn test_connection_refused_is_network() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut settings = settings(format!("http://{}/v1/segment", addr));
        settings.retry_policy = RetryPolicy::new(Duration::from_millis(1), 2);

        let client = PhotoroomClient::new(settings).unwrap();
        let err = client.remove_background(image(), "cat.png").await.unwrap_err();

        assert_eq!(err.kind, RemovalErrorKind::Network);
    }

    #[tokio::test]
    async fn test_request_build_failure_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/segment")
            .expect(0)
            .create_async()
            .await;

        let mut settings = settings(format!("{}/v1/segment", server.url()));
        settings.api_key = "bad\nkey".to_string();

        let client = PhotoroomClient::new(settings).unwrap();
        let err = client.remove_background(image(), "cat.png").await.unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.kind, RemovalErrorKind::Unknown);
        assert!(!err.kind.is_retryable());
    }

    #[test]
    fn test_from_config_requires_api_key() {
        let config = Config::default();
        assert!(PhotoroomClient::from_config(&config).is_err());
    }
}

//! Cloudinary storage backend
//!
//! Talks to the Cloudinary upload API directly with signed multipart requests.
//! Requests are signed with SHA-1 by default, matching a standard account;
//! SHA-256 is available for accounts that have it enabled.

use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use flipcut_core::SignatureAlgorithm;
use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::keys::validate_object_id;
use crate::traits::{Storage, StorageError, StorageResult, StoredObject};
use crate::StorageBackend;

const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Connection and upload settings for a Cloudinary account.
#[derive(Clone)]
pub struct CloudinarySettings {
    pub api_url: String,
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
    /// Server-side clamp applied to both width and height
    pub max_dimension: u32,
    pub signature_algorithm: SignatureAlgorithm,
}

impl Debug for CloudinarySettings {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CloudinarySettings")
            .field("api_url", &self.api_url)
            .field("cloud_name", &self.cloud_name)
            .field("folder", &self.folder)
            .field("max_dimension", &self.max_dimension)
            .field("signature_algorithm", &self.signature_algorithm)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
    #[serde(default)]
    bytes: Option<u64>,
    #[serde(default)]
    format: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    message: String,
}

pub struct CloudinaryStorage {
    http_client: reqwest::Client,
    settings: CloudinarySettings,
}

impl Debug for CloudinaryStorage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CloudinaryStorage")
            .field("settings", &self.settings)
            .finish()
    }
}

/// Map a transport-level failure onto the storage taxonomy.
fn transport_error(err: reqwest::Error) -> StorageError {
    if err.is_timeout() {
        StorageError::Timeout(err.to_string())
    } else if err.is_decode() {
        StorageError::InvalidResponse(err.to_string())
    } else {
        StorageError::Network(err.to_string())
    }
}

fn digest_hex<D: Digest>(to_sign: &str, secret: &str) -> String {
    let mut hasher = D::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Turn a non-success response into a `RemoteStatus` error, keeping the provider's message.
async fn status_error(response: reqwest::Response) -> StorageError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error.message)
        .unwrap_or(body);

    StorageError::RemoteStatus { status, message }
}

impl CloudinaryStorage {
    pub fn new(settings: CloudinarySettings) -> StorageResult<Self> {
        if settings.cloud_name.is_empty()
            || settings.api_key.is_empty()
            || settings.api_secret.is_empty()
        {
            return Err(StorageError::ConfigError(
                "Cloudinary cloud name, API key and API secret are required".to_string(),
            ));
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| StorageError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            settings,
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/v1_1/{}/image/{}",
            self.settings.api_url.trim_end_matches('/'),
            self.settings.cloud_name,
            action
        )
    }

    /// Hex digest of the sorted `key=value` pairs joined by `&`, followed by the secret.
    fn sign(&self, params: &BTreeMap<&'static str, String>) -> String {
        let to_sign = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        match self.settings.signature_algorithm {
            SignatureAlgorithm::Sha1 => digest_hex::<Sha1>(&to_sign, &self.settings.api_secret),
            SignatureAlgorithm::Sha256 => {
                digest_hex::<Sha256>(&to_sign, &self.settings.api_secret)
            }
        }
    }

    /// Signed form for `params`, with credentials appended.
    fn signed_form(&self, params: BTreeMap<&'static str, String>) -> reqwest::multipart::Form {
        let signature = self.sign(&params);

        let mut form = reqwest::multipart::Form::new();
        for (key, value) in params {
            form = form.text(key, value);
        }
        form.text("api_key", self.settings.api_key.clone())
            .text("signature", signature)
    }

    fn timestamp() -> String {
        chrono::Utc::now().timestamp().to_string()
    }

    fn upload_params(&self, desired_id: &str, timestamp: String) -> BTreeMap<&'static str, String> {
        let max = self.settings.max_dimension;
        BTreeMap::from([
            ("folder", self.settings.folder.clone()),
            ("format", "jpg".to_string()),
            ("public_id", desired_id.to_string()),
            ("quality", "auto".to_string()),
            ("timestamp", timestamp),
            ("transformation", format!("c_limit,h_{},w_{}", max, max)),
        ])
    }
}

#[async_trait]
impl Storage for CloudinaryStorage {
    async fn upload(&self, desired_id: &str, data: Bytes) -> StorageResult<StoredObject> {
        validate_object_id(desired_id)?;
        let size = data.len();
        let start = std::time::Instant::now();

        let file = reqwest::multipart::Part::bytes(data.to_vec())
            .file_name(format!("{}.jpg", desired_id))
            .mime_str("image/jpeg")
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        let form = self
            .signed_form(self.upload_params(desired_id, Self::timestamp()))
            .part("file", file);

        let response = self
            .http_client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let body: UploadResponse = response.json().await.map_err(transport_error)?;

        tracing::info!(
            storage_id = %body.public_id,
            size_bytes = size,
            stored_bytes = body.bytes,
            format = body.format.as_deref().unwrap_or("unknown"),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Cloudinary upload successful"
        );

        Ok(StoredObject {
            storage_id: body.public_id,
            public_url: body.secure_url,
        })
    }

    async fn delete(&self, storage_id: &str) -> StorageResult<()> {
        validate_object_id(storage_id)?;
        let start = std::time::Instant::now();

        let params = BTreeMap::from([
            ("public_id", storage_id.to_string()),
            ("timestamp", Self::timestamp()),
        ]);

        let response = self
            .http_client
            .post(self.endpoint("destroy"))
            .multipart(self.signed_form(params))
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let body: DestroyResponse = response.json().await.map_err(transport_error)?;

        match body.result.as_str() {
            "ok" | "not found" => {
                tracing::info!(
                    storage_id = %storage_id,
                    result = %body.result,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Cloudinary delete successful"
                );
                Ok(())
            }
            other => Err(StorageError::DeleteFailed(format!(
                "Cloudinary destroy returned '{}'",
                other
            ))),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Cloudinary
    }
}

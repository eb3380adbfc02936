//! Configuration module
//!
//! Configuration is read from the environment (optionally seeded from a `.env`
//! file) once at startup. Required variables are checked together so a
//! misconfigured deployment reports everything that is missing in one go.

use std::env;
use std::time::Duration;

use crate::retry::RetryPolicy;
use crate::storage_types::{SignatureAlgorithm, StorageBackend};

// Common constants
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_FILE_SIZE_BYTES: usize = 5 * 1024 * 1024;
const DEFAULT_JPEG_QUALITY: u8 = 90;
const DEFAULT_MAX_IMAGE_DIMENSION: u32 = 1200;
const DEFAULT_REMOVAL_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PHOTOROOM_API_URL: &str = "https://sdk.photoroom.com/v1/segment";
const DEFAULT_CLOUDINARY_API_URL: &str = "https://api.cloudinary.com";
const DEFAULT_CLOUDINARY_FOLDER: &str = "image-processing-service";
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Server-level configuration
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    /// `text` or `json`
    pub log_format: String,
}

impl Default for BaseConfig {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_PORT,
            cors_origins: vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
            environment: "development".to_string(),
            log_format: "text".to_string(),
        }
    }
}

/// Image processing service configuration
#[derive(Clone, Debug)]
pub struct ProcessingConfig {
    pub base: BaseConfig,
    // Background removal (Photoroom segmentation API)
    pub photoroom_api_key: Option<String>,
    pub photoroom_api_url: String,
    pub background_removal_timeout: Duration,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub cloudinary_cloud_name: Option<String>,
    pub cloudinary_api_key: Option<String>,
    pub cloudinary_api_secret: Option<String>,
    pub cloudinary_api_url: String,
    pub cloudinary_folder: String,
    pub cloudinary_signature_algorithm: SignatureAlgorithm,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Image handling
    pub max_file_size_bytes: usize,
    pub allowed_content_types: Vec<String>,
    pub jpeg_quality: u8,
    pub max_image_dimension: u32,
    // Retry policies, one per remote client
    pub removal_retry_policy: RetryPolicy,
    pub upload_retry_policy: RetryPolicy,
    pub delete_retry_policy: RetryPolicy,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            base: BaseConfig::default(),
            photoroom_api_key: None,
            photoroom_api_url: DEFAULT_PHOTOROOM_API_URL.to_string(),
            background_removal_timeout: Duration::from_secs(DEFAULT_REMOVAL_TIMEOUT_SECS),
            storage_backend: StorageBackend::Cloudinary,
            cloudinary_cloud_name: None,
            cloudinary_api_key: None,
            cloudinary_api_secret: None,
            cloudinary_api_url: DEFAULT_CLOUDINARY_API_URL.to_string(),
            cloudinary_folder: DEFAULT_CLOUDINARY_FOLDER.to_string(),
            cloudinary_signature_algorithm: SignatureAlgorithm::default(),
            local_storage_path: None,
            local_storage_base_url: None,
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
            allowed_content_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            max_image_dimension: DEFAULT_MAX_IMAGE_DIMENSION,
            removal_retry_policy: RetryPolicy::background_removal(),
            upload_retry_policy: RetryPolicy::storage_upload(),
            delete_retry_policy: RetryPolicy::storage_delete(),
        }
    }
}

/// Read an optional, non-empty environment variable.
fn env_opt(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a variable when it is set. A value that does not parse is an error,
/// not a silent fallback to the default.
fn env_parse_or<T>(name: &str, default: T) -> Result<T, anyhow::Error>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env_opt(name) {
        Some(value) => value
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Invalid value for {}: '{}' ({})", name, value, e)),
        None => Ok(default),
    }
}

impl ProcessingConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let defaults = ProcessingConfig::default();

        let environment = env_opt("ENVIRONMENT")
            .or_else(|| env_opt("APP_ENV"))
            .unwrap_or_else(|| defaults.base.environment.clone());

        let cors_origins: Vec<String> = env_opt("ALLOWED_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| defaults.base.cors_origins.clone());

        let storage_backend = match env_opt("STORAGE_BACKEND") {
            Some(value) => value.parse::<StorageBackend>()?,
            None => defaults.storage_backend,
        };

        let cloudinary_signature_algorithm = env_parse_or(
            "CLOUDINARY_SIGNATURE_ALGORITHM",
            defaults.cloudinary_signature_algorithm,
        )?;

        let jpeg_quality: u8 = env_parse_or("JPEG_QUALITY", defaults.jpeg_quality)?;
        if !(1..=100).contains(&jpeg_quality) {
            return Err(anyhow::anyhow!(
                "JPEG_QUALITY must be between 1 and 100, got {}",
                jpeg_quality
            ));
        }

        Ok(ProcessingConfig {
            base: BaseConfig {
                server_port: env_parse_or("PORT", defaults.base.server_port)?,
                cors_origins,
                environment,
                log_format: env_opt("LOG_FORMAT").unwrap_or(defaults.base.log_format),
            },
            photoroom_api_key: env_opt("PHOTOROOM_API_KEY"),
            photoroom_api_url: env_opt("PHOTOROOM_API_URL").unwrap_or(defaults.photoroom_api_url),
            background_removal_timeout: Duration::from_secs(env_parse_or(
                "BACKGROUND_REMOVAL_TIMEOUT_SECS",
                DEFAULT_REMOVAL_TIMEOUT_SECS,
            )?),
            storage_backend,
            cloudinary_cloud_name: env_opt("CLOUDINARY_CLOUD_NAME"),
            cloudinary_api_key: env_opt("CLOUDINARY_API_KEY"),
            cloudinary_api_secret: env_opt("CLOUDINARY_API_SECRET"),
            cloudinary_api_url: env_opt("CLOUDINARY_API_URL")
                .unwrap_or(defaults.cloudinary_api_url),
            cloudinary_folder: env_opt("CLOUDINARY_FOLDER").unwrap_or(defaults.cloudinary_folder),
            cloudinary_signature_algorithm,
            local_storage_path: env_opt("LOCAL_STORAGE_PATH"),
            local_storage_base_url: env_opt("LOCAL_STORAGE_BASE_URL"),
            max_file_size_bytes: env_parse_or("MAX_FILE_SIZE", defaults.max_file_size_bytes)?,
            allowed_content_types: defaults.allowed_content_types,
            jpeg_quality,
            max_image_dimension: env_parse_or("MAX_IMAGE_DIMENSION", defaults.max_image_dimension)?,
            removal_retry_policy: defaults.removal_retry_policy,
            upload_retry_policy: defaults.upload_retry_policy,
            delete_retry_policy: defaults.delete_retry_policy,
        })
    }

    /// Names of required variables that are not set for the selected backend.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();

        if self.photoroom_api_key.is_none() {
            missing.push("PHOTOROOM_API_KEY");
        }

        match self.storage_backend {
            StorageBackend::Cloudinary => {
                if self.cloudinary_cloud_name.is_none() {
                    missing.push("CLOUDINARY_CLOUD_NAME");
                }
                if self.cloudinary_api_key.is_none() {
                    missing.push("CLOUDINARY_API_KEY");
                }
                if self.cloudinary_api_secret.is_none() {
                    missing.push("CLOUDINARY_API_SECRET");
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    missing.push("LOCAL_STORAGE_PATH");
                }
                if self.local_storage_base_url.is_none() {
                    missing.push("LOCAL_STORAGE_BASE_URL");
                }
            }
        }

        missing
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(anyhow::anyhow!(
                "Missing required environment variables: {}",
                missing.join(", ")
            ));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE must be greater than 0"));
        }

        if self.max_image_dimension == 0 {
            return Err(anyhow::anyhow!("MAX_IMAGE_DIMENSION must be greater than 0"));
        }

        Ok(())
    }
}

/// Application configuration.
#[derive(Clone, Debug, Default)]
pub struct Config(pub Box<ProcessingConfig>);

impl Config {
    fn inner(&self) -> &ProcessingConfig {
        &self.0
    }

    pub fn new(config: ProcessingConfig) -> Self {
        Config(Box::new(config))
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ProcessingConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.inner().base.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    // Convenience getters
    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn log_format(&self) -> &str {
        &self.inner().base.log_format
    }

    pub fn photoroom_api_key(&self) -> Option<&str> {
        self.inner().photoroom_api_key.as_deref()
    }

    pub fn photoroom_api_url(&self) -> &str {
        &self.inner().photoroom_api_url
    }

    pub fn background_removal_timeout(&self) -> Duration {
        self.inner().background_removal_timeout
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.inner().storage_backend
    }

    pub fn cloudinary_cloud_name(&self) -> Option<&str> {
        self.inner().cloudinary_cloud_name.as_deref()
    }

    pub fn cloudinary_api_key(&self) -> Option<&str> {
        self.inner().cloudinary_api_key.as_deref()
    }

    pub fn cloudinary_api_secret(&self) -> Option<&str> {
        self.inner().cloudinary_api_secret.as_deref()
    }

    pub fn cloudinary_api_url(&self) -> &str {
        &self.inner().cloudinary_api_url
    }

    pub fn cloudinary_folder(&self) -> &str {
        &self.inner().cloudinary_folder
    }

    pub fn cloudinary_signature_algorithm(&self) -> SignatureAlgorithm {
        self.inner().cloudinary_signature_algorithm
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.inner().local_storage_base_url.as_deref()
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.inner().max_file_size_bytes
    }

    pub fn allowed_content_types(&self) -> &[String] {
        &self.inner().allowed_content_types
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.inner().jpeg_quality
    }

    pub fn max_image_dimension(&self) -> u32 {
        self.inner().max_image_dimension
    }

    pub fn removal_retry_policy(&self) -> RetryPolicy {
        self.inner().removal_retry_policy
    }

    pub fn upload_retry_policy(&self) -> RetryPolicy {
        self.inner().upload_retry_policy
    }

    pub fn delete_retry_policy(&self) -> RetryPolicy {
        self.inner().delete_retry_policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_service_contract() {
        let config = ProcessingConfig::default();
        assert_eq!(config.base.server_port, 3000);
        assert_eq!(config.max_file_size_bytes, 5 * 1024 * 1024);
        assert_eq!(config.jpeg_quality, 90);
        assert_eq!(config.background_removal_timeout, Duration::from_secs(30));
        assert_eq!(config.removal_retry_policy.max_attempts, 3);
        assert_eq!(config.upload_retry_policy.max_attempts, 1);
        assert_eq!(config.delete_retry_policy.base_delay, Duration::from_millis(1000));
    }

    #[test]
    fn test_missing_required_reports_everything_for_cloudinary() {
        let config = ProcessingConfig::default();
        let missing = config.missing_required();
        assert_eq!(
            missing,
            vec![
                "PHOTOROOM_API_KEY",
                "CLOUDINARY_CLOUD_NAME",
                "CLOUDINARY_API_KEY",
                "CLOUDINARY_API_SECRET"
            ]
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_local_backend_requires_path_and_url() {
        let config = ProcessingConfig {
            photoroom_api_key: Some("key".to_string()),
            storage_backend: StorageBackend::Local,
            ..ProcessingConfig::default()
        };
        assert_eq!(
            config.missing_required(),
            vec!["LOCAL_STORAGE_PATH", "LOCAL_STORAGE_BASE_URL"]
        );

        let config = ProcessingConfig {
            local_storage_path: Some("/tmp/flipcut".to_string()),
            local_storage_base_url: Some("http://localhost:3000/media".to_string()),
            ..config
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_parse_or_rejects_malformed_values() {
        const VAR: &str = "FLIPCUT_TEST_MALFORMED_PORT";

        assert_eq!(env_parse_or::<u16>(VAR, 3000).unwrap(), 3000);

        env::set_var(VAR, "80a");
        let err = env_parse_or::<u16>(VAR, 3000).unwrap_err();
        env::remove_var(VAR);

        assert!(err.to_string().contains(VAR));
    }

    #[test]
    fn test_is_production() {
        let mut inner = ProcessingConfig::default();
        assert!(!Config::new(inner.clone()).is_production());
        inner.base.environment = "PROD".to_string();
        assert!(Config::new(inner).is_production());
    }
}

//! Blob store configuration.

use crate::error::{CloudError, CloudResult};
use serde::{Deserialize, Serialize};

/// Configuration for the HTTP storage hub transport.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HubConfig {
    /// Base URL of the storage hub (e.g., "https://hub.example.org").
    pub hub_url: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            hub_url: "http://localhost:3000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl HubConfig {
    pub fn validate(&self) -> CloudResult<()> {
        if self.hub_url.trim().is_empty() {
            return Err(CloudError::Config("hub_url must not be empty".to_string()));
        }
        if !(self.hub_url.starts_with("http://") || self.hub_url.starts_with("https://")) {
            return Err(CloudError::Config(format!(
                "hub_url must be an http(s) URL, got {}",
                self.hub_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(CloudError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Hub URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.hub_url.trim_end_matches('/')
    }
}

/// Configuration for the S3 transport.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct S3StoreConfig {
    /// S3 bucket name.
    pub s3_bucket: String,

    /// AWS region for S3.
    pub s3_region: String,

    /// Optional S3 endpoint override (for MinIO in testing).
    pub s3_endpoint_override: Option<String>,

    /// Prefix prepended to every wallet namespace, e.g. "wallets/".
    pub key_prefix: String,
}

impl Default for S3StoreConfig {
    fn default() -> Self {
        Self {
            s3_bucket: "wallet-config".to_string(),
            s3_region: "us-east-1".to_string(),
            s3_endpoint_override: None,
            key_prefix: String::new(),
        }
    }
}

impl S3StoreConfig {
    pub fn validate(&self) -> CloudResult<()> {
        if self.s3_bucket.trim().is_empty() {
            return Err(CloudError::Config("s3_bucket must not be empty".to_string()));
        }
        if self.s3_region.trim().is_empty() {
            return Err(CloudError::Config("s3_region must not be empty".to_string()));
        }
        Ok(())
    }

    /// Creates a config for testing with MinIO.
    pub fn minio() -> Self {
        Self {
            s3_bucket: "wallet-config".to_string(),
            s3_region: "us-east-1".to_string(),
            s3_endpoint_override: Some("http://localhost:9000".to_string()),
            key_prefix: "test-runs/".to_string(),
        }
    }
}

//! S3 blob store.
//!
//! Each wallet gets the namespace `s3://{bucket}/{key_prefix}{address}/`.
//! The client is rebuilt per request from the current credentials so that
//! rotated credentials take effect without reconnecting.

use crate::config::S3StoreConfig;
use crate::error::CloudResult;
use crate::store::{BlobStore, StoreError, StoreResult};
use crate::types::StoreCredentials;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::primitives::ByteStream;
use tokio::sync::RwLock;
use tracing::debug;

/// S3-backed blob store bound to one wallet's namespace.
pub struct S3BlobStore {
    bucket: String,
    region: String,
    endpoint_override: Option<String>,
    namespace: String,
    creds: RwLock<StoreCredentials>,
}

impl S3BlobStore {
    pub fn new(config: &S3StoreConfig, address: &str, creds: StoreCredentials) -> CloudResult<Self> {
        config.validate()?;
        Ok(Self {
            bucket: config.s3_bucket.clone(),
            region: config.s3_region.clone(),
            endpoint_override: config.s3_endpoint_override.clone(),
            namespace: format!("{}{address}", config.key_prefix),
            creds: RwLock::new(creds),
        })
    }

    /// Swaps in refreshed credentials.
    pub async fn set_credentials(&self, creds: StoreCredentials) {
        *self.creds.write().await = creds;
    }

    /// Full object key for a name inside this wallet's namespace.
    pub fn object_key(&self, name: &str) -> String {
        format!("{}/{name}", self.namespace)
    }

    async fn build_client(&self) -> StoreResult<S3Client> {
        let creds = self.creds.read().await;
        if creds.is_expired() {
            return Err(StoreError::Transport("S3 credentials expired".to_string()));
        }

        let credentials = aws_credential_types::Credentials::new(
            &creds.access_key_id,
            &creds.secret_access_key,
            creds.session_token.clone(),
            None,
            "walletcfg-static",
        );

        let mut config_builder = aws_sdk_s3::Config::builder()
            .region(aws_types::region::Region::new(self.region.clone()))
            .credentials_provider(credentials)
            .behavior_version_latest();

        if let Some(ref endpoint) = self.endpoint_override {
            config_builder = config_builder
                .endpoint_url(endpoint)
                .force_path_style(true);
        }

        Ok(S3Client::from_conf(config_builder.build()))
    }
}

impl BlobStore for S3BlobStore {
    async fn fetch(&self, name: &str) -> StoreResult<Vec<u8>> {
        let client = self.build_client().await?;
        let key = self.object_key(name);

        let resp = match client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                let service_err = e.into_service_error();
                if service_err.is_no_such_key() {
                    return Err(StoreError::NotFound(name.to_string()));
                }
                return Err(StoreError::Transport(format!(
                    "download failed for {key}: {service_err}"
                )));
            }
        };

        let body = resp
            .body
            .collect()
            .await
            .map_err(|e| StoreError::Transport(format!("failed to read body for {key}: {e}")))?;

        let bytes = body.into_bytes().to_vec();
        debug!(
            "downloaded {} bytes from s3://{}/{key}",
            bytes.len(),
            self.bucket
        );
        Ok(bytes)
    }

    async fn upload(&self, name: &str, data: Vec<u8>) -> StoreResult<()> {
        let client = self.build_client().await?;
        let key = self.object_key(name);
        let size = data.len();

        client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type("application/json")
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| StoreError::Transport(format!("upload failed for {key}: {e}")))?;

        debug!("uploaded {size} bytes to s3://{}/{key}", self.bucket);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn creds(expires_at: Option<chrono::DateTime<Utc>>) -> StoreCredentials {
        StoreCredentials {
            access_key_id: "AKIA_TEST".into(),
            secret_access_key: "secret".into(),
            session_token: None,
            expires_at,
        }
    }

    #[test]
    fn object_key_includes_prefix_and_address() {
        let config = S3StoreConfig {
            key_prefix: "wallets/".into(),
            ..S3StoreConfig::default()
        };
        let store = S3BlobStore::new(&config, "deadbeef", creds(None)).unwrap();
        assert_eq!(store.object_key("wallet-config.json"), "wallets/deadbeef/wallet-config.json");
    }

    #[test]
    fn rejects_empty_bucket() {
        let config = S3StoreConfig {
            s3_bucket: String::new(),
            ..S3StoreConfig::default()
        };
        assert!(S3BlobStore::new(&config, "a", creds(None)).is_err());
    }

    #[tokio::test]
    async fn expired_credentials_fail_before_network() {
        let store = S3BlobStore::new(
            &S3StoreConfig::default(),
            "a",
            creds(Some(Utc::now() - Duration::seconds(5))),
        )
        .unwrap();

        let err = store.fetch("wallet-config.json").await.unwrap_err();
        assert!(matches!(err, StoreError::Transport(msg) if msg.contains("expired")));
    }
}

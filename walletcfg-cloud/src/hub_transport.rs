//! HTTP storage hub transport.
//!
//! Objects are read from the hub's public read prefix and written through the
//! authenticated store endpoint:
//!
//! - `GET  {hub_url}/hub_info` once on connect, for `read_url_prefix`
//! - `GET  {read_url_prefix}{address}/{name}`
//! - `POST {hub_url}/store/{address}/{name}` with a bearer token
//!
//! Producing the bearer token (signed with the wallet's key) is the caller's
//! job.

use crate::config::HubConfig;
use crate::error::{CloudError, CloudResult};
use crate::store::{BlobStore, StoreError, StoreResult};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Subset of the hub's `/hub_info` response used by this transport.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HubInfo {
    pub read_url_prefix: String,
    #[serde(default)]
    pub challenge_text: Option<String>,
    #[serde(default)]
    pub max_file_upload_size_megabytes: Option<u64>,
}

/// Blob store bound to one wallet's namespace on a storage hub.
pub struct HubBlobStore {
    client: Client,
    hub_url: String,
    read_url_prefix: String,
    address: String,
    auth_token: String,
}

impl HubBlobStore {
    /// Queries `hub_info` and binds a store to `address`.
    pub async fn connect(config: &HubConfig, address: &str, auth_token: &str) -> CloudResult<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let url = format!("{}/hub_info", config.base_url());
        let info: HubInfo = client
            .get(&url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| CloudError::HubConnect(e.to_string()))?
            .json()
            .await?;

        debug!("connected to hub {} (reads from {})", config.base_url(), info.read_url_prefix);

        Ok(Self::with_read_prefix(
            client,
            config.base_url(),
            &info.read_url_prefix,
            address,
            auth_token,
        ))
    }

    /// Binds a store without the `hub_info` round-trip.
    pub fn with_read_prefix(
        client: Client,
        hub_url: &str,
        read_url_prefix: &str,
        address: &str,
        auth_token: &str,
    ) -> Self {
        let mut read_url_prefix = read_url_prefix.to_string();
        if !read_url_prefix.ends_with('/') {
            read_url_prefix.push('/');
        }
        Self {
            client,
            hub_url: hub_url.trim_end_matches('/').to_string(),
            read_url_prefix,
            address: address.to_string(),
            auth_token: auth_token.to_string(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Public URL an object is readable from.
    pub fn read_url(&self, name: &str) -> String {
        format!("{}{}/{name}", self.read_url_prefix, self.address)
    }

    fn write_url(&self, name: &str) -> String {
        format!("{}/store/{}/{name}", self.hub_url, self.address)
    }
}

impl BlobStore for HubBlobStore {
    async fn fetch(&self, name: &str) -> StoreResult<Vec<u8>> {
        let url = self.read_url(name);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| StoreError::Transport(format!("download failed for {url}: {e}")))?;

        match resp.status() {
            // Some hub drivers answer 403 for keys that were never written.
            StatusCode::NOT_FOUND | StatusCode::FORBIDDEN => {
                return Err(StoreError::NotFound(name.to_string()));
            }
            status if !status.is_success() => {
                return Err(StoreError::Transport(format!(
                    "download failed for {url}: HTTP {status}"
                )));
            }
            _ => {}
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| StoreError::Transport(format!("failed to read body for {url}: {e}")))?;

        debug!("downloaded {} bytes from {url}", bytes.len());
        Ok(bytes.to_vec())
    }

    async fn upload(&self, name: &str, data: Vec<u8>) -> StoreResult<()> {
        let url = self.write_url(name);
        let size = data.len();

        self.client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, format!("bearer {}", self.auth_token))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(data)
            .send()
            .await
            .map_err(|e| StoreError::Transport(format!("upload failed for {url}: {e}")))?
            .error_for_status()
            .map_err(|e| StoreError::Transport(format!("upload failed for {url}: {e}")))?;

        debug!("uploaded {size} bytes to {url}");
        Ok(())
    }
}

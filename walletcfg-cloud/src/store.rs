//! Blob store seam used by the sync engine.
//!
//! A store handle is already bound to a single wallet's namespace; object
//! names passed in are relative to it. Implementations must report a missing
//! object as [`StoreError::NotFound`] and everything else as
//! [`StoreError::Transport`].

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("store transport error: {0}")]
    Transport(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Key-value blob storage addressed by object name.
pub trait BlobStore: Send + Sync {
    /// Downloads the full object.
    fn fetch(&self, name: &str) -> impl Future<Output = StoreResult<Vec<u8>>> + Send;

    /// Replaces the full object. There is no partial write.
    fn upload(&self, name: &str, data: Vec<u8>) -> impl Future<Output = StoreResult<()>> + Send;
}

impl<S: BlobStore> BlobStore for Arc<S> {
    fn fetch(&self, name: &str) -> impl Future<Output = StoreResult<Vec<u8>>> + Send {
        (**self).fetch(name)
    }

    fn upload(&self, name: &str, data: Vec<u8>) -> impl Future<Output = StoreResult<()>> + Send {
        (**self).upload(name, data)
    }
}

/// In-process blob store.
///
/// Useful for local-only wallets and as a fake in tests: reads and writes can
/// be made to fail on demand.
#[derive(Default)]
pub struct MemoryBlobStore {
    objects: RwLock<HashMap<String, Vec<u8>>>,
    uploads: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores raw bytes without counting an upload.
    pub async fn insert_raw(&self, name: &str, data: impl Into<Vec<u8>>) {
        self.objects.write().await.insert(name.to_string(), data.into());
    }

    pub async fn get_raw(&self, name: &str) -> Option<Vec<u8>> {
        self.objects.read().await.get(name).cloned()
    }

    /// Number of successful uploads so far.
    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl BlobStore for MemoryBlobStore {
    async fn fetch(&self, name: &str) -> StoreResult<Vec<u8>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Transport(format!("read of {name} refused")));
        }
        self.objects
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    async fn upload(&self, name: &str, data: Vec<u8>) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Transport(format!("write of {name} refused")));
        }
        let size = data.len();
        self.objects.write().await.insert(name.to_string(), data);
        self.uploads.fetch_add(1, Ordering::SeqCst);
        debug!("stored {size} bytes at memory://{name}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_object_is_not_found() {
        let store = MemoryBlobStore::new();
        let err = store.fetch("nope.json").await.unwrap_err();
        assert_eq!(err, StoreError::NotFound("nope.json".to_string()));
    }

    #[tokio::test]
    async fn upload_replaces_whole_object() {
        let store = MemoryBlobStore::new();
        store.upload("a", b"first".to_vec()).await.unwrap();
        store.upload("a", b"2".to_vec()).await.unwrap();

        assert_eq!(store.fetch("a").await.unwrap(), b"2".to_vec());
        assert_eq!(store.upload_count(), 2);
    }

    #[tokio::test]
    async fn failed_write_leaves_previous_object() {
        let store = MemoryBlobStore::new();
        store.upload("a", b"kept".to_vec()).await.unwrap();
        store.set_fail_writes(true);

        let err = store.upload("a", b"lost".to_vec()).await.unwrap_err();
        assert!(matches!(err, StoreError::Transport(_)));
        assert_eq!(store.get_raw("a").await, Some(b"kept".to_vec()));
        assert_eq!(store.upload_count(), 1);
    }

    #[tokio::test]
    async fn insert_raw_does_not_count_as_upload() {
        let store = MemoryBlobStore::new();
        store.insert_raw("a", "raw").await;
        assert_eq!(store.upload_count(), 0);
        assert_eq!(store.fetch("a").await.unwrap(), b"raw".to_vec());
    }

    #[tokio::test]
    async fn arc_store_delegates() {
        let store = Arc::new(MemoryBlobStore::new());
        BlobStore::upload(&store, "x", b"1".to_vec()).await.unwrap();
        assert_eq!(BlobStore::fetch(&store, "x").await.unwrap(), b"1".to_vec());
    }
}

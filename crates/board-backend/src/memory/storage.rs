//! In-memory blob storage.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use tracing::debug;

use crate::traits::FileStorage;
use crate::value::child;
use crate::{BackendError, BackendResult};

const DEFAULT_BASE_URL: &str = "memory://storage";

#[derive(Debug, Default)]
struct StorageState {
    objects: BTreeMap<String, Vec<u8>>,
    failures: VecDeque<BackendError>,
    uploads: usize,
}

/// Blob storage that keeps uploads in a map and hands out fake URLs.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    base_url: String,
    state: Arc<Mutex<StorageState>>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl MemoryStorage {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            state: Arc::new(Mutex::new(StorageState::default())),
        }
    }

    pub fn fail_next_upload(&self, err: BackendError) {
        self.state.lock().failures.push_back(err);
    }

    pub fn object(&self, path: &str) -> Option<Vec<u8>> {
        self.state.lock().objects.get(path).cloned()
    }

    pub fn upload_count(&self) -> usize {
        self.state.lock().uploads
    }
}

#[async_trait]
impl FileStorage for MemoryStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> BackendResult<String> {
        let mut state = self.state.lock();
        if let Some(err) = state.failures.pop_front() {
            return Err(err);
        }
        debug!(path, size = bytes.len(), "Stored object");
        state.objects.insert(path.to_string(), bytes);
        state.uploads += 1;
        Ok(child(&self.base_url, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_returns_public_url() {
        let storage = MemoryStorage::default();
        let url = storage.upload("images/1_cat.png", vec![1, 2]).await.unwrap();
        assert_eq!(url, "memory://storage/images/1_cat.png");
        assert_eq!(storage.object("images/1_cat.png"), Some(vec![1, 2]));
        assert_eq!(storage.upload_count(), 1);
    }

    #[tokio::test]
    async fn failed_upload_stores_nothing() {
        let storage = MemoryStorage::default();
        storage.fail_next_upload(BackendError::Upload("quota exceeded".into()));
        assert!(storage.upload("images/x", vec![1]).await.is_err());
        assert_eq!(storage.upload_count(), 0);
        assert_eq!(storage.object("images/x"), None);
    }
}

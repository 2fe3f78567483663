//! Key-value blob storage.
//!
//! This module provides the durable key-value store contract the ledger
//! persists through, plus a memory-based implementation for testing. The
//! store is injected into [`LocalLedger`](crate::LocalLedger) rather than
//! reached through any ambient state, so the ledger is testable against
//! any backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::StoreError;

/// Trait for durable key-value blob storage.
///
/// The ledger serializes the whole leaderboard as one blob per key; a
/// backend only needs whole-value reads and writes.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Retrieve the blob stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Store `bytes` under `key`, replacing any previous blob.
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;

    /// Remove the blob stored under `key`.
    ///
    /// Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory key-value store for testing.
///
/// Stores blobs in a thread-safe HashMap. Not persistent - all data is
/// lost when the store is dropped. Forced-failure knobs allow tests to
/// exercise the fatal storage paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    blobs: HashMap<String, Vec<u8>>,
    fail_next_get: Option<StoreError>,
    fail_next_put: Option<StoreError>,
    fail_next_delete: Option<StoreError>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of blobs currently stored.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().blobs.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().blobs.is_empty()
    }

    /// Clear all blobs from the store.
    pub fn clear(&self) {
        self.inner.lock().unwrap().blobs.clear();
    }

    /// Cause the next `get()` to fail with the given error.
    pub fn fail_next_get(&self, error: StoreError) {
        self.inner.lock().unwrap().fail_next_get = Some(error);
    }

    /// Cause the next `put()` to fail with the given error.
    pub fn fail_next_put(&self, error: StoreError) {
        self.inner.lock().unwrap().fail_next_put = Some(error);
    }

    /// Cause the next `delete()` to fail with the given error.
    pub fn fail_next_delete(&self, error: StoreError) {
        self.inner.lock().unwrap().fail_next_delete = Some(error);
    }
}

impl Clone for MemoryStore {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(error) = inner.fail_next_get.take() {
            return Err(error);
        }
        Ok(inner.blobs.get(key).cloned())
    }

    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(error) = inner.fail_next_put.take() {
            return Err(error);
        }
        inner.blobs.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(error) = inner.fail_next_delete.take() {
            return Err(error);
        }
        inner.blobs.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_put_get() {
        let store = MemoryStore::new();

        store.put("board", b"[1,2,3]").await.unwrap();
        let blob = store.get("board").await.unwrap();

        assert_eq!(blob, Some(b"[1,2,3]".to_vec()));
    }

    #[tokio::test]
    async fn memory_store_missing_key_returns_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("nothing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn memory_store_put_overwrites() {
        let store = MemoryStore::new();

        store.put("board", b"old").await.unwrap();
        store.put("board", b"new").await.unwrap();

        assert_eq!(store.get("board").await.unwrap(), Some(b"new".to_vec()));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn memory_store_delete() {
        let store = MemoryStore::new();
        store.put("board", b"data").await.unwrap();

        store.delete("board").await.unwrap();

        assert_eq!(store.get("board").await.unwrap(), None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn delete_absent_key_is_ok() {
        let store = MemoryStore::new();
        store.delete("never-existed").await.unwrap();
    }

    #[tokio::test]
    async fn forced_put_failure_fires_once() {
        let store = MemoryStore::new();
        store.fail_next_put(StoreError::Full);

        let result = store.put("board", b"data").await;
        assert!(matches!(result, Err(StoreError::Full)));

        // Next put works again.
        store.put("board", b"data").await.unwrap();
    }

    #[tokio::test]
    async fn forced_get_failure_fires_once() {
        let store = MemoryStore::new();
        store.put("board", b"data").await.unwrap();
        store.fail_next_get(StoreError::Backend("io error".into()));

        assert!(store.get("board").await.is_err());
        assert_eq!(store.get("board").await.unwrap(), Some(b"data".to_vec()));
    }

    #[tokio::test]
    async fn forced_delete_failure() {
        let store = MemoryStore::new();
        store.put("board", b"data").await.unwrap();
        store.fail_next_delete(StoreError::Backend("locked".into()));

        assert!(store.delete("board").await.is_err());
        // Blob survives the failed delete.
        assert_eq!(store.get("board").await.unwrap(), Some(b"data".to_vec()));
    }

    #[tokio::test]
    async fn clone_shares_state() {
        let store1 = MemoryStore::new();
        let store2 = store1.clone();

        store1.put("board", b"shared").await.unwrap();

        assert_eq!(store2.get("board").await.unwrap(), Some(b"shared".to_vec()));
    }
}

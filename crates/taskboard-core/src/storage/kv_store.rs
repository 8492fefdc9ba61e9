use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use thiserror::Error;

/// Errors produced by key-value storage implementations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KvStoreError {
    /// Requested key does not exist.
    #[error("entry not found for key: {key}")]
    NotFound { key: String },
    /// Underlying storage failure (I/O, quota, lock poisoning).
    #[error("storage failure: {reason}")]
    Storage { reason: String },
}

/// Durable local key-value slot. Values are opaque bytes; callers own the
/// encoding.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Persist a value under a key, overwriting any existing entry.
    async fn put(&self, key: &str, value: &[u8]) -> Result<(), KvStoreError>;

    /// Retrieve the value for a key.
    async fn get(&self, key: &str) -> Result<Vec<u8>, KvStoreError>;

    /// Remove a key and its value (idempotent).
    async fn delete(&self, key: &str) -> Result<(), KvStoreError>;
}

/// Process-local store for tests and ephemeral sessions. Clones share the same
/// backing map, so a test can keep a handle while a task store owns another.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    inner: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one entry, handy for load-path tests.
    pub fn with_entry(key: &str, value: impl Into<Vec<u8>>) -> Self {
        let store = Self::new();
        if let Ok(mut map) = store.inner.lock() {
            map.insert(key.to_string(), value.into());
        }
        store
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>, KvStoreError> {
        self.inner.lock().map_err(|err| KvStoreError::Storage {
            reason: format!("lock poisoned: {err}"),
        })
    }
}

#[async_trait]
impl KvStore for InMemoryStore {
    async fn put(&self, key: &str, value: &[u8]) -> Result<(), KvStoreError> {
        self.lock()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, KvStoreError> {
        self.lock()?
            .get(key)
            .cloned()
            .ok_or_else(|| KvStoreError::NotFound {
                key: key.to_string(),
            })
    }

    async fn delete(&self, key: &str) -> Result<(), KvStoreError> {
        self.lock()?.remove(key);
        Ok(())
    }
}

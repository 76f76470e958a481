//! Key-value persistence for small per-visitor state.
//!
//! Services read and write one key at a time through [`KeyValueStore`]; the
//! JSON file store survives restarts, the memory store is for tests and
//! ephemeral runs.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::errors::ServiceError;

pub mod json_map_store;

pub use json_map_store::JsonMapStore;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn read(&self, key: &str) -> Result<Option<String>, ServiceError>;
    async fn write(&self, key: &str, value: &str) -> Result<(), ServiceError>;
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn read(&self, key: &str) -> Result<Option<String>, ServiceError> {
        Ok(self.inner.read().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), ServiceError> {
        self.inner.write().await.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonMapStore<String, String> {
    async fn read(&self, key: &str) -> Result<Option<String>, ServiceError> {
        Ok(self.get(&key.to_string()).await)
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), ServiceError> {
        if self.get(&key.to_string()).await.as_deref() == Some(value) {
            return Ok(());
        }
        self.insert(key.to_string(), value.to_string()).await
    }
}

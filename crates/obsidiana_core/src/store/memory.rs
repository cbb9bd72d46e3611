//! In-memory backend for tests and ephemeral runs.

use async_trait::async_trait;
use dashmap::DashMap;

use super::StoreBackend;
use crate::error::Result;

/// Backend keeping documents in a concurrent map. Nothing touches disk;
/// contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: DashMap<String, serde_json::Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoreBackend for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<serde_json::Value>> {
        Ok(self.documents.get(key).map(|entry| entry.value().clone()))
    }

    async fn save(&self, key: &str, value: serde_json::Value) -> Result<()> {
        self.documents.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.documents.remove(key);
        Ok(())
    }
}

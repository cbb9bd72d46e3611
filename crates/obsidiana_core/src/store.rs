//! Flat key-value persistence for companion documents.
//!
//! Every feature keeps its state under a single well-known key with a
//! typed schema. Backends move whole JSON documents; typed access goes
//! through [`Store`], which is injected into the feature services rather
//! than reached for as a global.

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{CoreError, Result};

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// Raw document access by string key.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    async fn load(&self, key: &str) -> Result<Option<serde_json::Value>>;
    async fn save(&self, key: &str, value: serde_json::Value) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Schema marker binding a storage key to its document type.
///
/// An absent document reads as `Default`, so first-run code paths never
/// special-case missing keys.
pub trait StoreKey {
    const KEY: &'static str;
    type Value: Serialize + DeserializeOwned + Default + Send;
}

/// Typed facade over a raw backend.
#[derive(Debug, Clone)]
pub struct Store {
    backend: Arc<dyn StoreBackend>,
}

impl Store {
    pub fn new(backend: Arc<dyn StoreBackend>) -> Self {
        Self { backend }
    }

    /// Load the document for `K`, falling back to its default when the
    /// key has never been written.
    pub async fn get<K: StoreKey>(&self) -> Result<K::Value> {
        match self.backend.load(K::KEY).await? {
            Some(value) => {
                serde_json::from_value(value).map_err(|e| CoreError::store_corrupt(K::KEY, e))
            }
            None => Ok(K::Value::default()),
        }
    }

    pub async fn put<K: StoreKey>(&self, value: &K::Value) -> Result<()> {
        let raw = serde_json::to_value(value).map_err(|e| CoreError::SerializationError {
            data_type: K::KEY.to_string(),
            cause: e,
        })?;
        self.backend.save(K::KEY, raw).await
    }

    pub async fn remove<K: StoreKey>(&self) -> Result<()> {
        self.backend.remove(K::KEY).await
    }

    /// Read-modify-write round trip. Last writer wins; documents are
    /// small enough that rewriting them whole is the contract.
    pub async fn update<K, F, T>(&self, mutate: F) -> Result<T>
    where
        K: StoreKey,
        F: FnOnce(&mut K::Value) -> T + Send,
    {
        let mut value = self.get::<K>().await?;
        let out = mutate(&mut value);
        self.put::<K>(&value).await?;
        Ok(out)
    }
}

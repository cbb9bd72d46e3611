//! Single-file JSON backend.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::StoreBackend;
use crate::error::{CoreError, Result};

/// Backend holding every document in one JSON object on disk.
///
/// Writes land in a sibling temp file and are renamed into place, so an
/// interrupted write never clobbers the last good document.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open the store at `path`, creating parent directories as needed.
    /// An existing file must parse as a JSON object.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    CoreError::store_io(parent.display().to_string(), "create directory", e)
                })?;
            }
        }

        let store = Self {
            path,
            write_lock: Mutex::new(()),
        };
        // Surface corruption at open rather than on first access
        store.read_document().await?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<serde_json::Map<String, serde_json::Value>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Default::default()),
            Err(e) => {
                return Err(CoreError::store_io(
                    self.path.display().to_string(),
                    "read",
                    e,
                ));
            }
        };
        serde_json::from_str(&content).map_err(|e| CoreError::store_corrupt("store root", e))
    }

    async fn write_document(
        &self,
        document: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<()> {
        let content =
            serde_json::to_string_pretty(document).map_err(|e| CoreError::SerializationError {
                data_type: "store document".to_string(),
                cause: e,
            })?;

        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp = PathBuf::from(tmp_name);

        tokio::fs::write(&tmp, content)
            .await
            .map_err(|e| CoreError::store_io(tmp.display().to_string(), "write", e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| CoreError::store_io(self.path.display().to_string(), "rename", e))?;
        Ok(())
    }
}

#[async_trait]
impl StoreBackend for JsonFileStore {
    async fn load(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let mut document = self.read_document().await?;
        Ok(document.remove(key))
    }

    async fn save(&self, key: &str, value: serde_json::Value) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;
        document.insert(key.to_string(), value);
        self.write_document(&document).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;
        if document.remove(key).is_some() {
            self.write_document(&document).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("store.json"))
            .await
            .unwrap();
        assert!(store.load("anything").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_round_trip_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = JsonFileStore::open(path.clone()).await.unwrap();
        store
            .save("profile", serde_json::json!({"name": "Ana"}))
            .await
            .unwrap();

        let reopened = JsonFileStore::open(path).await.unwrap();
        let value = reopened.load("profile").await.unwrap().unwrap();
        assert_eq!(value["name"], "Ana");
    }

    #[tokio::test]
    async fn test_remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = JsonFileStore::open(path.clone()).await.unwrap();
        store.save("doc", serde_json::json!(1)).await.unwrap();
        store.remove("doc").await.unwrap();

        let reopened = JsonFileStore::open(path).await.unwrap();
        assert!(reopened.load("doc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deep").join("inside").join("store.json");
        let store = JsonFileStore::open(nested).await.unwrap();
        store.save("doc", serde_json::json!(true)).await.unwrap();
        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_rejected_at_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        tokio::fs::write(&path, "not json at all").await.unwrap();

        let err = JsonFileStore::open(path).await.unwrap_err();
        assert!(matches!(err, CoreError::StoreCorrupt { .. }));
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("store.json"))
            .await
            .unwrap();

        store.save("a", serde_json::json!(1)).await.unwrap();
        store.save("b", serde_json::json!(2)).await.unwrap();
        store.remove("a").await.unwrap();

        assert!(store.load("a").await.unwrap().is_none());
        assert_eq!(store.load("b").await.unwrap().unwrap(), 2);
    }
}

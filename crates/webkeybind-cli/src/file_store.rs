//! A [`KeyValueStore`] persisted as one JSON object per file.

use std::{fmt, io, path::PathBuf};

use async_trait::async_trait;
use bindings::{KeyValueStore, StorageChange, StoreError, check_quota};
use serde_json::{Map, Value};
use tokio::{
    fs,
    sync::{Mutex, broadcast},
};
use tracing::debug;

/// Capacity of the change-notification channel.
const CHANGE_CAPACITY: usize = 16;

/// JSON-file backed key-value store. The whole file is rewritten on each
/// change; a missing file reads as empty.
#[derive(Debug)]
pub struct FileStore {
    /// Store file.
    path: PathBuf,
    /// Per-item byte limit.
    quota: Option<usize>,
    /// Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
    /// Change fan-out.
    changes: broadcast::Sender<StorageChange>,
}

impl FileStore {
    /// A store over `path`.
    pub fn new(path: impl Into<PathBuf>, quota: Option<usize>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            path: path.into(),
            quota,
            lock: Mutex::new(()),
            changes,
        }
    }

    /// Map a filesystem error to a store failure naming the file.
    fn failure(&self, e: impl fmt::Display) -> StoreError {
        StoreError::Failure(format!("{}: {e}", self.path.display()))
    }

    /// Every item in the file.
    async fn load(&self) -> Result<Map<String, Value>, StoreError> {
        let text = match fs::read_to_string(&self.path).await {
            Ok(t) => t,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(self.failure(e)),
        };
        if text.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(&text) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(StoreError::Malformed {
                key: self.path.display().to_string(),
                message: "expected a JSON object".to_string(),
            }),
            Err(e) => Err(StoreError::Malformed {
                key: self.path.display().to_string(),
                message: e.to_string(),
            }),
        }
    }

    /// Replace the file with `items`, via a sibling temporary file.
    async fn save(&self, items: Map<String, Value>) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).await.map_err(|e| self.failure(e))?;
        }
        let text = serde_json::to_string_pretty(&Value::Object(items))
            .map_err(|e| self.failure(e))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text).await.map_err(|e| self.failure(e))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.failure(e))?;
        debug!(path = %self.path.display(), "store written");
        Ok(())
    }

    /// Publish a change; having no subscribers is fine.
    fn publish(&self, change: StorageChange) {
        self.changes.send(change).ok();
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        check_quota(key, &value, self.quota)?;
        let _guard = self.lock.lock().await;
        let mut items = self.load().await?;
        let old_value = items.insert(key.to_string(), value.clone());
        self.save(items).await?;
        self.publish(StorageChange {
            key: key.to_string(),
            old_value,
            new_value: Some(value),
        });
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut items = self.load().await?;
        let Some(old_value) = items.remove(key) else {
            return Ok(());
        };
        self.save(items).await?;
        self.publish(StorageChange {
            key: key.to_string(),
            old_value: Some(old_value),
            new_value: None,
        });
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use std::{env, process};

    use serde_json::json;

    use super::*;

    fn temp_path(label: &str) -> PathBuf {
        env::temp_dir()
            .join(format!("wkb-store-{label}-{}", process::id()))
            .join("storage.json")
    }

    #[tokio::test]
    async fn missing_file_is_empty_then_persists() {
        let path = temp_path("persist");
        fs::remove_file(&path).await.ok();
        let store = FileStore::new(&path, None);
        assert_eq!(store.get("bindings").await.unwrap(), None);

        let mut rx = store.subscribe();
        store.set("bindings", json!([1, 2])).await.unwrap();
        assert_eq!(rx.recv().await.unwrap().new_value, Some(json!([1, 2])));

        let reopened = FileStore::new(&path, None);
        assert_eq!(reopened.get("bindings").await.unwrap(), Some(json!([1, 2])));
        reopened.remove("bindings").await.unwrap();
        assert_eq!(store.get("bindings").await.unwrap(), None);
        fs::remove_file(&path).await.ok();
    }

    #[tokio::test]
    async fn quota_and_malformed_file() {
        let path = temp_path("quota");
        let store = FileStore::new(&path, Some(16));
        let err = store
            .set("bindings", json!(["a long enough value"]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { .. }));

        fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        fs::write(&path, "[1]").await.unwrap();
        assert!(matches!(
            store.get("bindings").await,
            Err(StoreError::Malformed { .. })
        ));
        fs::remove_file(&path).await.ok();
    }
}

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::broadcast;

/// Capacity of the change-notification channel.
const CHANGE_CAPACITY: usize = 64;

/// Errors raised by storage backends and the binding repository.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backend failed to read or write.
    #[error("Storage failure: {0}")]
    Failure(String),

    /// The serialized item is larger than the backend allows.
    #[error("Item '{key}' is {size} bytes, over the {quota} byte quota")]
    QuotaExceeded {
        /// Storage key.
        key: String,
        /// Serialized size including the key.
        size: usize,
        /// Per-item limit.
        quota: usize,
    },

    /// A stored value does not have the expected shape.
    #[error("Malformed value under '{key}': {message}")]
    Malformed {
        /// Storage key.
        key: String,
        /// Decoder message.
        message: String,
    },

    /// No binding with this id.
    #[error("Binding '{0}' not found")]
    NotFound(String),
}

/// A change to one key, delivered to subscribers after it is applied.
#[derive(Clone, Debug, PartialEq)]
pub struct StorageChange {
    /// Key that changed.
    pub key: String,
    /// Previous value.
    pub old_value: Option<Value>,
    /// New value; `None` when removed.
    pub new_value: Option<Value>,
}

/// Asynchronous JSON key-value storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Replace the value under `key`.
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Delete `key`; absent keys are not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Receive every subsequent change.
    fn subscribe(&self) -> broadcast::Receiver<StorageChange>;
}

/// Bytes an item occupies against a quota: key plus serialized JSON.
pub fn item_size(key: &str, value: &Value) -> usize {
    key.len() + value.to_string().len()
}

/// Reject `value` when it does not fit in `quota`.
pub fn check_quota(key: &str, value: &Value, quota: Option<usize>) -> Result<(), StoreError> {
    let Some(quota) = quota else {
        return Ok(());
    };
    let size = item_size(key, value);
    if size > quota {
        return Err(StoreError::QuotaExceeded {
            key: key.to_string(),
            size,
            quota,
        });
    }
    Ok(())
}

/// In-memory store with an optional per-item quota.
#[derive(Debug)]
pub struct MemoryStore {
    /// Items.
    items: Mutex<HashMap<String, Value>>,
    /// Per-item byte limit.
    quota: Option<usize>,
    /// Change fan-out.
    changes: broadcast::Sender<StorageChange>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// An empty store without a quota.
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            items: Mutex::new(HashMap::new()),
            quota: None,
            changes,
        }
    }

    /// An empty store that rejects items larger than `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            quota: Some(bytes),
            ..Self::new()
        }
    }

    /// Convenience constructor returning a shareable handle.
    pub fn shared(quota: Option<usize>) -> Arc<Self> {
        Arc::new(match quota {
            Some(q) => Self::with_quota(q),
            None => Self::new(),
        })
    }

    /// Publish a change; having no subscribers is fine.
    fn publish(&self, change: StorageChange) {
        self.changes.send(change).ok();
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.items.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        check_quota(key, &value, self.quota)?;
        let old_value = self.items.lock().insert(key.to_string(), value.clone());
        self.publish(StorageChange {
            key: key.to_string(),
            old_value,
            new_value: Some(value),
        });
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let old_value = self.items.lock().remove(key);
        if old_value.is_some() {
            self.publish(StorageChange {
                key: key.to_string(),
                old_value,
                new_value: None,
            });
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.changes.subscribe()
    }
}

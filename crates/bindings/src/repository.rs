use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::{KeyBinding, KeyValueStore, StoreError};

/// Default storage key of the binding collection.
pub const BINDINGS_KEY: &str = "bindings";

/// Reads and writes the binding collection.
///
/// Every write re-reads the whole collection, modifies it and writes it back;
/// concurrent writers race and the last write wins.
#[derive(Clone)]
pub struct BindingRepository {
    /// Backing store.
    store: Arc<dyn KeyValueStore>,
    /// Key of the collection.
    key: String,
}

impl BindingRepository {
    /// A repository over `store` using the default key.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, BINDINGS_KEY)
    }

    /// A repository over `store` using `key`.
    pub fn with_key(store: Arc<dyn KeyValueStore>, key: &str) -> Self {
        Self {
            store,
            key: key.to_string(),
        }
    }

    /// The backing store.
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// The collection's storage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Decode a stored collection; a missing value is an empty collection.
    pub fn decode(&self, value: Option<Value>) -> Result<Vec<KeyBinding>, StoreError> {
        match value {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(v) => serde_json::from_value(v).map_err(|e| StoreError::Malformed {
                key: self.key.clone(),
                message: e.to_string(),
            }),
        }
    }

    /// Every binding in stored order.
    pub async fn list(&self) -> Result<Vec<KeyBinding>, StoreError> {
        let value = self.store.get(&self.key).await?;
        self.decode(value)
    }

    /// Bindings whose domain equals `domain`, or all of them for `None`.
    pub async fn list_for_domain(
        &self,
        domain: Option<&str>,
    ) -> Result<Vec<KeyBinding>, StoreError> {
        let all = self.list().await?;
        Ok(match domain {
            Some(d) => all.into_iter().filter(|b| b.domain == d).collect(),
            None => all,
        })
    }

    /// The binding with `id`.
    pub async fn find(&self, id: &str) -> Result<Option<KeyBinding>, StoreError> {
        Ok(self.list().await?.into_iter().find(|b| b.id == id))
    }

    /// Write the whole collection.
    async fn write(&self, bindings: &[KeyBinding]) -> Result<(), StoreError> {
        let value =
            serde_json::to_value(bindings).map_err(|e| StoreError::Failure(e.to_string()))?;
        self.store.set(&self.key, value).await
    }

    /// Write an empty collection.
    pub async fn initialize(&self) -> Result<(), StoreError> {
        self.write(&[]).await
    }

    /// Insert `binding`, or replace the one with the same id in place.
    /// Returns true when an existing binding was replaced.
    pub async fn save(&self, binding: KeyBinding) -> Result<bool, StoreError> {
        let mut all = self.list().await?;
        let id = binding.id.clone();
        let replaced = match all.iter_mut().find(|b| b.id == binding.id) {
            Some(slot) => {
                *slot = binding;
                true
            }
            None => {
                all.push(binding);
                false
            }
        };
        self.write(&all).await?;
        info!(%id, replaced, "binding saved");
        Ok(replaced)
    }

    /// Remove the binding with `id`. Returns true when one was removed.
    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut all = self.list().await?;
        let before = all.len();
        all.retain(|b| b.id != id);
        let removed = all.len() != before;
        self.write(&all).await?;
        info!(%id, removed, "binding deleted");
        Ok(removed)
    }

    /// Enable or disable the binding with `id`.
    pub async fn set_enabled(&self, id: &str, enabled: bool) -> Result<(), StoreError> {
        let mut all = self.list().await?;
        let slot = all
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        slot.enabled = enabled;
        self.write(&all).await?;
        info!(%id, enabled, "binding toggled");
        Ok(())
    }
}

//! Key-value store implementation using Apache OpenDAL.

use async_trait::async_trait;
use opendal::{ErrorKind, Operator, services};
use serde_json::Value;
use tracing::debug;

use super::config::StorageProvider;
use super::error::StorageError;

/// Durable get/set/remove over JSON values in one namespace.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &Value) -> Result<(), StorageError>;

    /// Removes `key`. Removing an absent key succeeds.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// [`KeyValueStore`] backed by an OpenDAL operator.
///
/// Each key is one object named `<key>.json`.
pub struct OpenDalStore {
    operator: Operator,
    provider: StorageProvider,
}

impl OpenDalStore {
    /// Create a new store from provider configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_provider(provider: StorageProvider) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&provider)?;
        Ok(Self { operator, provider })
    }

    /// Create an in-memory store.
    ///
    /// # Errors
    ///
    /// Returns an error if the memory service cannot be initialized.
    pub fn in_memory() -> Result<Self, StorageError> {
        Self::from_provider(StorageProvider::memory())
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::Memory => Ok(Operator::new(services::Memory::default())
                .map_err(|e| StorageError::configuration(e.to_string()))?
                .finish()),
            StorageProvider::LocalFs { root } => {
                let root = root
                    .to_str()
                    .ok_or_else(|| StorageError::configuration("invalid path"))?;
                let builder = services::Fs::default().root(root);

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
        }
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Object path for `key`.
    ///
    /// Keys are fixed identifiers; only ASCII alphanumerics, hyphens and
    /// underscores are accepted so a key can never escape the root.
    fn object_path(key: &str) -> Result<String, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if valid {
            Ok(format!("{key}.json"))
        } else {
            Err(StorageError::InvalidKey(key.to_string()))
        }
    }
}

#[async_trait]
impl KeyValueStore for OpenDalStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let path = Self::object_path(key)?;
        let buffer = match self.operator.read(&path).await {
            Ok(buffer) => buffer,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let value = serde_json::from_slice(&buffer.to_vec())
            .map_err(|e| StorageError::serialization(key, &e))?;
        Ok(Some(value))
    }

    async fn set(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        let path = Self::object_path(key)?;
        let bytes = serde_json::to_vec(value).map_err(|e| StorageError::serialization(key, &e))?;
        debug!(key, bytes = bytes.len(), "Writing value");
        self.operator.write(&path, bytes).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = Self::object_path(key)?;
        self.operator.delete(&path).await?;
        Ok(())
    }
}

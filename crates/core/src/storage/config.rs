//! Storage configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tally_shared::config::{StorageBackend, StorageSettings};

/// Storage provider configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// Process memory; contents vanish with the store.
    Memory,
    /// Local filesystem.
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
}

impl StorageProvider {
    /// Create in-memory provider.
    #[must_use]
    pub const fn memory() -> Self {
        Self::Memory
    }

    /// Create local filesystem provider.
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Get the provider name for diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::LocalFs { .. } => "local",
        }
    }
}

impl From<&StorageSettings> for StorageProvider {
    fn from(settings: &StorageSettings) -> Self {
        match settings.provider {
            StorageBackend::Memory => Self::Memory,
            StorageBackend::Fs => Self::local_fs(settings.root.clone()),
        }
    }
}

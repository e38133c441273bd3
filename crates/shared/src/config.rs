//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Rate provider configuration.
    #[serde(default)]
    pub rates: RatesConfig,
    /// Persistence configuration.
    #[serde(default)]
    pub storage: StorageSettings,
    /// Ledger presentation defaults.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Rate provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RatesConfig {
    /// Base URL of the provider API (without trailing slash).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Static credential sent with every request.
    #[serde(default)]
    pub api_key: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.currencyapi.com/v3".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Which key-value backend holds the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// In-process memory, lost on exit.
    Memory,
    /// Local filesystem under `root`.
    #[default]
    Fs,
}

/// Persistence configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Backend selection.
    #[serde(default)]
    pub provider: StorageBackend,
    /// Root directory for the filesystem backend.
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

fn default_root() -> PathBuf {
    PathBuf::from("./data")
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            provider: StorageBackend::default(),
            root: default_root(),
        }
    }
}

/// Ledger presentation defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Number of expenses per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page_size() -> u32 {
    10
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

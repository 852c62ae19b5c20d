//! Session configuration
//!
//! Loaded from a TOML file; every section and key is optional:
//!
//! ```toml
//! [storage]
//! mode = "hybrid"
//! data_dir = "/var/lib/menu"
//! remote_url = "https://menu.example.com"
//!
//! [autosave]
//! enabled = true
//! delay_ms = 1500
//!
//! [store]
//! commit_policy = "transactional"
//!
//! [scroll]
//! offset = 72.0
//! ```
//!
//! `MENU_STORAGE_MODE` and `MENU_DATA_DIR` override the file.

use crate::error::ConfigError;
use menu_scroll::ResolverConfig;
use menu_state::CommitPolicy;
use menu_storage::{StorageConfig, StorageMode};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding `storage.mode`
pub const ENV_STORAGE_MODE: &str = "MENU_STORAGE_MODE";
/// Environment variable overriding `storage.data_dir`
pub const ENV_DATA_DIR: &str = "MENU_DATA_DIR";

/// Auto-save settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutosaveConfig {
    pub enabled: bool,
    /// Quiet period before an automatic confirm
    pub delay_ms: u64,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            delay_ms: 1_500,
        }
    }
}

impl AutosaveConfig {
    #[inline]
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Draft store settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub commit_policy: CommitPolicy,
}

/// Everything a [`crate::MenuSession`] needs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    pub storage: StorageConfig,
    pub autosave: AutosaveConfig,
    pub store: StoreConfig,
    pub scroll: ResolverConfig,
}

impl MenuConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With storage settings
    #[inline]
    #[must_use]
    pub fn with_storage(mut self, storage: StorageConfig) -> Self {
        self.storage = storage;
        self
    }

    /// With auto-save after `delay` of quiet
    #[inline]
    #[must_use]
    pub fn with_autosave(mut self, delay: Duration) -> Self {
        self.autosave = AutosaveConfig {
            enabled: true,
            delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
        };
        self
    }

    /// With commit policy
    #[inline]
    #[must_use]
    pub fn with_commit_policy(mut self, policy: CommitPolicy) -> Self {
        self.store.commit_policy = policy;
        self
    }

    /// Parse TOML text
    ///
    /// # Errors
    /// Returns error if the text is not valid TOML or a value is out of range
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` and apply environment overrides
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed, or an override
    /// is invalid
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no config at {}, using defaults", path.display());
                Self::default()
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        config.apply_env(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    /// Apply overrides from `lookup` (normally the process environment)
    ///
    /// # Errors
    /// Returns `ConfigError::Env` for an unknown storage mode
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(value) = lookup(ENV_STORAGE_MODE) {
            self.storage.mode = value.parse::<StorageMode>().map_err(|_| ConfigError::Env {
                var: ENV_STORAGE_MODE,
                value,
            })?;
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.storage.data_dir = dir.into();
        }
        Ok(())
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns error if the scroll settings are out of range
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scroll.validate()?;
        Ok(())
    }
}

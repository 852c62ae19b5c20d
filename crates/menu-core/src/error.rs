//! Error types for the menu session

use menu_scroll::ScrollError;
use menu_state::StoreError;
use menu_storage::StorageError;
use std::path::PathBuf;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file exists but could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::MenuConfig`]
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment override has an unusable value
    #[error("invalid value '{value}' for {var}")]
    Env { var: &'static str, value: String },

    /// Scroll settings out of range
    #[error(transparent)]
    Scroll(#[from] ScrollError),
}

/// Session errors
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SessionError {
    /// Check if error is retryable
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Config(_) => false,
            Self::Storage(e) => e.is_retryable(),
            Self::Store(e) => e.is_retryable(),
        }
    }
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

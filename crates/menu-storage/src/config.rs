//! Storage configuration

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

/// Which media the service writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageMode {
    /// Local file only
    #[default]
    LocalOnly,
    /// Remote endpoint only
    RemoteOnly,
    /// Remote primary, local fallback and backup
    Hybrid,
}

impl Display for StorageMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LocalOnly => "local-only",
            Self::RemoteOnly => "remote-only",
            Self::Hybrid => "hybrid",
        })
    }
}

impl std::str::FromStr for StorageMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local-only" | "local" => Ok(Self::LocalOnly),
            "remote-only" | "remote" => Ok(Self::RemoteOnly),
            "hybrid" => Ok(Self::Hybrid),
            other => Err(format!("unknown storage mode '{other}'")),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Media selection
    pub mode: StorageMode,
    /// Directory of the local payload file
    pub data_dir: PathBuf,
    /// Local payload file name
    pub file_name: String,
    /// Base URL of the remote endpoint
    pub remote_url: Option<String>,
    /// Bearer token for the remote endpoint
    pub api_token: Option<String>,
    /// Per-call timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            mode: StorageMode::LocalOnly,
            data_dir: PathBuf::from("./data"),
            file_name: "menu.json".to_string(),
            remote_url: None,
            api_token: None,
            timeout_ms: 5_000,
        }
    }
}

impl StorageConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With storage mode
    #[inline]
    #[must_use]
    pub fn with_mode(mut self, mode: StorageMode) -> Self {
        self.mode = mode;
        self
    }

    /// With local data directory
    #[inline]
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// With remote endpoint
    #[inline]
    #[must_use]
    pub fn with_remote(mut self, url: impl Into<String>) -> Self {
        self.remote_url = Some(url.into());
        self
    }

    /// With per-call timeout
    #[inline]
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

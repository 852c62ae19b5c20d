//! File-backed local medium

use crate::error::{Result, StorageError};
use crate::medium::{Medium, MediumKind};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Local medium storing the payload as one JSON file
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write never leaves a truncated payload behind.
#[derive(Debug, Clone)]
pub struct FileMedium {
    path: PathBuf,
}

impl FileMedium {
    /// Medium writing to `path`
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Medium writing `file_name` inside `dir`
    #[inline]
    #[must_use]
    pub fn in_dir(dir: impl AsRef<Path>, file_name: &str) -> Self {
        Self::new(dir.as_ref().join(file_name))
    }

    /// Target file path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn map_io(&self, err: std::io::Error) -> StorageError {
        match err.kind() {
            ErrorKind::PermissionDenied => StorageError::unavailable(
                MediumKind::Local,
                format!("{}: permission denied", self.path.display()),
            ),
            _ => StorageError::Io(err),
        }
    }
}

#[async_trait]
impl Medium for FileMedium {
    fn kind(&self) -> MediumKind {
        MediumKind::Local
    }

    async fn read(&self) -> Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) if text.trim().is_empty() => Ok(None),
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.map_io(e)),
        }
    }

    async fn write(&self, text: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| self.map_io(e))?;
            }
        }
        let temp = self.temp_path();
        tokio::fs::write(&temp, text)
            .await
            .map_err(|e| self.map_io(e))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| self.map_io(e))
    }

    async fn remove(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.map_io(e)),
        }
    }
}

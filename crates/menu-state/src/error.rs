//! Error types for draft stores

use menu_storage::StorageError;

/// Draft store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Persisting a confirmed snapshot failed
    #[error("persist failed: {0}")]
    Persist(#[source] StorageError),

    /// Loading from storage failed; in-memory state is unchanged
    #[error("load failed: {0}")]
    Load(#[source] StorageError),

    /// Referenced item or category does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Id already in use
    #[error("conflict: {0}")]
    Conflict(String),

    /// Edit rejected by content rules
    #[error("invalid edit: {0}")]
    Invalid(String),
}

impl StoreError {
    /// Check if error is retryable
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Persist(e) | Self::Load(e) => e.is_retryable(),
            Self::NotFound(_) | Self::Conflict(_) | Self::Invalid(_) => false,
        }
    }

    /// The underlying storage error, if any
    #[inline]
    #[must_use]
    pub fn storage(&self) -> Option<&StorageError> {
        match self {
            Self::Persist(e) | Self::Load(e) => Some(e),
            _ => None,
        }
    }

    pub(crate) fn not_found(what: impl std::fmt::Display) -> Self {
        Self::NotFound(what.to_string())
    }
}

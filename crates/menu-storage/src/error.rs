//! Error types for menu storage
//!
//! Every storage operation returns one of these instead of panicking, so a
//! failed load can be treated as "no data available" by callers.

use crate::medium::MediumKind;
use menu_model::PayloadError;
use std::fmt::{self, Display, Formatter};

/// One medium's failure, kept when another medium still succeeded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediumFailure {
    /// Which medium failed
    pub medium: MediumKind,
    /// Human-readable reason
    pub reason: String,
}

impl MediumFailure {
    /// Record a failure
    pub fn new(medium: MediumKind, reason: impl Into<String>) -> Self {
        Self {
            medium,
            reason: reason.into(),
        }
    }
}

impl Display for MediumFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.medium, self.reason)
    }
}

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Medium cannot be reached or is disabled
    #[error("{medium} storage unavailable: {reason}")]
    Unavailable { medium: MediumKind, reason: String },

    /// Nothing stored yet
    #[error("no stored data")]
    Empty,

    /// Stored or imported payload failed validation
    #[error("invalid payload: {0}")]
    Validation(#[from] PayloadError),

    /// Medium did not answer in time
    #[error("{medium} storage timed out after {after_ms}ms")]
    Timeout { medium: MediumKind, after_ms: u64 },

    /// Local filesystem error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Remote request failed
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote answered with an error status
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Every configured medium failed
    #[error("all storage media failed: {}", join_failures(.0))]
    AllMediaFailed(Vec<MediumFailure>),
}

impl StorageError {
    /// Create an unavailable error
    pub fn unavailable(medium: MediumKind, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            medium,
            reason: reason.into(),
        }
    }

    /// Whether retrying the same operation may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Unavailable { .. }
                | Self::Timeout { .. }
                | Self::Http(_)
                | Self::Io(_)
                | Self::AllMediaFailed(_)
        ) || matches!(self, Self::Server { status, .. } if *status >= 500)
    }

    /// Whether this just means "nothing to load"
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

fn join_failures(failures: &[MediumFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

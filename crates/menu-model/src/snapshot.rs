//! Versioned snapshots
//!
//! A [`Snapshot`] is a document value plus the metadata of its last
//! successful persist. Draft stores hold exactly two of them.

use crate::error::FingerprintError;
use crate::fingerprint::Fingerprint;
use crate::payload::SCHEMA_VERSION;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Document value at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<T> {
    /// The data tree
    pub payload: T,
    /// Timestamp of the last successful persist, if any
    pub saved_at: Option<DateTime<Utc>>,
    /// Schema tag for compatibility checks
    pub schema_version: String,
}

impl<T> Snapshot<T> {
    /// Unsaved snapshot under the current schema
    #[inline]
    #[must_use]
    pub fn new(payload: T) -> Self {
        Self {
            payload,
            saved_at: None,
            schema_version: SCHEMA_VERSION.to_string(),
        }
    }

    /// Snapshot known to be persisted at `saved_at`
    #[inline]
    #[must_use]
    pub fn saved(payload: T, saved_at: DateTime<Utc>) -> Self {
        Self {
            payload,
            saved_at: Some(saved_at),
            schema_version: SCHEMA_VERSION.to_string(),
        }
    }

    /// Replace the payload, keeping metadata
    #[inline]
    #[must_use]
    pub fn with_payload(self, payload: T) -> Self {
        Self { payload, ..self }
    }
}

impl<T: Serialize> Snapshot<T> {
    /// Fingerprint of the payload only
    ///
    /// # Errors
    /// Returns error if the payload cannot be serialized
    pub fn fingerprint(&self) -> Result<Fingerprint, FingerprintError> {
        Fingerprint::of(&self.payload)
    }
}

impl<T: Default> Default for Snapshot<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

//! Storage medium trait
//!
//! A medium is an opaque single-slot text store. Media know nothing about
//! payload structure; parsing and validation happen in the service.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display, Formatter};

/// Kind of backing medium
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediumKind {
    /// Persistent store on this machine
    Local,
    /// Remote endpoint
    Remote,
}

impl Display for MediumKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Local => "local",
            Self::Remote => "remote",
        })
    }
}

/// Single-slot text persistence
#[async_trait]
pub trait Medium: Send + Sync + Debug {
    /// Medium kind (for reporting)
    fn kind(&self) -> MediumKind;

    /// Read stored text; `Ok(None)` when nothing is stored
    async fn read(&self) -> Result<Option<String>>;

    /// Replace stored text
    async fn write(&self, text: &str) -> Result<()>;

    /// Delete stored text; deleting nothing is not an error
    async fn remove(&self) -> Result<()>;
}

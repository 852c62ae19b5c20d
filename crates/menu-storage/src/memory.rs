//! In-process medium
//!
//! Holds the payload text in memory. Can be switched offline, made to fail
//! writes, or slowed down, which is how fallback and timeout paths are driven
//! in tests.

use crate::error::{Result, StorageError};
use crate::medium::{Medium, MediumKind};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Default)]
struct Inner {
    slot: Mutex<Option<String>>,
    online: AtomicBool,
    reject_writes: AtomicBool,
    delay: Mutex<Option<Duration>>,
    writes: AtomicUsize,
}

/// In-memory medium; clones share the same slot
#[derive(Debug, Clone)]
pub struct MemoryMedium {
    kind: MediumKind,
    inner: Arc<Inner>,
}

impl MemoryMedium {
    /// Online, empty medium reporting as `kind`
    #[must_use]
    pub fn new(kind: MediumKind) -> Self {
        let inner = Inner::default();
        inner.online.store(true, Ordering::SeqCst);
        Self {
            kind,
            inner: Arc::new(inner),
        }
    }

    /// Medium pre-filled with `text`
    #[must_use]
    pub fn with_contents(kind: MediumKind, text: impl Into<String>) -> Self {
        let medium = Self::new(kind);
        *medium.inner.slot.lock() = Some(text.into());
        medium
    }

    /// Toggle availability; offline media fail every call
    pub fn set_online(&self, online: bool) {
        self.inner.online.store(online, Ordering::SeqCst);
    }

    /// Make writes and removes fail while reads keep working
    pub fn set_reject_writes(&self, reject: bool) {
        self.inner.reject_writes.store(reject, Ordering::SeqCst);
    }

    /// Delay every call by `delay`
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.inner.delay.lock() = delay;
    }

    /// Raw stored text
    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.inner.slot.lock().clone()
    }

    /// Number of successful writes
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.inner.writes.load(Ordering::SeqCst)
    }

    async fn gate(&self, mutating: bool) -> Result<()> {
        let delay = *self.inner.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if !self.inner.online.load(Ordering::SeqCst) {
            return Err(StorageError::unavailable(self.kind, "medium offline"));
        }
        if mutating && self.inner.reject_writes.load(Ordering::SeqCst) {
            return Err(StorageError::unavailable(self.kind, "medium is read-only"));
        }
        Ok(())
    }
}

#[async_trait]
impl Medium for MemoryMedium {
    fn kind(&self) -> MediumKind {
        self.kind
    }

    async fn read(&self) -> Result<Option<String>> {
        self.gate(false).await?;
        Ok(self.inner.slot.lock().clone())
    }

    async fn write(&self, text: &str) -> Result<()> {
        self.gate(true).await?;
        *self.inner.slot.lock() = Some(text.to_owned());
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self) -> Result<()> {
        self.gate(true).await?;
        self.inner.slot.lock().take();
        Ok(())
    }
}

//! Snapshot ports - how a draft store reaches persistence
//!
//! A store only ever calls `persist` and `fetch`. The menu-data and theme
//! ports share one [`StorageService`] and each merges its own section into
//! the stored payload under the service's write lock, so confirming one
//! document never persists the other's unconfirmed edits and two confirms
//! never overwrite each other's section.

use async_trait::async_trait;
use chrono::Utc;
use menu_model::{MenuData, MenuPayload, Snapshot, ThemeConfig};
use menu_storage::{MediumKind, StorageError, StorageReceipt, StorageService};
use parking_lot::Mutex;
use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Persistence seen from a draft store
#[async_trait]
pub trait SnapshotPort<T>: Send + Sync + Debug {
    /// Persist a confirmed document
    async fn persist(&self, doc: &T) -> Result<StorageReceipt, StorageError>;

    /// Fetch the stored document with its saved metadata
    async fn fetch(&self) -> Result<Snapshot<T>, StorageError>;
}

fn section<T>(payload: MenuPayload, pick: impl FnOnce(MenuPayload) -> T) -> Snapshot<T> {
    let saved_at = payload.last_saved;
    let schema_version = payload.version.clone();
    Snapshot {
        payload: pick(payload),
        saved_at,
        schema_version,
    }
}

/// Menu-data section of the shared payload
#[derive(Debug, Clone)]
pub struct MenuDataPort {
    service: Arc<StorageService>,
}

impl MenuDataPort {
    /// Port over `service`
    #[inline]
    #[must_use]
    pub fn new(service: Arc<StorageService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl SnapshotPort<MenuData> for MenuDataPort {
    async fn persist(&self, doc: &MenuData) -> Result<StorageReceipt, StorageError> {
        self.service.save_with(|payload| payload.menu = doc.clone()).await
    }

    async fn fetch(&self) -> Result<Snapshot<MenuData>, StorageError> {
        let payload = self.service.load().await?;
        Ok(section(payload, |p| p.menu))
    }
}

/// Theme section of the shared payload
#[derive(Debug, Clone)]
pub struct ThemePort {
    service: Arc<StorageService>,
}

impl ThemePort {
    /// Port over `service`
    #[inline]
    #[must_use]
    pub fn new(service: Arc<StorageService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl SnapshotPort<ThemeConfig> for ThemePort {
    async fn persist(&self, doc: &ThemeConfig) -> Result<StorageReceipt, StorageError> {
        self.service.save_with(|payload| payload.theme = doc.clone()).await
    }

    async fn fetch(&self) -> Result<Snapshot<ThemeConfig>, StorageError> {
        let payload = self.service.load().await?;
        Ok(section(payload, |p| p.theme))
    }
}

/// Port keeping the last persisted document in memory
///
/// Useful for stores that have no backing storage, and in tests where
/// `set_failing` drives the persist-failure paths.
#[derive(Debug)]
pub struct MemoryPort<T> {
    stored: Mutex<Option<Snapshot<T>>>,
    failing: AtomicBool,
}

impl<T> Default for MemoryPort<T> {
    fn default() -> Self {
        Self {
            stored: Mutex::new(None),
            failing: AtomicBool::new(false),
        }
    }
}

impl<T: Clone> MemoryPort<T> {
    /// Empty port
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Port that already holds `doc`
    #[must_use]
    pub fn with_stored(doc: T) -> Self {
        let port = Self::default();
        *port.stored.lock() = Some(Snapshot::saved(doc, Utc::now()));
        port
    }

    /// Make every call fail as if the medium were offline
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Last persisted document
    #[must_use]
    pub fn stored(&self) -> Option<T> {
        self.stored.lock().as_ref().map(|s| s.payload.clone())
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StorageError::unavailable(MediumKind::Local, "port offline"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl<T: Clone + Send + Sync + Debug> SnapshotPort<T> for MemoryPort<T> {
    async fn persist(&self, doc: &T) -> Result<StorageReceipt, StorageError> {
        self.check()?;
        let now = Utc::now();
        *self.stored.lock() = Some(Snapshot::saved(doc.clone(), now));
        Ok(StorageReceipt {
            saved_at: now,
            medium: MediumKind::Local,
            degraded: Vec::new(),
        })
    }

    async fn fetch(&self) -> Result<Snapshot<T>, StorageError> {
        self.check()?;
        self.stored.lock().clone().ok_or(StorageError::Empty)
    }
}

//! Storage service - the save/load/export/import/clear contract
//!
//! Wraps one or two [`Medium`]s according to a [`StorageMode`]:
//!
//! ```text
//! local-only   : FileMedium
//! remote-only  : HttpMedium
//! hybrid       : HttpMedium (primary) ──fail──► FileMedium (fallback)
//!                           └──ok──► FileMedium (backup copy)
//! ```
//!
//! The service holds no state except the last payload it successfully
//! loaded or saved, which is what [`StorageService::export_snapshot`] emits.

use crate::config::{StorageConfig, StorageMode};
use crate::error::{MediumFailure, Result, StorageError};
use crate::file::FileMedium;
use crate::http::HttpMedium;
use crate::medium::{Medium, MediumKind};
use chrono::{DateTime, Utc};
use menu_model::{Fingerprint, MenuPayload};
use parking_lot::Mutex;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Successful write outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageReceipt {
    /// When the operation completed
    pub saved_at: DateTime<Utc>,
    /// Medium that holds the authoritative copy
    pub medium: MediumKind,
    /// Media that failed while another one succeeded
    pub degraded: Vec<MediumFailure>,
}

impl StorageReceipt {
    fn new(saved_at: DateTime<Utc>, medium: MediumKind, degraded: Vec<MediumFailure>) -> Self {
        Self {
            saved_at,
            medium,
            degraded,
        }
    }

    /// Whether some configured medium did not take the write
    #[inline]
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.degraded.is_empty()
    }
}

/// Non-mutating health report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageStatus {
    pub mode: StorageMode,
    /// Medium that answered (or the primary, if none did)
    pub medium: MediumKind,
    pub available: bool,
    pub last_saved: Option<DateTime<Utc>>,
    /// Stored text length in bytes
    pub data_size: usize,
    pub fingerprint: Option<Fingerprint>,
    /// Reason the medium is unavailable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

struct Loaded {
    payload: MenuPayload,
    size: usize,
    medium: MediumKind,
}

/// Storage port over the configured media
#[derive(Debug)]
pub struct StorageService {
    mode: StorageMode,
    primary: Arc<dyn Medium>,
    secondary: Option<Arc<dyn Medium>>,
    timeout: Duration,
    last_payload: Mutex<Option<MenuPayload>>,
    // Held across every write so a merge never starts from a stale payload.
    write_lock: tokio::sync::Mutex<()>,
}

impl StorageService {
    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Local-only service
    #[must_use]
    pub fn local(medium: impl Medium + 'static) -> Self {
        Self::assemble(StorageMode::LocalOnly, Arc::new(medium), None)
    }

    /// Remote-only service
    #[must_use]
    pub fn remote(medium: impl Medium + 'static) -> Self {
        Self::assemble(StorageMode::RemoteOnly, Arc::new(medium), None)
    }

    /// Hybrid service: `remote` primary, `local` fallback and backup
    #[must_use]
    pub fn hybrid(remote: impl Medium + 'static, local: impl Medium + 'static) -> Self {
        Self::assemble(StorageMode::Hybrid, Arc::new(remote), Some(Arc::new(local)))
    }

    fn assemble(
        mode: StorageMode,
        primary: Arc<dyn Medium>,
        secondary: Option<Arc<dyn Medium>>,
    ) -> Self {
        Self {
            mode,
            primary,
            secondary,
            timeout: Self::DEFAULT_TIMEOUT,
            last_payload: Mutex::new(None),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Build media from configuration
    ///
    /// # Errors
    /// Returns error if a remote mode has no `remote_url` or the HTTP client
    /// cannot be built
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let file = || FileMedium::in_dir(&config.data_dir, &config.file_name);
        let http = || -> Result<HttpMedium> {
            let url = config.remote_url.as_deref().ok_or_else(|| {
                StorageError::unavailable(MediumKind::Remote, "no remote_url configured")
            })?;
            HttpMedium::new(url, config.api_token.as_deref(), timeout)
        };

        let service = match config.mode {
            StorageMode::LocalOnly => Self::local(file()),
            StorageMode::RemoteOnly => Self::remote(http()?),
            StorageMode::Hybrid => Self::hybrid(http()?, file()),
        };
        Ok(service.with_timeout(timeout))
    }

    /// With per-call timeout
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configured mode
    #[inline]
    #[must_use]
    pub fn mode(&self) -> StorageMode {
        self.mode
    }

    /// Last payload loaded or saved through this service
    #[must_use]
    pub fn last_payload(&self) -> Option<MenuPayload> {
        self.last_payload.lock().clone()
    }

    /// Persist `payload`
    ///
    /// Stamps `lastSaved`/`version` before writing. In hybrid mode a remote
    /// failure falls back to local, and a remote success is backed up to
    /// local; the medium that failed is listed in the receipt.
    ///
    /// # Errors
    /// Returns error only if every configured medium failed
    pub async fn save(&self, payload: &MenuPayload) -> Result<StorageReceipt> {
        let _guard = self.write_lock.lock().await;
        self.write_payload(payload).await
    }

    /// Apply `merge` to the stored payload and save the result
    ///
    /// The read, merge and write run under the service's write lock, so
    /// concurrent callers each see the other's section. When nothing has
    /// been loaded yet the stored payload is read first; an empty or
    /// invalid store merges into the default payload.
    ///
    /// # Errors
    /// Returns error if the stored payload cannot be read (so an unseen
    /// section is never overwritten) or every medium failed the write
    pub async fn save_with(
        &self,
        merge: impl FnOnce(&mut MenuPayload) + Send,
    ) -> Result<StorageReceipt> {
        let _guard = self.write_lock.lock().await;
        let cached = self.last_payload();
        let mut payload = match cached {
            Some(payload) => payload,
            None => match self.fetch().await {
                Ok(loaded) => loaded.payload,
                Err(e) if e.is_empty() => MenuPayload::default(),
                Err(StorageError::Validation(e)) => {
                    tracing::warn!("stored payload invalid, merging into defaults: {}", e);
                    MenuPayload::default()
                }
                Err(e) => {
                    tracing::warn!("cannot read stored payload before merge: {}", e);
                    return Err(e);
                }
            },
        };
        merge(&mut payload);
        self.write_payload(&payload).await
    }

    async fn write_payload(&self, payload: &MenuPayload) -> Result<StorageReceipt> {
        let now = Utc::now();
        let mut payload = payload.clone();
        payload.stamp(now);
        let text = payload.to_json()?;

        let receipt = match self.guarded(&*self.primary, self.primary.write(&text)).await {
            Ok(()) => {
                let mut degraded = Vec::new();
                if let Some(backup) = &self.secondary {
                    if let Err(e) = self.guarded(&**backup, backup.write(&text)).await {
                        tracing::warn!("backup write to {} failed: {}", backup.kind(), e);
                        degraded.push(MediumFailure::new(backup.kind(), e.to_string()));
                    }
                }
                StorageReceipt::new(now, self.primary.kind(), degraded)
            }
            Err(primary_err) => {
                let Some(fallback) = &self.secondary else {
                    tracing::error!("save to {} failed: {}", self.primary.kind(), primary_err);
                    return Err(primary_err);
                };
                tracing::warn!(
                    "save to {} failed, falling back to {}: {}",
                    self.primary.kind(),
                    fallback.kind(),
                    primary_err
                );
                let primary_failure =
                    MediumFailure::new(self.primary.kind(), primary_err.to_string());
                match self.guarded(&**fallback, fallback.write(&text)).await {
                    Ok(()) => StorageReceipt::new(now, fallback.kind(), vec![primary_failure]),
                    Err(e) => {
                        tracing::error!("fallback save to {} failed: {}", fallback.kind(), e);
                        return Err(StorageError::AllMediaFailed(vec![
                            primary_failure,
                            MediumFailure::new(fallback.kind(), e.to_string()),
                        ]));
                    }
                }
            }
        };

        tracing::info!(
            "saved {} bytes to {}{}",
            text.len(),
            receipt.medium,
            if receipt.is_partial() { " (partial)" } else { "" }
        );
        *self.last_payload.lock() = Some(payload);
        Ok(receipt)
    }

    /// Load and validate the stored payload
    ///
    /// # Errors
    /// - `StorageError::Empty` if nothing is stored
    /// - `StorageError::Validation` if the stored text is not a valid payload
    /// - medium errors if storage cannot be read
    pub async fn load(&self) -> Result<MenuPayload> {
        let loaded = self.fetch().await?;
        tracing::debug!("loaded {} bytes from {}", loaded.size, loaded.medium);
        *self.last_payload.lock() = Some(loaded.payload.clone());
        Ok(loaded.payload)
    }

    /// Pretty-printed JSON of the last loaded or saved payload
    ///
    /// # Errors
    /// Returns `StorageError::Empty` if nothing was loaded or saved yet
    pub fn export_snapshot(&self) -> Result<String> {
        let guard = self.last_payload.lock();
        let payload = guard.as_ref().ok_or(StorageError::Empty)?;
        Ok(payload.to_pretty_json()?)
    }

    /// Validate `text` and save it
    ///
    /// Nothing is written when parsing or validation fails.
    ///
    /// # Errors
    /// Returns `StorageError::Validation` with the reason, or a save error
    pub async fn import_snapshot(&self, text: &str) -> Result<StorageReceipt> {
        let payload = MenuPayload::from_json(text).map_err(|e| {
            tracing::warn!("import rejected: {}", e);
            StorageError::Validation(e)
        })?;
        self.save(&payload).await
    }

    /// Delete stored data from every configured medium
    ///
    /// Succeeds when at least one medium was cleared; the others are listed
    /// in the receipt.
    ///
    /// # Errors
    /// Returns error if no medium could be cleared
    pub async fn clear(&self) -> Result<StorageReceipt> {
        let _guard = self.write_lock.lock().await;
        let mut cleared = Vec::new();
        let mut failures = Vec::new();
        for medium in self.media() {
            match self.guarded(&**medium, medium.remove()).await {
                Ok(()) => cleared.push(medium.kind()),
                Err(e) => {
                    tracing::warn!("clear on {} failed: {}", medium.kind(), e);
                    failures.push(MediumFailure::new(medium.kind(), e.to_string()));
                }
            }
        }

        let Some(&medium) = cleared.first() else {
            return Err(match failures.len() {
                1 => StorageError::unavailable(failures[0].medium, failures.remove(0).reason),
                _ => StorageError::AllMediaFailed(failures),
            });
        };
        self.last_payload.lock().take();
        tracing::info!("cleared stored menu data");
        Ok(StorageReceipt::new(Utc::now(), medium, failures))
    }

    /// Report availability and metadata without exposing the payload
    pub async fn status(&self) -> StorageStatus {
        let mut status = StorageStatus {
            mode: self.mode,
            medium: self.primary.kind(),
            available: false,
            last_saved: None,
            data_size: 0,
            fingerprint: None,
            error: None,
        };
        match self.fetch().await {
            Ok(loaded) => {
                status.medium = loaded.medium;
                status.available = true;
                status.last_saved = loaded.payload.last_saved;
                status.data_size = loaded.size;
                status.fingerprint = Fingerprint::of(&loaded.payload).ok();
            }
            Err(StorageError::Empty) => status.available = true,
            Err(e) => status.error = Some(e.to_string()),
        }
        status
    }

    fn media(&self) -> impl Iterator<Item = &Arc<dyn Medium>> {
        std::iter::once(&self.primary).chain(self.secondary.iter())
    }

    async fn fetch(&self) -> Result<Loaded> {
        let primary_err = match self.fetch_from(&*self.primary).await {
            Ok(loaded) => return Ok(loaded),
            Err(e) => e,
        };
        let Some(fallback) = &self.secondary else {
            return Err(primary_err);
        };
        if !primary_err.is_empty() {
            tracing::warn!(
                "load from {} failed, trying {}: {}",
                self.primary.kind(),
                fallback.kind(),
                primary_err
            );
        }
        match self.fetch_from(&**fallback).await {
            Ok(loaded) => Ok(loaded),
            Err(StorageError::Empty) if primary_err.is_empty() => Err(StorageError::Empty),
            Err(StorageError::Empty) => Err(primary_err),
            Err(e) => Err(StorageError::AllMediaFailed(vec![
                MediumFailure::new(self.primary.kind(), primary_err.to_string()),
                MediumFailure::new(fallback.kind(), e.to_string()),
            ])),
        }
    }

    async fn fetch_from(&self, medium: &dyn Medium) -> Result<Loaded> {
        let text = self
            .guarded(medium, medium.read())
            .await?
            .ok_or(StorageError::Empty)?;
        let payload = MenuPayload::from_json(&text)?;
        Ok(Loaded {
            size: text.len(),
            payload,
            medium: medium.kind(),
        })
    }

    async fn guarded<T>(
        &self,
        medium: &dyn Medium,
        call: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        tokio::time::timeout(self.timeout, call)
            .await
            .unwrap_or_else(|_| {
                Err(StorageError::Timeout {
                    medium: medium.kind(),
                    after_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                })
            })
    }
}

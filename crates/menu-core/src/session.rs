//! Menu session
//!
//! Owns one storage service and the two draft stores over it. A session is
//! built explicitly and handed to whatever edits the menu; nothing here is
//! global.

use crate::config::MenuConfig;
use crate::error::Result;
use menu_model::{MenuData, ThemeConfig};
use menu_scroll::{ScrollSyncResolver, SectionId};
use menu_state::{
    AutoSaver, DraftStore, MenuDataPort, MenuDataStore, StoreError, ThemePort, ThemeStore,
};
use menu_storage::{StorageError, StorageReceipt, StorageService, StorageStatus};
use serde::Serialize;
use std::fmt::{self, Display};
use std::sync::Arc;

/// Storage health plus unsaved-edit flags
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub storage: StorageStatus,
    pub unsaved_menu: bool,
    pub unsaved_theme: bool,
}

impl Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.storage;
        writeln!(f, "mode:       {}", s.mode)?;
        writeln!(f, "medium:     {}", s.medium)?;
        writeln!(f, "available:  {}", s.available)?;
        match s.last_saved {
            Some(at) => writeln!(f, "last saved: {}", at.to_rfc3339())?,
            None => writeln!(f, "last saved: never")?,
        }
        writeln!(f, "size:       {} bytes", s.data_size)?;
        if let Some(fp) = &s.fingerprint {
            writeln!(f, "content:    {}", fp.short())?;
        }
        if let Some(error) = &s.error {
            writeln!(f, "error:      {error}")?;
        }
        write!(
            f,
            "unsaved:    menu={} theme={}",
            self.unsaved_menu, self.unsaved_theme
        )
    }
}

/// Storage, stores and auto-save for one editing session
#[derive(Debug)]
pub struct MenuSession {
    config: MenuConfig,
    storage: Arc<StorageService>,
    menu: Arc<MenuDataStore>,
    theme: Arc<ThemeStore>,
    autosavers: Vec<AutoSaver>,
}

impl MenuSession {
    /// Build storage from `config` and open a session over it
    ///
    /// # Errors
    /// Returns error if the configured media cannot be built
    pub async fn open(config: MenuConfig) -> Result<Self> {
        config.validate()?;
        let storage = StorageService::from_config(&config.storage)?;
        Ok(Self::with_storage(config, Arc::new(storage)).await)
    }

    /// Open a session over an existing storage service
    ///
    /// Loads stored data; when nothing usable is stored the stores start
    /// from defaults. Auto-save is started here when enabled, so this must
    /// run inside a tokio runtime.
    pub async fn with_storage(config: MenuConfig, storage: Arc<StorageService>) -> Self {
        let policy = config.store.commit_policy;
        let menu = MenuDataStore::from_store(
            DraftStore::new(
                "menu-data",
                MenuData::default(),
                Arc::new(MenuDataPort::new(storage.clone())),
            )
            .with_policy(policy),
        );
        let theme = ThemeStore::from_store(
            DraftStore::new(
                "theme",
                ThemeConfig::default(),
                Arc::new(ThemePort::new(storage.clone())),
            )
            .with_policy(policy),
        );

        let mut session = Self {
            menu: Arc::new(menu),
            theme: Arc::new(theme),
            autosavers: Vec::new(),
            storage,
            config,
        };

        match session.reload().await {
            Ok(()) => tracing::info!("session opened from {} storage", session.storage.mode()),
            Err(e) if e.storage().is_some_and(StorageError::is_empty) => {
                tracing::info!("no stored menu, starting from defaults");
            }
            Err(e) => tracing::warn!("stored menu unavailable, starting from defaults: {}", e),
        }

        if session.config.autosave.enabled {
            let delay = session.config.autosave.delay();
            session.autosavers = vec![
                AutoSaver::spawn(session.menu.clone(), delay),
                AutoSaver::spawn(session.theme.clone(), delay),
            ];
            tracing::debug!("auto-save every {:?} of quiet", delay);
        }
        session
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn storage(&self) -> &StorageService {
        &self.storage
    }

    #[inline]
    #[must_use]
    pub fn menu(&self) -> &MenuDataStore {
        &self.menu
    }

    #[inline]
    #[must_use]
    pub fn theme(&self) -> &ThemeStore {
        &self.theme
    }

    /// Whether auto-save tasks are running
    #[must_use]
    pub fn autosave_running(&self) -> bool {
        !self.autosavers.is_empty() && self.autosavers.iter().all(AutoSaver::is_running)
    }

    /// Either store has unsaved edits
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.menu.has_unsaved_changes() || self.theme.has_unsaved_changes()
    }

    /// Confirm every store with unsaved edits
    ///
    /// Returns one receipt per store that was persisted.
    ///
    /// # Errors
    /// Returns the first persist failure; stores confirmed before it stay
    /// confirmed
    pub async fn confirm_all(&self) -> Result<Vec<StorageReceipt>> {
        let mut receipts = Vec::new();
        if self.menu.has_unsaved_changes() {
            receipts.push(self.menu.confirm().await?);
        }
        if self.theme.has_unsaved_changes() {
            receipts.push(self.theme.confirm().await?);
        }
        Ok(receipts)
    }

    /// Discard unsaved edits in every store
    pub fn cancel_all(&self) {
        self.menu.cancel();
        self.theme.cancel();
    }

    /// Storage health and unsaved flags
    pub async fn status(&self) -> SessionStatus {
        SessionStatus {
            storage: self.storage.status().await,
            unsaved_menu: self.menu.has_unsaved_changes(),
            unsaved_theme: self.theme.has_unsaved_changes(),
        }
    }

    /// Pretty JSON of the stored payload
    ///
    /// # Errors
    /// Returns `StorageError::Empty` if nothing has been loaded or saved
    pub fn export(&self) -> Result<String> {
        Ok(self.storage.export_snapshot()?)
    }

    /// Validate and store `text`, then reload both stores from it
    ///
    /// Unsaved edits are discarded. Invalid text changes nothing.
    ///
    /// # Errors
    /// Returns the validation or storage error
    pub async fn import(&self, text: &str) -> Result<StorageReceipt> {
        let receipt = self.storage.import_snapshot(text).await?;
        self.reload().await?;
        Ok(receipt)
    }

    /// Delete stored data from every medium
    ///
    /// The stores keep their in-memory state and stay clean, so only a
    /// store edited after the clear is written by the next confirm.
    ///
    /// # Errors
    /// Returns error if no medium could be cleared
    pub async fn clear(&self) -> Result<StorageReceipt> {
        Ok(self.storage.clear().await?)
    }

    /// Section ids in navigation order, for registering scroll sections
    #[must_use]
    pub fn section_ids(&self) -> Vec<SectionId> {
        self.menu.with_current(|menu| {
            menu.categories
                .iter()
                .filter(|c| !c.id.is_desserts() || menu.desserts_config.visible)
                .map(|c| SectionId::new(c.id.as_str()))
                .collect()
        })
    }

    /// Scroll resolver with the configured tuning
    ///
    /// # Errors
    /// Returns error if the scroll settings are out of range
    pub fn scroll_resolver(&self) -> Result<ScrollSyncResolver> {
        Ok(ScrollSyncResolver::new(self.config.scroll.clone())
            .map_err(crate::error::ConfigError::from)?)
    }

    /// Stop auto-save tasks. Unsaved edits are not persisted.
    pub fn shutdown(mut self) {
        for saver in self.autosavers.drain(..) {
            saver.shutdown();
        }
        tracing::debug!("session closed");
    }

    async fn reload(&self) -> std::result::Result<(), StoreError> {
        self.menu.load_from_storage().await?;
        self.theme.load_from_storage().await
    }
}

//! Draft/commit store
//!
//! Holds exactly two snapshots of a document:
//!
//! ```text
//!             update / mutate
//!   current ◄──────────────── caller
//!      │  ▲
//!  confirm  cancel / load_from_storage
//!      ▼  │
//!   original ──persist──► SnapshotPort
//! ```
//!
//! Every mutation and the diff it implies are computed under one lock, so
//! no reader ever sees `current` updated with a stale pending-change set.

use crate::changes::PendingChanges;
use crate::document::Document;
use crate::error::StoreError;
use crate::port::SnapshotPort;
use menu_model::Snapshot;
use menu_storage::StorageReceipt;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::watch;

/// What `confirm` does when persistence fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommitPolicy {
    /// Commit in memory first, then persist. A failed persist is reported
    /// but the commit stands.
    #[default]
    Optimistic,
    /// Persist first and commit in memory only on success
    Transactional,
}

#[derive(Debug)]
struct DraftState<T> {
    original: Snapshot<T>,
    current: Snapshot<T>,
    original_value: Value,
    pending: PendingChanges,
    dirty: bool,
}

impl<T: Document> DraftState<T> {
    fn new(snapshot: Snapshot<T>) -> Self {
        let original_value = encode(&snapshot.payload);
        Self {
            current: snapshot.clone(),
            original: snapshot,
            original_value,
            pending: PendingChanges::default(),
            dirty: false,
        }
    }

    fn set_original(&mut self, snapshot: Snapshot<T>) {
        self.original_value = encode(&snapshot.payload);
        self.original = snapshot;
    }

    fn reset_current(&mut self) {
        self.current = self.original.clone();
        self.pending.clear();
        self.dirty = false;
    }

    fn recompute(&mut self) {
        let current = encode(&self.current.payload);
        self.pending = PendingChanges::between(&self.original_value, &current);
        self.dirty = current != self.original_value;
    }
}

fn encode<T: Document>(doc: &T) -> Value {
    serde_json::to_value(doc).unwrap_or_else(|e| {
        tracing::error!("document failed to serialize: {}", e);
        Value::Null
    })
}

/// Original/current snapshot pair with confirm and cancel
#[derive(Debug)]
pub struct DraftStore<T: Document> {
    name: &'static str,
    state: Mutex<DraftState<T>>,
    port: Arc<dyn SnapshotPort<T>>,
    policy: CommitPolicy,
    revision: watch::Sender<u64>,
}

impl<T: Document> DraftStore<T> {
    /// Store starting from `initial`, persisting through `port`
    #[must_use]
    pub fn new(name: &'static str, mut initial: T, port: Arc<dyn SnapshotPort<T>>) -> Self {
        initial.normalize();
        let (revision, _) = watch::channel(0);
        Self {
            name,
            state: Mutex::new(DraftState::new(Snapshot::new(initial))),
            port,
            policy: CommitPolicy::default(),
            revision,
        }
    }

    /// With commit policy
    #[inline]
    #[must_use]
    pub fn with_policy(mut self, policy: CommitPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Store name (for logs)
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Configured commit policy
    #[inline]
    #[must_use]
    pub fn policy(&self) -> CommitPolicy {
        self.policy
    }

    /// Merge `patch` into the working copy. Always succeeds.
    pub fn update(&self, patch: T::Patch) {
        {
            let mut state = self.state.lock();
            state.current.payload.apply(patch);
            state.current.payload.normalize();
            state.recompute();
        }
        self.bump();
    }

    /// Run a fallible edit against the working copy
    ///
    /// The edit sees a scratch copy; nothing changes unless it returns `Ok`.
    ///
    /// # Errors
    /// Returns whatever the edit returns
    pub fn try_mutate<R>(
        &self,
        edit: impl FnOnce(&mut T) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let out = {
            let mut state = self.state.lock();
            let mut scratch = state.current.payload.clone();
            let out = edit(&mut scratch)?;
            scratch.normalize();
            state.current.payload = scratch;
            state.recompute();
            out
        };
        self.bump();
        Ok(out)
    }

    /// Whether `current` differs from `original` anywhere in the tree
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.state.lock().dirty
    }

    /// Top-level fields that differ from `original`
    #[must_use]
    pub fn pending_changes(&self) -> PendingChanges {
        self.state.lock().pending.clone()
    }

    /// Working copy
    #[must_use]
    pub fn current(&self) -> T {
        self.state.lock().current.payload.clone()
    }

    /// Last confirmed or loaded copy
    #[must_use]
    pub fn original(&self) -> T {
        self.state.lock().original.payload.clone()
    }

    /// Read the working copy without cloning it
    pub fn with_current<R>(&self, read: impl FnOnce(&T) -> R) -> R {
        read(&self.state.lock().current.payload)
    }

    /// Working snapshot with metadata
    #[must_use]
    pub fn current_snapshot(&self) -> Snapshot<T> {
        self.state.lock().current.clone()
    }

    /// Committed snapshot with metadata
    #[must_use]
    pub fn original_snapshot(&self) -> Snapshot<T> {
        self.state.lock().original.clone()
    }

    /// Commit the working copy and persist it
    ///
    /// Under [`CommitPolicy::Optimistic`] `original := current` happens
    /// before the persist is awaited and is not rolled back if it fails.
    /// Under [`CommitPolicy::Transactional`] the commit happens only after a
    /// successful persist.
    ///
    /// # Errors
    /// Returns `StoreError::Persist` if the port failed
    pub async fn confirm(&self) -> Result<StorageReceipt, StoreError> {
        match self.policy {
            CommitPolicy::Optimistic => self.confirm_optimistic().await,
            CommitPolicy::Transactional => self.confirm_transactional().await,
        }
    }

    async fn confirm_optimistic(&self) -> Result<StorageReceipt, StoreError> {
        let committed = {
            let mut state = self.state.lock();
            let snapshot = state.current.clone();
            state.set_original(snapshot);
            state.reset_current();
            state.original.payload.clone()
        };
        self.bump();
        tracing::info!("{}: changes confirmed", self.name);

        match self.port.persist(&committed).await {
            Ok(receipt) => {
                self.mark_saved(&committed, &receipt);
                Ok(receipt)
            }
            Err(e) => {
                tracing::warn!("{}: confirmed in memory but persist failed: {}", self.name, e);
                Err(StoreError::Persist(e))
            }
        }
    }

    async fn confirm_transactional(&self) -> Result<StorageReceipt, StoreError> {
        let candidate = self.current();
        let receipt = self.port.persist(&candidate).await.map_err(|e| {
            tracing::warn!("{}: persist failed, edits kept as draft: {}", self.name, e);
            StoreError::Persist(e)
        })?;

        {
            let mut state = self.state.lock();
            state.set_original(Snapshot::saved(candidate, receipt.saved_at));
            state.recompute();
            if !state.dirty {
                state.current.saved_at = Some(receipt.saved_at);
            }
        }
        self.bump();
        tracing::info!("{}: changes confirmed and persisted", self.name);
        Ok(receipt)
    }

    fn mark_saved(&self, committed: &T, receipt: &StorageReceipt) {
        let mut state = self.state.lock();
        if &state.original.payload == committed {
            state.original.saved_at = Some(receipt.saved_at);
            if !state.dirty {
                state.current.saved_at = Some(receipt.saved_at);
            }
        }
    }

    /// Discard the working copy. Never touches storage.
    pub fn cancel(&self) {
        self.state.lock().reset_current();
        self.bump();
        tracing::debug!("{}: changes cancelled", self.name);
    }

    /// Replace both snapshots with what storage holds
    ///
    /// Unsaved edits are discarded. On failure nothing changes.
    ///
    /// # Errors
    /// Returns `StoreError::Load` if the port failed or holds nothing
    pub async fn load_from_storage(&self) -> Result<(), StoreError> {
        let mut snapshot = self.port.fetch().await.map_err(StoreError::Load)?;
        snapshot.payload.normalize();
        {
            let mut state = self.state.lock();
            if state.dirty {
                tracing::warn!("{}: discarding unsaved edits on load", self.name);
            }
            *state = DraftState::new(snapshot);
        }
        self.bump();
        tracing::info!("{}: loaded from storage", self.name);
        Ok(())
    }

    /// Revision counter, bumped on every state change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Current revision
    #[must_use]
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    fn bump(&self) {
        self.revision.send_modify(|r| *r += 1);
    }
}

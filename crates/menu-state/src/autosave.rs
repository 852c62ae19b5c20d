//! Debounced auto-save
//!
//! Watches a store's revision channel. Every change restarts the delay;
//! once the store has been quiet for the whole delay and still has unsaved
//! changes, the task confirms it.

use crate::document::Document;
use crate::store::DraftStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Handle to a running auto-save task
///
/// Dropping the handle stops the task.
#[derive(Debug)]
pub struct AutoSaver {
    handle: JoinHandle<()>,
    delay: Duration,
}

impl AutoSaver {
    /// Start auto-saving `store` after `delay` of quiet
    ///
    /// Must be called inside a tokio runtime.
    pub fn spawn<S, T>(store: Arc<S>, delay: Duration) -> Self
    where
        S: AsRef<DraftStore<T>> + Send + Sync + 'static,
        T: Document,
    {
        let rx = AsRef::<DraftStore<T>>::as_ref(&*store).subscribe();
        let handle = tokio::spawn(run(store, rx, delay));
        Self { handle, delay }
    }

    /// Configured quiet period
    #[inline]
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether the task is still running
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Stop the task. A debounce in progress is dropped without saving.
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for AutoSaver {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run<S, T>(store: Arc<S>, mut rx: watch::Receiver<u64>, delay: Duration)
where
    S: AsRef<DraftStore<T>> + Send + Sync + 'static,
    T: Document,
{
    loop {
        if rx.changed().await.is_err() {
            return;
        }

        // Quiet period: any further change restarts the wait.
        loop {
            tokio::select! {
                changed = rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
                () = tokio::time::sleep(delay) => break,
            }
        }

        let draft: &DraftStore<T> = (*store).as_ref();
        if !draft.has_unsaved_changes() {
            continue;
        }
        match draft.confirm().await {
            Ok(receipt) => {
                tracing::debug!("{}: auto-saved to {}", draft.name(), receipt.medium);
            }
            Err(e) => tracing::warn!("{}: auto-save failed: {}", draft.name(), e),
        }
        // The confirm itself bumped the revision.
        rx.borrow_and_update();
    }
}

impl<T: Document> AsRef<DraftStore<T>> for DraftStore<T> {
    fn as_ref(&self) -> &DraftStore<T> {
        self
    }
}

impl AsRef<DraftStore<menu_model::MenuData>> for crate::MenuDataStore {
    fn as_ref(&self) -> &DraftStore<menu_model::MenuData> {
        self.store()
    }
}

impl AsRef<DraftStore<menu_model::ThemeConfig>> for crate::ThemeStore {
    fn as_ref(&self) -> &DraftStore<menu_model::ThemeConfig> {
        self.store()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::MemoryPort;
    use crate::MenuDataStore;
    use menu_model::{MenuData, NavbarStyle};

    #[tokio::test(start_paused = true)]
    async fn saves_once_after_burst() {
        let port = Arc::new(MemoryPort::<MenuData>::new());
        let store = Arc::new(MenuDataStore::new(MenuData::default(), port.clone()));
        let saver = AutoSaver::spawn(store.clone(), Duration::from_millis(500));

        store.set_navbar_style(NavbarStyle::IconOnly);
        tokio::time::sleep(Duration::from_millis(200)).await;
        store.set_navbar_style(NavbarStyle::TextOnly);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(port.stored().is_none());

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(port.stored().unwrap().navbar_style, NavbarStyle::TextOnly);
        assert!(!store.has_unsaved_changes());
        assert!(saver.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn no_save_after_shutdown() {
        let port = Arc::new(MemoryPort::<MenuData>::new());
        let store = Arc::new(MenuDataStore::new(MenuData::default(), port.clone()));
        let saver = AutoSaver::spawn(store.clone(), Duration::from_millis(100));

        store.set_navbar_style(NavbarStyle::IconOnly);
        saver.shutdown();
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert!(port.stored().is_none());
        assert!(store.has_unsaved_changes());
    }
}

//! Theme store

use crate::document::ThemePatch;
use crate::port::SnapshotPort;
use crate::store::DraftStore;
use menu_model::{Effects, Layout, ThemeConfig, Typography};
use std::ops::Deref;
use std::sync::Arc;

/// Draft store over [`ThemeConfig`]
#[derive(Debug)]
pub struct ThemeStore {
    inner: DraftStore<ThemeConfig>,
}

impl ThemeStore {
    /// Store starting from `initial`
    #[must_use]
    pub fn new(initial: ThemeConfig, port: Arc<dyn SnapshotPort<ThemeConfig>>) -> Self {
        Self {
            inner: DraftStore::new("theme", initial, port),
        }
    }

    /// Wrap an already configured draft store
    #[must_use]
    pub fn from_store(inner: DraftStore<ThemeConfig>) -> Self {
        Self { inner }
    }

    /// The underlying draft store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &DraftStore<ThemeConfig> {
        &self.inner
    }

    /// Set one color role
    pub fn set_color(&self, role: impl Into<String>, value: impl Into<String>) {
        self.inner.update(ThemePatch::new().color(role, value));
    }

    /// Replace typography
    pub fn set_typography(&self, typography: Typography) {
        self.inner.update(ThemePatch::new().typography(typography));
    }

    /// Replace layout
    pub fn set_layout(&self, layout: Layout) {
        self.inner.update(ThemePatch::new().layout(layout));
    }

    /// Replace effects
    pub fn set_effects(&self, effects: Effects) {
        self.inner.update(ThemePatch::new().effects(effects));
    }

    /// Put the working copy back to the built-in theme
    ///
    /// This is an edit like any other; it still needs a confirm.
    pub fn reset_to_default(&self) {
        let ThemeConfig {
            colors,
            typography,
            layout,
            effects,
        } = ThemeConfig::default();
        // Colors merge, so clear roles the default does not define first.
        let _ = self.inner.try_mutate(|theme| {
            theme.colors = colors;
            theme.typography = typography;
            theme.layout = layout;
            theme.effects = effects;
            Ok(())
        });
    }
}

impl Deref for ThemeStore {
    type Target = DraftStore<ThemeConfig>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::MemoryPort;

    #[test]
    fn color_edit_is_pending_under_colors() {
        let store = ThemeStore::new(ThemeConfig::default(), Arc::new(MemoryPort::<ThemeConfig>::new()));
        store.set_color("primary", "#123456");
        let pending = store.pending_changes();
        assert_eq!(pending.fields().collect::<Vec<_>>(), vec!["colors"]);
    }

    #[test]
    fn reset_to_default_drops_custom_roles() {
        let mut custom = ThemeConfig::default();
        custom.colors.insert("neon".into(), "#0f0".into());
        let store = ThemeStore::new(custom, Arc::new(MemoryPort::<ThemeConfig>::new()));

        store.reset_to_default();

        assert_eq!(store.current(), ThemeConfig::default());
        assert!(store.has_unsaved_changes());
    }
}

//! Menu State - draft/commit stores
//!
//! Each editable document lives in a [`DraftStore`] holding two snapshots:
//! - `original`: last confirmed or loaded
//! - `current`: the working copy every edit goes to
//!
//! `confirm` promotes `current` and persists it through a [`SnapshotPort`];
//! `cancel` throws the working copy away without touching storage.
//!
//! # Example
//!
//! ```rust
//! use menu_model::{Category, MenuData, NavbarStyle};
//! use menu_state::{MemoryPort, MenuDataStore};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), menu_state::StoreError> {
//! let store = MenuDataStore::new(MenuData::default(), Arc::new(MemoryPort::<MenuData>::new()));
//! store.add_category(Category::new("mains", "Mains"))?;
//! store.set_navbar_style(NavbarStyle::IconOnly);
//! assert!(store.has_unsaved_changes());
//!
//! store.confirm().await?;
//! assert!(!store.has_unsaved_changes());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod autosave;
mod changes;
mod document;
pub mod error;
mod menu_store;
mod port;
mod store;
mod theme_store;

pub use autosave::AutoSaver;
pub use changes::PendingChanges;
pub use document::{Document, MenuPatch, ThemePatch};
pub use error::StoreError;
pub use menu_store::MenuDataStore;
pub use port::{MemoryPort, MenuDataPort, SnapshotPort, ThemePort};
pub use store::{CommitPolicy, DraftStore};
pub use theme_store::ThemeStore;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with draft stores
    pub use crate::{
        AutoSaver, CommitPolicy, Document, DraftStore, MenuDataStore, MenuPatch, StoreError,
        ThemePatch, ThemeStore,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Menu data model
//!
//! Typed menu content, the persisted payload shape and its validation.
//!
//! # Core Concepts
//!
//! - [`MenuData`]: items, categories, navbar style, template, desserts and discounts
//! - [`ThemeConfig`]: colors, typography, layout and effects
//! - [`MenuPayload`]: the flat object every storage medium reads and writes
//! - [`Snapshot<T>`]: a document plus its last-saved metadata
//! - [`Fingerprint`]: Blake3 digest of a value's JSON encoding
//!
//! # Example
//!
//! ```rust
//! use menu_model::{Category, MenuData, MenuPayload, ThemeConfig};
//!
//! let mut menu = MenuData::default();
//! menu.categories.push(Category::new("mains", "Mains"));
//! menu.categories.push(Category::new("desserts", "Desserts"));
//! menu.normalize();
//! assert_eq!(menu.categories[0].id.as_str(), "desserts");
//!
//! let text = MenuPayload::compose(menu, ThemeConfig::default())
//!     .to_pretty_json()
//!     .unwrap();
//! assert!(MenuPayload::from_json(&text).is_ok());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod fingerprint;
mod menu;
mod payload;
mod snapshot;
mod theme;

pub use error::{FingerprintError, PayloadError};
pub use fingerprint::Fingerprint;
pub use menu::{
    desserts_first, Category, CategoryId, DessertsConfig, DiscountConfig, ItemId, MenuData,
    MenuItem, MenuTemplate, NavbarStyle,
};
pub use payload::{is_compatible, MenuPayload, REQUIRED_KEYS, SCHEMA_VERSION};
pub use snapshot::Snapshot;
pub use theme::{ColorPalette, Effects, Layout, ThemeConfig, Typography};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

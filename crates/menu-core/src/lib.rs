//! Menu Core - session facade
//!
//! Wires configuration, storage and the two draft stores into one
//! [`MenuSession`], the object an admin surface talks to.
//!
//! # Example
//!
//! ```rust,no_run
//! use menu_core::{MenuConfig, MenuSession};
//! use menu_model::NavbarStyle;
//!
//! # async fn example() -> Result<(), menu_core::SessionError> {
//! let config = MenuConfig::load("menu.toml")?;
//! let session = MenuSession::open(config).await?;
//!
//! session.menu().set_navbar_style(NavbarStyle::IconOnly);
//! session.confirm_all().await?;
//! println!("{}", session.status().await);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
mod session;

pub use config::{AutosaveConfig, MenuConfig, StoreConfig, ENV_DATA_DIR, ENV_STORAGE_MODE};
pub use error::{ConfigError, Result, SessionError};
pub use session::{MenuSession, SessionStatus};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with a menu session
    pub use crate::{MenuConfig, MenuSession, SessionError};
    pub use menu_model::{Category, CategoryId, ItemId, MenuItem, MenuTemplate, NavbarStyle};
    pub use menu_state::{CommitPolicy, MenuPatch, StoreError, ThemePatch};
    pub use menu_storage::{StorageMode, StorageReceipt};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

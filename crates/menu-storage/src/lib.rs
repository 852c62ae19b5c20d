//! Menu Storage
//!
//! A uniform save/load/export/import/clear contract over one or two
//! persistence media.
//!
//! # Modes
//!
//! - `local-only`: a JSON file on this machine ([`FileMedium`])
//! - `remote-only`: an HTTP endpoint ([`HttpMedium`])
//! - `hybrid`: remote primary with local fallback and backup
//!
//! Every operation returns a [`Result`]; a failed load means "no data
//! available", never a fatal error. Calls are bounded by a timeout.
//!
//! # Example
//!
//! ```rust,no_run
//! use menu_storage::{StorageConfig, StorageService};
//! use menu_model::MenuPayload;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = StorageService::from_config(&StorageConfig::new().with_data_dir("/tmp/menu"))?;
//! let receipt = service.save(&MenuPayload::default()).await?;
//! println!("saved to {} at {}", receipt.medium, receipt.saved_at);
//!
//! let backup = service.export_snapshot()?;
//! service.import_snapshot(&backup).await?;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
mod file;
mod http;
mod medium;
mod memory;
mod service;

pub use config::{StorageConfig, StorageMode};
pub use error::{MediumFailure, Result, StorageError};
pub use file::FileMedium;
pub use http::HttpMedium;
pub use medium::{Medium, MediumKind};
pub use memory::MemoryMedium;
pub use service::{StorageReceipt, StorageService, StorageStatus};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Menu Scroll - scroll-sync resolver
//!
//! Reports the single menu section that should be highlighted in the
//! navigation bar while the user scrolls.
//!
//! # Core Concepts
//!
//! - **Producers**: [`VisibilityProducer`] works from visible-ratio reports,
//!   [`ScrollProducer`] from scroll position and section geometry
//! - **Arbitration**: [`Arbiter`] accepts a candidate only if it differs from
//!   the active section and the cooldown has passed
//! - **Signal**: [`ScrollSyncResolver::subscribe`] yields a `watch` receiver
//!   that closes when the resolver is torn down
//!
//! # Example
//!
//! ```rust
//! use menu_scroll::{ResolverConfig, ScrollSyncResolver, SectionBounds, SectionId, Viewport};
//! use std::time::Instant;
//!
//! let mut resolver = ScrollSyncResolver::new(ResolverConfig::default().without_observer()).unwrap();
//! resolver
//!     .register(vec![
//!         SectionBounds::new("desserts", 0.0, 600.0),
//!         SectionBounds::new("mains", 600.0, 900.0),
//!     ])
//!     .unwrap();
//!
//! resolver.on_scroll(Viewport::new(700.0, 1280.0, 800.0), Instant::now());
//! assert_eq!(resolver.active(), Some(SectionId::new("mains")));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod arbiter;
mod config;
pub mod error;
mod geometry;
mod producer;
mod resolver;

pub use arbiter::{Arbiter, FrameGate};
pub use config::ResolverConfig;
pub use error::{Result, ScrollError};
pub use geometry::{visible_ratio, SectionBounds, SectionId, Viewport, ViewportClass};
pub use producer::{CandidateProducer, ScrollProducer, VisibilityEntry, VisibilityProducer};
pub use resolver::{ResolverState, ScrollSyncResolver};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

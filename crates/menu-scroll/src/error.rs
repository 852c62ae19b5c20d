//! Error types for the scroll-sync resolver

use crate::geometry::SectionId;

/// Resolver errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScrollError {
    /// `register` was given no sections
    #[error("no sections to track")]
    NoSections,

    /// Two sections share an id
    #[error("duplicate section '{0}'")]
    DuplicateSection(SectionId),

    /// A section has a negative or non-finite height
    #[error("section '{0}' has invalid bounds")]
    InvalidBounds(SectionId),

    /// Override target is not registered
    #[error("unknown section '{0}'")]
    UnknownSection(SectionId),

    /// Configuration out of range
    #[error("invalid resolver config: {0}")]
    Config(String),
}

/// Result type for resolver operations
pub type Result<T> = std::result::Result<T, ScrollError>;

//! Error types for the menu data model
//!
//! Covers:
//! - Payload parsing (text → [`MenuPayload`](crate::MenuPayload))
//! - Structural validation of persisted or imported payloads
//! - Fingerprint decoding

/// Errors raised while parsing or validating a persisted payload
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    /// Text is not valid JSON or does not match the payload shape
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Payload is not a JSON object
    #[error("payload must be a JSON object")]
    NotAnObject,

    /// A required top-level key is absent
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    /// A top-level key has the wrong JSON type
    #[error("field '{field}' must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    /// Schema version is not readable by this build
    #[error("incompatible schema version '{found}' (supported: {supported})")]
    IncompatibleVersion { found: String, supported: String },

    /// Content invariant violated
    #[error("invalid content: {0}")]
    Invalid(String),
}

impl PayloadError {
    /// Create an invariant violation error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

/// Errors decoding a [`Fingerprint`](crate::Fingerprint)
#[derive(Debug, thiserror::Error)]
pub enum FingerprintError {
    /// Wrong byte length
    #[error("invalid fingerprint length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Hex decoding failed
    #[error("hex decode error: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Serialization failed while fingerprinting
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

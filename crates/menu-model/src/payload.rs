//! Persisted payload shape
//!
//! [`MenuPayload`] is what every storage medium reads and writes, and what
//! export/import exchange as pretty-printed JSON. It is a flat object: the
//! menu-data fields sit at the top level next to `theme`, `lastSaved` and
//! `version`.

use crate::error::PayloadError;
use crate::menu::MenuData;
use crate::theme::ThemeConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Current schema tag written into every payload
pub const SCHEMA_VERSION: &str = "1.0";

/// Top-level keys that must be present for a payload to be accepted
pub const REQUIRED_KEYS: [&str; 3] = ["menuItems", "categories", "navbarStyle"];

/// Full persisted state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuPayload {
    #[serde(flatten)]
    pub menu: MenuData,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub last_saved: Option<DateTime<Utc>>,
    #[serde(default = "default_version")]
    pub version: String,
}

impl Default for MenuPayload {
    fn default() -> Self {
        Self::compose(MenuData::default(), ThemeConfig::default())
    }
}

impl MenuPayload {
    /// Build a payload from its two documents
    #[must_use]
    pub fn compose(menu: MenuData, theme: ThemeConfig) -> Self {
        Self {
            menu,
            theme,
            last_saved: None,
            version: default_version(),
        }
    }

    /// Split into (menu-data, theme) documents
    #[must_use]
    pub fn split(self) -> (MenuData, ThemeConfig) {
        (self.menu, self.theme)
    }

    /// Mark as saved now under the current schema
    pub fn stamp(&mut self, at: DateTime<Utc>) {
        self.last_saved = Some(at);
        self.version = SCHEMA_VERSION.to_string();
    }

    /// Check that a raw JSON value has the required top-level structure
    ///
    /// # Errors
    /// Returns the first missing or mistyped required key
    pub fn validate_value(value: &Value) -> Result<(), PayloadError> {
        let object = value.as_object().ok_or(PayloadError::NotAnObject)?;
        for key in REQUIRED_KEYS {
            if !object.contains_key(key) {
                return Err(PayloadError::MissingField(key));
            }
        }
        for key in ["menuItems", "categories"] {
            if !object[key].is_array() {
                return Err(PayloadError::WrongType {
                    field: key,
                    expected: "an array",
                });
            }
        }
        if !object["navbarStyle"].is_string() {
            return Err(PayloadError::WrongType {
                field: "navbarStyle",
                expected: "a string",
            });
        }
        Ok(())
    }

    /// Parse and validate payload text
    ///
    /// Categories are normalized (desserts first) on the way in.
    ///
    /// # Errors
    /// - `PayloadError::Malformed` if the text is not valid payload JSON
    /// - `PayloadError::MissingField`/`WrongType` if required keys are absent
    /// - `PayloadError::IncompatibleVersion` for a different major version
    /// - `PayloadError::Invalid` if content invariants fail
    pub fn from_json(text: &str) -> Result<Self, PayloadError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Validate and convert a raw JSON value
    ///
    /// # Errors
    /// Same as [`MenuPayload::from_json`]
    pub fn from_value(value: Value) -> Result<Self, PayloadError> {
        Self::validate_value(&value)?;
        let mut payload: Self = serde_json::from_value(value)?;
        if !is_compatible(&payload.version) {
            return Err(PayloadError::IncompatibleVersion {
                found: payload.version,
                supported: SCHEMA_VERSION.to_string(),
            });
        }
        payload.menu.validate()?;
        payload.menu.normalize();
        Ok(payload)
    }

    /// Pretty-printed JSON (export form)
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_pretty_json(&self) -> Result<String, PayloadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Compact JSON (storage form)
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_json(&self) -> Result<String, PayloadError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Whether a stored schema tag can be read by this build (same major version)
#[must_use]
pub fn is_compatible(version: &str) -> bool {
    fn major(v: &str) -> &str {
        v.split('.').next().unwrap_or(v)
    }
    major(version) == major(SCHEMA_VERSION)
}

fn default_version() -> String {
    SCHEMA_VERSION.to_string()
}

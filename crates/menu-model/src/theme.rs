//! Visual theme document
//!
//! The theme is opaque to persistence; it is edited through its own draft
//! store and stored under the payload's `theme` key.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named colors, keyed by role (`primary`, `background`, ...)
pub type ColorPalette = BTreeMap<String, String>;

/// Font choices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub font_family: String,
    pub heading_font: String,
    pub base_size: u16,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            font_family: "Inter, sans-serif".to_string(),
            heading_font: "Playfair Display, serif".to_string(),
            base_size: 16,
        }
    }
}

/// Spacing and card shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub border_radius: u16,
    pub spacing: u16,
    pub card_style: String,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            border_radius: 12,
            spacing: 16,
            card_style: "elevated".to_string(),
        }
    }
}

/// Visual effects toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Effects {
    pub shadows: bool,
    pub animations: bool,
    pub blur: bool,
}

impl Default for Effects {
    fn default() -> Self {
        Self {
            shadows: true,
            animations: true,
            blur: false,
        }
    }
}

/// Theme document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    #[serde(default = "default_palette")]
    pub colors: ColorPalette,
    #[serde(default)]
    pub typography: Typography,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub effects: Effects,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            colors: default_palette(),
            typography: Typography::default(),
            layout: Layout::default(),
            effects: Effects::default(),
        }
    }
}

impl ThemeConfig {
    /// Color for a role, if set
    #[must_use]
    pub fn color(&self, role: &str) -> Option<&str> {
        self.colors.get(role).map(String::as_str)
    }
}

fn default_palette() -> ColorPalette {
    [
        ("primary", "#8b4513"),
        ("secondary", "#d2691e"),
        ("accent", "#f4a460"),
        ("background", "#fffaf0"),
        ("surface", "#ffffff"),
        ("text", "#2f1b0c"),
        ("textSecondary", "#6b4f3a"),
        ("border", "#e8d5c4"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

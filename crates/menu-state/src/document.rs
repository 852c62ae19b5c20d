//! Documents and patches
//!
//! A [`Document`] is a data tree a draft store can hold. Each document has a
//! patch type describing a partial update: fields left `None` are untouched.

use menu_model::{
    Category, ColorPalette, DessertsConfig, DiscountConfig, Effects, Layout, MenuData, MenuItem,
    MenuTemplate, NavbarStyle, ThemeConfig, Typography,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Debug;

/// A data tree managed by a draft store
pub trait Document:
    Clone + PartialEq + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Partial update
    type Patch: Send;

    /// Merge a patch into this document. No shape validation is done.
    fn apply(&mut self, patch: Self::Patch);

    /// Restore ordering invariants after any change
    fn normalize(&mut self) {}
}

/// Partial update of [`MenuData`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuPatch {
    pub menu_items: Option<Vec<MenuItem>>,
    pub categories: Option<Vec<Category>>,
    pub navbar_style: Option<NavbarStyle>,
    pub selected_template: Option<MenuTemplate>,
    pub desserts_config: Option<DessertsConfig>,
    pub desserts_discount_config: Option<DiscountConfig>,
    pub category_discounts: Option<BTreeMap<menu_model::CategoryId, DiscountConfig>>,
}

impl MenuPatch {
    /// Empty patch
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the item list
    #[inline]
    #[must_use]
    pub fn menu_items(mut self, items: Vec<MenuItem>) -> Self {
        self.menu_items = Some(items);
        self
    }

    /// Replace the category list
    #[inline]
    #[must_use]
    pub fn categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = Some(categories);
        self
    }

    /// Set navbar style
    #[inline]
    #[must_use]
    pub fn navbar_style(mut self, style: NavbarStyle) -> Self {
        self.navbar_style = Some(style);
        self
    }

    /// Set card template
    #[inline]
    #[must_use]
    pub fn selected_template(mut self, template: MenuTemplate) -> Self {
        self.selected_template = Some(template);
        self
    }

    /// Set desserts carousel config
    #[inline]
    #[must_use]
    pub fn desserts_config(mut self, config: DessertsConfig) -> Self {
        self.desserts_config = Some(config);
        self
    }

    /// Set desserts discount
    #[inline]
    #[must_use]
    pub fn desserts_discount(mut self, discount: DiscountConfig) -> Self {
        self.desserts_discount_config = Some(discount);
        self
    }

    /// Replace per-category discounts
    #[inline]
    #[must_use]
    pub fn category_discounts(
        mut self,
        discounts: BTreeMap<menu_model::CategoryId, DiscountConfig>,
    ) -> Self {
        self.category_discounts = Some(discounts);
        self
    }
}

impl Document for MenuData {
    type Patch = MenuPatch;

    fn apply(&mut self, patch: MenuPatch) {
        let MenuPatch {
            menu_items,
            categories,
            navbar_style,
            selected_template,
            desserts_config,
            desserts_discount_config,
            category_discounts,
        } = patch;

        if let Some(v) = menu_items {
            self.menu_items = v;
        }
        if let Some(v) = categories {
            self.categories = v;
        }
        if let Some(v) = navbar_style {
            self.navbar_style = v;
        }
        if let Some(v) = selected_template {
            self.selected_template = v;
        }
        if let Some(v) = desserts_config {
            self.desserts_config = v;
        }
        if let Some(v) = desserts_discount_config {
            self.desserts_discount_config = v;
        }
        if let Some(v) = category_discounts {
            self.category_discounts = v;
        }
    }

    fn normalize(&mut self) {
        MenuData::normalize(self);
    }
}

/// Partial update of [`ThemeConfig`]
///
/// `colors` is merged key by key; the other sections are replaced whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemePatch {
    pub colors: Option<ColorPalette>,
    pub typography: Option<Typography>,
    pub layout: Option<Layout>,
    pub effects: Option<Effects>,
}

impl ThemePatch {
    /// Empty patch
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one color role
    #[must_use]
    pub fn color(mut self, role: impl Into<String>, value: impl Into<String>) -> Self {
        self.colors
            .get_or_insert_with(ColorPalette::new)
            .insert(role.into(), value.into());
        self
    }

    /// Replace typography
    #[inline]
    #[must_use]
    pub fn typography(mut self, typography: Typography) -> Self {
        self.typography = Some(typography);
        self
    }

    /// Replace layout
    #[inline]
    #[must_use]
    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Replace effects
    #[inline]
    #[must_use]
    pub fn effects(mut self, effects: Effects) -> Self {
        self.effects = Some(effects);
        self
    }
}

impl Document for ThemeConfig {
    type Patch = ThemePatch;

    fn apply(&mut self, patch: ThemePatch) {
        if let Some(colors) = patch.colors {
            self.colors.extend(colors);
        }
        if let Some(v) = patch.typography {
            self.typography = v;
        }
        if let Some(v) = patch.layout {
            self.layout = v;
        }
        if let Some(v) = patch.effects {
            self.effects = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_patch_only_touches_given_fields() {
        let mut menu = MenuData::default();
        let before = menu.clone();
        menu.apply(MenuPatch::new().navbar_style(NavbarStyle::IconOnly));
        assert_eq!(menu.navbar_style, NavbarStyle::IconOnly);
        assert_eq!(menu.categories, before.categories);
        assert_eq!(menu.selected_template, before.selected_template);
    }

    #[test]
    fn theme_colors_merge() {
        let mut theme = ThemeConfig::default();
        let count = theme.colors.len();
        theme.apply(ThemePatch::new().color("primary", "#000000").color("highlight", "#ff0"));
        assert_eq!(theme.color("primary"), Some("#000000"));
        assert_eq!(theme.color("highlight"), Some("#ff0"));
        assert_eq!(theme.colors.len(), count + 1);
    }
}

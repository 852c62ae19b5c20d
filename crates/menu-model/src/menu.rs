//! Menu content: items, categories, presentation choices and discounts
//!
//! [`MenuData`] is the document edited through the menu-data draft store.
//! Field names serialize in camelCase to match the persisted payload.

use crate::error::PayloadError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt::{self, Display, Formatter};

/// Numeric menu item identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Category identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    /// Id of the desserts category, always listed first
    pub const DESSERTS: &'static str = "desserts";

    /// Create a category id
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The desserts category id
    #[inline]
    #[must_use]
    pub fn desserts() -> Self {
        Self(Self::DESSERTS.to_string())
    }

    /// Whether this is the desserts category
    #[inline]
    #[must_use]
    pub fn is_desserts(&self) -> bool {
        self.0 == Self::DESSERTS
    }

    /// Borrow as str
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CategoryId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CategoryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A single dish or drink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: ItemId,
    pub category: CategoryId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<f64>,
    #[serde(default)]
    pub has_discount: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_info: Option<String>,
}

impl MenuItem {
    /// Create an item with no discount, image or extra text
    #[must_use]
    pub fn new(
        id: ItemId,
        category: impl Into<CategoryId>,
        title: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id,
            category: category.into(),
            title: title.into(),
            description: String::new(),
            price,
            discounted_price: None,
            has_discount: false,
            image: None,
            extra_info: None,
        }
    }

    /// Set description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set an item-level discounted price and enable it
    #[inline]
    #[must_use]
    pub fn with_discount(mut self, discounted_price: f64) -> Self {
        self.discounted_price = Some(discounted_price);
        self.has_discount = true;
        self
    }
}

/// A menu section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Category {
    /// Create a category
    #[must_use]
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: String::new(),
            description: None,
        }
    }

    /// Set icon key
    #[inline]
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }
}

/// How the category navigation bar renders its entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavbarStyle {
    TextOnly,
    IconOnly,
    #[default]
    IconWithText,
}

impl std::str::FromStr for NavbarStyle {
    type Err = PayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text-only" => Ok(Self::TextOnly),
            "icon-only" => Ok(Self::IconOnly),
            "icon-with-text" => Ok(Self::IconWithText),
            other => Err(PayloadError::invalid(format!("unknown navbar style '{other}'"))),
        }
    }
}

/// Card layout used for menu items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MenuTemplate {
    #[default]
    Default,
    Compact,
    Square,
}

impl std::str::FromStr for MenuTemplate {
    type Err = PayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "compact" => Ok(Self::Compact),
            "square" => Ok(Self::Square),
            other => Err(PayloadError::invalid(format!("unknown template '{other}'"))),
        }
    }
}

/// Presentation of the desserts carousel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DessertsConfig {
    pub visible: bool,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub order: u32,
}

impl Default for DessertsConfig {
    fn default() -> Self {
        Self {
            visible: true,
            title: "Desserts".to_string(),
            description: String::new(),
            icon: "cake".to_string(),
            order: 0,
        }
    }
}

/// Percentage discount toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiscountConfig {
    pub percentage: u8,
    pub active: bool,
}

impl DiscountConfig {
    /// Active discount of `percentage` percent
    #[inline]
    #[must_use]
    pub const fn active(percentage: u8) -> Self {
        Self {
            percentage,
            active: true,
        }
    }

    /// Apply to a price, if active
    #[inline]
    #[must_use]
    pub fn apply(&self, price: f64) -> Option<f64> {
        (self.active && self.percentage > 0)
            .then(|| round_cents(price * f64::from(100 - self.percentage.min(100)) / 100.0))
    }
}

/// Menu-data document: everything the admin edits except the theme
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuData {
    pub menu_items: Vec<MenuItem>,
    pub categories: Vec<Category>,
    #[serde(default)]
    pub navbar_style: NavbarStyle,
    #[serde(default)]
    pub selected_template: MenuTemplate,
    #[serde(default)]
    pub desserts_config: DessertsConfig,
    #[serde(default)]
    pub desserts_discount_config: DiscountConfig,
    #[serde(default)]
    pub category_discounts: BTreeMap<CategoryId, DiscountConfig>,
}

impl MenuData {
    /// Price a customer pays for `item`
    ///
    /// Precedence: item-level discount, then category discount, then the
    /// desserts discount for desserts items, then list price.
    #[must_use]
    pub fn effective_price(&self, item: &MenuItem) -> f64 {
        if item.has_discount {
            if let Some(price) = item.discounted_price {
                return price;
            }
        }
        if let Some(price) = self
            .category_discounts
            .get(&item.category)
            .and_then(|d| d.apply(item.price))
        {
            return price;
        }
        if item.category.is_desserts() {
            if let Some(price) = self.desserts_discount_config.apply(item.price) {
                return price;
            }
        }
        item.price
    }

    /// Items of one category in stored order
    pub fn items_in<'a>(&'a self, category: &'a CategoryId) -> impl Iterator<Item = &'a MenuItem> {
        self.menu_items.iter().filter(move |i| &i.category == category)
    }

    /// Look up an item
    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<&MenuItem> {
        self.menu_items.iter().find(|i| i.id == id)
    }

    /// Look up a category
    #[must_use]
    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| &c.id == id)
    }

    /// Next unused item id
    #[must_use]
    pub fn next_item_id(&self) -> ItemId {
        ItemId(self.menu_items.iter().map(|i| i.id.0).max().map_or(1, |m| m + 1))
    }

    /// Restore the ordering invariants
    pub fn normalize(&mut self) {
        desserts_first(&mut self.categories);
    }

    /// Check content invariants
    ///
    /// # Errors
    /// Returns error on duplicate ids, negative prices or out-of-range discounts
    pub fn validate(&self) -> Result<(), PayloadError> {
        let mut seen = HashSet::new();
        for item in &self.menu_items {
            if !seen.insert(item.id) {
                return Err(PayloadError::invalid(format!("duplicate item id {}", item.id)));
            }
            if item.price < 0.0 || item.discounted_price.is_some_and(|p| p < 0.0) {
                return Err(PayloadError::invalid(format!(
                    "negative price on item {}",
                    item.id
                )));
            }
        }

        let mut categories = HashSet::new();
        for category in &self.categories {
            if !categories.insert(&category.id) {
                return Err(PayloadError::invalid(format!(
                    "duplicate category id '{}'",
                    category.id
                )));
            }
        }

        let discounts = std::iter::once(&self.desserts_discount_config)
            .chain(self.category_discounts.values());
        for discount in discounts {
            if discount.percentage > 100 {
                return Err(PayloadError::invalid(format!(
                    "discount percentage {} exceeds 100",
                    discount.percentage
                )));
            }
        }
        Ok(())
    }
}

/// Move the desserts category to the front, keeping everything else in order
///
/// Stable sort on a single boolean key, so ties keep their relative order.
pub fn desserts_first(categories: &mut [Category]) {
    categories.sort_by_key(|c| !c.id.is_desserts());
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

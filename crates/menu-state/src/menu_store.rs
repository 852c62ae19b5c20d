//! Menu-data store with domain edits
//!
//! Every edit goes through [`DraftStore::try_mutate`], so a rejected edit
//! never leaves a half-applied working copy behind.

use crate::error::StoreError;
use crate::port::SnapshotPort;
use crate::store::DraftStore;
use menu_model::{
    Category, CategoryId, DessertsConfig, DiscountConfig, ItemId, MenuData, MenuItem,
    MenuTemplate, NavbarStyle,
};
use std::ops::Deref;
use std::sync::Arc;

/// Draft store over [`MenuData`]
#[derive(Debug)]
pub struct MenuDataStore {
    inner: DraftStore<MenuData>,
}

impl MenuDataStore {
    /// Store starting from `initial`
    #[must_use]
    pub fn new(initial: MenuData, port: Arc<dyn SnapshotPort<MenuData>>) -> Self {
        Self {
            inner: DraftStore::new("menu-data", initial, port),
        }
    }

    /// Wrap an already configured draft store
    #[must_use]
    pub fn from_store(inner: DraftStore<MenuData>) -> Self {
        Self { inner }
    }

    /// The underlying draft store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &DraftStore<MenuData> {
        &self.inner
    }

    /// Add an item to an existing category, assigning the next free id
    ///
    /// The id on `item` is ignored.
    ///
    /// # Errors
    /// `NotFound` if the category does not exist, `Invalid` on a negative price
    pub fn add_item(&self, mut item: MenuItem) -> Result<ItemId, StoreError> {
        check_price(&item)?;
        self.inner.try_mutate(|menu| {
            if menu.category(&item.category).is_none() {
                return Err(StoreError::not_found(format_args!(
                    "category '{}'",
                    item.category
                )));
            }
            item.id = menu.next_item_id();
            let id = item.id;
            menu.menu_items.push(item);
            Ok(id)
        })
    }

    /// Edit one item in place
    ///
    /// # Errors
    /// `NotFound` if the item or its new category does not exist,
    /// `Invalid` if the edit changes the id or leaves a negative price
    pub fn edit_item(&self, id: ItemId, edit: impl FnOnce(&mut MenuItem)) -> Result<(), StoreError> {
        self.inner.try_mutate(|menu| {
            let item = menu
                .menu_items
                .iter_mut()
                .find(|i| i.id == id)
                .ok_or_else(|| StoreError::not_found(format_args!("item {id}")))?;
            edit(item);
            if item.id != id {
                return Err(StoreError::Invalid("item id cannot change".into()));
            }
            check_price(item)?;
            let category = item.category.clone();
            if menu.category(&category).is_none() {
                return Err(StoreError::not_found(format_args!("category '{category}'")));
            }
            Ok(())
        })
    }

    /// Remove an item, returning it
    ///
    /// # Errors
    /// `NotFound` if no item has `id`
    pub fn remove_item(&self, id: ItemId) -> Result<MenuItem, StoreError> {
        self.inner.try_mutate(|menu| {
            let pos = menu
                .menu_items
                .iter()
                .position(|i| i.id == id)
                .ok_or_else(|| StoreError::not_found(format_args!("item {id}")))?;
            Ok(menu.menu_items.remove(pos))
        })
    }

    /// Append a category. Desserts still sorts first.
    ///
    /// # Errors
    /// `Conflict` if the id is taken
    pub fn add_category(&self, category: Category) -> Result<(), StoreError> {
        self.inner.try_mutate(|menu| {
            if menu.category(&category.id).is_some() {
                return Err(StoreError::Conflict(format!("category '{}'", category.id)));
            }
            menu.categories.push(category);
            Ok(())
        })
    }

    /// Edit a category's name, icon or description
    ///
    /// # Errors
    /// `NotFound` if the category does not exist, `Invalid` if the edit
    /// changes its id
    pub fn edit_category(
        &self,
        id: &CategoryId,
        edit: impl FnOnce(&mut Category),
    ) -> Result<(), StoreError> {
        self.inner.try_mutate(|menu| {
            let category = menu
                .categories
                .iter_mut()
                .find(|c| &c.id == id)
                .ok_or_else(|| StoreError::not_found(format_args!("category '{id}'")))?;
            edit(category);
            if &category.id != id {
                return Err(StoreError::Invalid("category id cannot change".into()));
            }
            Ok(())
        })
    }

    /// Remove a category with its items and its discount
    ///
    /// Returns the number of items removed.
    ///
    /// # Errors
    /// `NotFound` if the category does not exist
    pub fn remove_category(&self, id: &CategoryId) -> Result<usize, StoreError> {
        self.inner.try_mutate(|menu| {
            let before = menu.categories.len();
            menu.categories.retain(|c| &c.id != id);
            if menu.categories.len() == before {
                return Err(StoreError::not_found(format_args!("category '{id}'")));
            }
            let items = menu.menu_items.len();
            menu.menu_items.retain(|i| &i.category != id);
            menu.category_discounts.remove(id);
            Ok(items - menu.menu_items.len())
        })
    }

    /// Set navbar style
    pub fn set_navbar_style(&self, style: NavbarStyle) {
        self.inner.update(crate::MenuPatch::new().navbar_style(style));
    }

    /// Set card template
    pub fn set_template(&self, template: MenuTemplate) {
        self.inner
            .update(crate::MenuPatch::new().selected_template(template));
    }

    /// Set desserts carousel presentation
    pub fn set_desserts_config(&self, config: DessertsConfig) {
        self.inner.update(crate::MenuPatch::new().desserts_config(config));
    }

    /// Set desserts discount
    ///
    /// # Errors
    /// `Invalid` if the percentage exceeds 100
    pub fn set_desserts_discount(&self, discount: DiscountConfig) -> Result<(), StoreError> {
        check_discount(discount)?;
        self.inner.update(crate::MenuPatch::new().desserts_discount(discount));
        Ok(())
    }

    /// Set or remove (`None`) one category's discount
    ///
    /// # Errors
    /// `NotFound` if the category does not exist, `Invalid` if the
    /// percentage exceeds 100
    pub fn set_category_discount(
        &self,
        id: &CategoryId,
        discount: Option<DiscountConfig>,
    ) -> Result<(), StoreError> {
        if let Some(d) = discount {
            check_discount(d)?;
        }
        self.inner.try_mutate(|menu| {
            if menu.category(id).is_none() {
                return Err(StoreError::not_found(format_args!("category '{id}'")));
            }
            match discount {
                Some(d) => {
                    menu.category_discounts.insert(id.clone(), d);
                }
                None => {
                    menu.category_discounts.remove(id);
                }
            }
            Ok(())
        })
    }
}

impl Deref for MenuDataStore {
    type Target = DraftStore<MenuData>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

fn check_discount(discount: DiscountConfig) -> Result<(), StoreError> {
    if discount.percentage > 100 {
        return Err(StoreError::Invalid(format!(
            "discount percentage {} exceeds 100",
            discount.percentage
        )));
    }
    Ok(())
}

fn check_price(item: &MenuItem) -> Result<(), StoreError> {
    if item.price < 0.0 || item.discounted_price.is_some_and(|p| p < 0.0) {
        return Err(StoreError::Invalid(format!("negative price on '{}'", item.title)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::MemoryPort;
    use pretty_assertions::assert_eq;

    fn store() -> MenuDataStore {
        let menu = MenuData {
            categories: vec![Category::new("mains", "Mains"), Category::new("desserts", "Desserts")],
            menu_items: vec![
                MenuItem::new(ItemId(1), "mains", "Steak", 24.0),
                MenuItem::new(ItemId(2), "desserts", "Tiramisu", 8.0),
            ],
            ..MenuData::default()
        };
        MenuDataStore::new(menu, Arc::new(MemoryPort::<MenuData>::new()))
    }

    #[test]
    fn add_item_assigns_next_id() {
        let store = store();
        let id = store
            .add_item(MenuItem::new(ItemId(0), "mains", "Risotto", 15.0))
            .unwrap();
        assert_eq!(id, ItemId(3));
        assert!(store.has_unsaved_changes());
        assert_eq!(store.pending_changes().fields().collect::<Vec<_>>(), vec!["menuItems"]);
    }

    #[test]
    fn add_item_to_unknown_category_fails() {
        let store = store();
        let err = store
            .add_item(MenuItem::new(ItemId(0), "drinks", "Water", 2.0))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        assert!(!store.has_unsaved_changes());
    }

    #[test]
    fn edit_item_cannot_change_id() {
        let store = store();
        let err = store.edit_item(ItemId(1), |i| i.id = ItemId(9)).unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)));
        assert!(store.current().item(ItemId(1)).is_some());
    }

    #[test]
    fn edit_item_updates_in_place() {
        let store = store();
        store.edit_item(ItemId(1), |i| i.price = 26.5).unwrap();
        assert_eq!(store.current().item(ItemId(1)).unwrap().price, 26.5);
        assert_eq!(store.original().item(ItemId(1)).unwrap().price, 24.0);
    }

    #[test]
    fn remove_category_drops_items_and_discount() {
        let store = store();
        store
            .set_category_discount(&CategoryId::new("mains"), Some(DiscountConfig::active(10)))
            .unwrap();

        let removed = store.remove_category(&CategoryId::new("mains")).unwrap();

        let menu = store.current();
        assert_eq!(removed, 1);
        assert!(menu.category(&CategoryId::new("mains")).is_none());
        assert!(menu.category_discounts.is_empty());
        assert_eq!(menu.menu_items.len(), 1);
    }

    #[test]
    fn add_category_keeps_desserts_first() {
        let store = store();
        store.add_category(Category::new("drinks", "Drinks")).unwrap();
        let ids: Vec<_> = store
            .current()
            .categories
            .iter()
            .map(|c| c.id.as_str().to_string())
            .collect();
        assert_eq!(ids, vec!["desserts", "mains", "drinks"]);
    }

    #[test]
    fn duplicate_category_conflicts() {
        let store = store();
        let err = store.add_category(Category::new("mains", "Again")).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn discount_over_100_rejected() {
        let store = store();
        let bad = DiscountConfig {
            percentage: 150,
            active: true,
        };
        assert!(store.set_desserts_discount(bad).is_err());
        assert!(!store.has_unsaved_changes());
    }
}

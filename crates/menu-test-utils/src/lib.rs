//! Testing utilities for the menu workspace
//!
//! Shared fixtures: a small sample menu, storage services over in-memory
//! media, and stores wired to them.

#![allow(missing_docs)]

use menu_model::{
    Category, CategoryId, DiscountConfig, ItemId, MenuData, MenuItem, MenuPayload, NavbarStyle,
    ThemeConfig,
};
use menu_state::{MemoryPort, MenuDataPort, MenuDataStore, ThemePort, ThemeStore};
use menu_storage::{MediumKind, MemoryMedium, StorageService};
use std::sync::Arc;

/// Three categories, desserts deliberately not first, and four items
pub fn sample_menu() -> MenuData {
    let mut menu = MenuData {
        categories: vec![
            Category::new("starters", "Starters").with_icon("salad"),
            Category::new(CategoryId::DESSERTS, "Desserts").with_icon("cake"),
            Category::new("mains", "Mains").with_icon("plate"),
        ],
        menu_items: vec![
            MenuItem::new(ItemId(1), "starters", "Bruschetta", 7.5),
            MenuItem::new(ItemId(2), "mains", "Lasagne", 14.0).with_description("Beef ragu"),
            MenuItem::new(ItemId(3), "mains", "Gnocchi", 12.0).with_discount(10.0),
            MenuItem::new(ItemId(4), CategoryId::DESSERTS, "Panna cotta", 6.0),
        ],
        navbar_style: NavbarStyle::IconWithText,
        ..MenuData::default()
    };
    menu.category_discounts
        .insert(CategoryId::new("starters"), DiscountConfig::active(20));
    menu.normalize();
    menu
}

/// Sample menu with the default theme
pub fn sample_payload() -> MenuPayload {
    MenuPayload::compose(sample_menu(), ThemeConfig::default())
}

/// Sample payload as export-format JSON
pub fn sample_payload_json() -> String {
    serde_json::to_string_pretty(&sample_payload()).unwrap()
}

/// Local-only service over a fresh memory medium, plus a handle to it
pub fn local_service() -> (Arc<StorageService>, MemoryMedium) {
    let local = MemoryMedium::new(MediumKind::Local);
    (Arc::new(StorageService::local(local.clone())), local)
}

/// Hybrid service over fresh memory media: `(service, remote, local)`
pub fn hybrid_service() -> (Arc<StorageService>, MemoryMedium, MemoryMedium) {
    let remote = MemoryMedium::new(MediumKind::Remote);
    let local = MemoryMedium::new(MediumKind::Local);
    let service = StorageService::hybrid(remote.clone(), local.clone());
    (Arc::new(service), remote, local)
}

/// Menu-data store over an in-memory port, starting from the sample menu
pub fn memory_menu_store() -> (MenuDataStore, Arc<MemoryPort<MenuData>>) {
    let port = Arc::new(MemoryPort::<MenuData>::new());
    (MenuDataStore::new(sample_menu(), port.clone()), port)
}

/// Both stores sharing `service`, starting from defaults
pub fn stores_over(service: &Arc<StorageService>) -> (MenuDataStore, ThemeStore) {
    let menu = MenuDataStore::new(
        MenuData::default(),
        Arc::new(MenuDataPort::new(service.clone())),
    );
    let theme = ThemeStore::new(
        ThemeConfig::default(),
        Arc::new(ThemePort::new(service.clone())),
    );
    (menu, theme)
}

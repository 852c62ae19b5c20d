use menu_model::{
    Category, CategoryId, MenuData, MenuPayload, MenuTemplate, NavbarStyle, ThemeConfig,
};
use menu_storage::{MediumKind, MemoryMedium, StorageService};
use menu_state::{CommitPolicy, DraftStore, MemoryPort, MenuDataPort, MenuPatch, StoreError};
use menu_test_utils::{hybrid_service, local_service, memory_menu_store, sample_menu, stores_over};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Clone)]
enum Edit {
    Navbar(NavbarStyle),
    Template(MenuTemplate),
    AddCategory(u8),
    DessertsVisible(bool),
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        prop_oneof![
            Just(NavbarStyle::TextOnly),
            Just(NavbarStyle::IconOnly),
            Just(NavbarStyle::IconWithText)
        ]
        .prop_map(Edit::Navbar),
        prop_oneof![
            Just(MenuTemplate::Default),
            Just(MenuTemplate::Compact),
            Just(MenuTemplate::Square)
        ]
        .prop_map(Edit::Template),
        (0u8..4).prop_map(Edit::AddCategory),
        any::<bool>().prop_map(Edit::DessertsVisible),
    ]
}

fn apply(store: &DraftStore<MenuData>, edit: Edit) {
    match edit {
        Edit::Navbar(style) => store.update(MenuPatch::new().navbar_style(style)),
        Edit::Template(template) => store.update(MenuPatch::new().selected_template(template)),
        Edit::AddCategory(n) => {
            let mut categories = store.current().categories;
            categories.push(Category::new(format!("extra-{n}"), format!("Extra {n}")));
            store.update(MenuPatch::new().categories(categories));
        }
        Edit::DessertsVisible(visible) => {
            let mut config = store.current().desserts_config;
            config.visible = visible;
            store.update(MenuPatch::new().desserts_config(config));
        }
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn dirty_flag_matches_tree_inequality(edits in prop::collection::vec(edit(), 0..12)) {
        let store = DraftStore::new("menu", sample_menu(), Arc::new(MemoryPort::<MenuData>::new()));
        for e in edits {
            apply(&store, e);
            prop_assert_eq!(store.has_unsaved_changes(), store.current() != store.original());
            prop_assert_eq!(store.pending_changes().is_empty(), !store.has_unsaved_changes());
        }
    }

    #[test]
    fn cancel_restores_original(edits in prop::collection::vec(edit(), 1..8)) {
        let store = DraftStore::new("menu", sample_menu(), Arc::new(MemoryPort::<MenuData>::new()));
        let original = store.original();
        for e in edits {
            apply(&store, e);
        }
        store.cancel();
        prop_assert!(!store.has_unsaved_changes());
        prop_assert!(store.pending_changes().is_empty());
        prop_assert_eq!(store.current(), original.clone());
        prop_assert_eq!(store.original(), original);
    }

    #[test]
    fn confirm_promotes_current(edits in prop::collection::vec(edit(), 1..8)) {
        let port = Arc::new(MemoryPort::<MenuData>::new());
        let store = DraftStore::new("menu", sample_menu(), port.clone());
        for e in edits {
            apply(&store, e);
        }
        let before = store.current();

        runtime().block_on(store.confirm()).unwrap();

        prop_assert!(!store.has_unsaved_changes());
        prop_assert_eq!(store.original(), before.clone());
        prop_assert_eq!(port.stored(), Some(before));
    }

    #[test]
    fn categories_stay_desserts_first(
        names in prop::collection::vec("[a-z]{1,6}", 0..6),
        pos in 0usize..6,
    ) {
        let store = DraftStore::new("menu", MenuData::default(), Arc::new(MemoryPort::<MenuData>::new()));
        let mut categories: Vec<Category> = names
            .iter()
            .enumerate()
            .map(|(i, n)| Category::new(format!("{n}-{i}"), n.clone()))
            .collect();
        categories.insert(pos.min(categories.len()), Category::new("desserts", "Desserts"));

        store.update(MenuPatch::new().categories(categories));

        prop_assert!(store.current().categories[0].id.is_desserts());
    }
}

#[test]
fn navbar_change_is_the_only_pending_field() {
    let (store, _) = memory_menu_store();
    assert_eq!(store.current().navbar_style, NavbarStyle::IconWithText);

    store.set_navbar_style(NavbarStyle::IconOnly);

    assert!(store.has_unsaved_changes());
    assert_eq!(
        store.pending_changes().to_value(),
        json!({ "navbarStyle": "icon-only" })
    );

    store.cancel();
    assert_eq!(store.current().navbar_style, NavbarStyle::IconWithText);
    assert!(!store.has_unsaved_changes());
}

#[test]
fn categories_update_sorts_desserts_to_front() {
    let store = DraftStore::new("menu", MenuData::default(), Arc::new(MemoryPort::<MenuData>::new()));

    store.update(MenuPatch::new().categories(vec![
        Category::new("a", "A"),
        Category::new("desserts", "Desserts"),
        Category::new("b", "B"),
    ]));

    let ids: Vec<String> = store
        .current()
        .categories
        .iter()
        .map(|c| c.id.to_string())
        .collect();
    assert_eq!(ids, vec!["desserts", "a", "b"]);
}

#[tokio::test]
async fn confirming_menu_does_not_persist_theme_draft() {
    let (service, _local) = local_service();
    let (menu, theme) = stores_over(&service);

    theme.set_color("primary", "#abcdef");
    menu.set_template(MenuTemplate::Square);
    menu.confirm().await.unwrap();

    let stored = service.load().await.unwrap();
    assert_eq!(stored.menu.selected_template, MenuTemplate::Square);
    assert_eq!(stored.theme, ThemeConfig::default());
    assert!(theme.has_unsaved_changes());

    theme.confirm().await.unwrap();
    let stored = service.load().await.unwrap();
    assert_eq!(stored.theme.color("primary"), Some("#abcdef"));
    assert_eq!(stored.menu.selected_template, MenuTemplate::Square);
}

#[tokio::test]
async fn load_from_storage_replaces_both_snapshots() {
    let (service, _local) = local_service();
    let (writer, _) = stores_over(&service);
    writer.update(MenuPatch::new().categories(sample_menu().categories));
    writer.confirm().await.unwrap();

    let reader = DraftStore::new(
        "reader",
        MenuData::default(),
        Arc::new(MenuDataPort::new(service.clone())),
    );
    reader.update(MenuPatch::new().navbar_style(NavbarStyle::TextOnly));
    reader.load_from_storage().await.unwrap();

    assert!(!reader.has_unsaved_changes());
    assert_eq!(reader.current().categories, sample_menu().categories);
    assert!(reader.original_snapshot().saved_at.is_some());
}

#[tokio::test]
async fn load_from_empty_storage_fails_without_change() {
    let (service, _local) = local_service();
    let (menu, _) = stores_over(&service);
    menu.set_navbar_style(NavbarStyle::TextOnly);

    let err = menu.load_from_storage().await.unwrap_err();

    assert!(matches!(err, StoreError::Load(ref e) if e.is_empty()));
    assert_eq!(menu.current().navbar_style, NavbarStyle::TextOnly);
}

#[tokio::test]
async fn hybrid_confirm_with_remote_down_is_partial() {
    let (service, remote, local) = hybrid_service();
    let (menu, _) = stores_over(&service);
    menu.set_template(MenuTemplate::Compact);
    menu.confirm().await.unwrap();

    remote.set_online(false);
    menu.add_category(Category::new(CategoryId::DESSERTS, "Desserts"))
        .unwrap();

    let receipt = menu.confirm().await.unwrap();

    assert!(receipt.is_partial());
    assert!(local.contents().is_some());
    assert!(!menu.has_unsaved_changes());
}

#[tokio::test]
async fn transactional_confirm_survives_storage_outage() {
    let (service, remote, local) = hybrid_service();
    let store = DraftStore::new(
        "menu",
        MenuData::default(),
        Arc::new(MenuDataPort::new(service.clone())),
    )
    .with_policy(CommitPolicy::Transactional);
    local.set_online(false);
    remote.set_online(false);
    store.update(MenuPatch::new().navbar_style(NavbarStyle::IconOnly));

    let err = store.confirm().await.unwrap_err();

    assert!(matches!(err, StoreError::Persist(_)));
    assert!(store.has_unsaved_changes());
    assert_eq!(store.original().navbar_style, NavbarStyle::IconWithText);
}

#[tokio::test]
async fn hybrid_confirm_before_any_load_with_remote_down_fails() {
    let (service, remote, local) = hybrid_service();
    let (menu, _) = stores_over(&service);
    remote.set_online(false);
    menu.set_navbar_style(NavbarStyle::TextOnly);

    let err = menu.confirm().await.unwrap_err();

    assert!(matches!(err, StoreError::Persist(_)));
    assert!(local.contents().is_none());
}

#[tokio::test]
async fn concurrent_confirms_keep_both_sections() {
    let (service, local) = local_service();
    local.set_delay(Some(std::time::Duration::from_millis(10)));
    let (menu, theme) = stores_over(&service);
    menu.set_navbar_style(NavbarStyle::TextOnly);
    theme.set_color("primary", "#123456");

    let (menu_saved, theme_saved) = tokio::join!(menu.confirm(), theme.confirm());
    menu_saved.unwrap();
    theme_saved.unwrap();

    let stored = service.load().await.unwrap();
    assert_eq!(stored.menu.navbar_style, NavbarStyle::TextOnly);
    assert_eq!(stored.theme.color("primary"), Some("#123456"));
}

#[tokio::test]
async fn first_confirm_merges_into_unseen_stored_payload() {
    let mut stored = MenuPayload::compose(sample_menu(), ThemeConfig::default());
    stored.theme.colors.insert("primary".into(), "#123456".into());
    let local = MemoryMedium::with_contents(MediumKind::Local, stored.to_pretty_json().unwrap());
    let service = Arc::new(StorageService::local(local));
    let (menu, _) = stores_over(&service);

    menu.set_navbar_style(NavbarStyle::TextOnly);
    menu.confirm().await.unwrap();

    let after = service.load().await.unwrap();
    assert_eq!(after.menu.navbar_style, NavbarStyle::TextOnly);
    assert_eq!(after.menu.menu_items.len(), 4);
    assert_eq!(after.theme.color("primary"), Some("#123456"));
}

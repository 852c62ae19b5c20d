use menu_core::{MenuConfig, MenuSession, SessionError};
use menu_model::{Category, CategoryId, MenuPayload, MenuTemplate, NavbarStyle};
use menu_state::CommitPolicy;
use menu_storage::{
    MediumKind, MemoryMedium, StorageConfig, StorageError, StorageMode, StorageService,
};
use menu_test_utils::{hybrid_service, local_service, sample_payload, sample_payload_json};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn opens_with_defaults_when_storage_empty() {
    let (storage, _local) = local_service();

    let session = MenuSession::with_storage(MenuConfig::default(), storage).await;

    assert!(!session.has_unsaved_changes());
    assert!(session.menu().current().categories.is_empty());
    assert!(matches!(
        session.export(),
        Err(SessionError::Storage(StorageError::Empty))
    ));
}

#[tokio::test]
async fn opens_from_stored_payload() {
    let local = MemoryMedium::with_contents(MediumKind::Local, sample_payload_json());
    let storage = Arc::new(StorageService::local(local));

    let session = MenuSession::with_storage(MenuConfig::default(), storage).await;

    let menu = session.menu().current();
    assert_eq!(menu.categories[0].id, CategoryId::desserts());
    assert_eq!(menu.menu_items.len(), 4);
    assert_eq!(
        session.section_ids().first().map(|s| s.as_str().to_string()),
        Some("desserts".to_string())
    );
}

#[tokio::test]
async fn confirm_all_persists_both_documents() {
    let (storage, _local) = local_service();
    let session = MenuSession::with_storage(MenuConfig::default(), storage.clone()).await;

    session.menu().set_template(MenuTemplate::Compact);
    session.theme().set_color("primary", "#101010");
    let receipts = session.confirm_all().await.unwrap();

    assert_eq!(receipts.len(), 2);
    assert!(!session.has_unsaved_changes());
    let stored = storage.load().await.unwrap();
    assert_eq!(stored.menu.selected_template, MenuTemplate::Compact);
    assert_eq!(stored.theme.color("primary"), Some("#101010"));
}

#[tokio::test]
async fn cancel_all_discards_both_documents() {
    let (storage, _local) = local_service();
    let session = MenuSession::with_storage(MenuConfig::default(), storage).await;

    session.menu().set_navbar_style(NavbarStyle::TextOnly);
    session.theme().set_color("primary", "#101010");
    session.cancel_all();

    assert!(!session.has_unsaved_changes());
}

#[tokio::test]
async fn import_reloads_stores_and_drops_edits() {
    let (storage, _local) = local_service();
    let session = MenuSession::with_storage(MenuConfig::default(), storage).await;
    session.menu().set_navbar_style(NavbarStyle::TextOnly);

    session.import(&sample_payload_json()).await.unwrap();

    assert!(!session.has_unsaved_changes());
    assert_eq!(session.menu().current().menu_items.len(), 4);
    assert_eq!(session.menu().current().navbar_style, NavbarStyle::IconWithText);
}

#[tokio::test]
async fn invalid_import_changes_nothing() {
    let (storage, local) = local_service();
    let session = MenuSession::with_storage(MenuConfig::default(), storage).await;
    session
        .menu()
        .add_category(Category::new("mains", "Mains"))
        .unwrap();
    session.confirm_all().await.unwrap();
    let before = local.contents();

    let err = session.import(r#"{"categories": []}"#).await.unwrap_err();

    assert!(matches!(err, SessionError::Storage(StorageError::Validation(_))));
    assert_eq!(local.contents(), before);
    assert_eq!(session.menu().current().categories.len(), 1);
}

#[tokio::test]
async fn export_then_import_round_trips() {
    let (storage, _local) = local_service();
    let session = MenuSession::with_storage(MenuConfig::default(), storage).await;
    session.import(&sample_payload_json()).await.unwrap();

    let exported = session.export().unwrap();
    session.import(&exported).await.unwrap();

    let reparsed = menu_model::MenuPayload::from_json(&session.export().unwrap()).unwrap();
    let original = menu_model::MenuPayload::from_json(&exported).unwrap();
    assert_eq!(reparsed.menu, original.menu);
    assert_eq!(reparsed.theme, original.theme);
}

#[tokio::test]
async fn hybrid_clear_with_remote_down_reports_partial() {
    let (storage, remote, local) = hybrid_service();
    let session = MenuSession::with_storage(MenuConfig::default(), storage).await;
    session.menu().set_navbar_style(NavbarStyle::IconOnly);
    session.confirm_all().await.unwrap();

    remote.set_online(false);
    let receipt = session.clear().await.unwrap();

    assert!(receipt.is_partial());
    assert_eq!(receipt.medium, MediumKind::Local);
    assert!(local.contents().is_none());
    assert!(session.status().await.storage.error.is_some());
}

#[tokio::test]
async fn transactional_policy_keeps_draft_on_failure() {
    let local = MemoryMedium::new(MediumKind::Local);
    let storage = Arc::new(StorageService::local(local.clone()));
    let config = MenuConfig::default().with_commit_policy(CommitPolicy::Transactional);
    let session = MenuSession::with_storage(config, storage).await;
    local.set_online(false);

    session.menu().set_navbar_style(NavbarStyle::TextOnly);
    let err = session.confirm_all().await.unwrap_err();

    assert!(matches!(err, SessionError::Store(_)));
    assert!(session.has_unsaved_changes());
}

#[tokio::test(start_paused = true)]
async fn autosave_confirms_after_quiet_period() {
    let local = MemoryMedium::new(MediumKind::Local);
    let storage = Arc::new(StorageService::local(local.clone()));
    let config = MenuConfig::default().with_autosave(Duration::from_millis(300));
    let session = MenuSession::with_storage(config, storage).await;
    assert!(session.autosave_running());

    session.menu().set_navbar_style(NavbarStyle::TextOnly);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(local.write_count(), 0);

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(local.write_count(), 1);
    assert!(!session.has_unsaved_changes());

    session.shutdown();
}

#[tokio::test]
async fn open_from_file_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = MenuConfig::default().with_storage(
        StorageConfig::new()
            .with_mode(StorageMode::LocalOnly)
            .with_data_dir(dir.path()),
    );

    let session = MenuSession::open(config.clone()).await.unwrap();
    session.menu().set_template(MenuTemplate::Square);
    session.confirm_all().await.unwrap();
    session.shutdown();

    let reopened = MenuSession::open(config).await.unwrap();
    assert_eq!(reopened.menu().current().selected_template, MenuTemplate::Square);
}

#[tokio::test]
async fn remote_mode_without_url_fails_to_open() {
    let config = MenuConfig::default()
        .with_storage(StorageConfig::new().with_mode(StorageMode::RemoteOnly));

    let err = MenuSession::open(config).await.unwrap_err();

    assert!(matches!(err, SessionError::Storage(_)));
}

#[tokio::test]
async fn scroll_resolver_uses_session_sections() {
    let local = MemoryMedium::with_contents(MediumKind::Local, sample_payload_json());
    let session =
        MenuSession::with_storage(MenuConfig::default(), Arc::new(StorageService::local(local)))
            .await;

    let mut resolver = session.scroll_resolver().unwrap();
    let sections = session
        .section_ids()
        .into_iter()
        .enumerate()
        .map(|(i, id)| menu_scroll::SectionBounds::new(id, i as f64 * 500.0, 500.0))
        .collect();
    resolver.register(sections).unwrap();

    assert_eq!(resolver.active().unwrap().as_str(), "desserts");
}

fn remote_with_custom_theme() -> MemoryMedium {
    let mut stored = sample_payload();
    stored.theme.colors.insert("primary".into(), "#123456".into());
    MemoryMedium::with_contents(MediumKind::Remote, stored.to_pretty_json().unwrap())
}

#[tokio::test]
async fn confirm_after_failed_open_keeps_untouched_section() {
    let remote = remote_with_custom_theme();
    remote.set_online(false);
    let storage = Arc::new(StorageService::remote(remote.clone()));
    let session = MenuSession::with_storage(MenuConfig::default(), storage).await;
    assert!(session.menu().current().categories.is_empty());

    remote.set_online(true);
    session.menu().set_navbar_style(NavbarStyle::TextOnly);
    session.confirm_all().await.unwrap();

    let stored = MenuPayload::from_json(&remote.contents().unwrap()).unwrap();
    assert_eq!(stored.menu.navbar_style, NavbarStyle::TextOnly);
    assert_eq!(stored.theme.color("primary"), Some("#123456"));
}

#[tokio::test]
async fn confirm_while_storage_unreadable_fails_without_writing() {
    let remote = remote_with_custom_theme();
    remote.set_online(false);
    let storage = Arc::new(StorageService::remote(remote.clone()));
    let session = MenuSession::with_storage(MenuConfig::default(), storage).await;
    let before = remote.contents();

    session.menu().set_navbar_style(NavbarStyle::TextOnly);
    let err = session.confirm_all().await.unwrap_err();

    assert!(matches!(err, SessionError::Store(_)));
    assert_eq!(remote.write_count(), 0);
    assert_eq!(remote.contents(), before);
}

#[tokio::test]
async fn clear_leaves_stores_clean_and_storage_empty() {
    let (storage, local) = local_service();
    let session = MenuSession::with_storage(MenuConfig::default(), storage).await;
    session.menu().set_template(MenuTemplate::Square);
    session.confirm_all().await.unwrap();

    session.clear().await.unwrap();

    assert!(!session.has_unsaved_changes());
    assert_eq!(session.menu().current().selected_template, MenuTemplate::Square);
    assert!(session.confirm_all().await.unwrap().is_empty());
    assert!(local.contents().is_none());

    session.menu().set_navbar_style(NavbarStyle::IconOnly);
    session.confirm_all().await.unwrap();
    let stored = MenuPayload::from_json(&local.contents().unwrap()).unwrap();
    assert_eq!(stored.menu.selected_template, MenuTemplate::Square);
}

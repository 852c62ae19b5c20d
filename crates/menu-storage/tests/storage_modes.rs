use menu_model::{Category, CategoryId, MenuPayload, NavbarStyle};
use menu_storage::{
    FileMedium, MediumKind, MemoryMedium, StorageConfig, StorageError, StorageMode,
    StorageService,
};
use pretty_assertions::assert_eq;

fn payload(style: NavbarStyle) -> MenuPayload {
    let mut payload = MenuPayload::default();
    payload.menu.categories = vec![
        Category::new("desserts", "Desserts"),
        Category::new("drinks", "Drinks"),
    ];
    payload.menu.navbar_style = style;
    payload
}

fn hybrid() -> (StorageService, MemoryMedium, MemoryMedium) {
    let remote = MemoryMedium::new(MediumKind::Remote);
    let local = MemoryMedium::new(MediumKind::Local);
    let service = StorageService::hybrid(remote.clone(), local.clone());
    (service, remote, local)
}

#[tokio::test]
async fn hybrid_save_writes_remote_and_backs_up_locally() {
    let (service, remote, local) = hybrid();

    let receipt = service.save(&payload(NavbarStyle::IconOnly)).await.unwrap();

    assert_eq!(receipt.medium, MediumKind::Remote);
    assert!(!receipt.is_partial());
    assert_eq!(remote.contents(), local.contents());
}

#[tokio::test]
async fn hybrid_save_falls_back_when_remote_down() {
    let (service, remote, local) = hybrid();
    remote.set_online(false);

    let receipt = service.save(&payload(NavbarStyle::TextOnly)).await.unwrap();

    assert_eq!(receipt.medium, MediumKind::Local);
    assert!(receipt.is_partial());
    assert_eq!(receipt.degraded[0].medium, MediumKind::Remote);
    assert!(remote.contents().is_none());
    assert_eq!(local.write_count(), 1);
}

#[tokio::test]
async fn hybrid_save_reports_backup_failure() {
    let (service, _remote, local) = hybrid();
    local.set_reject_writes(true);

    let receipt = service.save(&payload(NavbarStyle::TextOnly)).await.unwrap();

    assert_eq!(receipt.medium, MediumKind::Remote);
    assert_eq!(receipt.degraded.len(), 1);
    assert_eq!(receipt.degraded[0].medium, MediumKind::Local);
}

#[tokio::test]
async fn hybrid_save_fails_when_both_down() {
    let (service, remote, local) = hybrid();
    remote.set_online(false);
    local.set_online(false);

    let err = service.save(&payload(NavbarStyle::TextOnly)).await.unwrap_err();
    match err {
        StorageError::AllMediaFailed(failures) => assert_eq!(failures.len(), 2),
        other => panic!("unexpected error: {other}"),
    }
    assert!(service.last_payload().is_none());
}

#[tokio::test]
async fn hybrid_load_falls_back_to_local_copy() {
    let (service, remote, _local) = hybrid();
    service.save(&payload(NavbarStyle::IconOnly)).await.unwrap();
    remote.set_online(false);

    let fresh = service.load().await.unwrap();
    assert_eq!(fresh.menu.navbar_style, NavbarStyle::IconOnly);
}

#[tokio::test]
async fn hybrid_clear_surfaces_partial_failure() {
    let (service, remote, local) = hybrid();
    service.save(&payload(NavbarStyle::IconOnly)).await.unwrap();
    remote.set_reject_writes(true);

    let receipt = service.clear().await.unwrap();

    assert!(receipt.is_partial());
    assert_eq!(receipt.degraded[0].medium, MediumKind::Remote);
    assert!(local.contents().is_none());
    assert!(remote.contents().is_some());
}

#[tokio::test]
async fn import_invalid_text_leaves_storage_untouched() {
    let medium = MemoryMedium::new(MediumKind::Local);
    let service = StorageService::local(medium.clone());
    service.save(&payload(NavbarStyle::IconOnly)).await.unwrap();
    let before = medium.contents();

    let err = service
        .import_snapshot(r#"{"categories": [], "navbarStyle": "text-only"}"#)
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::Validation(_)));
    assert!(err.to_string().contains("menuItems"));
    assert_eq!(medium.contents(), before);
    assert_eq!(medium.write_count(), 1);
}

#[tokio::test]
async fn export_then_import_reproduces_payload() {
    let service = StorageService::local(MemoryMedium::new(MediumKind::Local));
    let mut original = payload(NavbarStyle::IconWithText);
    original
        .menu
        .category_discounts
        .insert(CategoryId::new("drinks"), menu_model::DiscountConfig::active(15));
    service.save(&original).await.unwrap();

    let exported = service.export_snapshot().unwrap();
    let target = StorageService::local(MemoryMedium::new(MediumKind::Local));
    target.import_snapshot(&exported).await.unwrap();
    let imported = target.load().await.unwrap();

    let expected = MenuPayload::from_json(&exported).unwrap();
    assert_eq!(imported.menu, expected.menu);
    assert_eq!(imported.theme, expected.theme);
}

#[tokio::test]
async fn file_medium_service_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let config = StorageConfig::new().with_data_dir(dir.path());

    let first = StorageService::from_config(&config).unwrap();
    assert_eq!(first.mode(), StorageMode::LocalOnly);
    first.save(&payload(NavbarStyle::TextOnly)).await.unwrap();

    let second = StorageService::local(FileMedium::in_dir(dir.path(), "menu.json"));
    let loaded = second.load().await.unwrap();
    assert_eq!(loaded.menu.navbar_style, NavbarStyle::TextOnly);
    assert!(loaded.last_saved.is_some());
}

#[test]
fn remote_mode_requires_url() {
    let config = StorageConfig::new().with_mode(StorageMode::RemoteOnly);
    let err = StorageService::from_config(&config).unwrap_err();
    assert!(matches!(
        err,
        StorageError::Unavailable {
            medium: MediumKind::Remote,
            ..
        }
    ));
}

mod common;

use common::{HELPER, OWNER, STRANGER, fixture, new_project, plugin_zip, png};
use pmgr_catalog::CatalogError;
use pmgr_kernel::domain::project::{ProjectKey, ProjectKind};

async fn with_plugin() -> (common::Fixture, ProjectKey) {
    let fx = fixture().await;
    fx.catalog
        .create_project(ProjectKind::Plugin, None, new_project("GunGame", "1.0"), plugin_zip("gungame"), OWNER)
        .await
        .expect("created");
    (fx, ProjectKey::plugin("gungame"))
}

#[tokio::test]
async fn logo_is_stored_under_the_project() {
    let (fx, key) = with_plugin().await;
    let project = fx.catalog.set_logo(&key, png(64, 64), OWNER).await.expect("logo");

    assert_eq!(project.logo.as_deref(), Some("logos/plugins/gungame.png"));
    assert!(fx.media_file("logos/plugins/gungame.png").is_file());
}

#[tokio::test]
async fn oversized_or_broken_logos_are_rejected() {
    let (fx, key) = with_plugin().await;

    let err = fx.catalog.set_logo(&key, png(201, 10), OWNER).await.expect_err("too wide");
    assert_eq!(
        err.violation().map(|v| v.message.to_string()).as_deref(),
        Some("Logo width must be no more than 200.")
    );

    let err = fx.catalog.set_logo(&key, b"GIF89a".to_vec(), OWNER).await.expect_err("not an image");
    assert_eq!(err.violation().map(|v| v.field), Some("logo"));

    let err = fx.catalog.set_logo(&key, png(8, 8), STRANGER).await.expect_err("not an editor");
    assert!(matches!(err, CatalogError::Forbidden { .. }));
}

#[tokio::test]
async fn images_are_numbered_and_removable() {
    let (fx, key) = with_plugin().await;
    let catalog = &fx.catalog;
    catalog.add_contributor(&key, "helper", OWNER).expect("contributor");

    let first = catalog.add_image(&key, png(32, 32), OWNER).await.expect("first");
    let second = catalog.add_image(&key, png(32, 32), HELPER).await.expect("second");
    assert_eq!(first.file, "images/plugins/gungame/0001.png");
    assert_eq!(second.file, "images/plugins/gungame/0002.png");

    catalog.remove_image(&key, &first.id, OWNER).await.expect("removed");
    assert!(!fx.media_file(&first.file).exists());
    let third = catalog.add_image(&key, png(32, 32), OWNER).await.expect("third");
    assert_eq!(third.file, "images/plugins/gungame/0003.png");

    let err = catalog.remove_image(&key, "missing", OWNER).await.expect_err("unknown");
    assert!(matches!(err, CatalogError::NotFound { .. }));
}

#[tokio::test]
async fn image_limit_is_enforced() {
    let (fx, key) = with_plugin().await;
    for _ in 0..10 {
        fx.catalog.add_image(&key, png(16, 16), OWNER).await.expect("image");
    }
    let err = fx.catalog.add_image(&key, png(16, 16), OWNER).await.expect_err("limit");
    assert_eq!(
        err.violation().map(|v| v.message.to_string()).as_deref(),
        Some("Maximum number of images (10) reached.")
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_images_get_their_own_files() {
    let (fx, key) = with_plugin().await;

    let (a, b) = tokio::join!(
        fx.catalog.add_image(&key, png(32, 32), OWNER),
        fx.catalog.add_image(&key, png(48, 48), OWNER),
    );
    let (a, b) = (a.expect("first image"), b.expect("second image"));
    assert_ne!(a.file, b.file);
    assert!(fx.media_file(&a.file).is_file());
    assert!(fx.media_file(&b.file).is_file());

    fx.catalog.remove_image(&key, &a.id, OWNER).await.expect("removed");
    assert!(!fx.media_file(&a.file).exists());
    assert!(fx.media_file(&b.file).is_file());

    let next = fx.catalog.add_image(&key, png(16, 16), OWNER).await.expect("third image");
    assert_ne!(next.file, b.file);
}

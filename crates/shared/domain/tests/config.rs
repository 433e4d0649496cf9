use pmgr_domain::config::{ApiConfig, ArchiveConfig, CatalogConfig, LogConfig, ServerConfig};
use serde_json::json;

#[test]
fn defaults_match_documented_values() {
    assert_eq!(ServerConfig::default().port, 4583);
    assert_eq!(ArchiveConfig::default().max_upload_bytes, 16 * 1024 * 1024);
    assert_eq!(CatalogConfig::default().page_size, 20);

    let log = LogConfig::default();
    assert_eq!(log.level, "info");
    assert_eq!(log.rotation, "daily");
    assert!(log.dir.is_none());

    let cfg = ApiConfig::default();
    assert_eq!(cfg.storage.media_dir, std::path::PathBuf::from("media"));
    assert!(cfg.storage.create);
}

#[test]
fn partial_sections_keep_defaults() {
    let raw = json!({
        "server": { "port": 8080 },
        "log": { "level": "debug", "json": true },
        "catalog": {
            "games": [
                { "name": "Counter-Strike: Source", "basename": "cstrike" },
                { "name": "Team Fortress 2", "basename": "tf", "icon": "tf.png" }
            ]
        }
    });

    let cfg: ApiConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 8080);
    assert!(cfg.server.ssl.is_none());
    assert_eq!(cfg.log.level, "debug");
    assert_eq!(cfg.log.max_files, 14);
    assert_eq!(cfg.catalog.games.len(), 2);
    assert_eq!(cfg.catalog.games[1].icon.as_deref(), Some("tf.png"));
    assert_eq!(cfg.catalog.page_size, 20);
}

#[test]
fn deref_mut_copies_on_write() {
    let original = ApiConfig::default();
    let mut changed = original.clone();
    changed.archive.max_upload_bytes = 1024;

    assert_eq!(changed.archive.max_upload_bytes, 1024);
    assert_eq!(original.archive.max_upload_bytes, 16 * 1024 * 1024);
}

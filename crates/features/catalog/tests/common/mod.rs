#![allow(dead_code, unused_imports, unused_macros)]

use pmgr_catalog::{Catalog, NewPath, NewProject};
use pmgr_kernel::domain::config::{ApiConfig, GameSeed};
use pmgr_storage::MediaStore;
use std::io::{Cursor, Write};
use std::path::PathBuf;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const OWNER: u64 = 100;
pub const HELPER: u64 = 200;
pub const STRANGER: u64 = 300;

macro_rules! plugins {
    ($path:literal) => {
        concat!("addons/source-python/plugins/", $path)
    };
}

macro_rules! packages {
    ($path:literal) => {
        concat!("addons/source-python/packages/custom/", $path)
    };
}

pub(crate) use {packages, plugins};

pub struct Fixture {
    pub catalog: Catalog,
    pub config: ApiConfig,
    dir: TempDir,
}

impl Fixture {
    pub fn media_file(&self, path: &str) -> PathBuf {
        self.dir.path().join("media").join(path)
    }
}

pub fn config() -> ApiConfig {
    let mut config = ApiConfig::default();
    config.catalog.games = vec![
        GameSeed { name: "Counter-Strike: Source".into(), basename: "cstrike".into(), icon: None },
        GameSeed { name: "Team Fortress 2".into(), basename: "tf".into(), icon: None },
    ];
    config.catalog.page_size = 2;
    config.archive.max_upload_bytes = 1024 * 1024;
    config
}

pub async fn media(dir: &TempDir) -> MediaStore {
    MediaStore::builder().root(dir.path().join("media")).connect().await.expect("media store")
}

/// A catalog with three registered users and no projects.
pub async fn fixture() -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config();
    let catalog = Catalog::open(&config, media(&dir).await);
    catalog.register_user(OWNER, "satoshi").expect("owner");
    catalog.register_user(HELPER, "helper").expect("helper");
    catalog.register_user(STRANGER, "stranger").expect("stranger");
    Fixture { catalog, config, dir }
}

pub fn archive(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, body) in entries {
        writer.start_file(*name, options).expect("start");
        writer.write_all(body.as_bytes()).expect("write");
    }
    writer.finish().expect("finish").into_inner()
}

pub fn plugin_zip(basename: &str) -> Vec<u8> {
    let root = format!("addons/source-python/plugins/{basename}");
    archive(&[(&format!("{root}/{basename}.py"), "# entry"), (&format!("{root}/core.py"), "")])
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image::RgbImage::new(width, height)
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}

pub fn new_project(name: &str, version: &str) -> NewProject {
    NewProject { name: name.to_owned(), version: version.to_owned(), ..NewProject::default() }
}

pub fn modes_path() -> NewPath {
    NewPath {
        path: "modes".to_owned(),
        allow_module: true,
        allow_package_using_basename: true,
        allow_package_using_init: false,
    }
}

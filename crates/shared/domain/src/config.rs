use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Sections of the service configuration. Every section falls back to its defaults.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfigInner {
    pub server: ServerConfig,
    pub log: LogConfig,
    pub storage: StorageConfig,
    pub archive: ArchiveConfig,
    pub catalog: CatalogConfig,
}

/// Arc-wrapped configuration; clones are cheap and mutation copies on write.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(flatten, default)]
    inner: Arc<ApiConfigInner>,
}

impl Deref for ApiConfig {
    type Target = ApiConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ApiConfig {
    fn deref_mut(&mut self) -> &mut ApiConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
    pub ssl: Option<SslConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SslConfig {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Logger settings; `dir` enables rolling files next to the console output.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub filter: Option<String>,
    pub dir: Option<PathBuf>,
    pub rotation: String,
    pub max_files: usize,
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub media_dir: PathBuf,
    pub create: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub games: Vec<GameSeed>,
    pub forum_url: String,
    pub pypi_url: String,
    pub page_size: usize,
}

/// A supported game registered at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameSeed {
    pub name: String,
    pub basename: String,
    #[serde(default)]
    pub icon: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 4583, ssl: None }
    }
}

impl Default for SslConfig {
    fn default() -> Self {
        Self { cert: PathBuf::from("cert.pem"), key: PathBuf::from("key.pem") }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            filter: None,
            dir: None,
            rotation: "daily".to_owned(),
            max_files: 14,
            json: false,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { media_dir: PathBuf::from("media"), create: true }
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self { max_upload_bytes: 16 * 1024 * 1024 }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            games: Vec::new(),
            forum_url: "https://forums.sourcepython.com/".to_owned(),
            pypi_url: "https://pypi.org/project".to_owned(),
            page_size: 20,
        }
    }
}

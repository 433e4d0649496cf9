//! # Project Manager Server
//!
//! Serves the plugin, package and sub-plugin catalog over `Axum`, with uploads and media
//! kept in a local media store.
//!
//! ## Example
//! ```no_run
//! use pmgr_server::Server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Server::builder()
//!         .port(4583)
//!         .media_dir("/var/lib/pmgr/media")
//!         .build()
//!         .await?
//!         .run()
//!         .await
//! }
//! ```

mod router;

pub use router::API_PREFIX;

use anyhow::{Context, Result, anyhow, bail};
use axum::Router;
use axum_server::Handle;
use axum_server::tls_rustls::RustlsConfig;
use pmgr::domain::config::{ApiConfig, SslConfig};
use pmgr::kernel::server::ApiState;
use pmgr::storage::MediaStore;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// A fluent builder for configuring and initializing the [`Server`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ServerBuilder {
    cfg: ApiConfig,
}

impl ServerBuilder {
    pub fn config(mut self, cfg: ApiConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.cfg.server.port = port;
        self
    }

    /// Overrides `storage.media_dir`.
    pub fn media_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cfg.storage.media_dir = dir.into();
        self
    }

    /// Consumes the builder: checks TLS files, opens the media store and registers every
    /// feature slice in the router state.
    ///
    /// # Errors
    /// Returns an error if:
    /// * The configured certificate or key is missing
    /// * The media directory cannot be created or opened
    /// * A feature slice fails to initialize (for instance a malformed game seed)
    pub async fn build(self) -> Result<Server> {
        if let Some(ssl) = &self.cfg.server.ssl {
            check_tls_files(ssl)?;
        }

        let storage = &self.cfg.storage;
        let media = MediaStore::builder()
            .root(&storage.media_dir)
            .create(storage.create)
            .connect()
            .await
            .with_context(|| format!("Failed to open media store at {}", storage.media_dir.display()))?;
        info!(root = %media.root().display(), "Media store ready");

        let slices =
            pmgr::init(&self.cfg, &media).map_err(|e| anyhow!("Feature bootstrap failed: {e}"))?;

        let state = ApiState::builder()
            .config(self.cfg)
            .media(media)
            .register_slices(slices)
            .build()
            .context("Failed to assemble the router state")?;
        info!(slices = ?state.slice_names().collect::<Vec<_>>(), "Feature slices registered");

        Ok(Server { state })
    }
}

fn check_tls_files(ssl: &SslConfig) -> Result<()> {
    for (what, path) in [("certificate", &ssl.cert), ("key", &ssl.key)] {
        if !path.is_file() {
            bail!("TLS {what} not found at {}", path.display());
        }
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if ssl.key.metadata()?.permissions().mode() & 0o077 != 0 {
            tracing::warn!(key = %ssl.key.display(), "TLS key is readable by group or others");
        }
    }
    Ok(())
}

/// A fully initialized server instance ready to run.
#[must_use = "call .run().await to start the server"]
#[derive(Debug)]
pub struct Server {
    state: ApiState,
}

impl Server {
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// The application router, for embedding or in-process tests.
    pub fn router(&self) -> Router {
        router::init(self.state.clone())
    }

    #[must_use]
    pub fn address(&self) -> SocketAddr {
        let server = &self.state.config.server;
        SocketAddr::new(server.address, server.port)
    }

    /// Serves until Ctrl+C or SIGTERM, then drains connections for up to 30 seconds.
    ///
    /// # Errors
    /// Returns an error if binding fails or the TLS material cannot be loaded.
    pub async fn run(self) -> Result<()> {
        let address = self.address();
        let service = self.router().into_make_service();

        let handle = Handle::<SocketAddr>::new();
        tokio::spawn(drain_on_signal(handle.clone()));

        match &self.state.config.server.ssl {
            Some(ssl) => {
                let tls = RustlsConfig::from_pem_file(&ssl.cert, &ssl.key)
                    .await
                    .context("Failed to load TLS certificate and key")?;
                info!(%address, "Listening on https://{address}");
                axum_server::bind_rustls(address, tls)
                    .handle(handle)
                    .serve(service)
                    .await
                    .context("HTTPS server failed")?;
            },
            None => {
                info!(%address, "Listening on http://{address}");
                axum_server::bind(address)
                    .handle(handle)
                    .serve(service)
                    .await
                    .context("HTTP server failed")?;
            },
        }

        info!("Server stopped");
        Ok(())
    }

    #[must_use]
    pub const fn state(&self) -> &ApiState {
        &self.state
    }
}

async fn drain_on_signal(handle: Handle<SocketAddr>) {
    match shutdown_signal().await {
        Ok(()) => {
            info!(grace = ?SHUTDOWN_GRACE, "Shutdown requested, draining connections");
            handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        },
        Err(e) => error!("Cannot listen for shutdown signals: {e:#}"),
    }
}

/// Waits for Ctrl+C or, on unix, SIGTERM.
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<_, anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => res,
        res = terminate => res,
    }
}

//! # Runtime
//!
//! Tokio runtime presets shared by the plugin manager binaries.
//!
//! Archive inspection and image probing run on the blocking pool, so every preset sizes
//! both the async workers and the blocking threads.
//!
//! ```rust,ignore
//! #[pmgr_runtime::main(high_performance)]
//! async fn main() -> anyhow::Result<()> {
//!     Ok(())
//! }
//! ```

pub use anyhow::Result;
pub use pmgr_derive::main;

use anyhow::Context;
use std::{num::NonZero, sync::OnceLock, thread::available_parallelism, time::Duration};
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

/// Environment override for the worker count.
pub const WORKER_THREADS_ENV: &str = "PMGR_WORKER_THREADS";

const FALLBACK_WORKERS: usize = 4;
const MAX_WORKERS: usize = 1024;
const MIN_STACK: usize = 1024 * 1024;
const MAX_STACK: usize = 16 * 1024 * 1024;
const MAX_BLOCKING: usize = 512;
const DEFAULT_THREAD_NAME: &str = "pmgr-worker";

static DETECTED_WORKERS: OnceLock<usize> = OnceLock::new();

fn detected_workers() -> usize {
    *DETECTED_WORKERS.get_or_init(|| {
        std::env::var(WORKER_THREADS_ENV)
            .ok()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|n| (1..=MAX_WORKERS).contains(n))
            .unwrap_or_else(|| {
                available_parallelism().map(NonZero::get).unwrap_or(FALLBACK_WORKERS)
            })
    })
}

/// Tokio runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub worker_threads: usize,
    pub max_blocking_threads: usize,
    pub stack_size: usize,
    pub thread_name: String,
    pub thread_keep_alive: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        let workers = detected_workers();
        Self {
            worker_threads: workers,
            max_blocking_threads: (workers * 8).min(MAX_BLOCKING),
            stack_size: 3 * 1024 * 1024,
            thread_name: DEFAULT_THREAD_NAME.to_owned(),
            thread_keep_alive: Duration::from_secs(60),
        }
    }
}

impl RuntimeConfig {
    /// Preset for the HTTP server: every core, a deep blocking pool for zip inspection.
    #[must_use]
    pub fn high_performance() -> Self {
        let workers = detected_workers();
        Self {
            worker_threads: workers,
            max_blocking_threads: (workers * 16).min(MAX_BLOCKING),
            stack_size: 4 * 1024 * 1024,
            thread_name: "pmgr-hp".to_owned(),
            thread_keep_alive: Duration::from_secs(300),
        }
    }

    /// Preset for command line tools and tests.
    #[must_use]
    pub fn memory_efficient() -> Self {
        let workers = (detected_workers() / 2).max(1);
        Self {
            worker_threads: workers,
            max_blocking_threads: (workers * 4).min(MAX_BLOCKING),
            stack_size: 2 * 1024 * 1024,
            thread_name: "pmgr-lite".to_owned(),
            thread_keep_alive: Duration::from_secs(30),
        }
    }

    #[must_use]
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads.clamp(1, MAX_WORKERS);
        self
    }

    #[must_use]
    pub fn with_max_blocking_threads(mut self, threads: usize) -> Self {
        self.max_blocking_threads = threads.clamp(1, MAX_BLOCKING);
        self
    }

    #[must_use]
    pub fn with_stack_size(mut self, size: usize) -> Self {
        self.stack_size = size.clamp(MIN_STACK, MAX_STACK);
        self
    }

    #[must_use]
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.trim().is_empty() {
            self.thread_name = name;
        }
        self
    }

    #[must_use]
    pub const fn with_thread_keep_alive(mut self, keep_alive: Duration) -> Self {
        self.thread_keep_alive = keep_alive;
        self
    }

    /// Clamps every field into its supported range.
    fn normalized(&self) -> Self {
        Self {
            worker_threads: self.worker_threads.clamp(1, MAX_WORKERS),
            max_blocking_threads: self.max_blocking_threads.clamp(1, MAX_BLOCKING),
            stack_size: self.stack_size.clamp(MIN_STACK, MAX_STACK),
            thread_name: if self.thread_name.trim().is_empty() {
                DEFAULT_THREAD_NAME.to_owned()
            } else {
                self.thread_name.clone()
            },
            thread_keep_alive: self.thread_keep_alive,
        }
    }
}

/// Builds a multi-threaded runtime with I/O and timers enabled.
///
/// # Errors
///
/// Fails when the OS refuses to spawn the worker threads.
pub fn build_runtime_with_config(config: &RuntimeConfig) -> Result<Runtime> {
    let config = config.normalized();
    debug!(?config, "Building tokio runtime");

    Builder::new_multi_thread()
        .worker_threads(config.worker_threads)
        .max_blocking_threads(config.max_blocking_threads)
        .thread_name(&config.thread_name)
        .thread_stack_size(config.stack_size)
        .thread_keep_alive(config.thread_keep_alive)
        .enable_all()
        .build()
        .context("Failed to initialize runtime")
}

/// Builds a runtime from [`RuntimeConfig::default`].
///
/// # Errors
///
/// See [`build_runtime_with_config`].
pub fn build_default_runtime() -> Result<Runtime> {
    build_runtime_with_config(&RuntimeConfig::default())
}

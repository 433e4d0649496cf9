use crate::error::{StorageError, StorageErrorExt};
use crate::maintenance;
use crate::store::{MediaStore, MediaStoreInner};
use private::Sealed;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tokio::fs;
use tracing::info;

#[derive(Debug, Default)]
pub struct NoRoot;
#[derive(Debug)]
pub struct WithRoot(PathBuf);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoRoot {}
impl Sealed for WithRoot {}

/// Configures a [`MediaStore`]; the root directory is mandatory.
#[allow(private_bounds)]
#[derive(Debug)]
pub struct MediaStoreBuilder<S: Sealed = NoRoot> {
    state: S,
    create: bool,
}

impl Default for MediaStoreBuilder<NoRoot> {
    fn default() -> Self {
        Self { state: NoRoot, create: true }
    }
}

#[allow(private_bounds)]
impl<S: Sealed> MediaStoreBuilder<S> {
    /// Create the root when it is missing (default `true`).
    #[must_use]
    pub const fn create(mut self, create: bool) -> Self {
        self.create = create;
        self
    }
}

impl MediaStoreBuilder<NoRoot> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn root(self, path: impl Into<PathBuf>) -> MediaStoreBuilder<WithRoot> {
        MediaStoreBuilder { state: WithRoot(path.into()), create: self.create }
    }
}

impl MediaStoreBuilder<WithRoot> {
    /// Opens the store: creates and canonicalizes the root, then sweeps stale part files.
    ///
    /// # Errors
    ///
    /// [`StorageError::Io`] when the root is missing (and `create` is off) or unreadable.
    pub async fn connect(self) -> Result<MediaStore, StorageError> {
        let root = self.state.0;

        if self.create {
            fs::create_dir_all(&root)
                .await
                .context(format!("Creating media root {}", root.display()))?;
        }

        let root = fs::canonicalize(&root)
            .await
            .context(format!("Resolving media root {}", root.display()))?;
        info!(root = %root.display(), "Media store ready");

        maintenance::purge_parts(&root).await;

        Ok(MediaStore { inner: Arc::new(MediaStoreInner { root, part_counter: AtomicU64::new(1) }) })
    }
}

use crate::builder::MediaStoreBuilder;
use crate::error::{StorageError, StorageErrorExt};
use crate::maintenance::PART_MARKER;
use crate::sandbox::sandboxed;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

#[derive(Debug)]
pub(crate) struct MediaStoreInner {
    pub(crate) root: PathBuf,
    pub(crate) part_counter: AtomicU64,
}

/// Cheap-to-clone handle to the media directory.
#[derive(Debug, Clone)]
pub struct MediaStore {
    pub(crate) inner: Arc<MediaStoreInner>,
}

impl MediaStore {
    #[must_use]
    pub fn builder() -> MediaStoreBuilder {
        MediaStoreBuilder::new()
    }

    /// Canonical media root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.inner.root
    }

    /// Physical location of `path` inside the root.
    ///
    /// # Errors
    ///
    /// [`StorageError::PathEscape`] when `path` leaves the root.
    pub fn resolve(&self, path: impl AsRef<Path>) -> Result<PathBuf, StorageError> {
        sandboxed(&self.inner.root, path.as_ref())
    }

    /// # Errors
    ///
    /// [`StorageError::NotFound`] for missing files, [`StorageError::Io`] otherwise.
    pub async fn read(&self, path: impl AsRef<Path>) -> Result<Vec<u8>, StorageError> {
        let target = self.resolve(path)?;
        match fs::read(&target).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(StorageError::not_found(&target)),
            Err(source) => Err(StorageError::Io {
                source,
                context: Some(format!("Reading {}", target.display()).into()),
            }),
        }
    }

    /// Atomically replaces `path` with `bytes`, creating parent directories.
    ///
    /// # Errors
    ///
    /// [`StorageError::PathEscape`] or [`StorageError::Io`].
    pub async fn write(&self, path: impl AsRef<Path>, bytes: &[u8]) -> Result<(), StorageError> {
        let target = self.resolve(path)?;
        let parent = target.parent().ok_or_else(|| StorageError::escape(&target, "no parent"))?;
        fs::create_dir_all(parent)
            .await
            .context(format!("Creating {}", parent.display()))?;

        let part = self.part_path(&target);
        let written = async {
            let mut file = fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&part)
                .await
                .context(format!("Creating {}", part.display()))?;
            file.write_all(bytes).await.context("Writing media part file")?;
            file.sync_all().await.context("Syncing media part file")?;
            fs::rename(&part, &target)
                .await
                .context(format!("Moving {} into place", target.display()))
        }
        .await;

        if let Err(err) = written {
            if let Err(cleanup) = fs::remove_file(&part).await {
                if cleanup.kind() != ErrorKind::NotFound {
                    warn!(path = %part.display(), error = %cleanup, "Could not remove part file");
                }
            }
            return Err(err);
        }

        sync_dir(parent).await;
        debug!(path = %target.display(), bytes = bytes.len(), "Media file stored");
        Ok(())
    }

    /// # Errors
    ///
    /// [`StorageError::NotFound`] when there is nothing to delete.
    pub async fn delete(&self, path: impl AsRef<Path>) -> Result<(), StorageError> {
        let target = self.resolve(path)?;
        match fs::remove_file(&target).await {
            Ok(()) => {
                debug!(path = %target.display(), "Media file deleted");
                Ok(())
            },
            Err(err) if err.kind() == ErrorKind::NotFound => Err(StorageError::not_found(&target)),
            Err(source) => Err(StorageError::Io {
                source,
                context: Some(format!("Deleting {}", target.display()).into()),
            }),
        }
    }

    /// # Errors
    ///
    /// Only when `path` escapes the root.
    pub fn exists(&self, path: impl AsRef<Path>) -> Result<bool, StorageError> {
        Ok(self.resolve(path)?.is_file())
    }

    /// File names directly inside `dir`, sorted. A missing directory lists as empty.
    ///
    /// # Errors
    ///
    /// [`StorageError::PathEscape`] or [`StorageError::Io`].
    pub async fn list(&self, dir: impl AsRef<Path>) -> Result<Vec<String>, StorageError> {
        let dir = self.resolve(dir)?;
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    source,
                    context: Some(format!("Listing {}", dir.display()).into()),
                });
            },
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.context("Reading directory entry")? {
            let is_file = entry.file_type().await.is_ok_and(|kind| kind.is_file());
            if let (true, Some(name)) = (is_file, entry.file_name().to_str()) {
                if !name.contains(PART_MARKER) {
                    names.push(name.to_owned());
                }
            }
        }
        names.sort_unstable();
        Ok(names)
    }

    fn part_path(&self, target: &Path) -> PathBuf {
        let n = self.inner.part_counter.fetch_add(1, Ordering::Relaxed);
        let name = target.file_name().and_then(|name| name.to_str()).unwrap_or("media");
        target.with_file_name(format!("{name}{PART_MARKER}{n}"))
    }
}

async fn sync_dir(dir: &Path) {
    let synced = match fs::File::open(dir).await {
        Ok(handle) => handle.sync_all().await,
        Err(err) => Err(err),
    };
    if let Err(err) = synced {
        debug!(path = %dir.display(), error = %err, "Directory sync skipped");
    }
}

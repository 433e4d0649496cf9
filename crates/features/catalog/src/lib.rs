//! Catalog feature slice.
//!
//! Keeps projects with their releases, people, tags, games, sub-plugin paths and
//! requirement records in memory. Uploaded archives go through [`pmgr_archive`] and are
//! stored in the media store; the lock is never held across an `.await`.

mod error;
mod games;
mod media;
mod model;
mod paths;
mod people;
mod projects;
mod query;
mod releases;
mod requirements;
mod store;
mod tags;
#[cfg(feature = "server")]
pub mod api;

pub use error::{CatalogError, CatalogErrorExt};
pub use model::{
    DownloadLink, ForumUser, Game, Project, ProjectImage, ProjectRequirements, PyPiProject,
    Release, RequirementLink, SubPluginPath, Tag, VcsType, VersionControlRequirement,
};
pub use paths::NewPath;
pub use people::UserProjects;
pub use projects::{NewProject, ProjectUpdate};
pub use query::{ListQuery, OrderBy, Page, SortOrder};
pub use releases::{NewRelease, release_file};
pub use requirements::RequirementEntry;

use pmgr_archive::ArchiveInspector;
use pmgr_kernel::domain::config::{ApiConfig, CatalogConfig};
use pmgr_kernel::validation::slugify;
use pmgr_storage::MediaStore;
use store::CatalogStore;

/// Catalog feature state.
#[pmgr_derive::pmgr_slice]
pub struct Catalog {
    store: CatalogStore,
    media: MediaStore,
    inspector: ArchiveInspector,
    settings: CatalogConfig,
}

impl Catalog {
    /// Builds an empty catalog with the configured games.
    #[must_use]
    pub fn open(config: &ApiConfig, media: MediaStore) -> Self {
        let store = CatalogStore::default();
        {
            let mut state = store.write();
            for seed in &config.catalog.games {
                let game = Game {
                    name: seed.name.clone(),
                    basename: seed.basename.clone(),
                    slug: slugify(&seed.basename),
                    icon: seed.icon.clone(),
                };
                state.games.insert(game.slug.clone(), game);
            }
        }

        Self::new(CatalogInner {
            store,
            media,
            inspector: ArchiveInspector::from_config(&config.archive),
            settings: config.catalog.clone(),
        })
    }
}

impl CatalogInner {
    #[must_use]
    pub const fn inspector(&self) -> &ArchiveInspector {
        &self.inspector
    }

    #[must_use]
    pub const fn settings(&self) -> &CatalogConfig {
        &self.settings
    }
}

/// Initialize the catalog feature.
///
/// # Errors
/// Returns an error if the catalog cannot be created.
#[cfg(feature = "server")]
pub fn init(
    config: &ApiConfig,
    media: MediaStore,
) -> Result<pmgr_kernel::domain::registry::InitializedSlice, CatalogError> {
    let catalog = Catalog::open(config, media);
    tracing::info!(games = config.catalog.games.len(), "Catalog slice initialized");
    Ok(pmgr_kernel::domain::registry::InitializedSlice::new(catalog))
}

/// Runs CPU-bound work (zip parsing, image decoding) off the async workers.
pub(crate) async fn blocking<T, F>(work: F) -> Result<T, CatalogError>
where
    F: FnOnce() -> Result<T, CatalogError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| CatalogError::from(format!("Blocking task failed: {err}")))?
}

/// Drops a file written ahead of a state change that did not go through.
pub(crate) async fn discard(media: &MediaStore, path: &str) {
    if let Err(err) = media.delete(path).await {
        tracing::warn!(%path, error = %err, "Could not discard orphaned media file");
    }
}

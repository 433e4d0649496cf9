use crate::error::CatalogError;
use crate::model::{
    DownloadLink, ForumUser, Game, Project, PyPiProject, Tag, VersionControlRequirement,
};
use fxhash::{FxHashMap, FxHashSet};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use pmgr_kernel::domain::project::{ProjectKey, ProjectKind};

/// Everything the catalog knows, guarded by one lock.
#[derive(Debug, Default)]
pub(crate) struct CatalogState {
    pub(crate) projects: FxHashMap<ProjectKey, Project>,
    pub(crate) users: FxHashMap<u64, ForumUser>,
    pub(crate) tags: FxHashMap<String, Tag>,
    /// Keyed by slug.
    pub(crate) games: FxHashMap<String, Game>,
    /// Keyed by slug.
    pub(crate) pypi: FxHashMap<String, PyPiProject>,
    /// Keyed by url.
    pub(crate) downloads: FxHashMap<String, DownloadLink>,
    /// Keyed by url.
    pub(crate) vcs: FxHashMap<String, VersionControlRequirement>,
    /// Keys of projects whose first archive is still being written.
    pub(crate) creating: FxHashSet<ProjectKey>,
    /// Media paths claimed by uploads that have not been recorded yet.
    pub(crate) pending: FxHashSet<String>,
}

impl CatalogState {
    pub(crate) fn project(&self, key: &ProjectKey) -> Result<&Project, CatalogError> {
        self.projects.get(key).ok_or_else(|| missing(key))
    }

    pub(crate) fn project_mut(&mut self, key: &ProjectKey) -> Result<&mut Project, CatalogError> {
        self.projects.get_mut(key).ok_or_else(|| missing(key))
    }

    pub(crate) fn user(&self, forum_id: u64) -> Result<&ForumUser, CatalogError> {
        self.users.get(&forum_id).ok_or_else(|| {
            CatalogError::forbidden(format!("Forum user {forum_id} is not registered."))
        })
    }

    pub(crate) fn user_by_name(&self, username: &str) -> Option<&ForumUser> {
        self.users.values().find(|user| user.username == username)
    }

    /// Projects of `kind` that share a namespace with `plugin` (sub-plugins of the same parent).
    pub(crate) fn siblings<'a>(
        &'a self,
        kind: ProjectKind,
        plugin: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Project> + 'a {
        self.projects
            .values()
            .filter(move |project| project.key.kind == kind && project.key.plugin.as_deref() == plugin)
    }

    /// A package addressed by slug or by basename.
    pub(crate) fn package(&self, name: &str) -> Option<&Project> {
        self.projects.get(&ProjectKey::package(name)).or_else(|| {
            self.siblings(ProjectKind::Package, None).find(|project| project.basename == name)
        })
    }
}

#[derive(Debug, Default)]
pub(crate) struct CatalogStore {
    state: RwLock<CatalogState>,
}

impl CatalogStore {
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, CatalogState> {
        self.state.read()
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, CatalogState> {
        self.state.write()
    }
}

fn missing(key: &ProjectKey) -> CatalogError {
    match &key.plugin {
        Some(plugin) => CatalogError::not_found(format!(
            "No {} \"{}\" found for plugin \"{plugin}\".",
            key.kind, key.slug
        )),
        None => CatalogError::not_found(format!("No {} \"{}\" found.", key.kind, key.slug)),
    }
}

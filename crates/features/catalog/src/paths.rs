use crate::CatalogInner;
use crate::error::{CatalogError, invalid};
use crate::model::SubPluginPath;
use crate::projects::ensure_editor;
use chrono::Utc;
use pmgr_kernel::domain::constants::{SUB_PLUGIN_PATH_MAX_LENGTH, fields};
use pmgr_kernel::domain::layout::PathLayout;
use pmgr_kernel::domain::project::ProjectKey;
use pmgr_kernel::safe_nanoid;
use pmgr_kernel::validation::{
    check_length, check_required, is_valid_sub_plugin_path, normalize_sub_plugin_path,
};
use tracing::info;

/// A sub-plugin path as submitted by a plugin editor.
#[derive(Debug, Clone, Default)]
pub struct NewPath {
    pub path: String,
    pub allow_module: bool,
    pub allow_package_using_basename: bool,
    pub allow_package_using_init: bool,
}

impl NewPath {
    fn validate(&self) -> Result<(String, PathLayout), CatalogError> {
        let path = normalize_sub_plugin_path(&self.path);
        check_required(fields::PATH, &path)?;
        check_length(fields::PATH, &path, SUB_PLUGIN_PATH_MAX_LENGTH)?;
        if !is_valid_sub_plugin_path(&path) {
            return Err(invalid(fields::PATH, format!("Invalid path \"{path}\".")));
        }

        let layout = PathLayout::from_flags(
            self.allow_module,
            self.allow_package_using_basename,
            self.allow_package_using_init,
        );
        if layout.is_empty() {
            return Err(invalid(fields::PATH, "At least one path type must be selected."));
        }
        Ok((path, layout))
    }
}

impl CatalogInner {
    /// # Errors
    ///
    /// [`CatalogError::NotFound`] for unknown plugins.
    pub fn paths(&self, plugin: &str) -> Result<Vec<SubPluginPath>, CatalogError> {
        Ok(self.store.read().project(&ProjectKey::plugin(plugin))?.paths.clone())
    }

    /// # Errors
    ///
    /// Rejects malformed and duplicate paths, paths without any layout and non-editors.
    pub fn add_path(
        &self,
        plugin: &str,
        new: &NewPath,
        actor: u64,
    ) -> Result<SubPluginPath, CatalogError> {
        let (path, layout) = new.validate()?;
        let mut state = self.store.write();
        let project = state.project_mut(&ProjectKey::plugin(plugin))?;
        ensure_editor(project, actor)?;
        if project.paths.iter().any(|existing| existing.path == path) {
            return Err(invalid(fields::PATH, format!("Path \"{path}\" already exists for plugin.")));
        }

        let added = SubPluginPath { id: safe_nanoid!(), path, layout, created: Utc::now() };
        project.paths.push(added.clone());
        project.modified = added.created;
        info!(%plugin, path = %added.path, "Sub-plugin path added");
        Ok(added)
    }

    /// # Errors
    ///
    /// As [`Self::add_path`], plus [`CatalogError::NotFound`] for unknown ids.
    pub fn update_path(
        &self,
        plugin: &str,
        id: &str,
        new: &NewPath,
        actor: u64,
    ) -> Result<SubPluginPath, CatalogError> {
        let (path, layout) = new.validate()?;
        let mut state = self.store.write();
        let project = state.project_mut(&ProjectKey::plugin(plugin))?;
        ensure_editor(project, actor)?;
        if project.paths.iter().any(|existing| existing.path == path && existing.id != id) {
            return Err(invalid(fields::PATH, format!("Path \"{path}\" already exists for plugin.")));
        }

        let entry = project
            .paths
            .iter_mut()
            .find(|existing| existing.id == id)
            .ok_or_else(|| CatalogError::not_found(format!("No path \"{id}\" found.")))?;
        entry.path = path;
        entry.layout = layout;
        let updated = entry.clone();
        project.modified = Utc::now();
        Ok(updated)
    }

    /// # Errors
    ///
    /// [`CatalogError::NotFound`] for unknown ids.
    pub fn remove_path(&self, plugin: &str, id: &str, actor: u64) -> Result<(), CatalogError> {
        let mut state = self.store.write();
        let project = state.project_mut(&ProjectKey::plugin(plugin))?;
        ensure_editor(project, actor)?;

        let before = project.paths.len();
        project.paths.retain(|existing| existing.id != id);
        if project.paths.len() == before {
            return Err(CatalogError::not_found(format!("No path \"{id}\" found.")));
        }
        project.modified = Utc::now();
        Ok(())
    }
}

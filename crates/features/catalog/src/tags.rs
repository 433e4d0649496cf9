use crate::CatalogInner;
use crate::error::{CatalogError, invalid};
use crate::model::{Project, Tag};
use crate::projects::ensure_editor;
use chrono::Utc;
use pmgr_kernel::domain::constants::{MAX_TAGS_PER_PROJECT, TAG_MAX_LENGTH, fields};
use pmgr_kernel::domain::project::ProjectKey;
use pmgr_kernel::validation::{check_length, check_required};
use tracing::info;

fn tag_name(name: &str) -> Result<String, CatalogError> {
    let name = name.trim().to_lowercase();
    check_required(fields::TAG, &name)?;
    check_length(fields::TAG, &name, TAG_MAX_LENGTH)?;
    Ok(name)
}

impl CatalogInner {
    #[must_use]
    pub fn tags(&self) -> Vec<Tag> {
        let mut tags: Vec<Tag> = self.store.read().tags.values().cloned().collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        tags
    }

    /// Links a tag, creating it on first use.
    ///
    /// # Errors
    ///
    /// Rejects black-listed tags, tags already linked and projects at the tag limit.
    pub fn add_tag(&self, key: &ProjectKey, name: &str, actor: u64) -> Result<Project, CatalogError> {
        let name = tag_name(name)?;
        let mut state = self.store.write();

        let project = state.project(key)?;
        ensure_editor(project, actor)?;
        if project.tags.contains(&name) {
            return Err(invalid(fields::TAG, format!("Tag already linked to {}.", key.kind)));
        }
        if project.tags.len() >= MAX_TAGS_PER_PROJECT {
            return Err(invalid(
                fields::TAG,
                format!("Maximum number of tags ({MAX_TAGS_PER_PROJECT}) reached."),
            ));
        }

        let tag = state.tags.entry(name.clone()).or_insert_with(|| Tag {
            name: name.clone(),
            black_listed: false,
            creator: Some(actor),
        });
        if tag.black_listed {
            return Err(invalid(fields::TAG, format!("Tag \"{name}\" is black-listed, unable to add.")));
        }

        let project = state.project_mut(key)?;
        project.tags.push(name);
        project.modified = Utc::now();
        Ok(project.clone())
    }

    /// # Errors
    ///
    /// [`CatalogError::NotFound`] when the tag is not linked.
    pub fn remove_tag(&self, key: &ProjectKey, name: &str, actor: u64) -> Result<Project, CatalogError> {
        let name = tag_name(name)?;
        let mut state = self.store.write();
        let project = state.project_mut(key)?;
        ensure_editor(project, actor)?;

        let before = project.tags.len();
        project.tags.retain(|tag| *tag != name);
        if project.tags.len() == before {
            return Err(CatalogError::not_found(format!("Tag \"{name}\" not linked to {}.", key.kind)));
        }
        project.modified = Utc::now();
        Ok(project.clone())
    }

    /// Marks a tag as black-listed and removes it from every project.
    ///
    /// # Errors
    ///
    /// Rejects malformed names and unregistered users.
    pub fn blacklist_tag(&self, name: &str, actor: u64) -> Result<Tag, CatalogError> {
        let name = tag_name(name)?;
        let mut state = self.store.write();
        state.user(actor)?;

        let tag = state
            .tags
            .entry(name.clone())
            .or_insert_with(|| Tag { name: name.clone(), black_listed: false, creator: Some(actor) });
        tag.black_listed = true;
        let tag = tag.clone();

        let mut unlinked = 0_usize;
        for project in state.projects.values_mut() {
            let before = project.tags.len();
            project.tags.retain(|linked| *linked != name);
            unlinked += before - project.tags.len();
        }
        info!(tag = %name, unlinked, "Tag black-listed");
        Ok(tag)
    }
}

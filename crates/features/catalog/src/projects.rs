use crate::error::{CatalogError, invalid};
use crate::model::{Project, Release};
use crate::query::{ListQuery, Page};
use crate::releases::{check_notes, check_version, release_file};
use crate::requirements::{check_manifest, link_manifest};
use crate::store::CatalogState;
use crate::{CatalogInner, blocking, discard};
use chrono::Utc;
use pmgr_archive::{InspectedArchive, ParentPlugin};
use pmgr_kernel::domain::constants::{
    CONFIGURATION_MAX_LENGTH, DESCRIPTION_MAX_LENGTH, NAME_MAX_LENGTH, SLUG_MAX_LENGTH,
    SYNOPSIS_MAX_LENGTH, fields,
};
use pmgr_kernel::domain::layout::SubPluginRoot;
use pmgr_kernel::domain::project::{ProjectKey, ProjectKind};
use pmgr_kernel::validation::{check_length, check_required, slugify};
use tracing::info;

/// Metadata sent along with the first archive of a project.
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub name: String,
    pub version: String,
    pub notes: String,
    pub synopsis: String,
    pub description: String,
    pub configuration: String,
    pub topic: Option<u32>,
}

/// Editable fields; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub synopsis: Option<String>,
    pub description: Option<String>,
    pub configuration: Option<String>,
    pub topic: Option<u32>,
}

fn check_text_fields(
    name: Option<&str>,
    synopsis: Option<&str>,
    description: Option<&str>,
    configuration: Option<&str>,
) -> Result<(), CatalogError> {
    if let Some(name) = name {
        check_required(fields::NAME, name)?;
        check_length(fields::NAME, name, NAME_MAX_LENGTH)?;
    }
    if let Some(synopsis) = synopsis {
        check_length("synopsis", synopsis, SYNOPSIS_MAX_LENGTH)?;
    }
    if let Some(description) = description {
        check_length("description", description, DESCRIPTION_MAX_LENGTH)?;
    }
    if let Some(configuration) = configuration {
        check_length("configuration", configuration, CONFIGURATION_MAX_LENGTH)?;
    }
    Ok(())
}

/// Basename and sub-plugin paths of the plugin a sub-plugin archive must live in.
#[derive(Debug, Clone)]
pub(crate) struct ParentSnapshot {
    pub(crate) basename: String,
    pub(crate) roots: Vec<SubPluginRoot>,
}

impl ParentSnapshot {
    pub(crate) fn of(state: &CatalogState, plugin: &str) -> Result<Self, CatalogError> {
        let parent = state.project(&ProjectKey::plugin(plugin))?;
        if parent.paths.is_empty() {
            return Err(invalid(
                fields::PLUGIN,
                format!("Plugin \"{plugin}\" has no sub-plugin paths."),
            ));
        }
        Ok(Self {
            basename: parent.basename.clone(),
            roots: parent
                .paths
                .iter()
                .map(|path| SubPluginRoot { path: path.path.clone(), layout: path.layout })
                .collect(),
        })
    }
}

impl CatalogInner {
    /// Inspects `zip` on a blocking thread.
    pub(crate) async fn inspect(
        &self,
        kind: ProjectKind,
        zip: std::sync::Arc<[u8]>,
        parent: Option<ParentSnapshot>,
    ) -> Result<InspectedArchive, CatalogError> {
        let inspector = self.inspector;
        blocking(move || {
            let parent = parent
                .as_ref()
                .map(|parent| ParentPlugin { basename: &parent.basename, roots: &parent.roots });
            Ok(inspector.inspect(kind, &zip, parent.as_ref())?)
        })
        .await
    }

    /// Dry run of an upload: what the archive would register, without touching the catalog.
    ///
    /// # Errors
    ///
    /// Rejects archives the inspector refuses and sub-plugins of unknown plugins.
    pub async fn inspect_archive(
        &self,
        kind: ProjectKind,
        plugin: Option<&str>,
        zip: Vec<u8>,
    ) -> Result<InspectedArchive, CatalogError> {
        let parent = match plugin {
            Some(plugin) if kind == ProjectKind::SubPlugin => {
                Some(ParentSnapshot::of(&self.store.read(), plugin)?)
            },
            _ => None,
        };
        self.inspect(kind, zip.into(), parent).await
    }

    /// Registers a project from its first archive and creates the first release.
    ///
    /// Sub-plugins are created below `plugin`, which must have at least one sub-plugin path.
    ///
    /// # Errors
    ///
    /// Rejects invalid metadata and archives, basenames already registered for the kind and
    /// unknown owners.
    pub async fn create_project(
        &self,
        kind: ProjectKind,
        plugin: Option<&str>,
        new: NewProject,
        zip: Vec<u8>,
        owner: u64,
    ) -> Result<Project, CatalogError> {
        check_text_fields(
            Some(&new.name),
            Some(&new.synopsis),
            Some(&new.description),
            Some(&new.configuration),
        )?;
        check_version(&new.version)?;
        check_notes(&new.notes)?;

        let plugin = match (kind, plugin) {
            (ProjectKind::SubPlugin, Some(plugin)) => Some(plugin.to_owned()),
            (ProjectKind::SubPlugin, None) => {
                return Err(invalid(fields::PLUGIN, "Sub-plugins require a parent plugin."));
            },
            _ => None,
        };

        let parent = {
            let state = self.store.read();
            state.user(owner)?;
            plugin.as_deref().map(|plugin| ParentSnapshot::of(&state, plugin)).transpose()?
        };

        let zip: std::sync::Arc<[u8]> = zip.into();
        let inspected = self.inspect(kind, zip.clone(), parent).await?;
        let slug = slugify(&inspected.basename);
        check_length("slug", &slug, SLUG_MAX_LENGTH)?;
        let key = ProjectKey { kind, plugin, slug };

        {
            let mut state = self.store.write();
            ensure_unregistered(&state, &key, &inspected.basename)?;
            check_manifest(&state, &inspected.requirements)?;
            state.creating.insert(key.clone());
        }

        let file = release_file(&key, &new.version);
        let written = self.media.write(&file, &zip).await;
        let stored = written.is_ok();

        let inserted = {
            let mut state = self.store.write();
            state.creating.remove(&key);
            written.map_err(CatalogError::from).and_then(|()| {
                let requirements = link_manifest(&mut state, &inspected.requirements)?;
                let now = Utc::now();
                let project = Project {
                    key: key.clone(),
                    name: new.name.trim().to_owned(),
                    basename: inspected.basename.clone(),
                    synopsis: new.synopsis,
                    description: new.description,
                    configuration: new.configuration,
                    logo: None,
                    owner,
                    contributors: Vec::new(),
                    tags: Vec::new(),
                    supported_games: Vec::new(),
                    topic: new.topic,
                    requirements,
                    releases: vec![Release {
                        version: new.version,
                        notes: new.notes,
                        file: file.clone(),
                        downloads: 0,
                        created: now,
                    }],
                    images: Vec::new(),
                    paths: Vec::new(),
                    created: now,
                    modified: now,
                };
                state.projects.insert(key.clone(), project.clone());
                Ok(project)
            })
        };

        match inserted {
            Ok(project) => {
                info!(project = %project.key, owner, "Project created");
                Ok(project)
            },
            Err(err) => {
                if stored {
                    discard(&self.media, &file).await;
                }
                Err(err)
            },
        }
    }

    /// # Errors
    ///
    /// [`CatalogError::NotFound`] for unknown projects.
    pub fn project(&self, key: &ProjectKey) -> Result<Project, CatalogError> {
        self.store.read().project(key).cloned()
    }

    /// # Errors
    ///
    /// Rejects invalid fields and users that are neither owner nor contributor.
    pub fn update_project(
        &self,
        key: &ProjectKey,
        update: ProjectUpdate,
        actor: u64,
    ) -> Result<Project, CatalogError> {
        check_text_fields(
            update.name.as_deref(),
            update.synopsis.as_deref(),
            update.description.as_deref(),
            update.configuration.as_deref(),
        )?;

        let mut state = self.store.write();
        let project = state.project_mut(key)?;
        ensure_editor(project, actor)?;

        if let Some(name) = update.name {
            project.name = name.trim().to_owned();
        }
        if let Some(synopsis) = update.synopsis {
            project.synopsis = synopsis;
        }
        if let Some(description) = update.description {
            project.description = description;
        }
        if let Some(configuration) = update.configuration {
            project.configuration = configuration;
        }
        if update.topic.is_some() {
            project.topic = update.topic;
        }
        project.modified = Utc::now();
        Ok(project.clone())
    }

    /// Projects of `kind`, sub-plugins only below `plugin`.
    ///
    /// # Errors
    ///
    /// [`CatalogError::NotFound`] for pages past the end or an unknown parent plugin.
    pub fn list(
        &self,
        kind: ProjectKind,
        plugin: Option<&str>,
        query: &ListQuery,
    ) -> Result<Page<Project>, CatalogError> {
        let mut projects: Vec<Project> = {
            let state = self.store.read();
            if let Some(plugin) = plugin {
                state.project(&ProjectKey::plugin(plugin))?;
            }
            state.siblings(kind, plugin).filter(|project| query.matches(project)).cloned().collect()
        };
        query.sort(&mut projects);
        query.paginate(projects, self.settings.page_size)
    }
}

fn ensure_unregistered(
    state: &CatalogState,
    key: &ProjectKey,
    basename: &str,
) -> Result<(), CatalogError> {
    let taken = state.projects.contains_key(key)
        || state.creating.contains(key)
        || state.siblings(key.kind, key.plugin.as_deref()).any(|project| project.basename == basename);
    if taken {
        return Err(CatalogError::conflict(
            fields::ZIP_FILE,
            format!("{} \"{basename}\" already registered.", key.kind.label()),
        ));
    }
    Ok(())
}

/// # Errors
///
/// [`CatalogError::Forbidden`] unless `actor` owns or contributes to the project.
pub(crate) fn ensure_editor(project: &Project, actor: u64) -> Result<(), CatalogError> {
    if project.can_edit(actor) {
        return Ok(());
    }
    Err(CatalogError::forbidden(format!(
        "Only the owner or contributors may edit this {}.",
        project.kind()
    )))
}

pub(crate) fn ensure_owner(project: &Project, actor: u64) -> Result<(), CatalogError> {
    if project.is_owner(actor) {
        return Ok(());
    }
    Err(CatalogError::forbidden(format!("Only the owner may manage this {}.", project.kind())))
}

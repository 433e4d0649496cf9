use crate::error::{CatalogError, invalid};
use crate::model::Release;
use crate::projects::{ParentSnapshot, ensure_editor};
use crate::requirements::{check_manifest, link_manifest};
use crate::store::CatalogState;
use crate::{CatalogInner, discard};
use chrono::Utc;
use pmgr_kernel::domain::constants::{
    RELEASE_NOTES_MAX_LENGTH, RELEASE_VERSION_MAX_LENGTH, fields,
};
use pmgr_kernel::domain::project::{ProjectKey, ProjectKind};
use pmgr_kernel::domain::requirements::RequirementsManifest;
use pmgr_kernel::validation::{check_length, check_required, is_valid_version};
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct NewRelease {
    pub version: String,
    pub notes: String,
}

/// Media path of a release archive:
/// `releases/plugins/gungame/gungame-v1.0.zip`,
/// `releases/sub-plugins/gungame/dm/dm-v1.0.zip`.
#[must_use]
pub fn release_file(key: &ProjectKey, version: &str) -> String {
    format!("releases/{}/{}-v{version}.zip", key.media_dir(), key.slug)
}

pub(crate) fn check_version(version: &str) -> Result<(), CatalogError> {
    check_required(fields::VERSION, version)?;
    check_length(fields::VERSION, version, RELEASE_VERSION_MAX_LENGTH)?;
    if !is_valid_version(version) {
        return Err(invalid(fields::VERSION, format!("Invalid version \"{version}\".")));
    }
    Ok(())
}

pub(crate) fn check_notes(notes: &str) -> Result<(), CatalogError> {
    Ok(check_length(fields::NOTES, notes, RELEASE_NOTES_MAX_LENGTH)?)
}

fn duplicate_version(version: &str) -> CatalogError {
    invalid(fields::VERSION, format!("Release version \"{version}\" already exists."))
}

fn ensure_new_version(versions: &[Release], version: &str) -> Result<(), CatalogError> {
    if versions.iter().any(|release| release.version == version) {
        return Err(duplicate_version(version));
    }
    Ok(())
}

/// Links the manifest and appends the release once the project is known to accept it.
fn record_release(
    state: &mut CatalogState,
    key: &ProjectKey,
    release: NewRelease,
    file: &str,
    manifest: &RequirementsManifest,
) -> Result<Release, CatalogError> {
    ensure_new_version(&state.project(key)?.releases, &release.version)?;
    let requirements = link_manifest(state, manifest)?;

    let project = state.project_mut(key)?;
    let now = Utc::now();
    let added = Release {
        version: release.version,
        notes: release.notes,
        file: file.to_owned(),
        downloads: 0,
        created: now,
    };
    project.requirements = requirements;
    project.releases.push(added.clone());
    project.modified = now;
    Ok(added)
}

impl CatalogInner {
    /// Publishes a new release of an existing project.
    ///
    /// # Errors
    ///
    /// Rejects duplicate or malformed versions, archives of another basename and users who
    /// may not edit the project.
    pub async fn add_release(
        &self,
        key: &ProjectKey,
        release: NewRelease,
        zip: Vec<u8>,
        actor: u64,
    ) -> Result<Release, CatalogError> {
        check_version(&release.version)?;
        check_notes(&release.notes)?;

        let (basename, parent) = {
            let state = self.store.read();
            let project = state.project(key)?;
            ensure_editor(project, actor)?;
            ensure_new_version(&project.releases, &release.version)?;
            let parent = match (key.kind, key.plugin.as_deref()) {
                (ProjectKind::SubPlugin, Some(plugin)) => Some(ParentSnapshot::of(&state, plugin)?),
                _ => None,
            };
            (project.basename.clone(), parent)
        };

        let zip: std::sync::Arc<[u8]> = zip.into();
        let inspected = self.inspect(key.kind, zip.clone(), parent).await?;
        if inspected.basename != basename {
            return Err(invalid(
                fields::ZIP_FILE,
                format!(
                    "Basename in zip \"{}\" does not match basename for {} \"{basename}\".",
                    inspected.basename, key.kind
                ),
            ));
        }
        let file = release_file(key, &release.version);
        {
            let mut state = self.store.write();
            ensure_new_version(&state.project(key)?.releases, &release.version)?;
            check_manifest(&state, &inspected.requirements)?;
            if !state.pending.insert(file.clone()) {
                return Err(duplicate_version(&release.version));
            }
        }

        if let Err(err) = self.media.write(&file, &zip).await {
            self.store.write().pending.remove(&file);
            return Err(err.into());
        }

        let added = {
            let mut state = self.store.write();
            state.pending.remove(&file);
            record_release(&mut state, key, release, &file, &inspected.requirements)
        };

        match added {
            Ok(added) => {
                info!(project = %key, version = %added.version, "Release added");
                Ok(added)
            },
            Err(err) => {
                discard(&self.media, &file).await;
                Err(err)
            },
        }
    }

    /// Serves a release archive by file name and counts the download.
    ///
    /// # Errors
    ///
    /// [`CatalogError::NotFound`] when the name does not belong to a release of the project.
    pub async fn download(
        &self,
        key: &ProjectKey,
        file_name: &str,
    ) -> Result<(Release, Vec<u8>), CatalogError> {
        let missing = || CatalogError::not_found(format!("No release \"{file_name}\" found."));
        let version = file_name
            .strip_prefix(&format!("{}-v", key.slug))
            .and_then(|rest| rest.strip_suffix(".zip"))
            .ok_or_else(missing)?;

        let file = {
            let state = self.store.read();
            state.project(key)?.release(version).ok_or_else(missing)?.file.clone()
        };
        let bytes = self.media.read(&file).await?;

        let mut state = self.store.write();
        let release = state
            .project_mut(key)?
            .releases
            .iter_mut()
            .find(|release| release.version == version)
            .ok_or_else(missing)?;
        release.downloads += 1;
        debug!(project = %key, %version, downloads = release.downloads, "Release downloaded");
        Ok((release.clone(), bytes))
    }
}

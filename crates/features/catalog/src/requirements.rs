//! Turns manifest entries into links to the site's requirement records.

use crate::CatalogInner;
use crate::error::{CatalogError, invalid};
use crate::model::{
    DownloadLink, ProjectRequirements, PyPiProject, RequirementLink, VcsType,
    VersionControlRequirement,
};
use crate::store::CatalogState;
use pmgr_kernel::domain::constants::fields;
use pmgr_kernel::domain::project::ProjectKey;
use pmgr_kernel::domain::requirements::{RequirementGroup, RequirementsManifest};

/// One requirement record together with the projects that declare it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementEntry {
    pub group: RequirementGroup,
    /// Package slug, `PyPI` slug, or url.
    pub key: String,
    pub name: String,
    pub url: Option<String>,
    pub dependents: Vec<ProjectKey>,
}

/// `PyPI` name normalization: lower-case, runs of `-`, `_` and `.` become one `-`.
pub(crate) fn pypi_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.trim().chars() {
        if matches!(ch, '-' | '_' | '.') {
            if !slug.ends_with('-') {
                slug.push('-');
            }
        } else {
            slug.push(ch.to_ascii_lowercase());
        }
    }
    slug.trim_matches('-').to_owned()
}

/// Rejects manifests that reference unknown packages, missing package releases or
/// unsupported version control systems.
pub(crate) fn check_manifest(
    state: &CatalogState,
    manifest: &RequirementsManifest,
) -> Result<(), CatalogError> {
    for custom in &manifest.custom {
        let b = &custom.basename;
        let package = state.package(b).ok_or_else(|| {
            invalid(
                fields::ZIP_FILE,
                format!("Custom Package \"{b}\" from requirements json file not found."),
            )
        })?;
        if let Some(version) = &custom.version
            && package.release(version).is_none()
        {
            return Err(invalid(
                fields::ZIP_FILE,
                format!(
                    "Custom Package \"{b}\" version \"{version}\", from requirements json file, not found."
                ),
            ));
        }
    }

    for vcs in &manifest.vcs {
        if VcsType::detect(&vcs.url).is_none() {
            return Err(invalid(
                fields::ZIP_FILE,
                format!("Unsupported version control url \"{}\".", vcs.url),
            ));
        }
    }

    Ok(())
}

/// Links the manifest to requirement records, creating the ones the site does not know yet.
pub(crate) fn link_manifest(
    state: &mut CatalogState,
    manifest: &RequirementsManifest,
) -> Result<ProjectRequirements, CatalogError> {
    check_manifest(state, manifest)?;
    let mut links = ProjectRequirements::default();

    for custom in &manifest.custom {
        if let Some(package) = state.package(&custom.basename) {
            links.packages.push(RequirementLink {
                key: package.key.slug.clone(),
                version: custom.version.clone(),
                optional: custom.optional,
            });
        }
    }

    for pypi in &manifest.pypi {
        let slug = pypi_slug(&pypi.name);
        state
            .pypi
            .entry(slug.clone())
            .or_insert_with(|| PyPiProject { name: pypi.name.clone(), slug: slug.clone() });
        links.pypi.push(RequirementLink {
            key: slug,
            version: pypi.version.clone(),
            optional: pypi.optional,
        });
    }

    for download in &manifest.download {
        state.downloads.entry(download.url.clone()).or_insert_with(|| DownloadLink {
            url: download.url.clone(),
            name: download.name.clone().unwrap_or_else(|| file_name(&download.url).to_owned()),
            description: download.description.clone().unwrap_or_default(),
        });
        links.download.push(RequirementLink {
            key: download.url.clone(),
            version: None,
            optional: download.optional,
        });
    }

    for vcs in &manifest.vcs {
        if let Some(vcs_type) = VcsType::detect(&vcs.url) {
            state
                .vcs
                .entry(vcs.url.clone())
                .or_insert_with(|| VersionControlRequirement { url: vcs.url.clone(), vcs_type });
            links.vcs.push(RequirementLink {
                key: vcs.url.clone(),
                version: vcs.version.clone(),
                optional: vcs.optional,
            });
        }
    }

    Ok(links)
}

fn file_name(url: &str) -> &str {
    url.trim_end_matches('/').rsplit('/').next().unwrap_or(url)
}

fn links(requirements: &ProjectRequirements, group: RequirementGroup) -> &[RequirementLink] {
    match group {
        RequirementGroup::Custom => &requirements.packages,
        RequirementGroup::Download => &requirements.download,
        RequirementGroup::Pypi => &requirements.pypi,
        RequirementGroup::Vcs => &requirements.vcs,
    }
}

impl CatalogInner {
    /// Projects whose current requirements include `key` in `group`.
    #[must_use]
    pub fn requirement_dependents(&self, group: RequirementGroup, key: &str) -> Vec<ProjectKey> {
        let state = self.store.read();
        dependents(&state, group, key)
    }

    /// Every record of `group` with its dependents. Packages are listed once something
    /// depends on them.
    #[must_use]
    pub fn requirements(&self, group: RequirementGroup) -> Vec<RequirementEntry> {
        let state = self.store.read();
        let pypi_url = self.settings.pypi_url.trim_end_matches('/');

        let mut entries: Vec<RequirementEntry> = match group {
            RequirementGroup::Custom => {
                let mut slugs: Vec<&str> = state
                    .projects
                    .values()
                    .flat_map(|project| project.requirements.packages.iter())
                    .map(|link| link.key.as_str())
                    .collect();
                slugs.sort_unstable();
                slugs.dedup();
                slugs
                    .into_iter()
                    .filter_map(|slug| state.projects.get(&ProjectKey::package(slug)))
                    .map(|package| RequirementEntry {
                        group,
                        key: package.key.slug.clone(),
                        name: package.name.clone(),
                        url: None,
                        dependents: Vec::new(),
                    })
                    .collect()
            },
            RequirementGroup::Pypi => state
                .pypi
                .values()
                .map(|pypi| RequirementEntry {
                    group,
                    key: pypi.slug.clone(),
                    name: pypi.name.clone(),
                    url: Some(format!("{pypi_url}/{}", pypi.name)),
                    dependents: Vec::new(),
                })
                .collect(),
            RequirementGroup::Download => state
                .downloads
                .values()
                .map(|download| RequirementEntry {
                    group,
                    key: download.url.clone(),
                    name: download.name.clone(),
                    url: Some(download.url.clone()),
                    dependents: Vec::new(),
                })
                .collect(),
            RequirementGroup::Vcs => state
                .vcs
                .values()
                .map(|vcs| RequirementEntry {
                    group,
                    key: vcs.url.clone(),
                    name: vcs.vcs_type.to_string(),
                    url: Some(vcs.url.clone()),
                    dependents: Vec::new(),
                })
                .collect(),
        };

        for entry in &mut entries {
            entry.dependents = dependents(&state, group, &entry.key);
        }
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        entries
    }
}

fn dependents(state: &CatalogState, group: RequirementGroup, key: &str) -> Vec<ProjectKey> {
    let mut found: Vec<ProjectKey> = state
        .projects
        .values()
        .filter(|project| links(&project.requirements, group).iter().any(|link| link.key == key))
        .map(|project| project.key.clone())
        .collect();
    found.sort_by(|a, b| a.media_dir().cmp(&b.media_dir()));
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pypi_names_normalize() {
        assert_eq!(pypi_slug("Zope.Interface"), "zope-interface");
        assert_eq!(pypi_slug("python__dateutil"), "python-dateutil");
        assert_eq!(pypi_slug("requests"), "requests");
    }

    #[test]
    fn unknown_custom_package_is_rejected() {
        let state = CatalogState::default();
        let manifest: RequirementsManifest = RequirementsManifest {
            custom: vec![pmgr_kernel::domain::requirements::CustomRequirement {
                basename: "missing".into(),
                version: None,
                optional: false,
            }],
            ..RequirementsManifest::default()
        };
        let err = check_manifest(&state, &manifest).unwrap_err();
        assert_eq!(
            err.violation().map(|v| v.message.as_ref()),
            Some("Custom Package \"missing\" from requirements json file not found.")
        );
    }

    #[test]
    fn records_are_shared_between_projects() {
        let mut state = CatalogState::default();
        let manifest = RequirementsManifest {
            pypi: vec![pmgr_kernel::domain::requirements::PyPiRequirement {
                name: "Requests".into(),
                version: Some("2.0".into()),
                optional: false,
            }],
            ..RequirementsManifest::default()
        };
        let first = link_manifest(&mut state, &manifest).unwrap();
        let second = link_manifest(&mut state, &manifest).unwrap();
        assert_eq!(first, second);
        assert_eq!(state.pypi.len(), 1);
        assert_eq!(state.pypi["requests"].name, "Requests");
    }
}

use crate::error::ArchiveError;
use crate::listing::ArchiveListing;
use crate::manifest::parse_manifest;
use crate::policy::{check_basename, check_file_paths, check_primary_file};
use crate::resolver::{ParentPlugin, Resolved, resolve_package, resolve_plugin, resolve_sub_plugin};
use pmgr_kernel::domain::config::ArchiveConfig;
use pmgr_kernel::domain::constants::{REQUIREMENTS_FILE, fields};
use pmgr_kernel::domain::project::ProjectKind;
use pmgr_kernel::domain::requirements::RequirementsManifest;
use pmgr_kernel::validation::Violation;
use tracing::debug;

/// Everything learned from an accepted archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectedArchive {
    pub kind: ProjectKind,
    pub basename: String,
    pub is_module: bool,
    /// Sub-plugin path the archive was found under.
    pub sub_path: Option<String>,
    pub files: Vec<String>,
    pub requirements: RequirementsManifest,
}

/// Runs the full acceptance pipeline over an uploaded zip.
#[derive(Debug, Clone, Copy)]
pub struct ArchiveInspector {
    max_upload_bytes: usize,
}

impl ArchiveInspector {
    #[must_use]
    pub const fn new(max_upload_bytes: usize) -> Self {
        Self { max_upload_bytes }
    }

    #[must_use]
    pub const fn from_config(config: &ArchiveConfig) -> Self {
        Self::new(config.max_upload_bytes)
    }

    #[must_use]
    pub const fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Lists, resolves and validates `bytes` as a `kind` archive.
    ///
    /// Sub-plugins are checked against `parent`; it is ignored for other kinds.
    ///
    /// # Errors
    ///
    /// [`ArchiveError::TooLarge`] above the upload limit, [`ArchiveError::Rejected`] for any
    /// structural problem.
    pub fn inspect(
        &self,
        kind: ProjectKind,
        bytes: &[u8],
        parent: Option<&ParentPlugin<'_>>,
    ) -> Result<InspectedArchive, ArchiveError> {
        if bytes.len() > self.max_upload_bytes {
            return Err(ArchiveError::TooLarge {
                message: format!(
                    "Archive is {} bytes, the limit is {} bytes.",
                    bytes.len(),
                    self.max_upload_bytes
                )
                .into(),
                context: None,
            });
        }

        let mut listing = ArchiveListing::from_bytes(bytes)?;
        let files = listing.files();

        let mut resolved = match (kind, parent) {
            (ProjectKind::Plugin, _) => resolve_plugin(files)?,
            (ProjectKind::Package, _) => resolve_package(files)?,
            (ProjectKind::SubPlugin, Some(parent)) => resolve_sub_plugin(files, parent)?,
            (ProjectKind::SubPlugin, None) => {
                return Err(
                    Violation::invalid(fields::PLUGIN, "Sub-plugins require a parent plugin.").into()
                );
            },
        };
        check_basename(kind, &resolved.basename)?;
        resolved.is_module = check_primary_file(files, &resolved)?;
        check_file_paths(files, &resolved)?;

        let requirements = read_manifest(&mut listing, &resolved)?;
        debug!(
            kind = %kind,
            basename = %resolved.basename,
            is_module = resolved.is_module,
            files = listing.files().len(),
            "Archive accepted"
        );

        Ok(InspectedArchive {
            kind,
            basename: resolved.basename,
            is_module: resolved.is_module,
            sub_path: resolved.sub_path,
            files: listing.into_files(),
            requirements,
        })
    }
}

fn read_manifest(
    listing: &mut ArchiveListing<'_>,
    resolved: &Resolved,
) -> Result<RequirementsManifest, ArchiveError> {
    let location = if resolved.is_module {
        resolved.module_manifest()
    } else {
        format!("{}{REQUIREMENTS_FILE}", resolved.project_dir())
    };

    match listing.read(&location)? {
        Some(bytes) => Ok(parse_manifest(&bytes)?),
        None => {
            debug!(%location, "No requirements manifest");
            Ok(RequirementsManifest::default())
        },
    }
}

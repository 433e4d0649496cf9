//! Checks applied once the basename is known.

use crate::resolver::Resolved;
use pmgr_kernel::domain::constants::{
    ALLOWED_FILE_TYPES, BASENAME_MAX_LENGTH, FORBIDDEN_NAMES, FORBIDDEN_PREFIX,
    READABLE_DATA_FILE_TYPES, fields,
};
use pmgr_kernel::domain::layout::PathLayout;
use pmgr_kernel::domain::project::ProjectKind;
use pmgr_kernel::validation::{Violation, check_length, is_valid_basename};

/// # Errors
///
/// `invalid` when the basename is reserved, uses the reserved prefix, is too long or is not
/// a lower-case identifier.
pub fn check_basename(kind: ProjectKind, basename: &str) -> Result<(), Violation> {
    let label = kind.title();
    if FORBIDDEN_NAMES.contains(&basename) {
        return Err(Violation::invalid(
            fields::ZIP_FILE,
            format!("{label} basename cannot be \"{basename}\"."),
        ));
    }
    if basename.starts_with(FORBIDDEN_PREFIX) {
        return Err(Violation::invalid(
            fields::ZIP_FILE,
            format!("{label} basename cannot start with \"{FORBIDDEN_PREFIX}\"."),
        ));
    }
    check_length(fields::ZIP_FILE, basename, BASENAME_MAX_LENGTH)?;
    if !is_valid_basename(basename) {
        return Err(Violation::invalid(
            fields::ZIP_FILE,
            format!("Invalid {kind} basename \"{basename}\"."),
        ));
    }
    Ok(())
}

/// Verifies the entry point of the project and returns whether it ships as a module.
///
/// # Errors
///
/// `not-found` when the expected entry point is absent, `invalid` when a sub-plugin is
/// present both as a module and as a package.
pub fn check_primary_file(files: &[String], resolved: &Resolved) -> Result<bool, Violation> {
    let has = |name: String| files.iter().any(|file| *file == name);
    let b = &resolved.basename;
    let dir = resolved.project_dir();

    match resolved.kind {
        ProjectKind::Plugin => {
            if !has(format!("{dir}{b}.py")) {
                return Err(Violation::not_found(
                    fields::ZIP_FILE,
                    "No primary file found in zip.  Perhaps you are attempting to upload a sub-plugin.",
                ));
            }
            Ok(false)
        },
        ProjectKind::Package => {
            if !resolved.is_module && !has(format!("{dir}__init__.py")) {
                return Err(Violation::not_found(
                    fields::ZIP_FILE,
                    format!("No primary file found in zip for package \"{b}\"."),
                ));
            }
            Ok(resolved.is_module)
        },
        ProjectKind::SubPlugin => {
            let layout = resolved.layout.unwrap_or_else(PathLayout::empty);
            let module = layout.contains(PathLayout::MODULE) && has(resolved.module_file());
            let package = (layout.contains(PathLayout::PACKAGE_USING_BASENAME)
                && has(format!("{dir}{b}.py")))
                || (layout.contains(PathLayout::PACKAGE_USING_INIT)
                    && has(format!("{dir}__init__.py")));

            match (module, package) {
                (true, true) => Err(Violation::invalid(
                    fields::ZIP_FILE,
                    format!(
                        "SubPlugin found as both a module and package in the same path: \"{}\".",
                        resolved.base
                    ),
                )),
                (false, false) => Err(Violation::not_found(
                    fields::ZIP_FILE,
                    format!(
                        "SubPlugin not found in path, though files found within zip for directory: \"{}\".",
                        resolved.base
                    ),
                )),
                (module, _) => Ok(module),
            }
        },
    }
}

/// Every entry must sit in a directory that accepts its extension, or be one of the
/// project's own module files.
///
/// # Errors
///
/// `invalid` listing every rejected entry.
pub fn check_file_paths(files: &[String], resolved: &Resolved) -> Result<(), Violation> {
    let project_dir = resolved.project_dir();
    let module_files = match resolved.kind {
        ProjectKind::Plugin => Vec::new(),
        ProjectKind::Package | ProjectKind::SubPlugin => {
            vec![resolved.module_file(), resolved.module_manifest()]
        },
    };

    let invalid: Vec<&str> = files
        .iter()
        .map(String::as_str)
        .filter(|file| !module_files.iter().any(|allowed| allowed == file))
        .filter(|file| {
            let Some(ext) = extension(file) else { return true };
            let in_project =
                file.starts_with(&project_dir) && (ext == "py" || READABLE_DATA_FILE_TYPES.contains(&ext));
            let in_shared = ALLOWED_FILE_TYPES
                .iter()
                .any(|(dir, exts)| file.starts_with(dir) && exts.contains(&ext));
            !(in_project || in_shared)
        })
        .collect();

    if invalid.is_empty() {
        return Ok(());
    }
    Err(Violation::invalid(
        fields::ZIP_FILE,
        format!("Invalid paths found in zip: {}", invalid.join(", ")),
    ))
}

/// Extension of the file name, if it has one.
fn extension(path: &str) -> Option<&str> {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.rsplit_once('.').map(|(_, ext)| ext).filter(|ext| !ext.is_empty())
}

//! Basename resolution over archive listings.
//!
//! Every `.py` file below a root directory proposes a candidate basename. All candidates
//! have to agree: the first one sets the expected value and any other value rejects the
//! archive.

use pmgr_kernel::domain::constants::{PACKAGE_PATH, PLUGIN_PATH, SOURCE_EXTENSION, fields};
use pmgr_kernel::domain::layout::{PathLayout, SubPluginRoot};
use pmgr_kernel::domain::project::ProjectKind;
use pmgr_kernel::validation::Violation;

/// A basename proposed by a single archive entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate<'a> {
    pub name: &'a str,
    /// The entry is a lone `{name}.py` rather than a file inside `{name}/`.
    pub module: bool,
    /// Sub-plugin path the entry was found under.
    pub sub_path: Option<&'a str>,
}

impl<'a> Candidate<'a> {
    #[must_use]
    pub const fn directory(name: &'a str) -> Self {
        Self { name, module: false, sub_path: None }
    }

    #[must_use]
    pub const fn module(name: &'a str) -> Self {
        Self { name, module: true, sub_path: None }
    }

    #[must_use]
    pub const fn under(self, sub_path: &'a str) -> Self {
        Self { sub_path: Some(sub_path), ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// Every candidate named the same basename. `module` is set if any of them was a module.
    Found(Candidate<'a>),
    Missing,
    Multiple { first: &'a str, second: &'a str },
}

/// Applies the single-basename policy to the `.py` entries below `root`.
///
/// `extract` receives the remainder of each entry after `root` and returns the candidates
/// it proposes; empty names are ignored. Only names are compared, the first candidate's
/// sub-path is kept.
pub fn resolve_single<'a, I>(
    paths: &'a [String],
    root: &str,
    mut extract: impl FnMut(&'a str) -> I,
) -> Resolution<'a>
where
    I: IntoIterator<Item = Candidate<'a>>,
{
    let mut found: Option<Candidate<'a>> = None;

    for rest in paths
        .iter()
        .filter(|path| path.ends_with(SOURCE_EXTENSION))
        .filter_map(|path| path.strip_prefix(root))
    {
        for candidate in extract(rest).into_iter().filter(|c| !c.name.is_empty()) {
            found = match found.take() {
                None => Some(candidate),
                Some(mut first) if first.name == candidate.name => {
                    first.module |= candidate.module;
                    Some(first)
                },
                Some(first) => {
                    return Resolution::Multiple { first: first.name, second: candidate.name };
                },
            };
        }
    }

    found.map_or(Resolution::Missing, Resolution::Found)
}

/// The outcome of resolving an archive of a given kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub kind: ProjectKind,
    pub basename: String,
    pub is_module: bool,
    /// Directory that contains the project, with a trailing slash.
    pub base: String,
    pub sub_path: Option<String>,
    /// Layouts accepted by `sub_path`.
    pub layout: Option<PathLayout>,
}

impl Resolved {
    fn new(kind: ProjectKind, base: String, candidate: Candidate<'_>) -> Self {
        Self {
            kind,
            basename: candidate.name.to_owned(),
            is_module: candidate.module,
            base,
            sub_path: candidate.sub_path.map(str::to_owned),
            layout: None,
        }
    }

    /// `{base}{basename}/`
    #[must_use]
    pub fn project_dir(&self) -> String {
        format!("{}{}/", self.base, self.basename)
    }

    /// `{base}{basename}.py`
    #[must_use]
    pub fn module_file(&self) -> String {
        format!("{}{}{SOURCE_EXTENSION}", self.base, self.basename)
    }

    /// `{base}{basename}_requirements.json`
    #[must_use]
    pub fn module_manifest(&self) -> String {
        format!("{}{}_requirements.json", self.base, self.basename)
    }
}

/// A plugin that sub-plugin archives are checked against.
#[derive(Debug, Clone, Copy)]
pub struct ParentPlugin<'a> {
    pub basename: &'a str,
    pub roots: &'a [SubPluginRoot],
}

/// First path segment of the remainder; lone files keep their full name.
fn first_segment(rest: &str) -> Option<Candidate<'_>> {
    Some(Candidate::directory(rest.split('/').next().unwrap_or(rest)))
}

/// Directory name, or the stem of a `.py` file sitting directly in the root.
fn directory_or_module(rest: &str) -> Option<Candidate<'_>> {
    match rest.split_once('/') {
        Some((name, _)) => Some(Candidate::directory(name)),
        None => rest.strip_suffix(SOURCE_EXTENSION).map(Candidate::module),
    }
}

/// # Errors
///
/// `multiple` or `not-found` on `zip_file` when the plugin directory is ambiguous or absent.
pub fn resolve_plugin(files: &[String]) -> Result<Resolved, Violation> {
    let kind = ProjectKind::Plugin;
    match resolve_single(files, PLUGIN_PATH, first_segment) {
        Resolution::Found(candidate) => Ok(Resolved::new(kind, PLUGIN_PATH.to_owned(), candidate)),
        Resolution::Multiple { .. } => Err(multiple_bases(kind)),
        Resolution::Missing => Err(no_base(kind)),
    }
}

/// # Errors
///
/// `multiple` or `not-found` on `zip_file` when the package directory or module is
/// ambiguous or absent.
pub fn resolve_package(files: &[String]) -> Result<Resolved, Violation> {
    let kind = ProjectKind::Package;
    match resolve_single(files, PACKAGE_PATH, directory_or_module) {
        Resolution::Found(candidate) => {
            Ok(Resolved::new(kind, PACKAGE_PATH.to_owned(), candidate))
        },
        Resolution::Multiple { .. } => Err(multiple_bases(kind)),
        Resolution::Missing => Err(no_base(kind)),
    }
}

/// Resolves the parent plugin directory first, then the sub-plugin below one of the
/// parent's registered paths.
///
/// # Errors
///
/// Rejects archives whose plugin directory is ambiguous, absent or differs from
/// `parent.basename`, and archives without exactly one sub-plugin basename.
pub fn resolve_sub_plugin(files: &[String], parent: &ParentPlugin<'_>) -> Result<Resolved, Violation> {
    match resolve_single(files, PLUGIN_PATH, first_segment) {
        Resolution::Found(plugin) if plugin.name == parent.basename => {},
        Resolution::Found(_) => {
            return Err(Violation::invalid(
                fields::ZIP_FILE,
                "Wrong plugin base directory found in zip.",
            ));
        },
        Resolution::Multiple { .. } => {
            return Err(Violation::multiple(fields::ZIP_FILE, "Multiple plugins found in zip."));
        },
        Resolution::Missing => {
            return Err(Violation::not_found(
                fields::ZIP_FILE,
                "No plugin base directory found in zip.",
            ));
        },
    }

    let plugin_dir = format!("{PLUGIN_PATH}{}/", parent.basename);
    let roots = parent.roots;
    let resolution = resolve_single(files, &plugin_dir, |rest| {
        roots.iter().filter_map(move |root| {
            let tail = rest.strip_prefix(root.path.as_str())?.strip_prefix('/')?;
            directory_or_module(tail).map(|candidate| candidate.under(&root.path))
        })
    });

    match resolution {
        Resolution::Found(candidate) => {
            let sub_path = candidate.sub_path.unwrap_or_default();
            let mut resolved = Resolved::new(
                ProjectKind::SubPlugin,
                format!("{plugin_dir}{sub_path}/"),
                candidate,
            );
            resolved.layout =
                roots.iter().find(|root| root.path == sub_path).map(|root| root.layout);
            Ok(resolved)
        },
        Resolution::Multiple { .. } => {
            Err(Violation::multiple(fields::ZIP_FILE, "Multiple sub-plugins found in zip."))
        },
        Resolution::Missing => Err(Violation::not_found(
            fields::ZIP_FILE,
            "No sub-plugin base directory found in zip.",
        )),
    }
}

fn multiple_bases(kind: ProjectKind) -> Violation {
    Violation::multiple(fields::ZIP_FILE, format!("Multiple base directories found for {kind}."))
}

fn no_base(kind: ProjectKind) -> Violation {
    Violation::not_found(fields::ZIP_FILE, format!("No base directory or file found for {kind}."))
}

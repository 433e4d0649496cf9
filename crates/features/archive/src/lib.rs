//! Inspection of uploaded project archives.
//!
//! An upload is listed, its basename is resolved from the directory layout, the basename
//! and primary file are checked, every file path is matched against the allowed
//! directories and the optional `requirements.json` manifest is parsed. Everything here is
//! synchronous and free of side effects; callers run it on a blocking thread.

mod error;
mod inspector;
mod listing;
mod manifest;
mod policy;
mod resolver;
#[cfg(feature = "server")]
pub mod api;

pub use error::{ArchiveError, ArchiveErrorExt};
pub use inspector::{ArchiveInspector, InspectedArchive};
pub use listing::ArchiveListing;
pub use manifest::parse_manifest;
pub use policy::{check_basename, check_file_paths, check_primary_file};
pub use resolver::{
    Candidate, ParentPlugin, Resolution, Resolved, resolve_package, resolve_plugin, resolve_single,
    resolve_sub_plugin,
};

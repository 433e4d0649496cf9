//! # Domain Models
//!
//! Plain data shared by every crate of the project manager: configuration, project kinds,
//! sub-plugin path layouts, requirement manifests and archive constants.
//! Only `serde` and `bitflags` are allowed here; no I/O and no validation logic.

pub mod config;
pub mod constants;
pub mod layout;
pub mod project;
pub mod registry;
pub mod requirements;

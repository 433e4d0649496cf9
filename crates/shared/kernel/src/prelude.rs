pub use crate::validation::{Violation, ViolationCode};
pub use pmgr_domain::constants::fields;
pub use pmgr_domain::project::{ProjectKey, ProjectKind};

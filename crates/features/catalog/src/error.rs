use pmgr_archive::ArchiveError;
use pmgr_kernel::validation::Violation;
use pmgr_storage::StorageError;
use std::borrow::Cow;

#[pmgr_derive::pmgr_error]
pub enum CatalogError {
    #[error("Rejected{}: {source}", format_context(.context))]
    Rejected {
        #[source]
        source: Violation,
        context: Option<Cow<'static, str>>,
    },

    #[error("Not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A unique name, basename or id is already taken.
    #[error("Conflict{}: {message}", format_context(.context))]
    Conflict {
        field: &'static str,
        message: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },

    #[error("Forbidden{}: {message}", format_context(.context))]
    Forbidden { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Archive error{}: {source}", format_context(.context))]
    Archive { source: ArchiveError, context: Option<Cow<'static, str>> },

    #[error("Storage error{}: {source}", format_context(.context))]
    Storage { source: StorageError, context: Option<Cow<'static, str>> },

    #[error("Internal catalog error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl CatalogError {
    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound { message: message.into(), context: None }
    }

    pub fn conflict(field: &'static str, message: impl Into<Cow<'static, str>>) -> Self {
        Self::Conflict { field, message: message.into(), context: None }
    }

    pub fn forbidden(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Forbidden { message: message.into(), context: None }
    }

    /// The violation behind a rejection, including archive rejections.
    #[must_use]
    pub const fn violation(&self) -> Option<&Violation> {
        match self {
            Self::Rejected { source, .. } => Some(source),
            Self::Archive { source, .. } => source.violation(),
            _ => None,
        }
    }
}

pub(crate) fn invalid(field: &'static str, message: impl Into<Cow<'static, str>>) -> CatalogError {
    Violation::invalid(field, message).into()
}

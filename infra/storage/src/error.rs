use std::borrow::Cow;

#[pmgr_derive::pmgr_error]
pub enum StorageError {
    #[error("Media file not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The path would resolve outside of the media root.
    #[error("Path escapes the media root{}: {message}", format_context(.context))]
    PathEscape { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Media I/O failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Internal storage error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl StorageError {
    pub(crate) fn not_found(path: &std::path::Path) -> Self {
        Self::NotFound { message: path.display().to_string().into(), context: None }
    }

    pub(crate) fn escape(path: &std::path::Path, reason: &'static str) -> Self {
        Self::PathEscape { message: path.display().to_string().into(), context: Some(reason.into()) }
    }
}

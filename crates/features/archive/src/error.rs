use pmgr_kernel::validation::Violation;
use std::borrow::Cow;

#[pmgr_derive::pmgr_error]
pub enum ArchiveError {
    /// The upload was read but its contents are not acceptable.
    #[error("Archive rejected{}: {source}", format_context(.context))]
    Rejected {
        #[source]
        source: Violation,
        context: Option<Cow<'static, str>>,
    },

    #[error("Archive too large{}: {message}", format_context(.context))]
    TooLarge { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Archive read failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Internal archive error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ArchiveError {
    /// The violation behind a rejection, if any.
    #[must_use]
    pub const fn violation(&self) -> Option<&Violation> {
        match self {
            Self::Rejected { source, .. } => Some(source),
            _ => None,
        }
    }
}

use pmgr_derive::pmgr_error;
use std::borrow::Cow;

#[pmgr_error]
pub enum ArchiveError {
    #[error("I/O error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Structure error{}: {message}", format_context(.context))]
    Structure { code: &'static str, message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<Vec<u8>, ArchiveError> {
    std::fs::read("missing.zip").context("Reading upload")
}

fn main() {
    let err = ArchiveError::from("boom");
    assert_eq!(err.kind(), "internal");

    let err: Result<(), ArchiveError> = Err(ArchiveError::Structure {
        code: "multiple",
        message: "Multiple base directories found for plugin.".into(),
        context: None,
    });
    let err = err.context("plugin upload").unwrap_err();
    assert_eq!(err.kind(), "structure");
    assert!(err.to_string().ends_with("(plugin upload): Multiple base directories found for plugin."));

    let _ = read();
}

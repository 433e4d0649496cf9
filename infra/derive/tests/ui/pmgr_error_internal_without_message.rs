use pmgr_derive::pmgr_error;
use std::borrow::Cow;

#[pmgr_error]
pub enum CatalogError {
    #[error("Internal error")]
    Internal { context: Option<Cow<'static, str>> },
}

fn main() {}

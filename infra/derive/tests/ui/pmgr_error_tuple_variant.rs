use pmgr_derive::pmgr_error;

#[pmgr_error]
pub enum CatalogError {
    #[error("Not found: {0}")]
    NotFound(String),
}

fn main() {}

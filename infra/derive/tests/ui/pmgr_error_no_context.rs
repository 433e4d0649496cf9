use pmgr_derive::pmgr_error;

#[pmgr_error]
pub enum StorageError {
    #[error("I/O error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },
}

fn main() {}

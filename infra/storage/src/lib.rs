//! Sandboxed media store.
//!
//! Release archives, logos and screenshots live below a single root directory. Every
//! relative path handed to [`MediaStore`] is normalized and checked against the root, so a
//! crafted slug or file name cannot read or write outside of it.
//!
//! Writes go to a unique `.pmgrpart.<n>` file first, are synced and then renamed over the
//! target. Leftover part files from a crash are removed when the store connects.
//!
//! ```rust
//! use pmgr_storage::{MediaStore, StorageError};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), StorageError> {
//! # let tmp = tempfile::tempdir().unwrap();
//! let store = MediaStore::builder().root(tmp.path().join("media")).connect().await?;
//!
//! store.write("releases/plugins/gungame/gungame-v1.0.zip", b"PK").await?;
//! assert!(store.exists("releases/plugins/gungame/gungame-v1.0.zip")?);
//! assert_eq!(store.list("releases/plugins/gungame").await?, ["gungame-v1.0.zip"]);
//! # Ok(())
//! # }
//! ```

mod builder;
mod error;
mod maintenance;
mod sandbox;
mod store;

pub use builder::MediaStoreBuilder;
pub use error::{StorageError, StorageErrorExt};
pub use store::MediaStore;

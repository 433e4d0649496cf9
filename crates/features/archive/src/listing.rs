use crate::error::ArchiveError;
use pmgr_kernel::domain::constants::fields;
use pmgr_kernel::validation::Violation;
use std::io::{Cursor, Read};
use zip::ZipArchive;
use zip::result::ZipError;

/// File entries of a zip upload, with access to their contents.
#[derive(Debug)]
pub struct ArchiveListing<'a> {
    files: Vec<String>,
    zip: ZipArchive<Cursor<&'a [u8]>>,
}

impl<'a> ArchiveListing<'a> {
    /// Opens the archive and records every entry that is not a directory.
    ///
    /// # Errors
    ///
    /// [`ArchiveError::Rejected`] on `zip_file` when the bytes are not a readable zip.
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self, ArchiveError> {
        let zip = ZipArchive::new(Cursor::new(bytes)).map_err(|_| not_a_zip())?;
        let files = zip.file_names().filter(|name| !name.ends_with('/')).map(str::to_owned).collect();
        Ok(Self { files, zip })
    }

    /// Entry names in archive order.
    #[must_use]
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Reads an entry; `Ok(None)` when the archive has no such file.
    ///
    /// # Errors
    ///
    /// [`ArchiveError::Rejected`] when the entry is corrupt, [`ArchiveError::Io`] on read errors.
    pub fn read(&mut self, name: &str) -> Result<Option<Vec<u8>>, ArchiveError> {
        let mut entry = match self.zip.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(_) => return Err(not_a_zip()),
        };
        let mut buf = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or_default());
        entry.read_to_end(&mut buf).map_err(|source| ArchiveError::Io {
            source,
            context: Some(format!("Reading {name}").into()),
        })?;
        Ok(Some(buf))
    }

    /// Gives up the zip handle and keeps the names.
    #[must_use]
    pub fn into_files(self) -> Vec<String> {
        self.files
    }
}

fn not_a_zip() -> ArchiveError {
    Violation::invalid(fields::ZIP_FILE, "Given file is not a valid zip file.").into()
}

use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::{info, warn};
use walkdir::WalkDir;

pub(crate) const PART_MARKER: &str = ".pmgrpart.";

/// Part files younger than this may belong to a write still in flight.
const STALE_AFTER: Duration = Duration::from_secs(300);

/// Removes abandoned part files below `root`. Failures are logged, never returned.
pub(crate) async fn purge_parts(root: &Path) {
    let root = root.to_path_buf();
    let task = tokio::task::spawn_blocking(move || sweep(&root, SystemTime::now(), STALE_AFTER));

    match task.await {
        Ok((0, 0)) => {},
        Ok((removed, failed)) => info!(removed, failed, "Removed abandoned media part files"),
        Err(err) => warn!(error = %err, "Media part file sweep did not finish"),
    }
}

pub(crate) fn sweep(root: &Path, now: SystemTime, stale_after: Duration) -> (usize, usize) {
    let mut removed = 0;
    let mut failed = 0;

    let parts = WalkDir::new(root).into_iter().flatten().filter(|entry| {
        entry.file_type().is_file()
            && entry.file_name().to_str().is_some_and(|name| name.contains(PART_MARKER))
    });

    for entry in parts {
        let age = entry
            .metadata()
            .ok()
            .and_then(|meta| meta.modified().ok())
            .and_then(|modified| now.duration_since(modified).ok());
        if age.is_some_and(|age| age < stale_after) {
            continue;
        }

        match std::fs::remove_file(entry.path()) {
            Ok(()) => removed += 1,
            Err(err) => {
                warn!(path = %entry.path().display(), error = %err, "Could not remove part file");
                failed += 1;
            },
        }
    }

    (removed, failed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_only_removes_old_part_files() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let dir = tmp.path().join("releases/plugins/gungame");
        std::fs::create_dir_all(&dir).expect("dirs");
        std::fs::write(dir.join("gungame-v1.0.zip"), b"zip").expect("zip");
        std::fs::write(dir.join("gungame-v1.1.zip.pmgrpart.7"), b"half").expect("part");

        let (removed, _) = sweep(tmp.path(), SystemTime::now(), STALE_AFTER);
        assert_eq!(removed, 0, "fresh part files are kept");

        let later = SystemTime::now() + STALE_AFTER * 2;
        assert_eq!(sweep(tmp.path(), later, STALE_AFTER), (1, 0));
        assert!(dir.join("gungame-v1.0.zip").exists());
        assert!(!dir.join("gungame-v1.1.zip.pmgrpart.7").exists());
    }
}

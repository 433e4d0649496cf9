use crate::error::StorageError;
use std::path::{Component, Path, PathBuf};

/// Joins `relative` onto `root`, rejecting absolute paths and `..` that climb above the root.
///
/// `root` must already be canonical. Existing ancestors of the result are canonicalized too,
/// so a symlink inside the store that points elsewhere is rejected as well.
pub(crate) fn sandboxed(root: &Path, relative: &Path) -> Result<PathBuf, StorageError> {
    let mut clean = PathBuf::new();
    for component in relative.components() {
        match component {
            Component::CurDir => {},
            Component::Normal(segment) => clean.push(segment),
            Component::ParentDir => {
                if !clean.pop() {
                    return Err(StorageError::escape(relative, "'..' climbs above the media root"));
                }
            },
            Component::RootDir | Component::Prefix(_) => {
                return Err(StorageError::escape(relative, "absolute paths are not allowed"));
            },
        }
    }

    let joined = root.join(&clean);
    let existing = joined.ancestors().find(|ancestor| ancestor.exists()).unwrap_or(root);

    match existing.canonicalize() {
        Ok(canonical) if canonical.starts_with(root) => Ok(joined),
        Ok(_) => Err(StorageError::escape(relative, "resolves through a link outside the media root")),
        Err(source) => Err(StorageError::Io {
            source,
            context: Some(format!("Resolving {}", existing.display()).into()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> (tempfile::TempDir, PathBuf) {
        let tmp = tempfile::tempdir().expect("tempdir");
        let root = tmp.path().canonicalize().expect("canonical");
        (tmp, root)
    }

    #[test]
    fn nested_relative_paths_stay_inside() {
        let (_tmp, root) = root();
        let path = sandboxed(&root, Path::new("logos/plugins/./gungame.png")).expect("inside");
        assert_eq!(path, root.join("logos/plugins/gungame.png"));
    }

    #[test]
    fn parent_segments_within_root_collapse() {
        let (_tmp, root) = root();
        let path = sandboxed(&root, Path::new("images/a/../b/0001.png")).expect("inside");
        assert_eq!(path, root.join("images/b/0001.png"));
    }

    #[test]
    fn escapes_are_rejected() {
        let (_tmp, root) = root();
        for bad in ["../secret", "images/../../secret", "/etc/passwd"] {
            assert!(
                matches!(sandboxed(&root, Path::new(bad)), Err(StorageError::PathEscape { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_leaving_the_root_are_rejected() {
        let (_tmp, root) = root();
        let (_outside_tmp, outside) = self::root();
        std::os::unix::fs::symlink(&outside, root.join("link")).expect("symlink");

        let err = sandboxed(&root, Path::new("link/file.zip")).unwrap_err();
        assert!(matches!(err, StorageError::PathEscape { .. }));
    }
}

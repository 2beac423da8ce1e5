//! Candidate file discovery.
//!
//! Walks a directory tree and collects every file whose name ends with the
//! configured suffix.

use std::path::{Path, PathBuf};

use log::warn;
use walkdir::{DirEntry, WalkDir};

/// Returns the full path of every candidate file below `root`, at any depth.
///
/// `root` itself is never a candidate, even when it is a matching file.
/// Matching is a case-sensitive suffix comparison on the raw bytes of the file
/// name, so names that are not valid UTF-8 still match. Symlinks count when
/// they resolve to a file; links to directories are not followed. Entries that
/// cannot be read are logged and skipped. Paths come back sorted so that
/// repeated scans of an unchanged tree visit files in the same order.
#[must_use]
pub fn find_candidates(root: &Path, suffix: &str) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    for entry in WalkDir::new(root).min_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable entry under {}: {e}", root.display());
                continue;
            }
        };

        if !is_file(&entry) {
            continue;
        }

        if entry
            .file_name()
            .as_encoded_bytes()
            .ends_with(suffix.as_bytes())
        {
            candidates.push(entry.into_path());
        }
    }

    candidates.sort();
    candidates
}

fn is_file(entry: &DirEntry) -> bool {
    if entry.path_is_symlink() {
        entry.path().is_file()
    } else {
        entry.file_type().is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_finds_nested_candidates() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("top.hdf5"));
        touch(&dir.path().join("a/b/c/deep.hdf5"));
        touch(&dir.path().join("a/notes.txt"));

        let found = find_candidates(dir.path(), ".hdf5");
        assert_eq!(
            found,
            vec![dir.path().join("a/b/c/deep.hdf5"), dir.path().join("top.hdf5")]
        );
    }

    #[test]
    fn test_suffix_is_case_sensitive() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("upper.HDF5"));
        touch(&dir.path().join("short.h5"));
        touch(&dir.path().join("archive.hdf5.bak"));
        touch(&dir.path().join("keep.hdf5"));

        let found = find_candidates(dir.path(), ".hdf5");
        assert_eq!(found, vec![dir.path().join("keep.hdf5")]);
    }

    #[test]
    fn test_directory_with_suffix_is_not_a_candidate() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("folder.hdf5")).unwrap();
        assert!(find_candidates(dir.path(), ".hdf5").is_empty());
    }

    #[test]
    fn test_missing_root_yields_nothing() {
        let dir = TempDir::new().unwrap();
        assert!(find_candidates(&dir.path().join("absent"), ".hdf5").is_empty());
    }

    #[test]
    fn test_root_file_is_not_a_candidate() {
        let dir = TempDir::new().unwrap();
        let only = dir.path().join("only.hdf5");
        touch(&only);
        assert!(find_candidates(&only, ".hdf5").is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_name_is_a_candidate() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join(OsStr::from_bytes(b"caf\xe9.hdf5"));
        touch(&path);

        assert_eq!(find_candidates(dir.path(), ".hdf5"), vec![path]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_follow_their_target_kind() {
        use std::os::unix::fs::symlink;

        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("scans")).unwrap();
        touch(&dir.path().join("data/real.hdf5"));
        symlink(dir.path().join("scans"), dir.path().join("link.hdf5")).unwrap();
        symlink(
            dir.path().join("data/real.hdf5"),
            dir.path().join("alias.hdf5"),
        )
        .unwrap();

        let found = find_candidates(dir.path(), ".hdf5");
        assert_eq!(
            found,
            vec![
                dir.path().join("alias.hdf5"),
                dir.path().join("data/real.hdf5"),
            ]
        );
    }
}

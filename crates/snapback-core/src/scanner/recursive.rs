//! Recursive directory scanning

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{BackupError, Result};

/// Walk `base` and collect every regular file, sorted by name per level
///
/// Symlinks resolving to a regular file are included.
///
/// # Errors
///
/// Returns an error if directory traversal fails due to permission issues
/// or I/O errors.
pub fn scan(base: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(base)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| walk_error(base, e))?;

        // Symlinked files are backed up by content; symlinked directories
        // are not descended into
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if is_file {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

fn walk_error(base: &Path, err: walkdir::Error) -> BackupError {
    let path = err.path().unwrap_or(base).to_path_buf();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
    BackupError::Io {
        context: "Failed to walk",
        path,
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_recursive_nested_structure() {
        let tmp = TempDir::new().unwrap();
        let frontend = tmp.path().join("frontend");
        let api = tmp.path().join("backend").join("api");
        fs::create_dir_all(&frontend).unwrap();
        fs::create_dir_all(&api).unwrap();

        fs::write(tmp.path().join("root.txt"), "root").unwrap();
        fs::write(frontend.join("component.txt"), "component").unwrap();
        fs::write(api.join("endpoint.txt"), "endpoint").unwrap();

        let files = scan(tmp.path()).unwrap();

        assert_eq!(files.len(), 3);
        assert!(files.iter().any(|p| p.ends_with("frontend/component.txt")));
        assert!(files.iter().any(|p| p.ends_with("backend/api/endpoint.txt")));
        assert!(files.iter().all(|p| p.is_file()));
    }

    #[test]
    fn test_recursive_empty_directories_yield_nothing() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("a/b/c")).unwrap();

        let files = scan(tmp.path()).unwrap();
        assert!(files.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_recursive_includes_file_symlinks_only() {
        let tmp = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        fs::write(outside.path().join("real.txt"), "real").unwrap();
        fs::create_dir(outside.path().join("dir")).unwrap();
        fs::write(outside.path().join("dir/inner.txt"), "inner").unwrap();

        std::os::unix::fs::symlink(outside.path().join("real.txt"), tmp.path().join("link.txt"))
            .unwrap();
        std::os::unix::fs::symlink(outside.path().join("dir"), tmp.path().join("linked_dir"))
            .unwrap();
        std::os::unix::fs::symlink(outside.path().join("gone"), tmp.path().join("dangling"))
            .unwrap();

        let files = scan(tmp.path()).unwrap();

        assert_eq!(files, vec![tmp.path().join("link.txt")]);
    }
}

//! File enumeration for backup sources
//!
//! A source root is scanned in one of three ways:
//! - a single file: the file itself
//! - `Flat`: regular files directly inside the root, no subdirectories
//! - `Recursive`: every regular file in the subtree
//!
//! Directories are never returned; symlinks to regular files count as files.
//! Results are sorted by file name at every level so that repeated runs
//! visit files in the same order.

mod flat;
mod recursive;

use std::path::{Path, PathBuf};

use crate::error::{IoContext, Result};

/// Type of enumeration performed for a root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Root is a single file
    Single,
    /// Immediate children only
    Flat,
    /// Full subtree walk
    Recursive,
}

impl ScanMode {
    /// Pick the scan mode for a root that is known to exist
    #[must_use]
    pub fn for_root(root: &Path, recursive: bool) -> Self {
        if root.is_file() {
            Self::Single
        } else if recursive {
            Self::Recursive
        } else {
            Self::Flat
        }
    }
}

/// Source enumerator
pub struct Scanner;

impl Scanner {
    /// List the files under `root`
    ///
    /// # Errors
    ///
    /// Returns an I/O error if `root` does not exist or a directory cannot be
    /// read.
    pub fn enumerate(root: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
        root.metadata()
            .io_context("Failed to read metadata for", root)?;

        match ScanMode::for_root(root, recursive) {
            ScanMode::Single => Ok(vec![root.to_path_buf()]),
            ScanMode::Flat => flat::scan(root),
            ScanMode::Recursive => recursive::scan(root),
        }
    }

    /// List every file in a mirror subtree
    ///
    /// A missing root is an empty mirror, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the walk fails.
    pub fn list_subtree(root: &Path) -> Result<Vec<PathBuf>> {
        if !root.exists() {
            return Ok(Vec::new());
        }
        recursive::scan(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn populate(root: &Path) {
        fs::write(root.join("b.txt"), "b").unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::create_dir_all(root.join("nested/deeper")).unwrap();
        fs::write(root.join("nested/c.txt"), "c").unwrap();
        fs::write(root.join("nested/deeper/d.txt"), "d").unwrap();
    }

    #[test]
    fn test_single_file_root() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("only.txt");
        fs::write(&file, "x").unwrap();

        let files = Scanner::enumerate(&file, true).unwrap();
        assert_eq!(files, vec![file.clone()]);

        let files = Scanner::enumerate(&file, false).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_flat_excludes_directories() {
        let tmp = TempDir::new().unwrap();
        populate(tmp.path());

        let files = Scanner::enumerate(tmp.path(), false).unwrap();

        assert_eq!(
            files,
            vec![tmp.path().join("a.txt"), tmp.path().join("b.txt")]
        );
        assert!(files.iter().all(|p| p.is_file()));
    }

    #[test]
    fn test_recursive_walks_subtree_in_order() {
        let tmp = TempDir::new().unwrap();
        populate(tmp.path());

        let files = Scanner::enumerate(tmp.path(), true).unwrap();

        assert_eq!(
            files,
            vec![
                tmp.path().join("a.txt"),
                tmp.path().join("b.txt"),
                tmp.path().join("nested/c.txt"),
                tmp.path().join("nested/deeper/d.txt"),
            ]
        );
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let result = Scanner::enumerate(&tmp.path().join("gone"), true);
        assert!(matches!(result, Err(crate::error::BackupError::Io { .. })));
    }

    #[test]
    fn test_list_subtree_missing_root_is_empty() {
        let tmp = TempDir::new().unwrap();
        let files = Scanner::list_subtree(&tmp.path().join("gone")).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_scan_mode_for_root() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("f");
        fs::write(&file, "").unwrap();

        assert_eq!(ScanMode::for_root(&file, true), ScanMode::Single);
        assert_eq!(ScanMode::for_root(tmp.path(), true), ScanMode::Recursive);
        assert_eq!(ScanMode::for_root(tmp.path(), false), ScanMode::Flat);
    }
}

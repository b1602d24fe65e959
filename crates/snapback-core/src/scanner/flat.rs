//! Flat directory scanning for non-recursive sources
//!
//! Only regular files directly in the root are returned, including symlinks
//! to regular files. Subdirectories are skipped, never returned as entries.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IoContext, Result};

/// Scan the immediate children of `base` for regular files
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn scan(base: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(base).io_context("Failed to read directory", base)? {
        let entry = entry.io_context("Failed to read entry in", base)?;
        let file_type = entry
            .file_type()
            .io_context("Failed to read file type of", &entry.path())?;

        // Only include files (not directories), following file symlinks
        let path = entry.path();
        if file_type.is_file() || (file_type.is_symlink() && path.is_file()) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

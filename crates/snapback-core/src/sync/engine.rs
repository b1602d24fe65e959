//! Per-source sync workflow

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::info;

use super::SyncResult;
use super::actions::{DestState, SyncAction, SyncActionResolver};
use super::executor::FileOperationExecutor;
use crate::comparison::TimestampComparator;
use crate::config::{BackupMode, BackupSource};
use crate::error::{BackupError, IoContext, Result};
use crate::scanner::Scanner;

/// Mirrors one backup source into its content directory
pub struct SyncEngine<'a> {
    source: &'a BackupSource,
}

impl<'a> SyncEngine<'a> {
    /// Create a sync engine for `source`
    #[must_use]
    pub const fn new(source: &'a BackupSource) -> Self {
        Self { source }
    }

    /// Synchronize `source_path` into `dest_root`
    ///
    /// `source_path` is the source's configured path already resolved
    /// against the source root.
    ///
    /// # Errors
    ///
    /// Returns an error if the source path is missing or any filesystem
    /// operation fails. Incremental collisions are not errors; they are
    /// returned as advisories.
    pub fn sync(&self, source_path: &Path, dest_root: &Path) -> Result<SyncResult> {
        if !source_path.exists() {
            return Err(BackupError::SourceMissing {
                name: self.source.name.clone(),
                path: source_path.to_path_buf(),
            });
        }

        info!(
            source = %self.source.name,
            mode = %self.source.mode,
            "Syncing {} -> {}",
            source_path.display(),
            dest_root.display()
        );

        // A single-file source is mirrored relative to its parent directory
        let source_root = if source_path.is_file() {
            source_path.parent().unwrap_or(source_path)
        } else {
            source_path
        };

        let mut result = SyncResult::default();

        if self.source.mode == BackupMode::Variable {
            for path in Self::orphaned_files(source_root, dest_root)? {
                FileOperationExecutor::execute(SyncAction::Delete { path }, &mut result)?;
            }
        }

        for source_file in Scanner::enumerate(source_path, self.source.recursive)? {
            let dest_file = relocate(&source_file, source_root, dest_root)?;

            let dest_state = DestState::probe(&dest_file)?;
            let source_newer = dest_state == DestState::Obstructed
                || TimestampComparator::is_newer(&source_file, &dest_file)?;

            let action = SyncActionResolver::resolve(
                source_file,
                dest_file,
                self.source.mode,
                source_newer,
                dest_state,
            );
            FileOperationExecutor::execute(action, &mut result)?;
        }

        info!(
            source = %self.source.name,
            created = result.created,
            updated = result.updated,
            deleted = result.deleted,
            skipped = result.skipped,
            conflicts = result.conflicts(),
            "Source synced"
        );

        Ok(result)
    }

    /// Mirror files whose source counterpart is no longer a file
    ///
    /// Covers a removed source as well as a source file replaced by a
    /// directory, or a source directory replaced by a file.
    fn orphaned_files(source_root: &Path, dest_root: &Path) -> Result<Vec<PathBuf>> {
        let mut orphans = Vec::new();
        for dest_file in Scanner::list_subtree(dest_root)? {
            let source_file = relocate(&dest_file, dest_root, source_root)?;
            let still_a_file = match fs::metadata(&source_file) {
                Ok(metadata) => metadata.is_file(),
                Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                    false
                }
                Err(e) => return Err(e).io_context("Failed to read metadata for", &source_file),
            };
            if !still_a_file {
                orphans.push(dest_file);
            }
        }
        Ok(orphans)
    }
}

/// Re-root `path` from `from` onto `to`
fn relocate(path: &Path, from: &Path, to: &Path) -> Result<PathBuf> {
    let relative = path.strip_prefix(from).map_err(|_| BackupError::Io {
        context: "Path escapes its root",
        path: path.to_path_buf(),
        source: std::io::Error::other(format!("not under {}", from.display())),
    })?;
    Ok(to.join(relative))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relocate() {
        let moved = relocate(
            Path::new("/src/docs/a/b.txt"),
            Path::new("/src/docs"),
            Path::new("/dest/content/docs"),
        )
        .unwrap();
        assert_eq!(moved, PathBuf::from("/dest/content/docs/a/b.txt"));
    }

    #[test]
    fn test_relocate_outside_root() {
        assert!(relocate(Path::new("/elsewhere/x"), Path::new("/src"), Path::new("/dst")).is_err());
    }
}

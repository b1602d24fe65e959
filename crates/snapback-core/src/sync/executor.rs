//! File operations executor

use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, warn};

use super::actions::SyncAction;
use super::{SyncAdvisory, SyncResult};
use crate::error::{IoContext, Result};

/// Applies sync actions to the filesystem
pub struct FileOperationExecutor;

impl FileOperationExecutor {
    /// Execute a sync action and record it in `result`
    ///
    /// # Errors
    ///
    /// Returns an error if a file operation fails.
    pub fn execute(action: SyncAction, result: &mut SyncResult) -> Result<()> {
        match action {
            SyncAction::Copy {
                source,
                dest,
                replace,
            } => {
                Self::copy_file(&source, &dest)?;
                if replace {
                    debug!(dest = %dest.display(), "Updated");
                    result.updated += 1;
                } else {
                    debug!(dest = %dest.display(), "Created");
                    result.created += 1;
                }
            }
            SyncAction::Skip { path, reason } => {
                debug!(path = %path.display(), reason, "Skipped");
                result.skipped += 1;
            }
            SyncAction::Delete { path } => {
                fs::remove_file(&path).io_context("Failed to delete", &path)?;
                debug!(path = %path.display(), "Deleted");
                result.deleted += 1;
            }
            SyncAction::Conflict { source, dest } => {
                warn!(
                    source = %source.display(),
                    dest = %dest.display(),
                    "Destination already exists, not overwriting incremental backup"
                );
                result.advisories.push(SyncAdvisory::Conflict { source, dest });
            }
        }
        Ok(())
    }

    /// Copy file contents and carry over the modification time
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// copy fails.
    pub fn copy_file(source: &Path, dest: &Path) -> Result<()> {
        // Create parent directory if needed
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).io_context("Failed to create directory", parent)?;
        }

        // A directory left where a file now belongs
        if dest.is_dir() {
            fs::remove_dir_all(dest).io_context("Failed to remove directory", dest)?;
        }

        fs::copy(source, dest).io_context("Failed to copy", source)?;

        let modified = fs::metadata(source)
            .and_then(|metadata| metadata.modified())
            .io_context("Failed to read modification time for", source)?;

        // Copies of read-only sources are read-only too
        let handle = match File::options().write(true).open(dest) {
            Err(e) if e.kind() == ErrorKind::PermissionDenied => File::open(dest),
            other => other,
        }
        .io_context("Failed to open", dest)?;

        handle
            .set_modified(modified)
            .io_context("Failed to set modification time on", dest)?;

        Ok(())
    }
}

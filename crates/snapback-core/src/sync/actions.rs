//! Sync action determination logic

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::BackupMode;
use crate::error::{IoContext, Result};

/// Sync action to perform for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    /// Copy source over to destination
    Copy {
        /// Source file path
        source: PathBuf,
        /// Destination file path
        dest: PathBuf,
        /// Whether an existing destination file is replaced
        replace: bool,
    },
    /// Skip this file (no action needed)
    Skip {
        /// File path being skipped
        path: PathBuf,
        /// Reason for skipping
        reason: &'static str,
    },
    /// Remove a mirror file whose source is gone
    Delete {
        /// Mirror file path
        path: PathBuf,
    },
    /// Newer source for an existing incremental destination
    Conflict {
        /// Source file path
        source: PathBuf,
        /// Destination file path
        dest: PathBuf,
    },
}

/// What currently occupies a destination path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestState {
    /// Nothing at the path
    Absent,
    /// A file to compare against
    File,
    /// A directory at the path, or a file where a parent directory belongs
    Obstructed,
}

impl DestState {
    /// Inspect `dest`
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata lookup fails for any reason other
    /// than the path or one of its parents being of the wrong type.
    pub fn probe(dest: &Path) -> Result<Self> {
        match fs::metadata(dest) {
            Ok(metadata) if metadata.is_dir() => Ok(Self::Obstructed),
            Ok(_) => Ok(Self::File),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::Absent),
            Err(e) if e.kind() == ErrorKind::NotADirectory => Ok(Self::Obstructed),
            Err(e) => Err(e).io_context("Failed to read metadata for", dest),
        }
    }
}

/// Resolves comparison outcomes into sync actions
pub struct SyncActionResolver;

impl SyncActionResolver {
    /// Determine the action for a source file
    ///
    /// `source_newer` is the staleness check result. It is not consulted
    /// for an obstructed destination, which has no mtime to compare.
    #[must_use]
    pub fn resolve(
        source: PathBuf,
        dest: PathBuf,
        mode: BackupMode,
        source_newer: bool,
        dest_state: DestState,
    ) -> SyncAction {
        if !source_newer && dest_state != DestState::Obstructed {
            return SyncAction::Skip {
                path: source,
                reason: "up to date",
            };
        }

        match (mode, dest_state) {
            (BackupMode::Incremental, DestState::File | DestState::Obstructed) => {
                SyncAction::Conflict { source, dest }
            }
            (_, state) => SyncAction::Copy {
                source,
                dest,
                replace: state != DestState::Absent,
            },
        }
    }
}

//! Error taxonomy for backup runs.
//!
//! Every variant is fatal for the run that raised it. Non-fatal conditions
//! (incremental collisions) are carried as [`crate::sync::SyncAdvisory`]
//! values instead.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised by the backup engine
#[derive(Error, Debug)]
pub enum BackupError {
    /// Destination root does not exist or is not a directory
    #[error("Destination dir does not exist: {}", .0.display())]
    DestinationMissing(PathBuf),

    /// Configuration is structurally valid YAML but semantically wrong
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Configuration file could not be read
    #[error("Failed to read config file {}: {source}", path.display())]
    ConfigRead {
        /// Config file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Configuration file could not be parsed
    #[error("Failed to parse config file {}: {source}", path.display())]
    ConfigParse {
        /// Config file path
        path: PathBuf,
        /// Underlying YAML error
        #[source]
        source: serde_yml::Error,
    },

    /// A configured source path does not exist
    #[error("Source '{name}' path does not exist: {}", path.display())]
    SourceMissing {
        /// Source name
        name: String,
        /// Resolved source path
        path: PathBuf,
    },

    /// Filesystem operation failed
    #[error("{context} {}: {source}", path.display())]
    Io {
        /// What was being attempted
        context: &'static str,
        /// Path involved
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Archive could not be written
    #[error("Failed to write archive {}: {source}", path.display())]
    Archive {
        /// Archive path
        path: PathBuf,
        /// Underlying zip error
        #[source]
        source: zip::result::ZipError,
    },

    /// An archive for this run timestamp already exists
    #[error("Archive already exists: {}", .0.display())]
    ArchiveExists(PathBuf),

    /// History directory contains a file whose name is not an archive timestamp
    #[error("Unexpected file in history directory: {0} (expected YYYY-MM-DD_HH-MM-SS.zip)")]
    InvalidArchiveName(String),
}

/// Result type alias using [`BackupError`]
pub type Result<T> = std::result::Result<T, BackupError>;

/// Attach a path and description to an I/O error
pub(crate) trait IoContext<T> {
    fn io_context(self, context: &'static str, path: &Path) -> Result<T>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn io_context(self, context: &'static str, path: &Path) -> Result<T> {
        self.map_err(|source| BackupError::Io {
            context,
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_context_message() {
        let err: Result<()> = Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
            .io_context("Failed to copy", Path::new("/tmp/a.txt"));

        let msg = err.unwrap_err().to_string();
        assert!(msg.contains("Failed to copy"));
        assert!(msg.contains("/tmp/a.txt"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_invalid_archive_name_message() {
        let err = BackupError::InvalidArchiveName("notes.txt".to_string());
        assert!(err.to_string().contains("notes.txt"));
    }
}

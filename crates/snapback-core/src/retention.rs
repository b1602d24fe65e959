//! History retention policy
//!
//! Archives are named `YYYY-MM-DD_HH-MM-SS.zip`. Pruning keeps the
//! `keep_last` most recent archives unconditionally and deletes the rest once
//! they are older than `expired_days`.
//!
//! Every regular file in the history directory must carry an archive name;
//! anything else aborts pruning before a single file is deleted.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDateTime, TimeDelta};
use tracing::{debug, info};

use crate::config::RetentionPolicy;
use crate::error::{BackupError, IoContext, Result};

/// `chrono` format of the timestamp embedded in archive names
pub const ARCHIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Archive file extension
pub const ARCHIVE_EXTENSION: &str = "zip";

/// File name of the archive for a run started at `started_at`
#[must_use]
pub fn archive_file_name(started_at: NaiveDateTime) -> String {
    format!(
        "{}.{ARCHIVE_EXTENSION}",
        started_at.format(ARCHIVE_TIMESTAMP_FORMAT)
    )
}

/// Parse the run timestamp out of an archive file name
///
/// Only the exact canonical form is accepted.
#[must_use]
pub fn parse_archive_name(name: &str) -> Option<NaiveDateTime> {
    let stem = name.strip_suffix(&format!(".{ARCHIVE_EXTENSION}"))?;
    let parsed = NaiveDateTime::parse_from_str(stem, ARCHIVE_TIMESTAMP_FORMAT).ok()?;
    (archive_file_name(parsed) == name).then_some(parsed)
}

/// Outcome of a pruning pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    /// Archives left in place, newest first
    pub kept: Vec<PathBuf>,
    /// Archives removed, newest first
    pub deleted: Vec<PathBuf>,
}

/// Applies a [`RetentionPolicy`] to a history directory
pub struct RetentionManager;

impl RetentionManager {
    /// Prune archives in `history_dir` relative to `now`
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::InvalidArchiveName`] if a file does not carry an
    /// archive name, or an I/O error if listing or deleting fails.
    pub fn prune(
        history_dir: &Path,
        policy: &RetentionPolicy,
        now: NaiveDateTime,
    ) -> Result<PruneReport> {
        let mut archives = Self::list_archives(history_dir)?;
        // Newest first
        archives.sort_by(|a, b| b.cmp(a));

        let max_age = TimeDelta::days(i64::from(policy.expired_days));
        let mut report = PruneReport::default();

        for (idx, (ts, path)) in archives.into_iter().enumerate() {
            if idx < policy.keep_last || now - ts <= max_age {
                report.kept.push(path);
                continue;
            }

            fs::remove_file(&path).io_context("Failed to delete archive", &path)?;
            debug!(archive = %path.display(), "Deleted expired archive");
            report.deleted.push(path);
        }

        info!(
            kept = report.kept.len(),
            deleted = report.deleted.len(),
            "Pruned history"
        );

        Ok(report)
    }

    fn list_archives(history_dir: &Path) -> Result<Vec<(NaiveDateTime, PathBuf)>> {
        let mut archives = Vec::new();

        for entry in fs::read_dir(history_dir).io_context("Failed to read directory", history_dir)? {
            let entry = entry.io_context("Failed to read entry in", history_dir)?;
            let path = entry.path();
            let file_type = entry
                .file_type()
                .io_context("Failed to read file type of", &path)?;
            if !file_type.is_file() {
                continue;
            }

            let name = entry.file_name();
            let ts = name
                .to_str()
                .and_then(parse_archive_name)
                .ok_or_else(|| BackupError::InvalidArchiveName(name.to_string_lossy().into_owned()))?;

            archives.push((ts, path));
        }

        Ok(archives)
    }
}

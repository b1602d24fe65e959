//! Backup run orchestration
//!
//! A run mirrors every configured source in declaration order, appends the
//! mirrors of `variable` sources to one snapshot archive, closes the archive
//! and then prunes the history directory.
//!
//! Runs are not transactional. A failure part-way leaves the mirror and the
//! archive as they were at that point.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDateTime, Timelike, Utc};
use tracing::info;

use crate::archive::SnapshotArchiver;
use crate::config::{BackupConfig, BackupMode, BackupSource, RetentionPolicy};
use crate::error::{BackupError, IoContext, Result};
use crate::retention::{PruneReport, RetentionManager};
use crate::sync::{SyncAdvisory, SyncEngine, SyncResult};

/// Mirror directory name under the destination root
pub const CONTENT_DIR: &str = "content";

/// Archive directory name under the destination root
pub const HISTORY_DIR: &str = "history";

/// Run settings supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Existing destination root
    pub dest_root: PathBuf,
    /// Root that relative source paths are resolved against
    pub src_root: Option<PathBuf>,
    /// Overrides the retention policy from the configuration
    pub retention: Option<RetentionPolicy>,
}

impl RunOptions {
    /// Options for `dest_root` with no source root and config retention
    #[must_use]
    pub fn new(dest_root: impl Into<PathBuf>) -> Self {
        Self {
            dest_root: dest_root.into(),
            src_root: None,
            retention: None,
        }
    }

    /// Resolve relative source paths against `src_root`
    #[must_use]
    pub fn with_src_root(mut self, src_root: impl Into<PathBuf>) -> Self {
        self.src_root = Some(src_root.into());
        self
    }

    /// Use `retention` instead of the configured policy
    #[must_use]
    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = Some(retention);
        self
    }

    /// Mirror root, `<dest>/content`
    #[must_use]
    pub fn content_dir(&self) -> PathBuf {
        self.dest_root.join(CONTENT_DIR)
    }

    /// Archive root, `<dest>/history`
    #[must_use]
    pub fn history_dir(&self) -> PathBuf {
        self.dest_root.join(HISTORY_DIR)
    }

    /// Resolve a source's configured path
    #[must_use]
    pub fn resolve_source(&self, source: &BackupSource) -> PathBuf {
        match &self.src_root {
            Some(root) => root.join(&source.path),
            None => source.path.clone(),
        }
    }
}

/// Outcome for one source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    /// Source name
    pub name: String,
    /// Source mode
    pub mode: BackupMode,
    /// Sync statistics and advisories
    pub result: SyncResult,
    /// Files appended to the run archive
    pub archived: usize,
}

/// Outcome of a whole run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupReport {
    /// Run start time, second precision
    pub started_at: NaiveDateTime,
    /// Archive written by this run
    pub archive_path: PathBuf,
    /// Entries in the archive
    pub archived_files: usize,
    /// Per-source results in processing order
    pub sources: Vec<SourceReport>,
    /// Retention outcome
    pub prune: PruneReport,
}

impl BackupReport {
    /// All advisories raised during the run, with their source name
    pub fn advisories(&self) -> impl Iterator<Item = (&str, &SyncAdvisory)> {
        self.sources.iter().flat_map(|s| {
            s.result
                .advisories
                .iter()
                .map(move |a| (s.name.as_str(), a))
        })
    }

    /// Total files copied across sources
    #[must_use]
    pub fn copied(&self) -> usize {
        self.sources.iter().map(|s| s.result.copied()).sum()
    }

    /// Total creates, updates and deletes across sources
    #[must_use]
    pub fn total_operations(&self) -> usize {
        self.sources
            .iter()
            .map(|s| s.result.total_operations())
            .sum()
    }
}

/// Runs one backup over all configured sources
pub struct BackupOrchestrator {
    config: BackupConfig,
    options: RunOptions,
}

impl BackupOrchestrator {
    /// Create an orchestrator
    #[must_use]
    pub const fn new(config: BackupConfig, options: RunOptions) -> Self {
        Self { config, options }
    }

    /// Retention policy in effect for this run
    #[must_use]
    pub fn retention(&self) -> RetentionPolicy {
        self.options.retention.unwrap_or(self.config.retention)
    }

    /// Run a backup stamped with the current UTC time
    ///
    /// UTC keeps archive names unique and ordered across DST changes.
    ///
    /// # Errors
    ///
    /// See [`BackupOrchestrator::run_at`].
    pub fn run(&self) -> Result<BackupReport> {
        let now = Utc::now().naive_utc();
        self.run_at(now.with_nanosecond(0).unwrap_or(now))
    }

    /// Run a backup stamped with `started_at`
    ///
    /// # Errors
    ///
    /// Returns an error if the destination root is missing, a source path is
    /// missing, any filesystem or archive operation fails, or the history
    /// directory holds a file that is not an archive.
    pub fn run_at(&self, started_at: NaiveDateTime) -> Result<BackupReport> {
        let dest_root = &self.options.dest_root;
        if !dest_root.is_dir() {
            return Err(BackupError::DestinationMissing(dest_root.clone()));
        }

        let content_dir = self.options.content_dir();
        let history_dir = self.options.history_dir();
        ensure_dir(&content_dir)?;
        ensure_dir(&history_dir)?;

        info!(
            dest = %dest_root.display(),
            sources = self.config.backup_sources.len(),
            "Starting backup run"
        );

        let mut archiver = SnapshotArchiver::create(&history_dir, started_at)?;
        let mut sources = Vec::with_capacity(self.config.backup_sources.len());

        for source in &self.config.backup_sources {
            let mirror_dir = content_dir.join(&source.name);
            ensure_dir(&mirror_dir)?;

            let source_path = self.options.resolve_source(source);
            let result = SyncEngine::new(source).sync(&source_path, &mirror_dir)?;

            let archived = match source.mode {
                BackupMode::Variable => archiver.append_tree(&content_dir, &mirror_dir)?,
                BackupMode::Incremental => 0,
            };

            sources.push(SourceReport {
                name: source.name.clone(),
                mode: source.mode,
                result,
                archived,
            });
        }

        let archived_files = archiver.entries();
        let archive_path = archiver.finish()?;

        let prune = RetentionManager::prune(&history_dir, &self.retention(), started_at)?;

        info!(
            archive = %archive_path.display(),
            archived_files,
            pruned = prune.deleted.len(),
            "Backup run complete"
        );

        Ok(BackupReport {
            started_at,
            archive_path,
            archived_files,
            sources,
            prune,
        })
    }
}

/// Run a backup of `config` with `options`, stamped with the current time
///
/// # Errors
///
/// See [`BackupOrchestrator::run_at`].
pub fn run_backup(config: BackupConfig, options: RunOptions) -> Result<BackupReport> {
    BackupOrchestrator::new(config, options).run()
}

fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).io_context("Failed to create directory", path)
}

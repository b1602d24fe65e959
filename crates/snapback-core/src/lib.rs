//! # snapback-core
//!
//! Core library for configuration-driven incremental backups.
//!
//! Each configured source is mirrored into `<dest>/content/<name>`. Sources in
//! `variable` mode are kept as exact mirrors and snapshotted into one zip
//! archive per run under `<dest>/history`; sources in `incremental` mode only
//! ever accumulate files. Old archives are pruned by a retention policy.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Error types for the snapback library
pub mod error;

/// Source file enumeration
pub mod scanner;

/// Staleness comparison between source and mirror files
pub mod comparison;

/// Configuration document loading and validation
pub mod config;

/// Per-source mirroring engine
pub mod sync;

/// Run-scoped snapshot archives
pub mod archive;

/// History retention policy
pub mod retention;

/// Whole-run orchestration
pub mod backup;

pub use backup::{BackupOrchestrator, BackupReport, RunOptions, SourceReport, run_backup};
pub use config::{BackupConfig, BackupMode, BackupSource, ConfigLoader, RetentionPolicy};
pub use error::{BackupError, Result};
pub use sync::{SyncAdvisory, SyncReporter, SyncResult};

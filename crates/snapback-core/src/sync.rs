//! Per-source mirroring engine
//!
//! This module implements the mirroring of one backup source into its
//! content directory:
//! - `variable` sources: deletions propagate and newer files overwrite
//! - `incremental` sources: the mirror only grows; an existing destination is
//!   never overwritten and a newer source for it is reported as an advisory

mod actions;
mod engine;
mod executor;
mod reporting;

use std::path::PathBuf;

pub use actions::{DestState, SyncAction, SyncActionResolver};
pub use engine::SyncEngine;
pub use executor::FileOperationExecutor;
pub use reporting::SyncReporter;

/// Non-fatal condition recorded during a sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAdvisory {
    /// Incremental destination already holds a file; the newer source was
    /// not copied
    Conflict {
        /// Source file path
        source: PathBuf,
        /// Existing destination file path
        dest: PathBuf,
    },
}

/// Synchronization result with statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncResult {
    /// Files created
    pub created: usize,
    /// Files overwritten
    pub updated: usize,
    /// Files deleted
    pub deleted: usize,
    /// Files already up to date
    pub skipped: usize,
    /// Non-fatal advisories, in processing order
    pub advisories: Vec<SyncAdvisory>,
}

impl SyncResult {
    /// Total operations performed
    #[must_use]
    pub const fn total_operations(&self) -> usize {
        self.created + self.updated + self.deleted
    }

    /// Files copied (created or updated)
    #[must_use]
    pub const fn copied(&self) -> usize {
        self.created + self.updated
    }

    /// Number of incremental conflicts
    #[must_use]
    pub fn conflicts(&self) -> usize {
        self.advisories
            .iter()
            .filter(|a| matches!(a, SyncAdvisory::Conflict { .. }))
            .count()
    }
}

//! Backup run reporting and statistics

use std::fmt::Write;

use crate::backup::BackupReport;
use crate::sync::SyncAdvisory;

/// Backup run reporter
pub struct SyncReporter;

impl SyncReporter {
    /// Generate a summary report for a finished run
    #[must_use]
    pub fn generate_summary(report: &BackupReport) -> String {
        let mut output = String::new();

        output.push_str("\n=== Backup Summary ===\n");
        let _ = writeln!(output, "Started:  {}", report.started_at);

        for source in &report.sources {
            let result = &source.result;
            let _ = writeln!(output, "\n[{}] ({})", source.name, source.mode);
            let _ = writeln!(output, "  Created:  {}", result.created);
            let _ = writeln!(output, "  Updated:  {}", result.updated);
            let _ = writeln!(output, "  Deleted:  {}", result.deleted);
            let _ = writeln!(output, "  Skipped:  {}", result.skipped);
            let _ = writeln!(output, "  Conflicts: {}", result.conflicts());
            if source.archived > 0 {
                let _ = writeln!(output, "  Archived: {}", source.archived);
            }
        }

        let advisories: Vec<_> = report.advisories().collect();
        if !advisories.is_empty() {
            let _ = writeln!(output, "\nWarnings ({}):", advisories.len());
            for (name, advisory) in advisories {
                match advisory {
                    SyncAdvisory::Conflict { source, dest } => {
                        let _ = writeln!(
                            output,
                            "  - [{name}] not overwriting {} with {}",
                            dest.display(),
                            source.display()
                        );
                    }
                }
            }
        }

        let _ = writeln!(
            output,
            "\nArchive: {} ({} files)",
            report.archive_path.display(),
            report.archived_files
        );

        if !report.prune.deleted.is_empty() {
            let _ = writeln!(output, "Pruned ({}):", report.prune.deleted.len());
            for path in &report.prune.deleted {
                let _ = writeln!(output, "  - {}", path.display());
            }
        }

        let _ = writeln!(output, "\nTotal files copied: {}", report.copied());
        let _ = writeln!(output, "Total operations: {}", report.total_operations());

        if report.advisories().next().is_none() {
            output.push_str("Status: ✓ Success\n");
        } else {
            output.push_str("Status: ✓ Completed with warnings\n");
        }

        output
    }
}

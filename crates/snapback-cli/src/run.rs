use anyhow::Context;
use snapback_core::{ConfigLoader, RetentionPolicy, RunOptions, SyncReporter, run_backup};
use tracing::debug;

use crate::cli::Cli;

pub struct Run;

impl Run {
    pub fn execute(cli: &Cli) -> anyhow::Result<()> {
        if !cli.dest_dir.is_dir() {
            anyhow::bail!(
                "Destination dir does not exist: {}",
                cli.dest_dir.display()
            );
        }

        let config = ConfigLoader::load(&cli.config_file).with_context(|| {
            format!("Failed to load config file {}", cli.config_file.display())
        })?;

        let retention = Self::build_retention(cli, config.retention);
        debug!(?retention, "Retention policy");

        let mut options = RunOptions::new(&cli.dest_dir).with_retention(retention);
        if let Some(src_root) = &cli.src_root {
            options = options.with_src_root(src_root);
        }

        let report = run_backup(config, options).context("Backup run failed")?;

        if !cli.quiet {
            println!("{}", SyncReporter::generate_summary(&report));
        }

        Ok(())
    }

    /// Apply CLI overrides on top of the configured retention policy
    fn build_retention(cli: &Cli, configured: RetentionPolicy) -> RetentionPolicy {
        RetentionPolicy {
            keep_last: cli.keep_last.unwrap_or(configured.keep_last),
            expired_days: cli.expired_days.unwrap_or(configured.expired_days),
        }
    }
}

use clap::Parser;
use std::path::PathBuf;

/// Incremental mirror and snapshot backup tool
///
/// Mirrors every configured source into <DEST>/content/<name> and stores a
/// snapshot of the variable sources in <DEST>/history/<timestamp>.zip
#[derive(Parser, Debug)]
#[command(name = "snapback")]
#[command(about, long_about = None, version)]
pub struct Cli {
    /// Path to backup config file
    #[arg(short = 'c', long, env = "SNAPBACK_CONFIG", value_name = "PATH")]
    pub config_file: PathBuf,

    /// Path to destination directory (must exist)
    #[arg(short = 'o', long, env = "SNAPBACK_DEST", value_name = "PATH")]
    pub dest_dir: PathBuf,

    /// Root used to resolve relative source paths
    #[arg(short = 's', long, value_name = "PATH")]
    pub src_root: Option<PathBuf>,

    /// Number of most recent archives never pruned (overrides config)
    #[arg(long, value_name = "N")]
    pub keep_last: Option<usize>,

    /// Age in days after which archives are pruned (overrides config)
    #[arg(long, value_name = "DAYS")]
    pub expired_days: Option<u32>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Log level filter (RUST_LOG takes precedence)
    #[arg(long, default_value = "info", value_name = "LEVEL")]
    pub log_level: String,

    /// Do not print the run summary
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from(["snapback", "-c", "cfg.yaml", "-o", "/backup", "-s", "/home"])
            .unwrap();
        assert_eq!(cli.config_file, PathBuf::from("cfg.yaml"));
        assert_eq!(cli.dest_dir, PathBuf::from("/backup"));
        assert_eq!(cli.src_root, Some(PathBuf::from("/home")));
        assert_eq!(cli.log_level, "info");
        assert!(cli.keep_last.is_none());
    }
}

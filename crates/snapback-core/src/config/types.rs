//! Configuration types and structures

use std::fmt;
use std::path::PathBuf;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

/// How a source is mirrored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupMode {
    /// Mirror tracks the source exactly, deletions included, and is
    /// snapshotted into the run archive
    Variable,
    /// Mirror only accumulates; existing files are never overwritten
    Incremental,
}

impl fmt::Display for BackupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variable => f.write_str("variable"),
            Self::Incremental => f.write_str("incremental"),
        }
    }
}

/// A named backup source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupSource {
    /// Name, also the directory under `content/`
    pub name: String,
    /// Source path, absolute or relative to the source root
    pub path: PathBuf,
    /// Walk the whole subtree instead of the first level only
    pub recursive: bool,
    /// Mirroring mode
    pub mode: BackupMode,
}

impl BackupSource {
    /// Create a new backup source
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        recursive: bool,
        mode: BackupMode,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            recursive,
            mode,
        }
    }
}

/// Retention settings for the history directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionPolicy {
    /// Most recent archives that are never deleted
    pub keep_last: usize,
    /// Archives older than this many days are deleted (outside the floor)
    pub expired_days: u32,
}

impl RetentionPolicy {
    /// Default retention floor
    pub const DEFAULT_KEEP_LAST: usize = 3;
    /// Default maximum archive age in days
    pub const DEFAULT_EXPIRED_DAYS: u32 = 365;
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            keep_last: Self::DEFAULT_KEEP_LAST,
            expired_days: Self::DEFAULT_EXPIRED_DAYS,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BackupConfig {
    /// Sources in declaration order
    #[serde(deserialize_with = "deserialize_sources")]
    pub backup_sources: Vec<BackupSource>,

    /// History retention settings
    #[serde(default)]
    pub retention: RetentionPolicy,
}

impl BackupConfig {
    /// Build a configuration from sources with default retention
    #[must_use]
    pub fn new(backup_sources: Vec<BackupSource>) -> Self {
        Self {
            backup_sources,
            retention: RetentionPolicy::default(),
        }
    }
}

/// One entry of the `backup_sources` mapping as written in YAML
#[derive(Deserialize)]
struct SourceEntry {
    path: PathBuf,
    recursive: bool,
    backup_type: BackupMode,
}

/// Collect the `backup_sources` mapping into a `Vec`, keeping document order
fn deserialize_sources<'de, D>(deserializer: D) -> Result<Vec<BackupSource>, D::Error>
where
    D: Deserializer<'de>,
{
    struct SourcesVisitor;

    impl<'de> Visitor<'de> for SourcesVisitor {
        type Value = Vec<BackupSource>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a mapping of source names to source settings")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut sources: Vec<BackupSource> = Vec::new();

            while let Some((name, entry)) = map.next_entry::<String, SourceEntry>()? {
                if sources.iter().any(|s| s.name == name) {
                    return Err(de::Error::custom(format!(
                        "duplicate backup source '{name}'"
                    )));
                }
                sources.push(BackupSource {
                    name,
                    path: entry.path,
                    recursive: entry.recursive,
                    mode: entry.backup_type,
                });
            }

            Ok(sources)
        }
    }

    deserializer.deserialize_map(SourcesVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_keep_document_order() {
        let yaml = r"
backup_sources:
  zeta:
    path: /data/zeta
    recursive: true
    backup_type: variable
  alpha:
    path: alpha.txt
    recursive: false
    backup_type: incremental
  mid:
    path: /data/mid
    recursive: false
    backup_type: variable
";
        let config: BackupConfig = serde_yml::from_str(yaml).unwrap();

        let names: Vec<&str> = config
            .backup_sources
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);

        let alpha = &config.backup_sources[1];
        assert_eq!(alpha.path, PathBuf::from("alpha.txt"));
        assert!(!alpha.recursive);
        assert_eq!(alpha.mode, BackupMode::Incremental);
    }

    #[test]
    fn test_retention_defaults_when_absent() {
        let yaml = r"
backup_sources:
  docs:
    path: /docs
    recursive: true
    backup_type: variable
";
        let config: BackupConfig = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.retention, RetentionPolicy::default());
        assert_eq!(config.retention.keep_last, 3);
        assert_eq!(config.retention.expired_days, 365);
    }

    #[test]
    fn test_partial_retention_section() {
        let yaml = r"
backup_sources:
  docs:
    path: /docs
    recursive: true
    backup_type: variable
retention:
  keep_last: 7
";
        let config: BackupConfig = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.retention.keep_last, 7);
        assert_eq!(config.retention.expired_days, 365);
    }

    #[test]
    fn test_unknown_backup_type_rejected() {
        let yaml = r"
backup_sources:
  docs:
    path: /docs
    recursive: true
    backup_type: mirror
";
        assert!(serde_yml::from_str::<BackupConfig>(yaml).is_err());
    }

    #[test]
    fn test_missing_recursive_rejected() {
        let yaml = r"
backup_sources:
  docs:
    path: /docs
    backup_type: variable
";
        assert!(serde_yml::from_str::<BackupConfig>(yaml).is_err());
    }

    #[test]
    fn test_backup_mode_display() {
        assert_eq!(BackupMode::Variable.to_string(), "variable");
        assert_eq!(BackupMode::Incremental.to_string(), "incremental");
    }
}

//! Configuration validation and error reporting

use std::path::{Component, Path};

use super::types::BackupConfig;
use crate::error::{BackupError, Result};

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a configuration
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::Config`] if the configuration is invalid.
    pub fn validate(config: &BackupConfig) -> Result<()> {
        if config.backup_sources.is_empty() {
            return Err(invalid("no backup sources configured"));
        }

        for (idx, source) in config.backup_sources.iter().enumerate() {
            let name = source.name.trim();
            if name.is_empty() {
                return Err(invalid(format!("source #{} has an empty name", idx + 1)));
            }

            // The name becomes exactly one directory under content/
            let mut components = Path::new(&source.name).components();
            let single_normal = matches!(components.next(), Some(Component::Normal(_)))
                && components.next().is_none();
            if !single_normal || source.name.contains(['/', '\\']) {
                return Err(invalid(format!(
                    "source name '{}' must be a plain directory name",
                    source.name
                )));
            }

            if source.path.as_os_str().is_empty() {
                return Err(invalid(format!("source '{}' has an empty path", source.name)));
            }
        }

        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> BackupError {
    BackupError::Config(msg.into())
}

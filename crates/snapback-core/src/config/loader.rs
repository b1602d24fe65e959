//! Configuration file loading

use std::fs;
use std::path::Path;

use tracing::debug;

use super::types::BackupConfig;
use super::validation::ConfigValidator;
use crate::error::{BackupError, Result};

/// Reads, parses and validates configuration documents
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid YAML of the
    /// expected shape, or fails validation.
    pub fn load(path: &Path) -> Result<BackupConfig> {
        let text = fs::read_to_string(path).map_err(|source| BackupError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let config: BackupConfig =
            serde_yml::from_str(&text).map_err(|source| BackupError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;

        ConfigValidator::validate(&config)?;

        debug!(
            path = %path.display(),
            sources = config.backup_sources.len(),
            "Loaded configuration"
        );

        Ok(config)
    }
}

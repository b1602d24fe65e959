//! Configuration document parsing and validation
//!
//! This module handles:
//! - Reading the YAML configuration document
//! - Preserving the declaration order of `backup_sources`
//! - Optional retention settings
//! - Validation and error reporting

mod loader;
mod types;
mod validation;

pub use loader::ConfigLoader;
pub use types::{BackupConfig, BackupMode, BackupSource, RetentionPolicy};
pub use validation::ConfigValidator;

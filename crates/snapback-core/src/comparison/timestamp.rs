//! File timestamp comparison for determining staleness

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::{Duration, SystemTime};

use crate::error::{IoContext, Result};

/// Slack added to the destination mtime before a source counts as newer.
///
/// Absorbs coarse filesystem timestamp resolution and small clock skew.
pub const STALENESS_EPSILON: Duration = Duration::from_secs(1);

/// Timestamp comparator
pub struct TimestampComparator;

impl TimestampComparator {
    /// Check whether `source` is newer than `destination`
    ///
    /// A missing destination counts as modified at the Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns an error if the source metadata cannot be read, or if the
    /// destination exists but its metadata cannot be read.
    pub fn is_newer(source: &Path, destination: &Path) -> Result<bool> {
        let source_time = Self::get_modified_time(source)?;
        let dest_time = Self::modified_or_epoch(destination)?;

        Ok(source_time > dest_time + STALENESS_EPSILON)
    }

    /// Get the modification time of a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file metadata cannot be read.
    pub fn get_modified_time(path: &Path) -> Result<SystemTime> {
        fs::metadata(path)
            .and_then(|metadata| metadata.modified())
            .io_context("Failed to read modification time for", path)
    }

    fn modified_or_epoch(path: &Path) -> Result<SystemTime> {
        match fs::metadata(path) {
            Ok(metadata) => metadata
                .modified()
                .io_context("Failed to read modification time for", path),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(SystemTime::UNIX_EPOCH),
            Err(e) => Err(e).io_context("Failed to read metadata for", path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn write_with_mtime(path: &Path, content: &str, mtime: SystemTime) {
        fs::write(path, content).unwrap();
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(mtime)
            .unwrap();
    }

    fn base_time() -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000)
    }

    #[test]
    fn test_missing_destination_is_stale() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("src.txt");
        write_with_mtime(&source, "content", base_time());

        let is_newer = TimestampComparator::is_newer(&source, &tmp.path().join("absent")).unwrap();
        assert!(is_newer);
    }

    #[test]
    fn test_identical_timestamps_not_newer() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("src.txt");
        let dest = tmp.path().join("dest.txt");
        write_with_mtime(&source, "content", base_time());
        write_with_mtime(&dest, "content", base_time());

        assert!(!TimestampComparator::is_newer(&source, &dest).unwrap());
    }

    #[test]
    fn test_within_epsilon_not_newer() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("src.txt");
        let dest = tmp.path().join("dest.txt");
        write_with_mtime(&source, "v2", base_time() + Duration::from_millis(900));
        write_with_mtime(&dest, "v1", base_time());

        assert!(!TimestampComparator::is_newer(&source, &dest).unwrap());
    }

    #[test]
    fn test_source_newer_beyond_epsilon() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("src.txt");
        let dest = tmp.path().join("dest.txt");
        write_with_mtime(&source, "v2", base_time() + Duration::from_secs(10));
        write_with_mtime(&dest, "v1", base_time());

        assert!(TimestampComparator::is_newer(&source, &dest).unwrap());
    }

    #[test]
    fn test_destination_newer() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("src.txt");
        let dest = tmp.path().join("dest.txt");
        write_with_mtime(&source, "old", base_time());
        write_with_mtime(&dest, "new", base_time() + Duration::from_secs(10));

        assert!(!TimestampComparator::is_newer(&source, &dest).unwrap());
    }

    #[test]
    fn test_nonexistent_source() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("nonexistent.txt");

        assert!(TimestampComparator::get_modified_time(&file).is_err());
        assert!(TimestampComparator::is_newer(&file, &tmp.path().join("other")).is_err());
    }
}

//! Run-scoped snapshot archives
//!
//! One zip archive is written per run under `history/`, named after the run
//! start time. Only `variable` sources are appended. Entries are stored
//! relative to the content root, so the archive layout is
//! `<source name>/<relative path>`.
//!
//! The archive is finalized on every exit path: explicitly through
//! [`SnapshotArchiver::finish`], or by the drop guard when a run aborts.

use std::fs::File;
use std::io::{self, ErrorKind};
use std::path::{Component, Path, PathBuf};

use chrono::{Datelike, Local, NaiveDateTime, Timelike};
use tracing::{debug, info, warn};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::comparison::TimestampComparator;
use crate::error::{BackupError, IoContext, Result};
use crate::retention::archive_file_name;
use crate::scanner::Scanner;

/// Writes the snapshot archive for one run
pub struct SnapshotArchiver {
    path: PathBuf,
    writer: Option<ZipWriter<File>>,
    entries: usize,
}

impl SnapshotArchiver {
    /// Create the archive for a run started at `started_at`
    ///
    /// # Errors
    ///
    /// Returns [`BackupError::ArchiveExists`] if an archive with the same
    /// timestamp is already present, or an I/O error if it cannot be created.
    pub fn create(history_dir: &Path, started_at: NaiveDateTime) -> Result<Self> {
        let path = history_dir.join(archive_file_name(started_at));

        let file = match File::options().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(BackupError::ArchiveExists(path));
            }
            Err(e) => return Err(e).io_context("Failed to create archive", &path),
        };

        info!(archive = %path.display(), "Opened snapshot archive");

        Ok(Self {
            path,
            writer: Some(ZipWriter::new(file)),
            entries: 0,
        })
    }

    /// Archive file path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of entries written so far
    #[must_use]
    pub const fn entries(&self) -> usize {
        self.entries
    }

    /// Append every file currently under `source_dir`
    ///
    /// Entry names are relative to `content_root`. Returns the number of
    /// entries added.
    ///
    /// # Errors
    ///
    /// Returns an error if the subtree cannot be listed, a file cannot be
    /// read, or the archive cannot be written.
    pub fn append_tree(&mut self, content_root: &Path, source_dir: &Path) -> Result<usize> {
        let mut added = 0;

        for file in Scanner::list_subtree(source_dir)? {
            let name = entry_name(content_root, &file)?;
            self.append_file(&file, name)?;
            added += 1;
        }

        self.entries += added;
        Ok(added)
    }

    fn append_file(&mut self, file: &Path, name: String) -> Result<()> {
        let archive_path = self.path.clone();
        let zip_err = |source: ZipError| BackupError::Archive {
            path: archive_path.clone(),
            source,
        };

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| zip_err(ZipError::Io(io::Error::other("archive already finished"))))?;

        let mut input = File::open(file).io_context("Failed to open", file)?;
        let size = input
            .metadata()
            .io_context("Failed to read metadata for", file)?
            .len();

        let mut options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .large_file(size >= u64::from(u32::MAX));
        if let Some(modified) = zip_timestamp(file) {
            options = options.last_modified_time(modified);
        }

        debug!(entry = %name, "Archiving");
        writer.start_file(name, options).map_err(zip_err)?;
        io::copy(&mut input, writer).io_context("Failed to archive", file)?;

        Ok(())
    }

    /// Write the central directory and close the archive
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be finalized.
    pub fn finish(mut self) -> Result<PathBuf> {
        let path = std::mem::take(&mut self.path);
        if let Some(writer) = self.writer.take() {
            writer.finish().map_err(|source| BackupError::Archive {
                path: path.clone(),
                source,
            })?;
        }

        info!(archive = %path.display(), entries = self.entries, "Closed snapshot archive");
        Ok(path)
    }
}

impl Drop for SnapshotArchiver {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.take() {
            match writer.finish() {
                Ok(_) => warn!(
                    archive = %self.path.display(),
                    entries = self.entries,
                    "Run aborted, archive is incomplete"
                ),
                Err(e) => warn!(
                    archive = %self.path.display(),
                    error = %e,
                    "Failed to finalize archive"
                ),
            }
        }
    }
}

/// Archive entry name for `file`: its path below `content_root`, `/`-separated
fn entry_name(content_root: &Path, file: &Path) -> Result<String> {
    let relative = file.strip_prefix(content_root).map_err(|_| BackupError::Io {
        context: "File is outside the content root",
        path: file.to_path_buf(),
        source: io::Error::other(format!("not under {}", content_root.display())),
    })?;

    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    Ok(parts.join("/"))
}

/// The file's modification time as a zip timestamp, if representable
fn zip_timestamp(file: &Path) -> Option<zip::DateTime> {
    let modified = TimestampComparator::get_modified_time(file).ok()?;
    let local = chrono::DateTime::<Local>::from(modified);

    zip::DateTime::from_date_and_time(
        u16::try_from(local.year()).ok()?,
        u8::try_from(local.month()).ok()?,
        u8::try_from(local.day()).ok()?,
        u8::try_from(local.hour()).ok()?,
        u8::try_from(local.minute()).ok()?,
        u8::try_from(local.second()).ok()?,
    )
    .ok()
}

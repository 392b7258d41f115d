//! Append-only CSV output
//!
//! Every append writes a header line followed by a value line, so a file
//! shared across runs accumulates header/value pairs. Re-running a patient
//! appends a duplicate pair. There is no locking: concurrent runs against the
//! same file may interleave.

use crate::error::Result;
use crate::types::OutputRow;
use log::debug;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Appends [`OutputRow`]s to a CSV file
#[derive(Debug, Clone)]
pub struct CsvAppender {
    path: PathBuf,
}

impl CsvAppender {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the file in append-or-create mode and writes the row's header
    /// and value lines with a single write
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or written.
    pub fn append(&self, row: &OutputRow) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let text = format!("{}\n{}\n", row.header_line(), row.value_line());
        file.write_all(text.as_bytes())?;
        file.flush()?;

        debug!(
            "Appended {} columns for patient {} to {}",
            row.len(),
            row.patient_id(),
            self.path.display()
        );
        Ok(())
    }
}

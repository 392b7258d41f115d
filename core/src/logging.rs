//! Logger setup, performed once in each binary's `main`

use crate::error::{RadextError, Result};
use log::LevelFilter;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Truncates `path` and returns an append handle to it
///
/// Append mode lets the embedded Python logger share the file without the
/// two writers overwriting each other.
pub fn prepare_log_file(path: &Path) -> Result<File> {
    File::create(path)?;
    Ok(OpenOptions::new().append(true).open(path)?)
}

/// Sends every record at `level` or above to `path`, overwriting it
///
/// Lines look like `DEBUG:radext_core::api: message`.
pub fn init_file_logging(path: &Path, level: LevelFilter) -> Result<()> {
    let file = prepare_log_file(path)?;
    env_logger::Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "{}:{}: {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .map_err(|e| RadextError::IoError(io::Error::new(io::ErrorKind::Other, e)))
}

/// Stderr logging honouring `RUST_LOG`, at debug when `verbose`
pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_truncates_then_appends() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("testLog.txt");
        fs::write(&path, "previous run\n").unwrap();

        let mut first = prepare_log_file(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");

        // a second writer opened in append mode must not clobber the first
        let mut second = OpenOptions::new().append(true).open(&path).unwrap();
        first.write_all(b"INFO:radext: one\n").unwrap();
        second.write_all(b"DEBUG:radiomics: two\n").unwrap();
        first.write_all(b"INFO:radext: three\n").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "INFO:radext: one\nDEBUG:radiomics: two\nINFO:radext: three\n"
        );
    }

    #[test]
    fn test_prepare_fails_for_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("testLog.txt");
        assert!(prepare_log_file(&path).is_err());
    }
}

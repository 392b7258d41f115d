//! Routes pyradiomics' own `logging` output into the run's log file

use pyo3::prelude::*;
use pyo3::types::PyDict;
use std::path::Path;

use crate::error::Result;

/// Attaches a DEBUG-level file handler to the `radiomics` logger
///
/// The handler appends, so it interleaves with the Rust side that already
/// truncated the file, and uses the same `LEVEL:name: message` layout.
pub fn attach_radiomics_log(path: &Path) -> Result<()> {
    Python::with_gil(|py| {
        let logging = py.import_bound("logging")?;
        let radiomics = py.import_bound("radiomics")?;

        let logger = radiomics.getattr("logger")?;
        let debug = logging.getattr("DEBUG")?;
        logger.call_method1("setLevel", (&debug,))?;

        let kwargs = PyDict::new_bound(py);
        kwargs.set_item("filename", path.to_string_lossy().into_owned())?;
        kwargs.set_item("mode", "a")?;
        let handler = logging
            .getattr("FileHandler")?
            .call((), Some(&kwargs))?;

        let formatter = logging
            .getattr("Formatter")?
            .call1(("%(levelname)s:%(name)s: %(message)s",))?;
        handler.call_method1("setFormatter", (formatter,))?;
        handler.call_method1("setLevel", (debug,))?;
        logger.call_method1("addHandler", (handler,))?;
        Ok(())
    })
}

//! pyradiomics feature extractor driven through the embedded interpreter

use log::debug;
use pyo3::prelude::*;
use std::path::{Path, PathBuf};

use super::convert::to_sitk;
use crate::error::Result;
use crate::extraction::{FeatureExtractor, FeatureMap, FeatureValue};
use crate::image::Volume;

/// Wraps a `radiomics.featureextractor.RadiomicsFeatureExtractor`
///
/// The extractor is built once from the parameter file and reused for every
/// call to [`execute`](FeatureExtractor::execute).
pub struct PyRadiomicsExtractor {
    extractor: Py<PyAny>,
    params: PathBuf,
}

impl PyRadiomicsExtractor {
    /// Loads pyradiomics and configures it from a YAML/JSON parameter file
    ///
    /// # Errors
    ///
    /// Fails if pyradiomics cannot be imported or rejects the parameter
    /// file (missing, unparsable or failing its schema).
    pub fn new(params: &Path) -> Result<Self> {
        let extractor = Python::with_gil(|py| -> Result<Py<PyAny>> {
            let module = py.import_bound("radiomics.featureextractor")?;
            let extractor = module
                .getattr("RadiomicsFeatureExtractor")?
                .call1((params.to_string_lossy().into_owned(),))?;
            Ok(extractor.unbind())
        })?;
        debug!("Configured pyradiomics from {}", params.display());

        Ok(Self {
            extractor,
            params: params.to_path_buf(),
        })
    }
}

impl FeatureExtractor for PyRadiomicsExtractor {
    fn execute(&self, image: &Volume, mask: &Volume) -> Result<FeatureMap> {
        Python::with_gil(|py| {
            let image = to_sitk(py, image)?;
            let mask = to_sitk(py, mask)?;
            debug!("Running pyradiomics with {}", self.params.display());

            let results = self
                .extractor
                .bind(py)
                .call_method1("execute", (image, mask))?;

            // keep the OrderedDict's order; values go through str() like
            // any Python csv writer would render them
            let mut map = FeatureMap::new();
            for item in results.call_method0("items")?.iter()? {
                let (name, value): (String, Bound<'_, PyAny>) = item?.extract()?;
                let text = value.str()?.to_string_lossy().into_owned();
                map.push(name, FeatureValue::Text(text));
            }
            Ok(map)
        })
    }
}

/// Returns pyradiomics' version string
pub fn radiomics_version() -> Result<String> {
    Python::with_gil(|py| {
        let radiomics = py.import_bound("radiomics")?;
        let version = radiomics.getattr("__version__")?.extract()?;
        Ok(version)
    })
}


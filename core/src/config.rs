use crate::slices::Plane;
use crate::types::FilterPolicy;
use std::path::PathBuf;

/// Default extractor parameter file, resolved against the working directory
pub const DEFAULT_PARAMS_FILE: &str = "params.yaml";

/// Default shared output file
pub const DEFAULT_OUTPUT_FILE: &str = "pyRadiomicsOutput.csv";

/// Default log file, overwritten on every run
pub const DEFAULT_LOG_FILE: &str = "testLog.txt";

/// Paths and policy a run is configured with
///
/// Resolved once at startup and passed down; nothing below `main` reads a
/// hardcoded path.
///
/// # Example
///
/// ```
/// use radext_core::{ExtractionConfig, FilterPolicy};
///
/// let config = ExtractionConfig::default()
///     .with_params("/data/params.yaml")
///     .with_filter(FilterPolicy::FirstOrderDerived);
///
/// assert_eq!(config.params.to_str(), Some("/data/params.yaml"));
/// assert_eq!(config.output.to_str(), Some("pyRadiomicsOutput.csv"));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ExtractionConfig {
    /// Extractor parameter file (YAML owned by pyradiomics)
    pub params: PathBuf,

    /// CSV file rows are appended to
    pub output: PathBuf,

    /// Log file, truncated at startup
    pub log_file: PathBuf,

    /// Which result entries become columns
    pub filter: FilterPolicy,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            params: PathBuf::from(DEFAULT_PARAMS_FILE),
            output: PathBuf::from(DEFAULT_OUTPUT_FILE),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            filter: FilterPolicy::default(),
        }
    }
}

impl ExtractionConfig {
    /// Builder: Set the parameter file
    pub fn with_params(mut self, params: impl Into<PathBuf>) -> Self {
        self.params = params.into();
        self
    }

    /// Builder: Set the output CSV
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    /// Builder: Set the log file
    pub fn with_log_file(mut self, log_file: impl Into<PathBuf>) -> Self {
        self.log_file = log_file.into();
        self
    }

    /// Builder: Set the filtering policy
    pub fn with_filter(mut self, filter: FilterPolicy) -> Self {
        self.filter = filter;
        self
    }
}

/// Settings of the slice selector
///
/// Defaults reproduce the reference pipeline: coronal slices, intensities
/// rescaled onto [1, 128], NRRD outputs and N4 correction when available.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceSelectConfig {
    pub plane: Plane,
    pub min: f64,
    pub max: f64,

    /// Extension of the written files, without the dot
    pub extension: String,

    pub bias_correction: bool,
}

impl Default for SliceSelectConfig {
    fn default() -> Self {
        Self {
            plane: Plane::Coronal,
            min: 1.0,
            max: 128.0,
            extension: "nrrd".to_string(),
            bias_correction: true,
        }
    }
}

impl SliceSelectConfig {
    /// Builder: Set the slicing plane
    pub fn with_plane(mut self, plane: Plane) -> Self {
        self.plane = plane;
        self
    }

    /// Builder: Set the normalization range
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Builder: Set the output extension
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Builder: Enable or disable N4 bias correction
    pub fn with_bias_correction(mut self, enabled: bool) -> Self {
        self.bias_correction = enabled;
        self
    }
}

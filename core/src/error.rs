use thiserror::Error;

/// Result type for radext operations
pub type Result<T> = std::result::Result<T, RadextError>;

/// Error types for radext operations
#[derive(Error, Debug)]
pub enum RadextError {
    /// DICOM reading error
    #[error("DICOM error: {0}")]
    DicomError(String),

    /// NIfTI reading or writing error
    #[error("NIfTI error: {0}")]
    NiftiError(String),

    /// No available reader or writer handles this file
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// Image header or voxel data is inconsistent
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// Two volumes that must share a grid do not
    #[error("Geometry mismatch: {0}")]
    GeometryMismatch(String),

    /// Feature extractor failure
    #[error("Extraction error: {0}")]
    ExtractionError(String),

    /// Exception raised inside the embedded Python interpreter
    #[error("Python error: {0}")]
    PythonError(String),

    /// Functionality that needs a cargo feature this build lacks
    #[error("{0} requires the '{1}' feature")]
    FeatureDisabled(String, &'static str),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

// Helper conversions
impl From<String> for RadextError {
    fn from(s: String) -> Self {
        RadextError::ExtractionError(s)
    }
}

impl From<&str> for RadextError {
    fn from(s: &str) -> Self {
        RadextError::ExtractionError(s.to_string())
    }
}

// Convert dicom-object errors
impl From<dicom_object::ReadError> for RadextError {
    fn from(e: dicom_object::ReadError) -> Self {
        RadextError::DicomError(format!("{}", e))
    }
}

impl From<dicom_core::value::ConvertValueError> for RadextError {
    fn from(e: dicom_core::value::ConvertValueError) -> Self {
        RadextError::DicomError(format!("{}", e))
    }
}

impl From<nifti::NiftiError> for RadextError {
    fn from(e: nifti::NiftiError) -> Self {
        RadextError::NiftiError(format!("{}", e))
    }
}

#[cfg(feature = "python")]
impl From<pyo3::PyErr> for RadextError {
    fn from(e: pyo3::PyErr) -> Self {
        RadextError::PythonError(format!("{}", e))
    }
}

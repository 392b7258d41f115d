//! Image and mask loading
//!
//! Every backend reads the header first and then decodes the voxels, so a
//! bad file is reported before any large allocation. Decoding itself is left
//! to external libraries: `nifti` and `dicom-object` natively, SimpleITK when
//! the `python` feature is enabled.

mod decimal;
pub mod dicom;
mod format;
pub mod nii;
mod volume;

pub use decimal::parse_decimals;
pub use format::{is_dicom_file, ImageFormat};
pub use volume::{ImageInfo, PixelType, Volume};

use crate::error::{RadextError, Result};
use log::{debug, info};
use std::path::Path;

/// A source of image volumes
pub trait ImageReader {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Returns whether this backend can read `path`
    fn supports(&self, path: &Path) -> bool;

    /// Reads only the header
    fn read_information(&self, path: &Path) -> Result<ImageInfo>;

    /// Reads and decodes the whole file
    fn read(&self, path: &Path) -> Result<Volume>;

    /// Header read followed by a full decode
    ///
    /// # Errors
    ///
    /// Returns an error if either step fails or the decoded size disagrees
    /// with the header.
    fn execute(&self, path: &Path) -> Result<Volume> {
        let header = self.read_information(path)?;
        debug!("Header of {} ({}): {}", path.display(), self.name(), header);

        let volume = self.read(path)?;
        if volume.size() != header.size {
            return Err(RadextError::InvalidImage(format!(
                "{}: header size {:?} but decoded {:?}",
                path.display(),
                header.size,
                volume.size()
            )));
        }
        info!("Loaded {} ({})", path.display(), volume.info());
        Ok(volume)
    }
}

/// A sink for image volumes
pub trait ImageWriter {
    fn name(&self) -> &'static str;

    fn supports(&self, path: &Path) -> bool;

    fn write(&self, volume: &Volume, path: &Path) -> Result<()>;
}

/// Reader backed by the `nifti` and `dicom-object` crates
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeReader;

impl ImageReader for NativeReader {
    fn name(&self) -> &'static str {
        "native"
    }

    fn supports(&self, path: &Path) -> bool {
        ImageFormat::detect(path) != ImageFormat::Other
    }

    fn read_information(&self, path: &Path) -> Result<ImageInfo> {
        match ImageFormat::detect(path) {
            ImageFormat::Nifti => nii::read_information(path),
            ImageFormat::Dicom => dicom::read_information(path),
            ImageFormat::Other => Err(unsupported(path)),
        }
    }

    fn read(&self, path: &Path) -> Result<Volume> {
        match ImageFormat::detect(path) {
            ImageFormat::Nifti => nii::read(path),
            ImageFormat::Dicom => dicom::read(path),
            ImageFormat::Other => Err(unsupported(path)),
        }
    }
}

/// Writer backed by the `nifti` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeWriter;

impl ImageWriter for NativeWriter {
    fn name(&self) -> &'static str {
        "native"
    }

    fn supports(&self, path: &Path) -> bool {
        ImageFormat::is_nifti_name(path)
    }

    fn write(&self, volume: &Volume, path: &Path) -> Result<()> {
        if !self.supports(path) {
            return Err(unsupported(path));
        }
        nii::write(volume, path)
    }
}

/// Picks the first backend that supports a path
///
/// The native backend is always tried first; SimpleITK follows when the
/// `python` feature is compiled in.
pub struct AutoReader {
    backends: Vec<Box<dyn ImageReader>>,
}

impl AutoReader {
    /// Creates the default backend chain
    pub fn new() -> Self {
        #[allow(unused_mut)]
        let mut backends: Vec<Box<dyn ImageReader>> = vec![Box::new(NativeReader)];
        #[cfg(feature = "python")]
        backends.push(Box::new(crate::python::SimpleItkReader::new()));
        Self { backends }
    }

    /// Creates a chain from explicit backends
    pub fn with_backends(backends: Vec<Box<dyn ImageReader>>) -> Self {
        Self { backends }
    }

    fn pick(&self, path: &Path) -> Result<&dyn ImageReader> {
        self.backends
            .iter()
            .find(|b| b.supports(path))
            .map(|b| b.as_ref())
            .ok_or_else(|| unsupported(path))
    }
}

impl Default for AutoReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageReader for AutoReader {
    fn name(&self) -> &'static str {
        "auto"
    }

    fn supports(&self, path: &Path) -> bool {
        self.backends.iter().any(|b| b.supports(path))
    }

    fn read_information(&self, path: &Path) -> Result<ImageInfo> {
        self.pick(path)?.read_information(path)
    }

    fn read(&self, path: &Path) -> Result<Volume> {
        self.pick(path)?.read(path)
    }
}

/// Writer counterpart of [`AutoReader`]
pub struct AutoWriter {
    backends: Vec<Box<dyn ImageWriter>>,
}

impl AutoWriter {
    pub fn new() -> Self {
        #[allow(unused_mut)]
        let mut backends: Vec<Box<dyn ImageWriter>> = vec![Box::new(NativeWriter)];
        #[cfg(feature = "python")]
        backends.push(Box::new(crate::python::SimpleItkWriter::new()));
        Self { backends }
    }
}

impl Default for AutoWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for AutoWriter {
    fn name(&self) -> &'static str {
        "auto"
    }

    fn supports(&self, path: &Path) -> bool {
        self.backends.iter().any(|b| b.supports(path))
    }

    fn write(&self, volume: &Volume, path: &Path) -> Result<()> {
        let backend = self
            .backends
            .iter()
            .find(|b| b.supports(path))
            .ok_or_else(|| unsupported(path))?;
        debug!("Writing {} with the {} backend", path.display(), backend.name());
        backend.write(volume, path)
    }
}

pub(crate) fn unsupported(path: &Path) -> RadextError {
    let hint = if cfg!(feature = "python") {
        ""
    } else {
        " (rebuild with --features python for SimpleITK formats)"
    };
    RadextError::UnsupportedFormat(format!("{}{}", path.display(), hint))
}

//! SimpleITK-backed image I/O and filters

use log::debug;
use pyo3::prelude::*;
use std::path::Path;

use super::convert::{from_sitk, info_from_sitk, to_sitk};
use crate::error::Result;
use crate::image::{ImageInfo, ImageReader, ImageWriter, Volume};

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Reads any format SimpleITK understands (NRRD, MHA, NIfTI, DICOM, ...)
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleItkReader;

impl SimpleItkReader {
    pub fn new() -> Self {
        Self
    }
}

impl ImageReader for SimpleItkReader {
    fn name(&self) -> &'static str {
        "simpleitk"
    }

    fn supports(&self, _path: &Path) -> bool {
        true
    }

    fn read_information(&self, path: &Path) -> Result<ImageInfo> {
        Python::with_gil(|py| {
            let sitk = py.import_bound("SimpleITK")?;
            let reader = sitk.call_method0("ImageFileReader")?;
            reader.call_method1("SetFileName", (path_arg(path),))?;
            reader.call_method0("ReadImageInformation")?;
            info_from_sitk(py, &reader)
        })
    }

    fn read(&self, path: &Path) -> Result<Volume> {
        Python::with_gil(|py| {
            let sitk = py.import_bound("SimpleITK")?;
            let reader = sitk.call_method0("ImageFileReader")?;
            reader.call_method1("SetFileName", (path_arg(path),))?;
            let image = reader.call_method0("Execute")?;
            from_sitk(py, &image)
        })
    }
}

/// Writes through `SimpleITK.WriteImage`; the format follows the extension
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleItkWriter;

impl SimpleItkWriter {
    pub fn new() -> Self {
        Self
    }
}

impl ImageWriter for SimpleItkWriter {
    fn name(&self) -> &'static str {
        "simpleitk"
    }

    fn supports(&self, _path: &Path) -> bool {
        true
    }

    fn write(&self, volume: &Volume, path: &Path) -> Result<()> {
        Python::with_gil(|py| {
            let sitk = py.import_bound("SimpleITK")?;
            let image = to_sitk(py, volume)?;
            sitk.call_method1("WriteImage", (image, path_arg(path)))?;
            Ok(())
        })
    }
}

/// N4 bias field correction restricted to label 1 of `mask`
///
/// The float result is stored back into the input's pixel type, truncating
/// and saturating like an integer-typed ITK filter output.
pub fn n4_bias_correct(image: &Volume, mask: &Volume) -> Result<Volume> {
    Python::with_gil(|py| {
        let sitk = py.import_bound("SimpleITK")?;

        let float_image = sitk.call_method1(
            "Cast",
            (to_sitk(py, image)?, sitk.getattr("sitkFloat32")?),
        )?;
        let label = sitk.call_method1("Cast", (to_sitk(py, mask)?, sitk.getattr("sitkUInt8")?))?;

        let corrector = sitk.call_method0("N4BiasFieldCorrectionImageFilter")?;
        corrector.call_method1("SetMaskLabel", (1u8,))?;
        debug!("Running N4 bias field correction");
        let corrected = corrector.call_method1("Execute", (float_image, label))?;

        let volume = from_sitk(py, &corrected)?;
        Ok(volume.cast(image.info().pixel_type))
    })
}

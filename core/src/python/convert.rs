//! Volume <-> SimpleITK image conversion
//!
//! Voxels cross the boundary as little-endian `float64` bytes and are cast
//! back to the volume's pixel type on the numpy side.

use pyo3::prelude::*;
use pyo3::types::PyBytes;

use crate::error::{RadextError, Result};
use crate::image::{ImageInfo, PixelType, Volume};

/// Builds a `SimpleITK.Image` carrying the volume's voxels and geometry
pub fn to_sitk<'py>(py: Python<'py>, volume: &Volume) -> Result<Bound<'py, PyAny>> {
    let numpy = py.import_bound("numpy")?;
    let sitk = py.import_bound("SimpleITK")?;
    let info = volume.info();
    let [nx, ny, nz] = info.size;

    let bytes = PyBytes::new_bound(py, &volume.to_le_bytes());
    let array = numpy
        .call_method1("frombuffer", (bytes, "<f8"))?
        .call_method1("reshape", ((nz, ny, nx),))?
        .call_method1("astype", (info.pixel_type.numpy_dtype(),))?;

    let image = sitk.call_method1("GetImageFromArray", (array,))?;
    image.call_method1("SetSpacing", (info.spacing.to_vec(),))?;
    image.call_method1("SetOrigin", (info.origin.to_vec(),))?;
    image.call_method1("SetDirection", (info.direction.to_vec(),))?;
    Ok(image)
}

/// Header of a `SimpleITK.Image` or `SimpleITK.ImageFileReader`
///
/// Both expose the same `GetSize`/`GetSpacing`/... accessors.
pub fn info_from_sitk(py: Python<'_>, source: &Bound<'_, PyAny>) -> Result<ImageInfo> {
    let sitk = py.import_bound("SimpleITK")?;

    let components: usize = source
        .call_method0("GetNumberOfComponents")
        .or_else(|_| source.call_method0("GetNumberOfComponentsPerPixel"))?
        .extract()?;
    if components != 1 {
        return Err(RadextError::UnsupportedFormat(format!(
            "{} components per pixel",
            components
        )));
    }

    let pixel_id = source.call_method0("GetPixelID")?;
    let pixel_name: String = sitk
        .call_method1("GetPixelIDValueAsString", (pixel_id,))?
        .extract()?;
    let pixel_type = PixelType::from_itk_name(&pixel_name)
        .ok_or_else(|| RadextError::UnsupportedFormat(format!("pixel type {}", pixel_name)))?;

    let size: Vec<usize> = source.call_method0("GetSize")?.extract()?;
    let spacing: Vec<f64> = source.call_method0("GetSpacing")?.extract()?;
    let origin: Vec<f64> = source.call_method0("GetOrigin")?.extract()?;
    let direction: Vec<f64> = source.call_method0("GetDirection")?.extract()?;

    ImageInfo::from_parts(&size, &spacing, &origin, &direction, pixel_type)
}

/// Copies a `SimpleITK.Image` into a [`Volume`]
pub fn from_sitk(py: Python<'_>, image: &Bound<'_, PyAny>) -> Result<Volume> {
    let sitk = py.import_bound("SimpleITK")?;
    let info = info_from_sitk(py, image)?;

    let bytes: Vec<u8> = sitk
        .call_method1("GetArrayFromImage", (image,))?
        .call_method1("astype", ("<f8",))?
        .call_method0("tobytes")?
        .extract()?;

    let data = bytes
        .chunks_exact(8)
        .map(|chunk| {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(chunk);
            f64::from_le_bytes(raw)
        })
        .collect();

    Volume::new(info, data)
}

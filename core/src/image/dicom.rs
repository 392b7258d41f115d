//! Single-file DICOM reading through `dicom-object`
//!
//! Only native (uncompressed) little-endian pixel data with one sample per
//! pixel is decoded. Multi-frame objects become one volume with the frames
//! stacked along z.

use crate::error::{RadextError, Result};
use crate::image::decimal::parse_decimals;
use crate::image::volume::{ImageInfo, PixelType, Volume};
use dicom_core::Tag;
use dicom_dictionary_std::tags;
use dicom_object::{open_file, InMemDicomObject, OpenFileOptions};
use log::debug;
use std::path::Path;

const IMPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2";
const EXPLICIT_VR_LITTLE_ENDIAN: &str = "1.2.840.10008.1.2.1";

/// Reads the DICOM header, stopping before the pixel data
pub fn read_information(path: &Path) -> Result<ImageInfo> {
    let obj = OpenFileOptions::new()
        .read_until(tags::PIXEL_DATA)
        .open_file(path)?;
    info_from_object(&obj)
}

/// Reads and decodes a DICOM file
pub fn read(path: &Path) -> Result<Volume> {
    let obj = open_file(path)?;

    let transfer_syntax = obj.meta().transfer_syntax().trim_end_matches('\0');
    if transfer_syntax != IMPLICIT_VR_LITTLE_ENDIAN && transfer_syntax != EXPLICIT_VR_LITTLE_ENDIAN
    {
        return Err(RadextError::UnsupportedFormat(format!(
            "{}: transfer syntax {} is not native little endian",
            path.display(),
            transfer_syntax
        )));
    }

    let info = info_from_object(&obj)?;
    let layout = PixelLayout::from_object(&obj)?;
    debug!("DICOM pixel layout for {}: {:?}", path.display(), layout);

    let bytes = obj
        .element(tags::PIXEL_DATA)
        .map_err(|e| RadextError::DicomError(format!("{}", e)))?
        .to_bytes()?;
    let data = layout.decode(&bytes, info.voxel_count())?;

    Volume::new(info, data)
}

/// Builds the volume geometry from header tags
fn info_from_object(dcm: &InMemDicomObject) -> Result<ImageInfo> {
    let rows = get_u16_value(dcm, tags::ROWS)
        .ok_or_else(|| RadextError::DicomError("Tag not found: Rows".to_string()))?;
    let columns = get_u16_value(dcm, tags::COLUMNS)
        .ok_or_else(|| RadextError::DicomError("Tag not found: Columns".to_string()))?;
    let frames = get_int_value(dcm, tags::NUMBER_OF_FRAMES)
        .unwrap_or(1)
        .max(1) as usize;

    let samples = get_u16_value(dcm, tags::SAMPLES_PER_PIXEL).unwrap_or(1);
    if samples != 1 {
        return Err(RadextError::UnsupportedFormat(format!(
            "{} samples per pixel",
            samples
        )));
    }

    // PixelSpacing is (row spacing, column spacing), i.e. (y, x)
    let in_plane = get_float_values(dcm, tags::PIXEL_SPACING)
        .or_else(|| get_float_values(dcm, tags::IMAGER_PIXEL_SPACING))
        .filter(|v| v.len() == 2)
        .map(|v| [v[1], v[0]])
        .unwrap_or([1.0, 1.0]);
    let between_slices = get_float_values(dcm, tags::SPACING_BETWEEN_SLICES)
        .or_else(|| get_float_values(dcm, tags::SLICE_THICKNESS))
        .and_then(|v| v.first().copied())
        .filter(|v| *v > 0.0)
        .unwrap_or(1.0);

    let mut info = ImageInfo::new(
        [columns as usize, rows as usize, frames],
        pixel_type(dcm)?,
    );
    info.spacing = [in_plane[0], in_plane[1], between_slices];

    if let Some(position) = get_float_values(dcm, tags::IMAGE_POSITION_PATIENT) {
        if position.len() == 3 {
            info.origin = [position[0], position[1], position[2]];
        }
    }
    if let Some(orientation) = get_float_values(dcm, tags::IMAGE_ORIENTATION_PATIENT) {
        if orientation.len() == 6 {
            info.direction = direction_from_orientation(&orientation);
        }
    }

    Ok(info)
}

/// Direction matrix whose columns are the row cosine, column cosine and
/// their cross product
fn direction_from_orientation(iop: &[f64]) -> [f64; 9] {
    let r = [iop[0], iop[1], iop[2]];
    let c = [iop[3], iop[4], iop[5]];
    let n = [
        r[1] * c[2] - r[2] * c[1],
        r[2] * c[0] - r[0] * c[2],
        r[0] * c[1] - r[1] * c[0],
    ];
    [r[0], c[0], n[0], r[1], c[1], n[1], r[2], c[2], n[2]]
}

fn rescale(dcm: &InMemDicomObject) -> (f64, f64) {
    let slope = get_float_values(dcm, tags::RESCALE_SLOPE)
        .and_then(|v| v.first().copied())
        .unwrap_or(1.0);
    let intercept = get_float_values(dcm, tags::RESCALE_INTERCEPT)
        .and_then(|v| v.first().copied())
        .unwrap_or(0.0);
    (slope, intercept)
}

fn pixel_type(dcm: &InMemDicomObject) -> Result<PixelType> {
    let (slope, intercept) = rescale(dcm);
    if slope != 1.0 || intercept != 0.0 {
        return Ok(PixelType::Float64);
    }

    let bits = get_u16_value(dcm, tags::BITS_ALLOCATED).unwrap_or(16);
    let signed = get_u16_value(dcm, tags::PIXEL_REPRESENTATION).unwrap_or(0) == 1;
    match (bits, signed) {
        (8, false) => Ok(PixelType::UInt8),
        (8, true) => Ok(PixelType::Int8),
        (16, false) => Ok(PixelType::UInt16),
        (16, true) => Ok(PixelType::Int16),
        (32, false) => Ok(PixelType::UInt32),
        (32, true) => Ok(PixelType::Int32),
        _ => Err(RadextError::UnsupportedFormat(format!(
            "{} bits allocated",
            bits
        ))),
    }
}

/// How stored pixel bytes map to voxel values
#[derive(Debug, Clone, Copy, PartialEq)]
struct PixelLayout {
    bits_allocated: u16,
    signed: bool,
    slope: f64,
    intercept: f64,
}

impl PixelLayout {
    fn from_object(dcm: &InMemDicomObject) -> Result<Self> {
        let (slope, intercept) = rescale(dcm);
        let layout = Self {
            bits_allocated: get_u16_value(dcm, tags::BITS_ALLOCATED).unwrap_or(16),
            signed: get_u16_value(dcm, tags::PIXEL_REPRESENTATION).unwrap_or(0) == 1,
            slope,
            intercept,
        };
        if !matches!(layout.bits_allocated, 8 | 16 | 32) {
            return Err(RadextError::UnsupportedFormat(format!(
                "{} bits allocated",
                layout.bits_allocated
            )));
        }
        Ok(layout)
    }

    fn decode(&self, bytes: &[u8], count: usize) -> Result<Vec<f64>> {
        let width = (self.bits_allocated / 8) as usize;
        if bytes.len() < count * width {
            return Err(RadextError::InvalidImage(format!(
                "pixel data holds {} bytes, expected {}",
                bytes.len(),
                count * width
            )));
        }

        let raw = bytes[..count * width].chunks_exact(width).map(|b| {
            match (width, self.signed) {
                (1, false) => b[0] as f64,
                (1, true) => b[0] as i8 as f64,
                (2, false) => u16::from_le_bytes([b[0], b[1]]) as f64,
                (2, true) => i16::from_le_bytes([b[0], b[1]]) as f64,
                (_, false) => u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f64,
                (_, true) => i32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f64,
            }
        });
        Ok(raw.map(|v| v * self.slope + self.intercept).collect())
    }
}

/// Helper to get integer value from DICOM tag
fn get_int_value(dcm: &InMemDicomObject, tag: Tag) -> Option<i32> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_int::<i32>().ok())
}

/// Helper to get u16 value from DICOM tag
fn get_u16_value(dcm: &InMemDicomObject, tag: Tag) -> Option<u16> {
    dcm.element(tag)
        .ok()
        .and_then(|elem| elem.to_int::<u16>().ok())
}

/// Helper to get decimal values from DICOM tag
///
/// Falls back to scanning the raw string when the value is not a clean
/// decimal string.
fn get_float_values(dcm: &InMemDicomObject, tag: Tag) -> Option<Vec<f64>> {
    let elem = dcm.element(tag).ok()?;
    if let Ok(values) = elem.to_multi_float64() {
        return Some(values);
    }
    elem.to_str()
        .ok()
        .map(|s| parse_decimals(&s))
        .filter(|v| !v.is_empty())
}

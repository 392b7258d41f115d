//! NIfTI-1 reading and writing through the `nifti` crate
//!
//! NIfTI stores geometry in RAS; everything leaving this module is LPS, the
//! frame the rest of the crate (and ITK) uses.

use crate::error::{RadextError, Result};
use crate::image::volume::{ImageInfo, PixelType, Volume};
use ndarray::{Array3, ShapeBuilder};
use nifti::writer::WriterOptions;
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, NiftiType, ReaderOptions};
use std::path::Path;

/// Reads only the NIfTI header
pub fn read_information(path: &Path) -> Result<ImageInfo> {
    let header = NiftiHeader::from_file(path)?;
    info_from_header(&header)
}

/// Reads and decodes a NIfTI file, applying the header's intensity scaling
pub fn read(path: &Path) -> Result<Volume> {
    let obj = ReaderOptions::new().read_file(path)?;
    let info = info_from_header(obj.header())?;

    // The array is indexed [x, y, z]; its transpose iterates x-fastest.
    let array = obj.into_volume().into_ndarray::<f64>()?;
    let data: Vec<f64> = array.t().iter().copied().collect();

    Volume::new(info, data)
}

/// Writes a volume as single-precision NIfTI with an sform
pub fn write(volume: &Volume, path: &Path) -> Result<()> {
    let [nx, ny, nz] = volume.size();
    let voxels: Vec<f32> = volume.data().iter().map(|&v| v as f32).collect();
    let array = Array3::from_shape_vec((nx, ny, nz).f(), voxels)
        .map_err(|e| RadextError::InvalidImage(format!("{}", e)))?;

    let header = header_from_info(volume.info());
    WriterOptions::new(path)
        .reference_header(&header)
        .write_nifti(&array)?;
    Ok(())
}

fn info_from_header(header: &NiftiHeader) -> Result<ImageInfo> {
    let dims = header.dim[0] as usize;
    if !(2..=7).contains(&dims) {
        return Err(RadextError::InvalidImage(format!(
            "NIfTI header declares {} dimensions",
            dims
        )));
    }
    if header.dim[4..=dims.max(3)].iter().any(|&d| d > 1) {
        return Err(RadextError::InvalidImage(
            "time series and vector NIfTI images are not supported".to_string(),
        ));
    }

    let size = [
        header.dim[1] as usize,
        header.dim[2] as usize,
        if dims >= 3 { header.dim[3].max(1) as usize } else { 1 },
    ];
    let mut info = ImageInfo::new(size, pixel_type(header)?);

    let (spacing, origin, direction) = if header.qform_code > 0 {
        qform_geometry(header)
    } else if header.sform_code > 0 {
        sform_geometry(header)
    } else {
        let spacing = [
            header.pixdim[1].abs() as f64,
            header.pixdim[2].abs() as f64,
            header.pixdim[3].abs() as f64,
        ];
        (spacing, [0.0; 3], IDENTITY)
    };

    info.spacing = spacing.map(|s| if s > 0.0 { s } else { 1.0 });
    // RAS -> LPS
    info.origin = [-origin[0], -origin[1], origin[2]];
    info.direction = direction;
    for v in info.direction[..6].iter_mut() {
        *v = -*v;
    }

    Ok(info)
}

const IDENTITY: [f64; 9] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

type Geometry = ([f64; 3], [f64; 3], [f64; 9]);

/// Quaternion form (method 2 of the NIfTI-1 standard)
fn qform_geometry(header: &NiftiHeader) -> Geometry {
    let b = header.quatern_b as f64;
    let c = header.quatern_c as f64;
    let d = header.quatern_d as f64;
    let a = (1.0 - (b * b + c * c + d * d)).max(0.0).sqrt();
    let qfac = if header.pixdim[0] < 0.0 { -1.0 } else { 1.0 };

    let direction = [
        a * a + b * b - c * c - d * d,
        2.0 * (b * c - a * d),
        2.0 * (b * d + a * c) * qfac,
        2.0 * (b * c + a * d),
        a * a + c * c - b * b - d * d,
        2.0 * (c * d - a * b) * qfac,
        2.0 * (b * d - a * c),
        2.0 * (c * d + a * b),
        (a * a + d * d - b * b - c * c) * qfac,
    ];
    let spacing = [
        header.pixdim[1].abs() as f64,
        header.pixdim[2].abs() as f64,
        header.pixdim[3].abs() as f64,
    ];
    let origin = [
        header.quatern_x as f64,
        header.quatern_y as f64,
        header.quatern_z as f64,
    ];
    (spacing, origin, direction)
}

/// Affine form (method 3 of the NIfTI-1 standard)
fn sform_geometry(header: &NiftiHeader) -> Geometry {
    let rows = [header.srow_x, header.srow_y, header.srow_z];
    let mut spacing = [0.0; 3];
    let mut direction = [0.0; 9];

    for col in 0..3 {
        let norm = rows
            .iter()
            .map(|r| (r[col] as f64).powi(2))
            .sum::<f64>()
            .sqrt();
        spacing[col] = norm;
        for (row, r) in rows.iter().enumerate() {
            direction[row * 3 + col] = if norm > 0.0 {
                r[col] as f64 / norm
            } else if row == col {
                1.0
            } else {
                0.0
            };
        }
    }
    let origin = [rows[0][3] as f64, rows[1][3] as f64, rows[2][3] as f64];
    (spacing, origin, direction)
}

fn pixel_type(header: &NiftiHeader) -> Result<PixelType> {
    let scaled = header.scl_slope != 0.0 && (header.scl_slope != 1.0 || header.scl_inter != 0.0);
    if scaled {
        return Ok(PixelType::Float64);
    }

    match header.data_type()? {
        NiftiType::Uint8 => Ok(PixelType::UInt8),
        NiftiType::Int8 => Ok(PixelType::Int8),
        NiftiType::Uint16 => Ok(PixelType::UInt16),
        NiftiType::Int16 => Ok(PixelType::Int16),
        NiftiType::Uint32 => Ok(PixelType::UInt32),
        NiftiType::Int32 => Ok(PixelType::Int32),
        NiftiType::Uint64 => Ok(PixelType::UInt64),
        NiftiType::Int64 => Ok(PixelType::Int64),
        NiftiType::Float32 => Ok(PixelType::Float32),
        NiftiType::Float64 => Ok(PixelType::Float64),
        other => Err(RadextError::UnsupportedFormat(format!(
            "NIfTI datatype {:?}",
            other
        ))),
    }
}

/// Header carrying the volume geometry as an sform, converted back to RAS
fn header_from_info(info: &ImageInfo) -> NiftiHeader {
    let mut srow = [[0f32; 4]; 3];
    for (row, out) in srow.iter_mut().enumerate() {
        let flip = if row < 2 { -1.0 } else { 1.0 };
        for col in 0..3 {
            out[col] = (flip * info.direction[row * 3 + col] * info.spacing[col]) as f32;
        }
        out[3] = (flip * info.origin[row]) as f32;
    }

    NiftiHeader {
        pixdim: [
            1.0,
            info.spacing[0] as f32,
            info.spacing[1] as f32,
            info.spacing[2] as f32,
            1.0,
            1.0,
            1.0,
            1.0,
        ],
        sform_code: 1,
        qform_code: 0,
        srow_x: srow[0],
        srow_y: srow[1],
        srow_z: srow[2],
        ..NiftiHeader::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_volume() -> Volume {
        let mut info = ImageInfo::new([3, 2, 2], PixelType::Float32);
        info.spacing = [0.5, 0.75, 2.0];
        info.origin = [-12.0, 8.0, 30.0];
        Volume::new(info, (0..12).map(f64::from).collect()).unwrap()
    }

    #[test]
    fn test_sform_geometry_extracts_spacing() {
        let header = NiftiHeader {
            sform_code: 1,
            srow_x: [-0.5, 0.0, 0.0, 10.0],
            srow_y: [0.0, -0.5, 0.0, 20.0],
            srow_z: [0.0, 0.0, 3.0, -5.0],
            ..NiftiHeader::default()
        };
        let (spacing, origin, direction) = sform_geometry(&header);

        assert_eq!(spacing, [0.5, 0.5, 3.0]);
        assert_eq!(origin, [10.0, 20.0, -5.0]);
        assert_eq!(direction[0], -1.0);
        assert_eq!(direction[4], -1.0);
        assert_eq!(direction[8], 1.0);
    }

    #[test]
    fn test_identity_qform() {
        let header = NiftiHeader {
            qform_code: 1,
            pixdim: [1.0, 0.8, 0.8, 4.0, 0.0, 0.0, 0.0, 0.0],
            ..NiftiHeader::default()
        };
        let (spacing, _, direction) = qform_geometry(&header);

        assert_eq!(spacing, [0.8f32 as f64, 0.8f32 as f64, 4.0]);
        assert_eq!(direction, IDENTITY);
    }

    #[test]
    fn test_header_round_trip_geometry() {
        let volume = sample_volume();
        let header = header_from_info(volume.info());
        let (spacing, origin, direction) = sform_geometry(&header);

        assert_eq!(spacing, [0.5, 0.75, 2.0]);
        // LPS (-12, 8, 30) is RAS (12, -8, 30)
        assert_eq!(origin, [12.0, -8.0, 30.0]);
        assert_eq!(direction[0], -1.0);
        assert_eq!(direction[4], -1.0);
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("volume.nii");
        let volume = sample_volume();

        write(&volume, &path).unwrap();

        let header_only = read_information(&path).unwrap();
        assert_eq!(header_only.size, [3, 2, 2]);
        assert_eq!(header_only.pixel_type, PixelType::Float32);

        let loaded = read(&path).unwrap();
        assert_eq!(loaded.size(), [3, 2, 2]);
        assert_eq!(loaded.get([2, 0, 0]), 2.0);
        assert_eq!(loaded.get([0, 1, 1]), 9.0);
        assert_eq!(loaded.info().origin, [-12.0, 8.0, 30.0]);
    }
}

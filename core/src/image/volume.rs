use crate::error::{RadextError, Result};
use std::fmt;

/// On-disk voxel type of an image
///
/// Voxels are always held as `f64` in memory; the pixel type records what the
/// file stored so backends can restore it when handing the volume on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum PixelType {
    UInt8,
    Int8,
    UInt16,
    Int16,
    UInt32,
    Int32,
    UInt64,
    Int64,
    Float32,
    Float64,
}

impl PixelType {
    /// numpy dtype name for this pixel type
    pub fn numpy_dtype(&self) -> &'static str {
        match self {
            PixelType::UInt8 => "uint8",
            PixelType::Int8 => "int8",
            PixelType::UInt16 => "uint16",
            PixelType::Int16 => "int16",
            PixelType::UInt32 => "uint32",
            PixelType::Int32 => "int32",
            PixelType::UInt64 => "uint64",
            PixelType::Int64 => "int64",
            PixelType::Float32 => "float32",
            PixelType::Float64 => "float64",
        }
    }

    /// Parses ITK's pixel ID description, e.g. "16-bit signed integer"
    pub fn from_itk_name(name: &str) -> Option<Self> {
        let pixel_type = match name.trim() {
            "8-bit unsigned integer" => PixelType::UInt8,
            "8-bit signed integer" => PixelType::Int8,
            "16-bit unsigned integer" => PixelType::UInt16,
            "16-bit signed integer" => PixelType::Int16,
            "32-bit unsigned integer" => PixelType::UInt32,
            "32-bit signed integer" => PixelType::Int32,
            "64-bit unsigned integer" => PixelType::UInt64,
            "64-bit signed integer" => PixelType::Int64,
            "32-bit float" => PixelType::Float32,
            "64-bit float" => PixelType::Float64,
            _ => return None,
        };
        Some(pixel_type)
    }

    /// Smallest and largest representable values
    pub fn range(&self) -> (f64, f64) {
        match self {
            PixelType::UInt8 => (0.0, u8::MAX as f64),
            PixelType::Int8 => (i8::MIN as f64, i8::MAX as f64),
            PixelType::UInt16 => (0.0, u16::MAX as f64),
            PixelType::Int16 => (i16::MIN as f64, i16::MAX as f64),
            PixelType::UInt32 => (0.0, u32::MAX as f64),
            PixelType::Int32 => (i32::MIN as f64, i32::MAX as f64),
            PixelType::UInt64 => (0.0, u64::MAX as f64),
            PixelType::Int64 => (i64::MIN as f64, i64::MAX as f64),
            PixelType::Float32 => (f32::MIN as f64, f32::MAX as f64),
            PixelType::Float64 => (f64::MIN, f64::MAX),
        }
    }

    /// Converts a value the way storing it in this type would
    ///
    /// Integer types truncate toward zero and saturate at their range;
    /// `Float32` rounds to single precision. NaN becomes 0 for integers.
    pub fn convert(&self, value: f64) -> f64 {
        match self {
            PixelType::Float64 => value,
            PixelType::Float32 => value as f32 as f64,
            _ if value.is_nan() => 0.0,
            _ => {
                let (lo, hi) = self.range();
                value.trunc().clamp(lo, hi)
            }
        }
    }
}

impl fmt::Display for PixelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.numpy_dtype())
    }
}

const IDENTITY: [f64; 9] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

/// Header-level description of a volume
///
/// Geometry follows ITK conventions: `origin` and `direction` live in the LPS
/// world frame, `direction` is row-major and its columns are the index axes.
/// Two-dimensional images are promoted to a depth of one.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ImageInfo {
    /// Voxel counts along x, y, z
    pub size: [usize; 3],

    /// Physical distance between voxel centers along each index axis
    pub spacing: [f64; 3],

    /// Physical position of voxel (0, 0, 0)
    pub origin: [f64; 3],

    /// Row-major 3x3 direction cosines
    pub direction: [f64; 9],

    /// Voxel type stored in the file
    pub pixel_type: PixelType,
}

impl ImageInfo {
    /// Creates an info with unit spacing, zero origin and identity direction
    pub fn new(size: [usize; 3], pixel_type: PixelType) -> Self {
        Self {
            size,
            spacing: [1.0; 3],
            origin: [0.0; 3],
            direction: IDENTITY,
            pixel_type,
        }
    }

    /// Builds an info from 2-D or 3-D header vectors
    ///
    /// `direction` must hold `dims * dims` row-major entries. A 2-D image is
    /// embedded in 3-D with unit spacing and an identity third axis.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimension is not 2 or 3 or the vector lengths
    /// disagree with it.
    pub fn from_parts(
        size: &[usize],
        spacing: &[f64],
        origin: &[f64],
        direction: &[f64],
        pixel_type: PixelType,
    ) -> Result<Self> {
        let dims = size.len();
        if !(2..=3).contains(&dims) {
            return Err(RadextError::InvalidImage(format!(
                "expected a 2-D or 3-D image, found {} dimensions",
                dims
            )));
        }
        if spacing.len() != dims || origin.len() != dims || direction.len() != dims * dims {
            return Err(RadextError::InvalidImage(format!(
                "header vectors do not match dimension {}",
                dims
            )));
        }

        let mut info = Self::new([1; 3], pixel_type);
        for axis in 0..dims {
            info.size[axis] = size[axis];
            info.spacing[axis] = spacing[axis];
            info.origin[axis] = origin[axis];
            for col in 0..dims {
                info.direction[axis * 3 + col] = direction[axis * dims + col];
            }
        }
        Ok(info)
    }

    /// Total number of voxels
    pub fn voxel_count(&self) -> usize {
        self.size.iter().product()
    }

    /// Maps a voxel index to its physical position
    pub fn index_to_physical(&self, index: [usize; 3]) -> [f64; 3] {
        let mut point = self.origin;
        for (row, coord) in point.iter_mut().enumerate() {
            for axis in 0..3 {
                *coord += self.direction[row * 3 + axis] * self.spacing[axis] * index[axis] as f64;
            }
        }
        point
    }
}

impl fmt::Display for ImageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}x{} {} spacing {:?} origin {:?}",
            self.size[0], self.size[1], self.size[2], self.pixel_type, self.spacing, self.origin
        )
    }
}

/// Decoded image volume
///
/// Voxels are stored x-fastest: the voxel at `[x, y, z]` sits at
/// `x + nx * (y + ny * z)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    info: ImageInfo,
    data: Vec<f64>,
}

impl Volume {
    /// Creates a volume from its header and voxels
    ///
    /// # Errors
    ///
    /// Returns an error if `data` does not hold exactly one value per voxel.
    pub fn new(info: ImageInfo, data: Vec<f64>) -> Result<Self> {
        if data.len() != info.voxel_count() {
            return Err(RadextError::InvalidImage(format!(
                "expected {} voxels for size {:?}, found {}",
                info.voxel_count(),
                info.size,
                data.len()
            )));
        }
        Ok(Self { info, data })
    }

    /// Creates a zero-filled volume
    pub fn zeros(info: ImageInfo) -> Self {
        let data = vec![0.0; info.voxel_count()];
        Self { info, data }
    }

    pub fn info(&self) -> &ImageInfo {
        &self.info
    }

    pub fn size(&self) -> [usize; 3] {
        self.info.size
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f64> {
        self.data
    }

    /// Linear offset of a voxel index
    #[inline]
    pub fn offset(&self, index: [usize; 3]) -> usize {
        let [nx, ny, _] = self.info.size;
        index[0] + nx * (index[1] + ny * index[2])
    }

    /// Value at a voxel index
    ///
    /// Panics if the index is out of bounds.
    #[inline]
    pub fn get(&self, index: [usize; 3]) -> f64 {
        self.data[self.offset(index)]
    }

    /// Returns a copy relabelled with a different pixel type
    pub fn with_pixel_type(mut self, pixel_type: PixelType) -> Self {
        self.info.pixel_type = pixel_type;
        self
    }

    /// Converts every voxel to `pixel_type` and relabels the volume
    pub fn cast(&self, pixel_type: PixelType) -> Self {
        self.map(|v| pixel_type.convert(v)).with_pixel_type(pixel_type)
    }

    /// Applies `f` to every voxel, keeping the geometry
    pub fn map<F: Fn(f64) -> f64>(&self, f: F) -> Self {
        Self {
            info: self.info.clone(),
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Voxels as little-endian `f64` bytes, x-fastest
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.data.iter().flat_map(|v| v.to_le_bytes()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_promotes_2d() {
        let info = ImageInfo::from_parts(
            &[4, 3],
            &[0.5, 0.25],
            &[10.0, -2.0],
            &[0.0, 1.0, 1.0, 0.0],
            PixelType::Int16,
        )
        .unwrap();

        assert_eq!(info.size, [4, 3, 1]);
        assert_eq!(info.spacing, [0.5, 0.25, 1.0]);
        assert_eq!(info.origin, [10.0, -2.0, 0.0]);
        assert_eq!(
            info.direction,
            [0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn test_from_parts_rejects_4d() {
        let result = ImageInfo::from_parts(
            &[2, 2, 2, 2],
            &[1.0; 4],
            &[0.0; 4],
            &[0.0; 16],
            PixelType::UInt8,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_index_to_physical() {
        let mut info = ImageInfo::new([10, 10, 10], PixelType::Float32);
        info.spacing = [0.5, 2.0, 3.0];
        info.origin = [1.0, 1.0, 1.0];

        assert_eq!(info.index_to_physical([2, 1, 1]), [2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_volume_rejects_wrong_length() {
        let info = ImageInfo::new([2, 2, 2], PixelType::UInt8);
        assert!(Volume::new(info, vec![0.0; 7]).is_err());
    }

    #[test]
    fn test_volume_offset_is_x_fastest() {
        let info = ImageInfo::new([3, 2, 2], PixelType::UInt8);
        let volume = Volume::new(info, (0..12).map(f64::from).collect()).unwrap();

        assert_eq!(volume.get([1, 0, 0]), 1.0);
        assert_eq!(volume.get([0, 1, 0]), 3.0);
        assert_eq!(volume.get([0, 0, 1]), 6.0);
        assert_eq!(volume.get([2, 1, 1]), 11.0);
    }

    #[test]
    fn test_itk_pixel_names() {
        assert_eq!(
            PixelType::from_itk_name("16-bit signed integer"),
            Some(PixelType::Int16)
        );
        assert_eq!(PixelType::from_itk_name("vector of 32-bit float"), None);
    }

    #[test]
    fn test_cast_truncates_and_saturates() {
        let info = ImageInfo::new([6, 1, 1], PixelType::Float32);
        let volume = Volume::new(info, vec![136.6, 137.0, -2.5, 70000.0, 0.99, f64::NAN]).unwrap();

        let cast = volume.cast(PixelType::UInt16);

        assert_eq!(cast.info().pixel_type, PixelType::UInt16);
        assert_eq!(cast.data(), &[136.0, 137.0, 0.0, 65535.0, 0.0, 0.0]);
    }

    #[test]
    fn test_cast_signed_and_float() {
        let info = ImageInfo::new([3, 1, 1], PixelType::Float64);
        let volume = Volume::new(info, vec![-1.7, 200.2, 0.1]).unwrap();

        assert_eq!(volume.cast(PixelType::Int8).data(), &[-1.0, 127.0, 0.0]);
        assert_eq!(
            volume.cast(PixelType::Float32).data(),
            &[-1.7f32 as f64, 200.2f32 as f64, 0.1f32 as f64]
        );
        assert_eq!(volume.cast(PixelType::Float64).data(), volume.data());
    }
}

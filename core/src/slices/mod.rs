//! Largest-slice selection and intensity normalization
//!
//! Finds the slice where a label covers the most voxels, rescales the masked
//! image and writes the volume plus that slice for downstream 2-D analysis.

mod naming;
mod ops;

pub use naming::{output_stem, OutputPaths};
pub use ops::{extract_slice, multiply, rescale_intensity};

use crate::config::SliceSelectConfig;
use crate::error::Result;
use crate::image::{ImageWriter, PixelType, Volume};
use log::{debug, info};
use std::fmt;

/// Slicing plane, named after the index axis it walks
///
/// Axis 0 is treated as coronal, 1 as axial and 2 as sagittal, matching
/// how the reference scans are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub enum Plane {
    Coronal,
    Axial,
    Sagittal,
}

impl Plane {
    /// Index axis perpendicular to the plane
    pub fn axis(&self) -> usize {
        match self {
            Plane::Coronal => 0,
            Plane::Axial => 1,
            Plane::Sagittal => 2,
        }
    }

    pub fn simple_name(&self) -> &'static str {
        match self {
            Plane::Coronal => "coronal",
            Plane::Axial => "axial",
            Plane::Sagittal => "sagittal",
        }
    }
}

impl fmt::Display for Plane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())
    }
}

/// Result of scanning a label volume slice by slice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct SliceSelection {
    /// First slice with the largest label sum, 0 for an empty label
    pub biggest: usize,

    /// Number of slices the label touches
    pub width: usize,

    /// `biggest - width / 4`, rounded and kept inside the volume
    pub first: usize,

    /// `biggest + width / 4`, rounded and kept inside the volume
    pub last: usize,

    /// Slices along the plane's axis
    pub num_slices: usize,
}

/// Scans `label` along `plane` for the slice with the largest sum
///
/// Slice sums are truncated to whole numbers before comparison.
pub fn largest_slice(label: &Volume, plane: Plane) -> SliceSelection {
    let axis = plane.axis();
    let size = label.size();
    let num_slices = size[axis];

    let mut sums = vec![0.0; num_slices];
    for z in 0..size[2] {
        for y in 0..size[1] {
            for x in 0..size[0] {
                let index = [x, y, z];
                sums[index[axis]] += label.get(index);
            }
        }
    }

    let mut biggest = 0;
    let mut biggest_sum = 0u64;
    let mut width = 0;
    for (slice, &sum) in sums.iter().enumerate() {
        // saturating cast, negative sums count as empty
        let sum = sum as u64;
        if sum != 0 {
            width += 1;
        }
        if sum > biggest_sum {
            biggest_sum = sum;
            biggest = slice;
        }
    }

    let upper = num_slices.saturating_sub(1) as f64;
    let around = |delta: f64| (biggest as f64 + delta).round().clamp(0.0, upper) as usize;
    let quarter = 0.25 * width as f64;

    SliceSelection {
        biggest,
        width,
        first: around(-quarter),
        last: around(quarter),
        num_slices,
    }
}

/// Volumes produced by one selector run
#[derive(Debug, Clone, PartialEq)]
pub struct SliceOutputs {
    pub selection: SliceSelection,

    /// Masked image rescaled onto the configured range
    pub normalized: Volume,

    /// Normalized slice multiplied by the label slice
    pub slice: Volume,

    pub slice_label: Volume,
}

impl SliceOutputs {
    /// Writes all three volumes as 32-bit float
    pub fn write(&self, writer: &dyn ImageWriter, paths: &OutputPaths) -> Result<()> {
        for (volume, path) in [
            (&self.normalized, &paths.normalized),
            (&self.slice, &paths.slice),
            (&self.slice_label, &paths.slice_label),
        ] {
            let float = volume.clone().with_pixel_type(PixelType::Float32);
            writer.write(&float, path)?;
            info!("Wrote {}", path.display());
        }
        Ok(())
    }
}

/// Selects the largest label slice and normalizes the masked image
///
/// `image` is expected to be bias corrected already when that is wanted.
///
/// # Errors
///
/// Returns an error if image and label sizes differ.
pub fn select_and_normalize(
    image: &Volume,
    label: &Volume,
    config: &SliceSelectConfig,
) -> Result<SliceOutputs> {
    let selection = largest_slice(label, config.plane);
    debug!(
        "{} slices along the {} axis",
        selection.num_slices, config.plane
    );
    info!(
        "Biggest slice: {}. Width: {}. Selected slices: {}, {}, {}",
        selection.biggest, selection.width, selection.first, selection.biggest, selection.last
    );

    let masked = multiply(image, label)?;
    let normalized = rescale_intensity(&masked, config.min, config.max);

    let image_slice = extract_slice(&normalized, config.plane, selection.biggest)?;
    let slice_label = extract_slice(label, config.plane, selection.biggest)?;
    let slice = multiply(&image_slice, &slice_label)?;

    Ok(SliceOutputs {
        selection,
        normalized,
        slice,
        slice_label,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RadextError;
    use crate::image::{nii, ImageInfo, ImageReader, NativeReader, NativeWriter};
    use tempfile::TempDir;

    /// 6 coronal slices; the label covers slices 1..=4 with 4 voxels on slice 3
    fn label_volume() -> Volume {
        let info = ImageInfo::new([6, 2, 2], PixelType::UInt8);
        let layout = Volume::zeros(info.clone());
        let mut data = vec![0.0; info.voxel_count()];
        for index in [
            [1, 0, 0],
            [2, 0, 0],
            [2, 1, 0],
            [3, 0, 0],
            [3, 1, 0],
            [3, 0, 1],
            [3, 1, 1],
            [4, 1, 1],
        ] {
            data[layout.offset(index)] = 1.0;
        }
        Volume::new(info, data).unwrap()
    }

    #[test]
    fn test_largest_slice() {
        let selection = largest_slice(&label_volume(), Plane::Coronal);

        assert_eq!(selection.num_slices, 6);
        assert_eq!(selection.biggest, 3);
        assert_eq!(selection.width, 4);
        assert_eq!(selection.first, 2);
        assert_eq!(selection.last, 4);
    }

    #[test]
    fn test_largest_slice_first_maximum_wins() {
        let info = ImageInfo::new([1, 4, 1], PixelType::UInt8);
        let label = Volume::new(info, vec![0.0, 2.0, 1.0, 2.0]).unwrap();

        let selection = largest_slice(&label, Plane::Axial);
        assert_eq!(selection.biggest, 1);
        assert_eq!(selection.width, 3);
    }

    #[test]
    fn test_largest_slice_empty_label() {
        let label = Volume::zeros(ImageInfo::new([4, 4, 4], PixelType::UInt8));
        let selection = largest_slice(&label, Plane::Sagittal);

        assert_eq!(
            selection,
            SliceSelection {
                biggest: 0,
                width: 0,
                first: 0,
                last: 0,
                num_slices: 4,
            }
        );
    }

    #[test]
    fn test_largest_slice_clamps_range() {
        // 8 touched slices around slice 0 would put `first` at -2
        let info = ImageInfo::new([8, 1, 1], PixelType::UInt8);
        let label = Volume::new(info, vec![3.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]).unwrap();

        let selection = largest_slice(&label, Plane::Coronal);
        assert_eq!(selection.biggest, 0);
        assert_eq!(selection.first, 0);
        assert_eq!(selection.last, 2);
    }

    #[test]
    fn test_select_and_normalize() {
        let label = label_volume();
        let image = label.map(|_| 127.0).with_pixel_type(PixelType::UInt16);
        let config = SliceSelectConfig::default();

        let outputs = select_and_normalize(&image, &label, &config).unwrap();

        // masked values are 0 or 127, rescaled onto 1 and 128
        assert!(outputs
            .normalized
            .data()
            .iter()
            .all(|&v| v == 1.0 || v == 128.0));
        assert_eq!(outputs.slice.size(), [1, 2, 2]);
        assert_eq!(outputs.slice.data(), &[128.0; 4]);
        assert_eq!(outputs.slice_label.data(), &[1.0; 4]);
    }

    #[test]
    fn test_select_and_normalize_size_mismatch() {
        let label = label_volume();
        let image = Volume::zeros(ImageInfo::new([6, 2, 1], PixelType::UInt16));

        let result = select_and_normalize(&image, &label, &SliceSelectConfig::default());
        assert!(matches!(result, Err(RadextError::GeometryMismatch(_))));
    }

    #[test]
    fn test_write_outputs_as_float() {
        let temp_dir = TempDir::new().unwrap();
        let image_path = temp_dir.path().join("0692604I-short.nii");
        let label = label_volume();
        let image = label.map(|v| v * 40.0);
        nii::write(&image, &image_path).unwrap();

        let outputs =
            select_and_normalize(&image, &label, &SliceSelectConfig::default()).unwrap();
        let paths = OutputPaths::for_image(&image_path, "nii");
        outputs.write(&NativeWriter, &paths).unwrap();

        let written = NativeReader.read(&paths.slice_label).unwrap();
        assert_eq!(written.info().pixel_type, PixelType::Float32);
        assert_eq!(written.size(), [1, 2, 2]);
        assert!(paths.normalized.exists());
        assert!(paths.slice.exists());
    }
}

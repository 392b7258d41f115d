use crate::error::{RadextError, Result};
use crate::image::Volume;

use super::Plane;

/// Linearly maps the volume's value range onto `[min, max]`
///
/// Mapped values are truncated toward zero and clamped, which is what an
/// integer-typed ITK rescale produces. A constant volume maps to `min`.
pub fn rescale_intensity(volume: &Volume, min: f64, max: f64) -> Volume {
    let data = volume.data();
    if data.is_empty() {
        return volume.clone();
    }

    let (vmin, vmax) = data
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    let factor = if vmax != vmin {
        (max - min) / (vmax - vmin)
    } else if vmax != 0.0 {
        (max - min) / vmax
    } else {
        0.0
    };
    let offset = min - vmin * factor;

    volume.map(|v| (v * factor + offset).trunc().clamp(min, max))
}

/// Voxelwise product of two volumes of the same size
///
/// The result carries `a`'s geometry.
pub fn multiply(a: &Volume, b: &Volume) -> Result<Volume> {
    if a.size() != b.size() {
        return Err(RadextError::GeometryMismatch(format!(
            "cannot multiply {:?} by {:?}",
            a.size(),
            b.size()
        )));
    }

    let data = a
        .data()
        .iter()
        .zip(b.data())
        .map(|(x, y)| x * y)
        .collect();
    Volume::new(a.info().clone(), data)
}

/// Cuts slice `index` out of `volume` along `plane`
///
/// The result keeps three dimensions with a size of one along the plane's
/// axis; its origin is the physical position of the slice's first voxel.
pub fn extract_slice(volume: &Volume, plane: Plane, index: usize) -> Result<Volume> {
    let axis = plane.axis();
    let size = volume.size();
    if index >= size[axis] {
        return Err(RadextError::InvalidImage(format!(
            "slice {} is outside {} slices along {}",
            index, size[axis], plane
        )));
    }

    let mut start = [0; 3];
    start[axis] = index;

    let mut info = volume.info().clone();
    info.size[axis] = 1;
    info.origin = volume.info().index_to_physical(start);

    let [nx, ny, nz] = info.size;
    let mut data = Vec::with_capacity(info.voxel_count());
    for z in 0..nz {
        for y in 0..ny {
            for x in 0..nx {
                let mut source = [x, y, z];
                source[axis] += index;
                data.push(volume.get(source));
            }
        }
    }

    Volume::new(info, data)
}

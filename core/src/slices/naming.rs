use crate::error::Result;
use crate::image::{unsupported, ImageWriter};
use std::path::{Path, PathBuf};

/// Patient stem of an image file name
///
/// Drops the extension (both parts of `.nii.gz`) and everything from the
/// last `-` on, so `0692604I-short.nrrd` gives `0692604I`. Names without a
/// `-` keep their whole stem.
pub fn output_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let without_gz = name.strip_suffix(".gz").unwrap_or(&name);
    let stem = match without_gz.rfind('.') {
        Some(dot) if dot > 0 => &without_gz[..dot],
        _ => without_gz,
    };

    match stem.rfind('-') {
        Some(dash) => stem[..dash].to_string(),
        None => stem.to_string(),
    }
}

/// The three files written next to the input image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Masked, rescaled volume
    pub normalized: PathBuf,

    /// Masked slice of the normalized volume
    pub slice: PathBuf,

    /// Label slice
    pub slice_label: PathBuf,
}

impl OutputPaths {
    /// Derives output names from the image path and an extension
    pub fn for_image(image: &Path, extension: &str) -> Self {
        let dir = match image.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let stem = output_stem(image);
        let extension = extension.trim_start_matches('.');

        Self {
            normalized: dir.join(format!("{}-norm.{}", stem, extension)),
            slice: dir.join(format!("{}-bigstSlice.{}", stem, extension)),
            slice_label: dir.join(format!("{}-bigstSlice-label.{}", stem, extension)),
        }
    }

    /// Fails unless `writer` can produce every output path
    pub fn check_writable(&self, writer: &dyn ImageWriter) -> Result<()> {
        for path in [&self.normalized, &self.slice, &self.slice_label] {
            if !writer.supports(path) {
                return Err(unsupported(path));
            }
        }
        Ok(())
    }
}

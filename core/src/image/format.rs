use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Image file formats the native backend recognises
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// `.nii` or `.nii.gz`
    Nifti,
    /// Single-file DICOM
    Dicom,
    /// Anything else (NRRD, MHA, ...), left to other backends
    Other,
}

impl ImageFormat {
    /// Detects the format from the file name, falling back to the DICOM magic
    /// for files without an extension
    pub fn detect(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if name.ends_with(".nii") || name.ends_with(".nii.gz") {
            return ImageFormat::Nifti;
        }

        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("dcm") || ext.eq_ignore_ascii_case("dicom") => {
                ImageFormat::Dicom
            }
            Some(_) => ImageFormat::Other,
            None if is_dicom_file(path) => ImageFormat::Dicom,
            None => ImageFormat::Other,
        }
    }

    /// Returns whether the NIfTI writer can produce this file name
    pub fn is_nifti_name(path: &Path) -> bool {
        Self::detect(path) == ImageFormat::Nifti
    }
}

/// Checks if a file has a DICOM header
///
/// Looks for the 4-byte "DICM" magic after the 128-byte preamble.
pub fn is_dicom_file(path: &Path) -> bool {
    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return false,
    };

    let mut buffer = [0u8; 132];
    match file.read(&mut buffer) {
        Ok(n) if n >= 132 => &buffer[128..132] == b"DICM",
        _ => false,
    }
}

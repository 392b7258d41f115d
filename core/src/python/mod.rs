//! Embedded-Python backends
//!
//! pyradiomics and SimpleITK are reached through an interpreter embedded
//! with PyO3. Every entry point takes the GIL for the duration of the call.

mod convert;
mod extractor;
mod image;
mod radiomics_log;

pub use convert::{from_sitk, info_from_sitk, to_sitk};
pub use extractor::{radiomics_version, PyRadiomicsExtractor};
pub use image::{n4_bias_correct, SimpleItkReader, SimpleItkWriter};
pub use radiomics_log::attach_radiomics_log;

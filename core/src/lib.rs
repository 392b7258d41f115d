pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod extraction;
pub mod image;
pub mod logging;
pub mod output;
pub mod slices;
pub mod types;

#[cfg(feature = "python")]
pub mod python;

pub use api::{ExtractionRequest, RadiomicsPipeline, RunSummary};
pub use cli::report::TextReport;
pub use config::{ExtractionConfig, SliceSelectConfig};
pub use error::{RadextError, Result};
pub use extraction::{default_extractor, Feature, FeatureExtractor, FeatureMap, FeatureValue};
pub use image::{
    AutoReader, AutoWriter, ImageFormat, ImageInfo, ImageReader, ImageWriter, NativeReader,
    NativeWriter, PixelType, Volume,
};
pub use output::CsvAppender;
pub use slices::{select_and_normalize, OutputPaths, Plane, SliceOutputs, SliceSelection};
pub use types::*;

use crate::config::ExtractionConfig;
use crate::error::Result;
use crate::extraction::FeatureExtractor;
use crate::image::ImageReader;
use crate::output::CsvAppender;
use crate::types::{OutputRow, RowBuilder};
use log::{debug, info};
use std::path::PathBuf;

/// Inputs of one run
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ExtractionRequest {
    /// Image file
    pub image: PathBuf,

    /// Label (mask) file
    pub mask: PathBuf,

    /// Identifier written in the patient column
    pub patient_id: String,
}

impl ExtractionRequest {
    pub fn new(image: impl Into<PathBuf>, mask: impl Into<PathBuf>, patient_id: &str) -> Self {
        Self {
            image: image.into(),
            mask: mask.into(),
            patient_id: patient_id.to_string(),
        }
    }
}

/// What a completed run produced
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct RunSummary {
    pub request: ExtractionRequest,

    /// Entries in the extractor's result mapping
    pub entries_returned: usize,

    /// The row that was appended
    pub row: OutputRow,

    /// File the row was appended to
    pub output: PathBuf,
}

impl RunSummary {
    /// Number of columns written, including the patient column
    pub fn feature_count(&self) -> usize {
        self.row.len()
    }
}

/// Load, extract, filter, append
///
/// Holds the injected reader and extractor plus the configured row policy
/// and output file. Each [`run`](Self::run) is independent.
pub struct RadiomicsPipeline {
    reader: Box<dyn ImageReader>,
    extractor: Box<dyn FeatureExtractor>,
    rows: RowBuilder,
    appender: CsvAppender,
}

impl RadiomicsPipeline {
    pub fn new(
        config: &ExtractionConfig,
        reader: Box<dyn ImageReader>,
        extractor: Box<dyn FeatureExtractor>,
    ) -> Self {
        Self {
            reader,
            extractor,
            rows: RowBuilder::new(config.filter),
            appender: CsvAppender::new(config.output.clone()),
        }
    }

    /// Runs the pipeline for one (image, mask, patient) triple
    ///
    /// # Errors
    ///
    /// Any loader, extractor or output failure ends the run; nothing is
    /// retried and a failure before the append leaves the output untouched.
    pub fn run(&self, request: &ExtractionRequest) -> Result<RunSummary> {
        info!(
            "Extracting features for patient {} ({} / {})",
            request.patient_id,
            request.image.display(),
            request.mask.display()
        );

        let image = self.reader.execute(&request.image)?;
        let mask = self.reader.execute(&request.mask)?;

        let results = self.extractor.execute(&image, &mask)?;
        debug!("Extractor returned {} entries", results.len());

        let row = self.rows.build(&request.patient_id, &results);
        info!(
            "Kept {} of {} entries with {:?}",
            row.len() - 1,
            results.len(),
            self.rows.policy()
        );

        self.appender.append(&row)?;

        Ok(RunSummary {
            request: request.clone(),
            entries_returned: results.len(),
            row,
            output: self.appender.path().to_path_buf(),
        })
    }
}

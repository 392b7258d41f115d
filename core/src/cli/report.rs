use crate::api::RunSummary;
use std::fmt;

/// Text report formatter for a completed extraction run
pub struct TextReport<'a> {
    summary: &'a RunSummary,
}

impl<'a> TextReport<'a> {
    /// Creates a new text report
    pub fn new(summary: &'a RunSummary) -> Self {
        Self { summary }
    }
}

impl<'a> fmt::Display for TextReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let request = &self.summary.request;

        writeln!(f, "done")?;
        writeln!(f, "Patient:        {}", request.patient_id)?;
        writeln!(f, "Image:          {}", request.image.display())?;
        writeln!(f, "Mask:           {}", request.mask.display())?;
        writeln!(f, "Entries:        {}", self.summary.entries_returned)?;
        writeln!(f, "Output:         {}", self.summary.output.display())?;
        writeln!(
            f,
            "Total number of features extracted: {}.",
            self.summary.feature_count()
        )?;

        Ok(())
    }
}

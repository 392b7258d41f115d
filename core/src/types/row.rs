use crate::extraction::FeatureMap;
use crate::types::FilterPolicy;

/// Name of the synthetic leading column
pub const PATIENT_COLUMN: &str = "Patients";

/// One patient's output row: parallel column names and values
///
/// Both sequences always have the same length and start with the patient
/// column.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct OutputRow {
    names: Vec<String>,
    values: Vec<String>,
}

impl OutputRow {
    /// Starts a row holding only the patient column
    pub fn new(patient_id: &str) -> Self {
        Self {
            names: vec![PATIENT_COLUMN.to_string()],
            values: vec![patient_id.to_string()],
        }
    }

    /// Appends a column
    pub fn push(&mut self, name: impl Into<String>, value: impl ToString) {
        self.names.push(name.into());
        self.values.push(value.to_string());
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn patient_id(&self) -> &str {
        &self.values[0]
    }

    /// Number of columns, including the patient column
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false: the patient column is present from construction
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Column names joined with commas
    ///
    /// Nothing is quoted or escaped.
    pub fn header_line(&self) -> String {
        self.names.join(",")
    }

    /// Values joined with commas
    pub fn value_line(&self) -> String {
        self.values.join(",")
    }
}

/// Turns a result mapping into an [`OutputRow`]
///
/// # Example
///
/// ```
/// use radext_core::{FeatureMap, FilterPolicy, RowBuilder};
///
/// let mut map = FeatureMap::new();
/// map.push("diagnostics_Versions_PyRadiomics", "v3.1.0");
/// map.push("original_firstorder_Mean", 5.0);
///
/// let row = RowBuilder::new(FilterPolicy::skip_leading(1)).build("P01", &map);
/// assert_eq!(row.header_line(), "Patients,original_firstorder_Mean");
/// assert_eq!(row.value_line(), "P01,5.0");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RowBuilder {
    policy: FilterPolicy,
}

impl RowBuilder {
    pub fn new(policy: FilterPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> FilterPolicy {
        self.policy
    }

    /// Builds the row for `patient_id` from the kept entries of `map`
    pub fn build(&self, patient_id: &str, map: &FeatureMap) -> OutputRow {
        let mut row = OutputRow::new(patient_id);
        for feature in self.policy.apply(map) {
            row.push(feature.name.clone(), &feature.value);
        }
        row
    }
}

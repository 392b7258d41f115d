//! Feature extraction seam
//!
//! The extractor itself is an external library; radext only hands it an
//! image and a mask and keeps whatever ordered mapping comes back.

mod value;

pub use value::FeatureValue;

use crate::error::Result;
use crate::image::Volume;
use std::path::Path;

/// Name/value pair of a result mapping
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Feature {
    pub name: String,
    pub value: FeatureValue,
}

impl Feature {
    pub fn new(name: impl Into<String>, value: impl Into<FeatureValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Ordered result mapping returned by an extractor
///
/// Insertion order is preserved; pyradiomics puts its diagnostic entries
/// first and the computed features after them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureMap {
    entries: Vec<Feature>,
}

impl FeatureMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry at the end
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<FeatureValue>) {
        self.entries.push(Feature::new(name, value));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a FeatureMap {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<N: Into<String>, V: Into<FeatureValue>> FromIterator<(N, V)> for FeatureMap {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, value)| Feature::new(name, value))
                .collect(),
        }
    }
}

/// Computes a feature panel for an (image, mask) pair
pub trait FeatureExtractor {
    /// Runs the extractor and returns its ordered result mapping
    fn execute(&self, image: &Volume, mask: &Volume) -> Result<FeatureMap>;
}

impl<E: FeatureExtractor + ?Sized> FeatureExtractor for Box<E> {
    fn execute(&self, image: &Volume, mask: &Volume) -> Result<FeatureMap> {
        (**self).execute(image, mask)
    }
}

/// Builds the production extractor for a parameter file
///
/// # Errors
///
/// Returns `FeatureDisabled` when built without the `python` feature, or the
/// interpreter error if pyradiomics cannot be set up.
pub fn default_extractor(params: &Path) -> Result<Box<dyn FeatureExtractor>> {
    #[cfg(feature = "python")]
    {
        let extractor = crate::python::PyRadiomicsExtractor::new(params)?;
        Ok(Box::new(extractor))
    }
    #[cfg(not(feature = "python"))]
    {
        let _ = params;
        Err(crate::error::RadextError::FeatureDisabled(
            "Feature extraction".to_string(),
            "python",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_map_keeps_insertion_order() {
        let map: FeatureMap = vec![
            ("diagnostics_Versions_PyRadiomics", FeatureValue::from("v3.1.0")),
            ("original_firstorder_Mean", FeatureValue::from(5.0)),
            ("original_firstorder_Energy", FeatureValue::from(12.5)),
        ]
        .into_iter()
        .collect();

        let names: Vec<&str> = map.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "diagnostics_Versions_PyRadiomics",
                "original_firstorder_Mean",
                "original_firstorder_Energy"
            ]
        );
        assert_eq!(map.len(), 3);
        assert_eq!(
            map.iter().nth(1).map(|f| &f.value),
            Some(&FeatureValue::Float(5.0))
        );
    }

    #[cfg(not(feature = "python"))]
    #[test]
    fn test_default_extractor_needs_python() {
        let result = default_extractor(Path::new("params.yaml"));
        assert!(matches!(
            result,
            Err(crate::error::RadextError::FeatureDisabled(_, "python"))
        ));
    }
}

use crate::extraction::{Feature, FeatureMap};

/// Number of diagnostic entries pyradiomics puts ahead of the features
pub const DIAGNOSTIC_ENTRY_COUNT: usize = 32;

/// How entries of a result mapping become output columns
///
/// The default skips a fixed number of leading entries by position. That
/// rule is fragile: if the extractor ever emits a different number of
/// diagnostic entries, real features are dropped or metadata leaks into the
/// row without any error.
///
/// # Example
///
/// ```
/// use radext_core::FilterPolicy;
///
/// let policy = FilterPolicy::default();
/// assert_eq!(policy, FilterPolicy::SkipLeading(32));
/// assert_eq!(FilterPolicy::skip_leading(4), FilterPolicy::SkipLeading(4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "kebab-case"))]
pub enum FilterPolicy {
    /// Drop the first `n` entries by position, keep the rest
    SkipLeading(usize),

    /// Drop `diagnostics_*` entries; keep wavelet and gradient features only
    /// when they are first-order, keep every other feature
    FirstOrderDerived,

    /// Keep every entry
    KeepAll,
}

impl Default for FilterPolicy {
    fn default() -> Self {
        FilterPolicy::SkipLeading(DIAGNOSTIC_ENTRY_COUNT)
    }
}

impl FilterPolicy {
    /// Builder: positional skip of `n` entries
    pub fn skip_leading(n: usize) -> Self {
        FilterPolicy::SkipLeading(n)
    }

    /// Returns whether the entry at `position` with `name` is kept
    pub fn keeps(&self, position: usize, name: &str) -> bool {
        match self {
            FilterPolicy::SkipLeading(n) => position >= *n,
            FilterPolicy::FirstOrderDerived => keeps_first_order_derived(name),
            FilterPolicy::KeepAll => true,
        }
    }

    /// Kept entries of `map`, in order
    pub fn apply<'a>(&self, map: &'a FeatureMap) -> Vec<&'a Feature> {
        map.iter()
            .enumerate()
            .filter(|(position, feature)| self.keeps(*position, &feature.name))
            .map(|(_, feature)| feature)
            .collect()
    }
}

fn keeps_first_order_derived(name: &str) -> bool {
    if name.starts_with("diagnostics_") {
        return false;
    }
    let derived = name.contains("wavelet") || name.contains("gradient");
    !derived || name.contains("firstorder")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::FeatureValue;
    use rstest::rstest;

    fn mapping(names: &[&str]) -> FeatureMap {
        names
            .iter()
            .map(|n| (n.to_string(), FeatureValue::Float(1.0)))
            .collect()
    }

    #[test]
    fn test_default_policy() {
        assert_eq!(FilterPolicy::default(), FilterPolicy::SkipLeading(32));
    }

    #[rstest]
    #[case(33)]
    #[case(34)]
    #[case(40)]
    #[case(1000)]
    fn test_skip_leading_is_exact(#[case] total: usize) {
        let names: Vec<String> = (0..total).map(|i| format!("entry_{}", i)).collect();
        let map: FeatureMap = names
            .iter()
            .map(|n| (n.clone(), FeatureValue::Int(0)))
            .collect();

        let kept = FilterPolicy::default().apply(&map);
        assert_eq!(kept.len(), total - 32);
        assert_eq!(kept[0].name, "entry_32");
    }

    #[test]
    fn test_skip_leading_short_mapping() {
        let map = mapping(&["a", "b"]);
        assert!(FilterPolicy::default().apply(&map).is_empty());
    }

    #[test]
    fn test_skip_is_positional_not_content_based() {
        let map = mapping(&["original_firstorder_Mean", "diagnostics_Image-original_Hash"]);
        let kept = FilterPolicy::skip_leading(1).apply(&map);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "diagnostics_Image-original_Hash");
    }

    #[rstest]
    #[case("diagnostics_Versions_PyRadiomics", false)]
    #[case("original_firstorder_Mean", true)]
    #[case("original_glcm_Contrast", true)]
    #[case("original_shape_Sphericity", true)]
    #[case("wavelet-LLH_firstorder_Mean", true)]
    #[case("wavelet-LLH_glcm_Contrast", false)]
    #[case("gradient_firstorder_Energy", true)]
    #[case("gradient_glrlm_RunEntropy", false)]
    fn test_first_order_derived(#[case] name: &str, #[case] kept: bool) {
        assert_eq!(FilterPolicy::FirstOrderDerived.keeps(0, name), kept);
    }

    #[test]
    fn test_keep_all() {
        let map = mapping(&["diagnostics_a", "b", "c"]);
        assert_eq!(FilterPolicy::KeepAll.apply(&map).len(), 3);
    }
}

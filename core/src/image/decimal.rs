use regex::Regex;
use std::sync::OnceLock;

/// Extracts every decimal number from a free-form string
///
/// Accepts the layouts header values show up in:
/// - "0.7\\0.7"
/// - "0.7 0.7"
/// - "[0.7, 0.7]"
/// - "(1,0,0) (0,1,0)"
/// - Exponential notation: "1.5e-4 1.5e-4"
pub fn parse_decimals(s: &str) -> Vec<f64> {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let re = REGEX.get_or_init(|| {
        Regex::new(r"[-+]?\d*\.?\d+(?:[eE][-+]?\d+)?").expect("Failed to compile regex")
    });

    re.find_iter(s)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

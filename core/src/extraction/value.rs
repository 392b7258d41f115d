use std::fmt;

/// One computed entry of an extractor's result mapping
///
/// The only conversion ever applied to a value is its string form, which
/// follows Python's `str()` for floats (`5.0`, `nan`, `inf`).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(untagged))]
pub enum FeatureValue {
    Float(f64),
    Int(i64),
    Text(String),
    Array(Vec<f64>),
}

/// Python `repr`/`str` layout: scientific below 1e-4 and from 1e16 on,
/// with a signed exponent of at least two digits
fn format_float(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    if v.is_nan() {
        return write!(f, "nan");
    }
    if v.is_infinite() {
        return write!(f, "{}", if v > 0.0 { "inf" } else { "-inf" });
    }

    let scientific = format!("{:e}", v);
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if v != 0.0 && !(-4..16).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        write!(f, "{}e{}{:02}", mantissa, sign, exponent.abs())
    } else {
        write!(f, "{:?}", v)
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Float(v) => format_float(f, *v),
            FeatureValue::Int(v) => write!(f, "{}", v),
            FeatureValue::Text(s) => write!(f, "{}", s),
            FeatureValue::Array(values) => {
                write!(f, "[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    format_float(f, *v)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(v: f64) -> Self {
        FeatureValue::Float(v)
    }
}

impl From<i64> for FeatureValue {
    fn from(v: i64) -> Self {
        FeatureValue::Int(v)
    }
}

impl From<String> for FeatureValue {
    fn from(s: String) -> Self {
        FeatureValue::Text(s)
    }
}

impl From<&str> for FeatureValue {
    fn from(s: &str) -> Self {
        FeatureValue::Text(s.to_string())
    }
}

impl From<Vec<f64>> for FeatureValue {
    fn from(values: Vec<f64>) -> Self {
        FeatureValue::Array(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(FeatureValue::Float(5.0), "5.0")]
    #[case(FeatureValue::Float(0.125), "0.125")]
    #[case(FeatureValue::Float(-3.5), "-3.5")]
    #[case(FeatureValue::Float(f64::NAN), "nan")]
    #[case(FeatureValue::Float(f64::NEG_INFINITY), "-inf")]
    #[case(FeatureValue::Float(1e-7), "1e-07")]
    #[case(FeatureValue::Float(-1.5e-5), "-1.5e-05")]
    #[case(FeatureValue::Float(0.0001), "0.0001")]
    #[case(FeatureValue::Float(1e16), "1e+16")]
    #[case(FeatureValue::Float(1.23e22), "1.23e+22")]
    #[case(FeatureValue::Float(1e15), "1000000000000000.0")]
    #[case(FeatureValue::Float(0.0), "0.0")]
    #[case(FeatureValue::Int(42), "42")]
    #[case(FeatureValue::Text("v3.1.0".to_string()), "v3.1.0")]
    #[case(FeatureValue::Array(vec![0.5, 1.0]), "[0.5, 1.0]")]
    fn test_display(#[case] value: FeatureValue, #[case] expected: &str) {
        assert_eq!(value.to_string(), expected);
    }
}

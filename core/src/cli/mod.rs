pub mod report;

use crate::api::ExtractionRequest;
use crate::config::{
    ExtractionConfig, SliceSelectConfig, DEFAULT_LOG_FILE, DEFAULT_OUTPUT_FILE,
    DEFAULT_PARAMS_FILE,
};
use crate::slices::Plane;
use crate::types::{FilterPolicy, DIAGNOSTIC_ENTRY_COUNT};
use clap::{Parser, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;

/// Command-line arguments for radext
#[derive(Parser, Debug)]
#[command(name = "radext")]
#[command(about = "Radiomics feature extraction into a shared CSV")]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Image file
    #[arg(value_name = "input_imageName", allow_hyphen_values = true)]
    pub image: PathBuf,

    /// Label (mask) file
    #[arg(value_name = "input_maskName", allow_hyphen_values = true)]
    pub mask: PathBuf,

    /// Identifier written in the Patients column
    #[arg(value_name = "patient_id", allow_hyphen_values = true)]
    pub patient_id: String,

    /// Extractor parameter file
    #[arg(long, default_value = DEFAULT_PARAMS_FILE)]
    pub params: PathBuf,

    /// CSV file rows are appended to
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// Log file, overwritten on every run
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Which result entries become columns
    #[arg(long, value_enum, default_value_t = FilterArg::Position)]
    pub filter: FilterArg,

    /// Leading entries dropped by the position filter
    #[arg(long, default_value_t = DIAGNOSTIC_ENTRY_COUNT)]
    pub skip: usize,

    /// Summary format printed after a run
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl Cli {
    /// Run configuration resolved from the flags
    pub fn config(&self) -> ExtractionConfig {
        let filter = match self.filter {
            FilterArg::Position => FilterPolicy::SkipLeading(self.skip),
            FilterArg::FirstOrder => FilterPolicy::FirstOrderDerived,
            FilterArg::KeepAll => FilterPolicy::KeepAll,
        };
        ExtractionConfig::default()
            .with_params(&self.params)
            .with_output(&self.output)
            .with_log_file(&self.log_file)
            .with_filter(filter)
    }

    pub fn request(&self) -> ExtractionRequest {
        ExtractionRequest::new(&self.image, &self.mask, &self.patient_id)
    }
}

/// Result filter selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterArg {
    /// Drop a fixed number of leading entries
    Position,
    /// Drop diagnostics, keep derived images' first-order features only
    FirstOrder,
    /// Keep every entry
    KeepAll,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}

/// One-line usage message for a wrong argument count
pub fn usage_line(program: &str) -> String {
    format!(
        "Usage: {} [input_imageName] [input_maskName] [patient_id]",
        program
    )
}

/// Parses radext arguments, `args[0]` being the program name
///
/// Exactly three arguments are always the three positionals, whatever they
/// look like; flags are only recognised in longer invocations.
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    if args.len() == 4 {
        args.insert(1, OsString::from("--"));
    }
    Cli::try_parse_from(args)
}

/// A rejected radext invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageError {
    /// Line printed on stdout
    pub usage: String,

    /// clap's explanation, printed on stderr
    pub detail: String,

    pub exit_code: i32,
}

/// Parses `args` or describes the usage failure
///
/// Every parse failure, `-h` and `--version` included, is a usage error
/// with exit code 1.
pub fn resolve_args(args: &[String]) -> Result<Cli, UsageError> {
    parse_args(args).map_err(|e| {
        let program = args.first().map(String::as_str).unwrap_or("radext");
        UsageError {
            usage: usage_line(program),
            detail: e.to_string(),
            exit_code: 1,
        }
    })
}

/// Returns whether a parse error is a help or version request
///
/// Only sliceselect keeps clap's help and version flags.
pub fn is_informational(error: &clap::Error) -> bool {
    matches!(
        error.kind(),
        clap::error::ErrorKind::DisplayHelp
            | clap::error::ErrorKind::DisplayVersion
            | clap::error::ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    )
}

/// Command-line arguments for sliceselect
#[derive(Parser, Debug)]
#[command(name = "sliceselect")]
#[command(about = "Largest label slice selection and intensity normalization")]
#[command(version)]
pub struct SliceSelectCli {
    /// Image file
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Label file
    #[arg(value_name = "LABEL")]
    pub label: PathBuf,

    /// Plane slices are taken in
    #[arg(long, value_enum, default_value_t = PlaneArg::Coronal)]
    pub plane: PlaneArg,

    /// Lower bound of the normalized range
    #[arg(long, default_value_t = 1.0)]
    pub min: f64,

    /// Upper bound of the normalized range
    #[arg(long, default_value_t = 128.0)]
    pub max: f64,

    /// Extension of the written files
    #[arg(long, default_value = "nrrd")]
    pub extension: String,

    /// Skip N4 bias field correction
    #[arg(long)]
    pub no_bias_correction: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl SliceSelectCli {
    pub fn config(&self) -> SliceSelectConfig {
        SliceSelectConfig::default()
            .with_plane(self.plane.into())
            .with_range(self.min, self.max)
            .with_extension(&self.extension)
            .with_bias_correction(!self.no_bias_correction)
    }
}

/// Slicing plane options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlaneArg {
    Coronal,
    Axial,
    Sagittal,
}

impl From<PlaneArg> for Plane {
    fn from(arg: PlaneArg) -> Self {
        match arg {
            PlaneArg::Coronal => Plane::Coronal,
            PlaneArg::Axial => Plane::Axial,
            PlaneArg::Sagittal => Plane::Sagittal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_three_positionals() {
        let cli = parse_args(["radext", "img.nrrd", "img-label.nrrd", "P01"]).unwrap();
        let config = cli.config();

        assert_eq!(cli.request(), ExtractionRequest::new("img.nrrd", "img-label.nrrd", "P01"));
        assert_eq!(config, ExtractionConfig::default());
    }

    #[test]
    fn test_patient_id_may_start_with_hyphen() {
        let cli = parse_args(["radext", "a.nii", "b.nii", "-17"]).unwrap();
        assert_eq!(cli.patient_id, "-17");
    }

    #[rstest]
    #[case(&["radext"])]
    #[case(&["radext", "img.nrrd"])]
    #[case(&["radext", "img.nrrd", "mask.nrrd"])]
    #[case(&["radext", "img.nrrd", "mask.nrrd", "P01", "extra"])]
    fn test_wrong_arity_is_usage_error(#[case] args: &[&str]) {
        let error = parse_args(args.iter().copied()).unwrap_err();
        assert!(!is_informational(&error));
    }

    #[rstest]
    #[case("-o")]
    #[case("-f")]
    #[case("-h")]
    #[case("--help")]
    #[case("--skip")]
    #[case("--")]
    fn test_flag_like_patient_id(#[case] patient_id: &str) {
        let cli = parse_args(["radext", "a.nii", "b.nii", patient_id]).unwrap();
        assert_eq!(cli.patient_id, patient_id);
        assert_eq!(cli.config(), ExtractionConfig::default());
    }

    #[test]
    fn test_flag_like_paths() {
        let cli = parse_args(["radext", "-x.nii", "--mask.nii", "P01"]).unwrap();
        assert_eq!(cli.image, PathBuf::from("-x.nii"));
        assert_eq!(cli.mask, PathBuf::from("--mask.nii"));
    }

    #[rstest]
    #[case(&["radext", "-h"])]
    #[case(&["radext", "--help"])]
    #[case(&["radext", "--version"])]
    #[case(&["radext", "-V"])]
    fn test_help_and_version_are_usage_errors(#[case] args: &[&str]) {
        let error = parse_args(args.iter().copied()).unwrap_err();
        assert!(!is_informational(&error));
    }

    #[test]
    fn test_resolve_args_usage_error() {
        let args: Vec<String> = ["/usr/bin/radext", "img.nrrd", "mask.nrrd"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let error = resolve_args(&args).unwrap_err();
        assert_eq!(
            error.usage,
            "Usage: /usr/bin/radext [input_imageName] [input_maskName] [patient_id]"
        );
        assert_eq!(error.exit_code, 1);
        assert!(!error.detail.is_empty());
    }

    #[test]
    fn test_resolve_args_flags_after_positionals() {
        let args: Vec<String> = ["radext", "i.nii", "m.nii", "P01", "--output", "rows.csv"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let cli = resolve_args(&args).unwrap();
        assert_eq!(cli.output, PathBuf::from("rows.csv"));
        assert_eq!(cli.patient_id, "P01");
    }

    #[rstest]
    #[case("position", FilterPolicy::SkipLeading(10))]
    #[case("first-order", FilterPolicy::FirstOrderDerived)]
    #[case("keep-all", FilterPolicy::KeepAll)]
    fn test_filter_flag(#[case] flag: &str, #[case] expected: FilterPolicy) {
        let cli = parse_args([
            "radext", "i.nii", "m.nii", "P01", "--filter", flag, "--skip", "10",
        ])
        .unwrap();
        assert_eq!(cli.config().filter, expected);
    }

    #[test]
    fn test_paths_from_flags() {
        let cli = parse_args([
            "radext",
            "i.nii",
            "m.nii",
            "P01",
            "--params",
            "/cfg/params.yaml",
            "--output",
            "/out/rows.csv",
            "--log-file",
            "/out/run.log",
        ])
        .unwrap();
        let config = cli.config();

        assert_eq!(config.params, PathBuf::from("/cfg/params.yaml"));
        assert_eq!(config.output, PathBuf::from("/out/rows.csv"));
        assert_eq!(config.log_file, PathBuf::from("/out/run.log"));
    }

    #[test]
    fn test_usage_line() {
        assert_eq!(
            usage_line("radext"),
            "Usage: radext [input_imageName] [input_maskName] [patient_id]"
        );
    }

    #[test]
    fn test_slice_select_flags() {
        let cli = SliceSelectCli::try_parse_from([
            "sliceselect",
            "ct.nrrd",
            "ct-label.nrrd",
            "--plane",
            "axial",
            "--max",
            "255",
            "--no-bias-correction",
        ])
        .unwrap();
        let config = cli.config();

        assert_eq!(config.plane, Plane::Axial);
        assert_eq!((config.min, config.max), (1.0, 255.0));
        assert!(!config.bias_correction);
        assert!(!cli.verbose);
    }
}

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn radext(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_radext"))
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap()
}

fn assert_untouched(dir: &Path) {
    assert!(!dir.join("pyRadiomicsOutput.csv").exists());
    assert!(!dir.join("testLog.txt").exists());
}

#[test]
fn wrong_arity_prints_usage_and_exits_1() {
    let cases: &[&[&str]] = &[
        &[],
        &["img.nrrd"],
        &["img.nrrd", "mask.nrrd"],
        &["img.nrrd", "mask.nrrd", "P01", "extra"],
        &["-h"],
        &["--help"],
        &["--version"],
    ];

    for args in cases {
        let temp_dir = TempDir::new().unwrap();
        let output = radext(temp_dir.path(), args);

        assert_eq!(output.status.code(), Some(1), "args {:?}", args);
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert_eq!(
            stdout,
            format!(
                "Usage: {} [input_imageName] [input_maskName] [patient_id]\n",
                env!("CARGO_BIN_EXE_radext")
            ),
            "args {:?}",
            args
        );
        assert_untouched(temp_dir.path());
    }
}

#[test]
fn three_arguments_skip_the_usage_path() {
    let temp_dir = TempDir::new().unwrap();
    let output = radext(temp_dir.path(), &["absent.nii", "absent-label.nii", "-o"]);

    // the run fails on the missing inputs (or the missing extractor), not on usage
    assert_eq!(output.status.code(), Some(1));
    assert!(!String::from_utf8_lossy(&output.stdout).contains("Usage:"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
    assert!(!temp_dir.path().join("pyRadiomicsOutput.csv").exists());
}

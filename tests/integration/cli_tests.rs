use clap::Parser;
use dupfinder::cli::Cli;
use dupfinder::duplicates::FinderError;
use dupfinder::error::ExitCode;
use dupfinder::run_with_output;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn run(args: &[&str]) -> (anyhow::Result<ExitCode>, String) {
    let cli = Cli::try_parse_from(std::iter::once("dupfinder").chain(args.iter().copied())).unwrap();
    let mut out = Vec::new();
    let result = run_with_output(cli, &mut out, false);
    (result, String::from_utf8(out).unwrap())
}

fn fixture(dir: &Path) {
    fs::write(dir.join("x.txt"), b"hello").unwrap();
    fs::write(dir.join("y.txt"), b"hello").unwrap();
    fs::write(dir.join("z.txt"), b"world").unwrap();
}

fn empty_config(dir: &Path) -> String {
    let path = dir.join("config.json");
    fs::write(&path, "{}").unwrap();
    path.display().to_string()
}

#[test]
fn test_scan_text_output_and_report() {
    let data = tempdir().unwrap();
    let work = tempdir().unwrap();
    fixture(data.path());
    let report = work.path().join("duplicate_files.txt");
    let config = empty_config(work.path());

    let (result, stdout) = run(&[
        "-q",
        "--config",
        &config,
        "scan",
        data.path().to_str().unwrap(),
        "--report",
        report.to_str().unwrap(),
    ]);

    assert_eq!(result.unwrap(), ExitCode::Success);
    let expected = format!(
        "—— Duplicate Files Found ——\n\nDuplicate Group:\n - {}\n - {}\n",
        data.path().join("x.txt").display(),
        data.path().join("y.txt").display()
    );
    assert_eq!(stdout, format!("\n{expected}"));
    assert_eq!(fs::read_to_string(&report).unwrap(), expected);
}

#[test]
fn test_scan_without_duplicates_exit_code() {
    let data = tempdir().unwrap();
    let work = tempdir().unwrap();
    fs::write(data.path().join("only.txt"), b"alone").unwrap();
    let config = empty_config(work.path());

    let (result, stdout) = run(&[
        "-q",
        "--config",
        &config,
        "scan",
        data.path().to_str().unwrap(),
        "--no-report",
    ]);

    assert_eq!(result.unwrap(), ExitCode::NoDuplicates);
    assert!(stdout.contains("No duplicate files found."));
}

#[test]
fn test_scan_json_output() {
    let data = tempdir().unwrap();
    let work = tempdir().unwrap();
    fixture(data.path());
    let config = empty_config(work.path());

    let (result, stdout) = run(&[
        "--config",
        &config,
        "scan",
        data.path().to_str().unwrap(),
        "--output",
        "json",
        "--no-report",
    ]);

    assert_eq!(result.unwrap(), ExitCode::Success);
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["duplicates"].as_array().unwrap().len(), 1);
    assert_eq!(value["duplicates"][0]["files"].as_array().unwrap().len(), 2);
    assert_eq!(
        value["duplicates"][0]["fingerprint"],
        "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
    );
    assert_eq!(value["summary"]["algorithm"], "sha256");
    assert_eq!(value["summary"]["total_files"], 3);
    assert_eq!(value["summary"]["exit_code_name"], "DF000");
}

#[test]
fn test_scan_csv_output() {
    let data = tempdir().unwrap();
    let work = tempdir().unwrap();
    fixture(data.path());
    let config = empty_config(work.path());

    let (result, stdout) = run(&[
        "--config",
        &config,
        "scan",
        data.path().to_str().unwrap(),
        "-o",
        "csv",
        "--no-report",
    ]);

    assert!(result.is_ok());
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "group_id,fingerprint,path");
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("1,"));
}

#[test]
fn test_nonexistent_root_is_invalid_roots_error() {
    let work = tempdir().unwrap();
    let missing = work.path().join("missing");
    let report = work.path().join("report.txt");
    let config = empty_config(work.path());

    let (result, stdout) = run(&[
        "-q",
        "--config",
        &config,
        "scan",
        missing.to_str().unwrap(),
        "--report",
        report.to_str().unwrap(),
    ]);

    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<FinderError>(),
        Some(FinderError::NoValidRoots)
    ));
    assert_eq!(ExitCode::for_error(&err), ExitCode::InvalidRoots);
    assert!(stdout.is_empty());
    assert!(!report.exists());
}

#[test]
fn test_config_file_settings_are_used() {
    let data = tempdir().unwrap();
    let work = tempdir().unwrap();
    fixture(data.path());
    let config = work.path().join("config.json");
    fs::write(&config, r#"{ "algorithm": "blake3", "io_threads": 2 }"#).unwrap();

    let (result, stdout) = run(&[
        "--config",
        config.to_str().unwrap(),
        "scan",
        data.path().to_str().unwrap(),
        "--output",
        "json",
        "--no-report",
    ]);

    assert!(result.is_ok());
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["summary"]["algorithm"], "blake3");
}

#[test]
fn test_cli_flag_overrides_config_file() {
    let data = tempdir().unwrap();
    let work = tempdir().unwrap();
    fixture(data.path());
    let config = work.path().join("config.json");
    fs::write(&config, r#"{ "algorithm": "blake3" }"#).unwrap();

    let (_, stdout) = run(&[
        "--config",
        config.to_str().unwrap(),
        "scan",
        data.path().to_str().unwrap(),
        "--algorithm",
        "sha256",
        "--output",
        "json",
        "--no-report",
    ]);

    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["summary"]["algorithm"], "sha256");
}

#[test]
fn test_broken_config_file_is_fatal() {
    let data = tempdir().unwrap();
    let work = tempdir().unwrap();
    let config = work.path().join("config.json");
    fs::write(&config, "not json").unwrap();

    let (result, _) = run(&[
        "--config",
        config.to_str().unwrap(),
        "scan",
        data.path().to_str().unwrap(),
        "--no-report",
    ]);

    let err = result.unwrap_err();
    assert_eq!(ExitCode::for_error(&err), ExitCode::GeneralError);
    assert!(format!("{err:#}").contains("Invalid config file"));
}

#[cfg(unix)]
#[test]
fn test_quiet_text_scan_still_lists_skips() {
    let data = tempdir().unwrap();
    let work = tempdir().unwrap();
    fixture(data.path());
    let link = data.path().join("link.txt");
    std::os::unix::fs::symlink(data.path().join("x.txt"), &link).unwrap();
    let config = empty_config(work.path());

    let (result, stdout) = run(&[
        "-q",
        "--config",
        &config,
        "scan",
        data.path().to_str().unwrap(),
        "--no-report",
    ]);

    assert_eq!(result.unwrap(), ExitCode::PartialSuccess);
    let skip_line = format!("Skipping {}: ", link.display());
    let report_start = stdout.find("—— Duplicate Files Found ——").unwrap();
    let skip_pos = stdout.find(&skip_line).unwrap();
    assert!(skip_pos < report_start);
    assert_eq!(stdout.matches("Skipping ").count(), 1);
}

mod common;

use common::synthetic_image::{checkerboard, to_pgm_text};
use std::fs;
use std::path::Path;
use std::process::Command;

fn write_config(dir: &Path, workers: usize) -> std::path::PathBuf {
    let image = checkerboard(12, 8, 4);
    let input = dir.join("edge12x8.pgm");
    fs::write(&input, to_pgm_text(&image)).unwrap();
    let config = serde_json::json!({
        "input": input,
        "output": dir.join("image12x8.pgm"),
        "width": 12,
        "height": 8,
        "workers": workers,
        "report_json": dir.join("report.json"),
        "log_level": "warn",
    });
    let path = dir.join("config.json");
    fs::write(&path, config.to_string()).unwrap();
    path
}

#[test]
fn successful_run_prints_timings_and_writes_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), 4);

    let out = Command::new(env!("CARGO_BIN_EXE_halo_sobel"))
        .arg(&config)
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("processors: 4"));
    assert!(stdout.contains("Total P Time:"));
    assert!(stdout.contains("Total S Time:"));
    assert!(stdout.contains("Total S + P Time:"));
    assert!(dir.path().join("image12x8.pgm").exists());

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("report.json")).unwrap()).unwrap();
    assert_eq!(report["workers"], 4);
    assert_eq!(report["blockRows"], 2);
}

#[test]
fn unit_count_mismatch_exits_nonzero_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path(), 4);

    let out = Command::new(env!("CARGO_BIN_EXE_halo_sobel"))
        .arg(&config)
        .arg("2")
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Error:"));
    assert!(!dir.path().join("image12x8.pgm").exists());
    assert!(!dir.path().join("report.json").exists());
}

#[test]
fn missing_config_argument_is_reported() {
    let out = Command::new(env!("CARGO_BIN_EXE_halo_sobel"))
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Usage"));
}

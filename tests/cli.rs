// file: tests/cli.rs
// version: 1.0.0
// guid: 4e8a2c61-d7f3-4b95-a0e6-9c1f5b3d7a28

//! Command line tests for the commands that need no Raspberry Pi

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("pi-board-info").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("PI_BOARD_INFO_CONFIG")
        .env_remove("PI_BOARD_INFO_LOG_LEVEL")
        .env_remove("PI_BOARD_INFO_TIMEOUT")
        .env_remove("PI_BOARD_INFO_SHELL");
    cmd
}

#[test]
fn test_decode_prints_identity() {
    cli()
        .args(["decode", "a02082"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Raspberry Pi 3 Model B"))
        .stdout(predicate::str::contains("Sony UK"))
        .stdout(predicate::str::contains("1024 MB"));
}

#[test]
fn test_decode_legacy_code_as_json() {
    let output = cli()
        .args(["--json", "decode", "0x000e"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["scheme"], "legacy");
    assert_eq!(json["model"], "RpiB");
    assert_eq!(json["manufacturer"], "SONY_UK");
    assert_eq!(json["memory_size_mb"], 512);
}

#[test]
fn test_decode_rejects_malformed_code() {
    cli()
        .args(["decode", "not-hex"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid revision code"));
}

#[test]
fn test_decode_rejects_unknown_legacy_code() {
    cli()
        .args(["decode", "0x0001"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown legacy revision code: 0x0001"));
}

#[test]
fn test_unknown_frequency_unit_is_rejected() {
    cli()
        .args(["-q", "cpu", "--unit", "THz"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Requested unknown CPU frequency unit: THz"));
}

#[test]
fn test_invalid_config_file_is_reported() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "[general]\ntimeout_seconds = 0").unwrap();

    cli()
        .args(["--config", file.path().to_str().unwrap(), "decode", "a02082"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_logs_stay_off_stdout() {
    let output = cli()
        .args(["--verbose", "--json", "decode", "c03114"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["model"], "Rpi4B");
}

#[test]
fn test_version() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

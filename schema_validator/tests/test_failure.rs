use std::{fs::write, process::Command};

use confidential_args::{banking, serialize_registry};
use tempfile::TempDir;

#[test]
fn test_registry_file_not_present() {
    let dir = TempDir::new().unwrap();
    let not_present = dir.path().join("no.such.registry");

    let output = Command::new(env!("CARGO_BIN_EXE_schema_validator"))
        .arg("--registry-path")
        .arg(&not_present)
        .output()
        .unwrap();

    assert!(!output.status.success());

    let err_msg = String::from_utf8_lossy(&output.stderr);
    assert!(
        err_msg.contains("failed to read registry file")
            && err_msg.contains(not_present.to_str().unwrap())
    );
}

#[test]
fn test_registry_file_not_valid() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("illegal.registry");
    write(&path, "NOT_A_VALID_REGISTRY_FILE").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_schema_validator"))
        .arg("--registry-path")
        .arg(&path)
        .output()
        .unwrap();

    assert!(!output.status.success());

    let err_msg = String::from_utf8_lossy(&output.stderr);
    assert!(err_msg.contains("failed to parse registry file") && err_msg.contains("invalid magic"));
}

#[test]
fn test_registry_with_duplicate_computation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("duplicate.registry");
    let schemas = vec![
        banking::check_balance_schema().unwrap(),
        banking::check_balance_schema().unwrap(),
    ];
    write(&path, serialize_registry(&schemas).unwrap()).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_schema_validator"))
        .arg("--registry-path")
        .arg(&path)
        .output()
        .unwrap();

    assert!(!output.status.success());

    let err_msg = String::from_utf8_lossy(&output.stderr);
    assert!(
        err_msg.contains("invalid registry file")
            && err_msg.contains("computation 'check_balance' is already published"),
        "stderr: {err_msg}"
    );
}

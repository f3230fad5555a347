//! CLI integration tests.
//! Tests the command-line interface against real config files on disk.

use assert_cmd::assert::OutputAssertExt;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

const GOAT: &str = r#"{
    "genes": {
        "autosomal": [ { "extension": ["wildtype", "black"] } ],
        "anonymous": [ { "deleterious": 16 } ],
        "bitwise": [ { "coi": 128 } ]
    },
    "sexdetermination": "xy",
    "interpreters": [ "polygenes" ],
    "initializers": { "wild": {} }
}"#;

const BROKEN: &str = r#"{ "interpreters": [ "doesnotexist" ] }"#;

/// Get the heredity binary command
fn heredity_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_heredity"))
}

#[test]
fn test_cli_help() {
    heredity_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Per-individual genetics engine"))
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn test_validate_good_configs() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("goat.json"), GOAT).unwrap();

    heredity_cmd()
        .arg("validate")
        .arg("--dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("goat: ok"))
        .stdout(predicate::str::contains("Checked 1 config(s), 0 failed"));
}

#[test]
fn test_validate_keeps_going_past_a_bad_config() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("broken.json"), BROKEN).unwrap();
    fs::write(dir.path().join("goat.json"), GOAT).unwrap();

    heredity_cmd()
        .arg("validate")
        .arg("--dir")
        .arg(dir.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("goat: ok"))
        .stdout(predicate::str::contains("Checked 2 config(s), 1 failed"));
}

#[test]
fn test_sample_is_seed_stable() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("goat.json");
    fs::write(&config, GOAT).unwrap();

    let first = heredity_cmd()
        .arg("sample")
        .arg("--config")
        .arg(&config)
        .arg("--initializer")
        .arg("wild")
        .arg("--seed")
        .arg("12345")
        .output()
        .unwrap();
    let second = heredity_cmd()
        .arg("sample")
        .arg("--config")
        .arg(&config)
        .arg("--initializer")
        .arg("wild")
        .arg("--seed")
        .arg("12345")
        .output()
        .unwrap();

    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_sample_unknown_initializer_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("goat.json");
    fs::write(&config, GOAT).unwrap();

    heredity_cmd()
        .arg("sample")
        .arg("--config")
        .arg(&config)
        .arg("--initializer")
        .arg("tame")
        .assert()
        .failure()
        .stderr(predicate::str::contains("tame"));
}

#[test]
fn test_inherit_prints_both_offspring() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("goat.json");
    fs::write(&config, GOAT).unwrap();

    heredity_cmd()
        .arg("inherit")
        .arg("--config")
        .arg(&config)
        .arg("--seed")
        .arg("7")
        .assert()
        .success()
        .stdout(predicate::str::contains("daughter:"))
        .stdout(predicate::str::contains("son:"))
        .stdout(predicate::str::contains("coi ="));
}

//! CLI integration tests for the `srcpath` binary.
//!
//! Uses `assert_cmd` to spawn the binary against unit files written to a
//! temporary directory, and checks exit codes, stdout and stderr.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn srcpath() -> Command {
    cargo_bin_cmd!("srcpath")
}

/// Write `units` as a JSON unit file inside `dir` and return its path.
fn write_units(dir: &TempDir, units: serde_json::Value) -> PathBuf {
    let path = dir.path().join("units.json");
    fs::write(&path, serde_json::to_string_pretty(&units).unwrap()).unwrap();
    path
}

fn chain_units() -> serde_json::Value {
    serde_json::json!([
        { "name": "Shovel", "source_path": "dig\nfollow Truck\n" },
        { "name": "Truck", "source_path": "haul\n" }
    ])
}

fn cyclic_units() -> serde_json::Value {
    serde_json::json!([
        { "name": "A", "source_path": "follow B\n" },
        { "name": "B", "source_path": "follow A\n" }
    ])
}

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    srcpath()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolve follow directives"));
}

#[test]
fn version_exits_0() {
    srcpath()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("srcpath"));
}

// ──────────────────────────────────────────────
// 2. Resolve subcommand
// ──────────────────────────────────────────────

#[test]
fn resolve_prints_resolved_units() {
    let tmp = TempDir::new().unwrap();
    let path = write_units(&tmp, chain_units());

    let out = srcpath().arg("resolve").arg(&path).assert().success();
    let stdout = String::from_utf8(out.get_output().stdout.clone()).unwrap();
    let units: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(
        units[0]["source_path"],
        "dig\nfollow Truck\n#>> follow Truck\nhaul\n#<< follow\n"
    );

    // Without --in-place the file is untouched.
    let on_disk: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk, chain_units());
}

#[test]
fn resolve_in_place_rewrites_file() {
    let tmp = TempDir::new().unwrap();
    let path = write_units(&tmp, chain_units());

    srcpath()
        .args(["resolve", "--in-place"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 changed"));

    let on_disk: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        on_disk[0]["source_path"],
        "dig\nfollow Truck\n#>> follow Truck\nhaul\n#<< follow\n"
    );

    // A second pass changes nothing.
    srcpath()
        .args(["resolve", "--in-place", "--output", "json"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"changed\": []"));
}

#[test]
fn resolve_cycle_exits_1_and_keeps_file() {
    let tmp = TempDir::new().unwrap();
    let path = write_units(&tmp, cyclic_units());

    srcpath()
        .args(["resolve", "--in-place"])
        .arg(&path)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("circular follow reference"));

    let on_disk: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk, cyclic_units());
}

#[test]
fn resolve_cycle_json_error() {
    let tmp = TempDir::new().unwrap();
    let path = write_units(&tmp, cyclic_units());

    srcpath()
        .args(["--output", "json", "resolve"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"kind\": \"circular_dependency\""));
}

#[test]
fn resolve_missing_file_exits_1() {
    srcpath()
        .args(["resolve", "nonexistent_units_xyz.json"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error reading file"));
}

#[test]
fn resolve_with_custom_config() {
    let tmp = TempDir::new().unwrap();
    let path = write_units(
        &tmp,
        serde_json::json!([
            { "name": "A", "source_path": "include B\n" },
            { "name": "B", "source_path": "b\n" }
        ]),
    );
    let config = tmp.path().join("srcpath.toml");
    fs::write(
        &config,
        "tokens = [\"include\"]\nopen_marker = \"// begin \"\nclose_marker = \"// end\"\n",
    )
    .unwrap();

    srcpath()
        .arg("--config")
        .arg(&config)
        .arg("resolve")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("include B\\n// begin B\\nb\\n// end\\n"));
}

// ──────────────────────────────────────────────
// 3. Check subcommand
// ──────────────────────────────────────────────

#[test]
fn check_prints_order() {
    let tmp = TempDir::new().unwrap();
    let path = write_units(&tmp, chain_units());

    srcpath()
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Truck"))
        .stdout(predicate::str::contains("2. Shovel <- Truck"));
}

#[test]
fn check_json_order() {
    let tmp = TempDir::new().unwrap();
    let path = write_units(&tmp, chain_units());

    let out = srcpath()
        .args(["check", "--output", "json"])
        .arg(&path)
        .assert()
        .success();
    let json: serde_json::Value = serde_json::from_slice(&out.get_output().stdout).unwrap();
    assert_eq!(json["order"], serde_json::json!(["Truck", "Shovel"]));
}

#[test]
fn check_cycle_exits_1() {
    let tmp = TempDir::new().unwrap();
    let path = write_units(&tmp, cyclic_units());

    srcpath()
        .arg("check")
        .arg(&path)
        .assert()
        .failure()
        .code(1);
}

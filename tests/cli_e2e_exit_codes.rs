//! End-to-end tests for CLI exit codes.
//!
//! - Exit code 0: Success
//! - Exit code 1: Any unrecovered error
//! - Exit code 2: Invalid command-line usage (handled by clap)

mod common;
use common::prelude::*;

/// Exit code 0 is returned for successful operations.
#[test]
fn test_exit_code_success() {
    let fixture = TestFixture::new().with_manifest(manifests::PLAIN);

    fixture.command().arg("info").assert().code(0);
}

/// Exit code 0 is returned for --help.
#[test]
fn test_exit_code_help() {
    let mut cmd = cargo_bin_cmd!("wstool");

    cmd.arg("--help").assert().code(0);
}

/// Exit code 0 is returned for --version.
#[test]
fn test_exit_code_version() {
    let mut cmd = cargo_bin_cmd!("wstool");

    cmd.arg("--version")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("wstool"));
}

/// Exit code 1 is returned when the manifest is invalid.
#[test]
fn test_exit_code_invalid_manifest() {
    let fixture = TestFixture::new().with_manifest(manifests::INVALID);

    fixture
        .command()
        .arg("info")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to load workspace"));
}

/// Exit code 1 is returned for a manifest naming an unknown entry type.
#[test]
fn test_exit_code_unknown_entry_type() {
    let fixture = TestFixture::new().with_manifest("- gti:\n    local-name: a\n    uri: x\n");

    fixture
        .command()
        .arg("status")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("did you mean 'git'?"));
}

/// Exit code 1 is returned when no workspace can be found.
#[test]
fn test_exit_code_missing_workspace() {
    let fixture = TestFixture::new();

    fixture.command().arg("update").assert().code(1);
}

/// Exit code 2 is returned for an unknown subcommand.
#[test]
fn test_exit_code_unknown_subcommand() {
    let mut cmd = cargo_bin_cmd!("wstool");

    cmd.arg("frobnicate").assert().code(2);
}

/// Exit code 2 is returned for an invalid flag value.
#[test]
fn test_exit_code_invalid_parallelism() {
    let fixture = TestFixture::new().with_manifest(manifests::EMPTY);

    fixture
        .command()
        .args(["update", "-j", "many"])
        .assert()
        .code(2);
}

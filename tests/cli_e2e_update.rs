//! End-to-end tests for `update` and `init` against real git repositories.
//!
//! These tests build a local origin repository with the system `git` and
//! check it out through the CLI. They need `git` on the PATH and are only run
//! with the `integration-tests` feature:
//!
//! ```bash
//! cargo test --features integration-tests --test cli_e2e_update
//! ```

mod common;
use common::prelude::*;

use std::path::Path;
use std::process::Command;

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(["-c", "user.name=wstool", "-c", "user.email=wstool@example.com"])
        .args(args)
        .current_dir(dir)
        .status()
        .expect("failed to run git");
    assert!(status.success(), "git {:?} failed", args);
}

/// An origin repository with one commit, tagged `v1`.
fn make_origin(fixture: &TestFixture) -> std::path::PathBuf {
    let origin = fixture.path().join("origin");
    std::fs::create_dir_all(&origin).unwrap();
    git(&origin, &["init", "-q"]);
    std::fs::write(origin.join("README"), "v1\n").unwrap();
    git(&origin, &["add", "README"]);
    git(&origin, &["commit", "-q", "-m", "first"]);
    git(&origin, &["tag", "v1"]);
    origin
}

fn manifest_for(origin: &Path, version: Option<&str>) -> String {
    let mut entry = format!(
        "- git:\n    local-name: ws/clone\n    uri: {}\n",
        origin.display()
    );
    if let Some(version) = version {
        entry.push_str(&format!("    version: {}\n", version));
    }
    entry
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_update_checks_out_then_updates() {
    if !git_available() {
        return;
    }
    let fixture = TestFixture::new();
    let origin = make_origin(&fixture);
    let fixture = fixture.with_manifest(&manifest_for(&origin, Some("v1")));

    fixture
        .command()
        .arg("update")
        .assert()
        .success()
        .stdout(predicate::str::contains("[checked out] ws/clone"));
    fixture
        .child("ws/clone/README")
        .assert(predicate::str::contains("v1"));

    fixture
        .command()
        .arg("update")
        .assert()
        .success()
        .stdout(predicate::str::contains("[updated] ws/clone"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_update_with_changed_uri_aborts_or_deletes() {
    if !git_available() {
        return;
    }
    let fixture = TestFixture::new();
    let origin = make_origin(&fixture);
    let fixture = fixture
        .with_manifest(&manifest_for(&origin, None))
        .with_file("ws/clone/local.txt", "not a checkout");

    fixture
        .command()
        .args(["update", "--abort-changed-uris"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a git checkout"));
    fixture
        .child("ws/clone/local.txt")
        .assert(predicate::path::exists());

    fixture
        .command()
        .args(["update", "--delete-changed-uris"])
        .assert()
        .success();
    fixture
        .child("ws/clone/local.txt")
        .assert(predicate::path::missing());
    fixture
        .child("ws/clone/README")
        .assert(predicate::path::exists());
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_update_backup_moves_directory() {
    if !git_available() {
        return;
    }
    let fixture = TestFixture::new();
    let origin = make_origin(&fixture);
    let fixture = fixture
        .with_manifest(&manifest_for(&origin, None))
        .with_file("ws/clone/local.txt", "keep me");

    fixture
        .command()
        .args(["update", "--backup-changed-uris", "backups"])
        .assert()
        .success();

    let backups: Vec<_> = std::fs::read_dir(fixture.path().join("backups"))
        .unwrap()
        .collect();
    assert_eq!(backups.len(), 1);
    let moved = backups[0].as_ref().unwrap().path();
    assert!(moved.join("local.txt").exists());
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_init_fetches_and_snapshot_pins_revision() {
    if !git_available() {
        return;
    }
    let fixture = TestFixture::new();
    let origin = make_origin(&fixture);
    let fixture = fixture.with_file(
        "base.rosinstall",
        &format!("- git:\n    local-name: clone\n    uri: {}\n", origin.display()),
    );

    fixture
        .command()
        .args(["init", "ws", "base.rosinstall", "-j", "2"])
        .assert()
        .success();
    fixture.child("ws/clone/README").assert(predicate::path::exists());

    let output = fixture
        .command()
        .args(["-t", "ws", "snapshot"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let specs = wstool::manifest::parse(&String::from_utf8_lossy(&output.stdout)).unwrap();
    let revision = specs[0].revision().expect("snapshot should pin a revision");
    assert_eq!(revision.len(), 40);
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_status_and_diff_prefix_paths() {
    if !git_available() {
        return;
    }
    let fixture = TestFixture::new();
    let origin = make_origin(&fixture);
    let fixture = fixture.with_manifest(&manifest_for(&origin, None));
    fixture.command().arg("update").assert().success();

    std::fs::write(fixture.path().join("ws/clone/README"), "changed\n").unwrap();

    fixture
        .command()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains(" M ws/clone/README"));
    fixture
        .command()
        .arg("diff")
        .assert()
        .success()
        .stdout(predicate::str::contains("a/ws/clone/README"))
        .stdout(predicate::str::contains("+changed"));
}

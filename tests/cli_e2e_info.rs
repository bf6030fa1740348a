//! End-to-end tests for the read-only commands: `info`, `status`, `diff`,
//! `snapshot` and `setup-script`.

mod common;
use common::prelude::*;

#[test]
fn test_info_lists_entries() {
    let fixture = TestFixture::new()
        .with_manifest(manifests::PLAIN)
        .with_dir("docs");

    fixture
        .command()
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workspace:"))
        .stdout(predicate::str::contains("docs"))
        .stdout(predicate::str::contains("src/tools"))
        .stdout(predicate::str::contains("(missing)"));
}

#[test]
fn test_info_only_paths() {
    let fixture = TestFixture::new().with_manifest(manifests::PLAIN);
    let expected = fixture.path().join("src/tools");

    fixture
        .command()
        .args(["info", "--only-paths", "src/tools"])
        .assert()
        .success()
        .stdout(predicate::str::diff(format!("{}\n", expected.display())));
}

#[test]
fn test_info_json() {
    let fixture = TestFixture::new().with_manifest(manifests::ALL_TYPES);

    let output = fixture
        .command()
        .args(["info", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 4);
    assert_eq!(entries[0]["local_name"], "src/core");
    assert_eq!(entries[0]["kind"], "git");
    assert_eq!(entries[0]["version"], "main");
    assert_eq!(entries[3]["uri"], "lp:bzrpkg");
}

#[test]
fn test_info_from_subdirectory_finds_workspace() {
    let fixture = TestFixture::new()
        .with_manifest(manifests::PLAIN)
        .with_dir("src/tools");

    fixture
        .command()
        .current_dir(fixture.path().join("src"))
        .args(["info", "--only-paths", "tools"])
        .assert()
        .success()
        .stdout(predicate::str::contains("src/tools"));
}

#[test]
fn test_info_without_workspace_fails() {
    let fixture = TestFixture::new();

    fixture
        .command()
        .arg("info")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No workspace manifest found"))
        .stderr(predicate::str::contains("wstool init"));
}

#[test]
fn test_status_and_diff_without_vcs_entries_are_quiet() {
    let fixture = TestFixture::new().with_manifest(manifests::PLAIN);

    fixture
        .command()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    fixture
        .command()
        .arg("diff")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_snapshot_of_plain_workspace() {
    let fixture = TestFixture::new().with_manifest(manifests::PLAIN);

    fixture
        .command()
        .args(["snapshot", "-o", "snap.rosinstall"])
        .assert()
        .success();

    let snapshot = std::fs::read_to_string(fixture.path().join("snap.rosinstall")).unwrap();
    let specs = wstool::manifest::parse(&snapshot).unwrap();
    assert_eq!(specs, wstool::manifest::parse(manifests::PLAIN).unwrap());
}

#[test]
fn test_setup_script_stdout() {
    let fixture = TestFixture::new()
        .with_manifest(manifests::PLAIN)
        .with_dir("docs")
        .with_dir("src/tools");

    fixture
        .command()
        .args(["setup-script", "--stdout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("env.sh'"))
        .stdout(predicate::str::contains("export ROS_PACKAGE_PATH="))
        .stdout(predicate::str::is_match(r"src/tools:.*docs'").unwrap());
}

#[test]
fn test_setup_script_writes_file() {
    let fixture = TestFixture::new().with_manifest(manifests::PLAIN);

    fixture
        .command()
        .args(["setup-script", "--var", "MY_PATH"])
        .assert()
        .success();

    fixture
        .child("setup.sh")
        .assert(predicate::str::contains("export MY_PATH="));
}

#[test]
fn test_setup_script_root_is_left_off_path() {
    let fixture = TestFixture::new()
        .with_manifest(manifests::PLAIN)
        .with_dir("docs")
        .with_dir("src/tools");

    fixture
        .command()
        .args(["setup-script", "--stdout", "--root", "docs"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"export ROS_PACKAGE_PATH='[^']*src/tools'\n").unwrap())
        .stdout(predicate::str::contains("docs'").not());
}

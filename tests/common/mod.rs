//! Shared test utilities for integration and E2E tests.
//!
//! This module provides common fixtures, helper functions, and manifest
//! snippets to reduce duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_manifest(manifests::PLAIN);
//!     fixture.command().arg("info").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::Path;
use std::process::Command as StdCommand;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::git_available;
    #[allow(unused_imports)]
    pub use super::manifests;
    pub use super::TestFixture;
}

/// Manifest snippets for testing.
#[allow(dead_code)]
pub mod manifests {
    /// Plain directories only; nothing to check out.
    pub const PLAIN: &str = r#"
- other:
    local-name: docs
- other:
    local-name: src/tools
- setup-file:
    local-name: env.sh
"#;

    /// One entry of each version-control type.
    pub const ALL_TYPES: &str = r#"
- git:
    local-name: src/core
    uri: https://example.com/core.git
    version: main
- hg:
    local-name: src/hgpkg
    uri: https://example.com/hgpkg
- svn:
    local-name: src/svnpkg
    uri: https://example.com/svn/trunk
- bzr:
    local-name: src/bzrpkg
    uri: lp:bzrpkg
"#;

    /// Invalid: uri without a VCS type.
    pub const INVALID: &str = r#"
- other:
    local-name: docs
    uri: https://example.com/docs.git
"#;

    /// An empty workspace.
    pub const EMPTY: &str = "[]\n";
}

/// Whether a usable `git` executable is on the PATH.
#[allow(dead_code)]
pub fn git_available() -> bool {
    StdCommand::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// A test fixture that provides a temporary workspace directory.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_manifest(manifests::PLAIN)
///     .with_dir("docs");
///
/// fixture.command().arg("info").assert().success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write a `.rosinstall` with the given content.
    pub fn with_manifest(self, content: &str) -> Self {
        self.temp_dir
            .child(".rosinstall")
            .write_str(content)
            .expect("Failed to write manifest");
        self
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Create a directory.
    pub fn with_dir(self, path: &str) -> Self {
        self.temp_dir
            .child(path)
            .create_dir_all()
            .expect("Failed to create directory");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the manifest.
    pub fn manifest_path(&self) -> std::path::PathBuf {
        self.temp_dir.path().join(".rosinstall")
    }

    /// The current manifest content.
    pub fn manifest(&self) -> String {
        std::fs::read_to_string(self.manifest_path()).expect("Failed to read manifest")
    }

    /// Create a child path in the temp directory.
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory, with
    /// colors off and no inherited workspace.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("wstool");
        cmd.current_dir(self.path())
            .env_remove("ROS_WORKSPACE")
            .env("NO_COLOR", "1");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_with_manifest() {
        let fixture = TestFixture::new().with_manifest(manifests::EMPTY);
        assert!(fixture.manifest_path().exists());
    }

    #[test]
    fn test_manifests_parse() {
        for manifest in [manifests::PLAIN, manifests::ALL_TYPES, manifests::EMPTY] {
            wstool::manifest::parse(manifest).expect("fixture manifest should parse");
        }
        assert!(wstool::manifest::parse(manifests::INVALID).is_err());
    }
}

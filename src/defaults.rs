//! Default values for wstool configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

use std::path::{Path, PathBuf};

/// The manifest file a workspace keeps at its root.
pub const DEFAULT_MANIFEST_FILENAME: &str = ".rosinstall";

/// The environment variable the generated setup script exports.
pub const DEFAULT_SEARCH_PATH_VAR: &str = "ROS_PACKAGE_PATH";

/// Environment variable naming the workspace when `-t` is not given.
pub const WORKSPACE_ENV_VAR: &str = "ROS_WORKSPACE";

/// Name of the setup script `setup-script` writes.
pub const SETUP_SCRIPT_FILENAME: &str = "setup.sh";

/// Returns the number of elements installed at once when `-j` is given
/// without a value.
///
/// Uses the number of available CPUs, falling back to 1 when it cannot be
/// determined.
pub fn default_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Returns the directory conflicting checkouts are moved to when
/// `--backup-changed-uris` is given without a directory.
///
/// This is `.wstool-backup` inside the workspace, so backups stay on the same
/// filesystem and the move is a cheap rename.
pub fn default_backup_dir(workspace: &Path) -> PathBuf {
    workspace.join(".wstool-backup")
}

//! # Environment Derivation
//!
//! Turns a workspace into the environment downstream tooling consumes: a
//! colon-separated search path and the list of setup files to source.
//!
//! The search path walks the manifest in reverse, so the entry declared
//! first ends up last on the path: later overlays are listed before the base
//! install they shadow.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::defaults::DEFAULT_SEARCH_PATH_VAR;
use crate::path;

/// The search path for `config`.
///
/// Skips `root` (the designated metadata root, if any), setup-file entries,
/// and entries that are plain files on disk.
pub fn package_path(config: &Config, root: Option<&Path>) -> String {
    package_path_entries(config, root)
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(":")
}

/// The search path for `config`, one directory per entry.
pub fn package_path_entries(config: &Config, root: Option<&Path>) -> Vec<PathBuf> {
    let root = root.map(path::clean);
    config
        .elements()
        .iter()
        .rev()
        .filter(|e| !e.is_setup_file())
        .filter(|e| root.as_deref() != Some(e.path()))
        .filter(|e| !e.path().is_file())
        .map(|e| e.path().to_path_buf())
        .collect()
}

/// Setup files in manifest order.
pub fn setup_files(config: &Config) -> Vec<PathBuf> {
    config
        .elements()
        .iter()
        .filter(|e| e.is_setup_file())
        .map(|e| e.path().to_path_buf())
        .collect()
}

/// A POSIX `sh` script exporting the search path as `var_name` and sourcing
/// every setup file. `root` is left off the search path, as in
/// [`package_path`].
///
/// `var_name` defaults to `ROS_PACKAGE_PATH` when empty.
pub fn render_setup_script(config: &Config, var_name: &str, root: Option<&Path>) -> String {
    let var_name = if var_name.is_empty() {
        DEFAULT_SEARCH_PATH_VAR
    } else {
        var_name
    };
    let mut script = String::new();
    let _ = writeln!(script, "#!/usr/bin/env sh");
    let _ = writeln!(
        script,
        "# generated from {}, do not edit",
        config.manifest_path().display()
    );
    let _ = writeln!(script);
    for setup_file in setup_files(config) {
        let _ = writeln!(script, ". {}", sh_quote(&setup_file.to_string_lossy()));
    }
    let _ = writeln!(
        script,
        "export {}={}",
        var_name,
        sh_quote(&package_path(config, root))
    );
    script
}

fn sh_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_spec::PathSpec;
    use crate::vcs::VcsRegistry;
    use std::fs;
    use tempfile::TempDir;

    fn config(specs: Vec<PathSpec>, base: &Path) -> Config {
        Config::new(specs, base, VcsRegistry::empty()).unwrap()
    }

    #[test]
    fn test_package_path_is_reversed() {
        let config = config(
            vec![PathSpec::other("a"), PathSpec::other("b"), PathSpec::other("c")],
            Path::new("/ws"),
        );
        assert_eq!(package_path(&config, None), "/ws/c:/ws/b:/ws/a");
    }

    #[test]
    fn test_package_path_skips_root_setup_files_and_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("notes.txt"), "x").unwrap();
        let config = config(
            vec![
                PathSpec::other("meta"),
                PathSpec::setup_file("env.sh"),
                PathSpec::other("notes.txt"),
                PathSpec::other("src"),
            ],
            temp.path(),
        );
        let root = temp.path().join("meta");
        let entries = package_path_entries(&config, Some(&root));
        assert_eq!(entries, vec![temp.path().join("src")]);
    }

    #[test]
    fn test_setup_files_in_order() {
        let config = config(
            vec![
                PathSpec::setup_file("first.sh"),
                PathSpec::other("a"),
                PathSpec::setup_file("second.sh"),
            ],
            Path::new("/ws"),
        );
        assert_eq!(
            setup_files(&config),
            vec![PathBuf::from("/ws/first.sh"), PathBuf::from("/ws/second.sh")]
        );
    }

    #[test]
    fn test_render_setup_script() {
        let config = config(
            vec![PathSpec::setup_file("/opt/ros/setup.sh"), PathSpec::other("src")],
            Path::new("/ws"),
        );
        let script = render_setup_script(&config, "", None);
        assert!(script.starts_with("#!/usr/bin/env sh\n"));
        assert!(script.contains(". '/opt/ros/setup.sh'\n"));
        assert!(script.contains("export ROS_PACKAGE_PATH='/ws/src'\n"));

        let script = render_setup_script(&config, "MY_PATH", None);
        assert!(script.contains("export MY_PATH="));
    }

    #[test]
    fn test_render_setup_script_leaves_out_root() {
        let config = config(
            vec![PathSpec::other("meta"), PathSpec::other("src")],
            Path::new("/ws"),
        );
        let script = render_setup_script(&config, "", Some(Path::new("/ws/meta/")));
        assert!(script.contains("export ROS_PACKAGE_PATH='/ws/src'\n"));
    }

    #[test]
    fn test_sh_quote_escapes_single_quotes() {
        assert_eq!(sh_quote("it's"), r"'it'\''s'");
    }
}

//! Subversion adapter built on the system `svn` command.
//!
//! Subversion versions are revision numbers (or `HEAD`), passed with `-r`.

use std::path::{Path, PathBuf};

use log::info;

use super::{display_prefix, prefix_status_lines, prepare_parent, run_checked, run_quiet, VcsClient};
use crate::error::Result;
use crate::path_spec::ScmType;

const SVN: &str = "svn";

#[derive(Debug, Clone)]
pub struct SvnClient {
    path: PathBuf,
}

impl SvnClient {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    fn svn(&self, args: &[&str]) -> Result<String> {
        run_checked(SVN, args, &self.path)
    }
}

/// Strip a leading `-r` from a version spec: manifests use both `1234` and
/// `-r1234`.
fn revision_arg(version: &str) -> &str {
    version.strip_prefix("-r").unwrap_or(version).trim()
}

impl VcsClient for SvnClient {
    fn path(&self) -> &Path {
        &self.path
    }

    fn vcs_type(&self) -> ScmType {
        ScmType::Svn
    }

    fn detect_presence(&self) -> bool {
        self.path.join(".svn").is_dir()
    }

    fn get_url(&self) -> Option<String> {
        if !self.detect_presence() {
            return None;
        }
        run_quiet(SVN, &["info", "--show-item", "url"], &self.path)
    }

    fn checkout(&self, uri: &str, version: Option<&str>) -> Result<()> {
        let parent = prepare_parent(&self.path)?;
        let target = self.path.to_string_lossy();
        info!("Checking out {} into {}", uri, target);
        let mut args = vec!["checkout", "--non-interactive"];
        if let Some(version) = version {
            args.extend(["-r", revision_arg(version)]);
        }
        args.extend([uri, &*target]);
        run_checked(SVN, &args, &parent)?;
        Ok(())
    }

    fn update(&self, version: Option<&str>) -> Result<()> {
        let mut args = vec!["update", "--non-interactive"];
        if let Some(version) = version {
            args.extend(["-r", revision_arg(version)]);
        }
        self.svn(&args)?;
        Ok(())
    }

    fn get_version(&self, spec: Option<&str>) -> Result<Option<String>> {
        if !self.detect_presence() {
            return Ok(None);
        }
        let revision = match spec {
            Some(spec) => run_quiet(
                SVN,
                &["info", "-r", revision_arg(spec), "--show-item", "last-changed-revision"],
                &self.path,
            ),
            None => run_quiet(SVN, &["info", "--show-item", "revision"], &self.path),
        };
        Ok(revision.map(|r| format!("-r{}", r)))
    }

    fn get_diff(&self, _basepath: Option<&Path>) -> Result<String> {
        self.svn(&["diff"])
    }

    fn get_status(&self, basepath: Option<&Path>, untracked: bool) -> Result<String> {
        let status = self.svn(&["status"])?;
        let status: String = status
            .lines()
            .filter(|line| untracked || !line.starts_with('?'))
            .map(|line| format!("{}\n", line))
            .collect();
        let prefix = display_prefix(&self.path, basepath);
        Ok(prefix_status_lines(&status, &prefix, 8))
    }
}

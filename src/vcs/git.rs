//! Git adapter built on the system `git` command.

use std::path::{Path, PathBuf};

use log::info;

use super::{display_prefix, prefix_status_lines, prepare_parent, run_checked, run_quiet, VcsClient};
use crate::error::{Error, Result};
use crate::path_spec::ScmType;

const GIT: &str = "git";

/// Drives one git checkout.
#[derive(Debug, Clone)]
pub struct GitClient {
    path: PathBuf,
}

impl GitClient {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    fn git(&self, args: &[&str]) -> Result<String> {
        run_checked(GIT, args, &self.path)
    }

    /// Whether HEAD is on a branch (as opposed to a detached tag or commit).
    fn on_branch(&self) -> bool {
        run_quiet(GIT, &["symbolic-ref", "-q", "HEAD"], &self.path).is_some()
    }
}

/// Rewrite auth failures into something actionable.
fn explain(err: Error, uri: &str) -> Error {
    match err {
        Error::VcsCommand {
            program,
            command,
            cwd,
            stderr,
        } if stderr.contains("Authentication failed")
            || stderr.contains("Permission denied")
            || stderr.contains("Could not read from remote repository") =>
        {
            Error::VcsCommand {
                program,
                command,
                cwd,
                stderr: format!(
                    "Authentication failed for {}. Make sure you have access to the repository \
                     (SSH key in ssh-agent, credential helper or access token).\n{}",
                    uri, stderr
                ),
            }
        }
        other => other,
    }
}

impl VcsClient for GitClient {
    fn path(&self) -> &Path {
        &self.path
    }

    fn vcs_type(&self) -> ScmType {
        ScmType::Git
    }

    fn detect_presence(&self) -> bool {
        self.path.join(".git").exists()
    }

    fn get_url(&self) -> Option<String> {
        if !self.detect_presence() {
            return None;
        }
        run_quiet(GIT, &["config", "--get", "remote.origin.url"], &self.path)
    }

    fn checkout(&self, uri: &str, version: Option<&str>) -> Result<()> {
        let parent = prepare_parent(&self.path)?;
        let target = self.path.to_string_lossy();
        info!("Cloning {} into {}", uri, target);
        run_checked(GIT, &["clone", "--recursive", uri, &*target], &parent)
            .map_err(|e| explain(e, uri))?;
        if let Some(version) = version {
            self.git(&["checkout", version])?;
            self.git(&["submodule", "update", "--init", "--recursive"])?;
        }
        Ok(())
    }

    fn update(&self, version: Option<&str>) -> Result<()> {
        let uri = self.get_url().unwrap_or_default();
        self.git(&["fetch", "--tags", "origin"])
            .map_err(|e| explain(e, &uri))?;
        if let Some(version) = version {
            self.git(&["checkout", version])?;
        }
        if self.on_branch() {
            self.git(&["pull", "--ff-only"]).map_err(|e| explain(e, &uri))?;
        }
        self.git(&["submodule", "update", "--init", "--recursive"])?;
        Ok(())
    }

    fn get_version(&self, spec: Option<&str>) -> Result<Option<String>> {
        if !self.detect_presence() {
            return Ok(None);
        }
        let rev = match spec {
            Some(spec) => format!("{}^{{commit}}", spec),
            None => "HEAD".to_string(),
        };
        if let Some(hash) = run_quiet(GIT, &["rev-parse", "--verify", "-q", &rev], &self.path) {
            return Ok(Some(hash));
        }
        // A branch that only exists on the remote.
        if let Some(spec) = spec {
            let remote = format!("origin/{}^{{commit}}", spec);
            return Ok(run_quiet(GIT, &["rev-parse", "--verify", "-q", &remote], &self.path));
        }
        Ok(None)
    }

    fn get_diff(&self, basepath: Option<&Path>) -> Result<String> {
        let prefix = display_prefix(&self.path, basepath);
        let src = format!("--src-prefix=a/{}", prefix);
        let dst = format!("--dst-prefix=b/{}", prefix);
        self.git(&["diff", "HEAD", &src, &dst])
    }

    fn get_status(&self, basepath: Option<&Path>, untracked: bool) -> Result<String> {
        let untracked_flag = if untracked {
            "--untracked-files=all"
        } else {
            "--untracked-files=no"
        };
        let status = self.git(&["status", "--porcelain", untracked_flag])?;
        let prefix = display_prefix(&self.path, basepath);
        Ok(prefix_status_lines(&status, &prefix, 3))
    }
}

//! Bazaar adapter built on the system `bzr` command.

use std::path::{Path, PathBuf};

use log::info;
use regex::Regex;

use super::{display_prefix, prefix_status_lines, prepare_parent, run, run_checked, run_quiet, VcsClient};
use crate::error::{Error, Result};
use crate::path_spec::ScmType;

const BZR: &str = "bzr";

#[derive(Debug, Clone)]
pub struct BzrClient {
    path: PathBuf,
}

impl BzrClient {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    fn bzr(&self, args: &[&str]) -> Result<String> {
        run_checked(BZR, args, &self.path)
    }
}

/// Pull the parent branch out of `bzr info` output.
fn parse_parent_branch(info: &str) -> Option<String> {
    let re = Regex::new(r"(?m)^\s*parent branch:\s*(\S+)\s*$").ok()?;
    re.captures(info).map(|c| c[1].to_string())
}

impl VcsClient for BzrClient {
    fn path(&self) -> &Path {
        &self.path
    }

    fn vcs_type(&self) -> ScmType {
        ScmType::Bzr
    }

    fn detect_presence(&self) -> bool {
        self.path.join(".bzr").is_dir()
    }

    fn get_url(&self) -> Option<String> {
        if !self.detect_presence() {
            return None;
        }
        let info = run_quiet(BZR, &["info"], &self.path)?;
        parse_parent_branch(&info)
    }

    fn checkout(&self, uri: &str, version: Option<&str>) -> Result<()> {
        let parent = prepare_parent(&self.path)?;
        let target = self.path.to_string_lossy();
        info!("Branching {} into {}", uri, target);
        let mut args = vec!["branch"];
        if let Some(version) = version {
            args.extend(["-r", version]);
        }
        args.extend([uri, &*target]);
        run_checked(BZR, &args, &parent)?;
        Ok(())
    }

    fn update(&self, version: Option<&str>) -> Result<()> {
        let mut args = vec!["pull"];
        if let Some(version) = version {
            args.extend(["-r", version, "--overwrite"]);
        }
        self.bzr(&args)?;
        Ok(())
    }

    fn get_version(&self, spec: Option<&str>) -> Result<Option<String>> {
        if !self.detect_presence() {
            return Ok(None);
        }
        let revno = match spec {
            Some(spec) => run_quiet(BZR, &["revno", "-r", spec], &self.path),
            None => run_quiet(BZR, &["revno", "--tree"], &self.path),
        };
        Ok(revno)
    }

    fn get_diff(&self, basepath: Option<&Path>) -> Result<String> {
        let prefix = display_prefix(&self.path, basepath);
        let prefix_arg = format!("--prefix=a/{p}:b/{p}", p = prefix);
        let output = run(BZR, &["diff", &prefix_arg], &self.path)?;
        // bzr diff exits with 1 when there are differences.
        match output.status.code() {
            Some(0) | Some(1) => Ok(String::from_utf8_lossy(&output.stdout).into_owned()),
            _ => Err(Error::VcsCommand {
                program: BZR.to_string(),
                command: "diff".to_string(),
                cwd: self.path.clone(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
        }
    }

    fn get_status(&self, basepath: Option<&Path>, untracked: bool) -> Result<String> {
        let status = self.bzr(&["status", "--short"])?;
        let status: String = status
            .lines()
            .filter(|line| untracked || !line.starts_with('?'))
            .map(|line| format!("{}\n", line))
            .collect();
        let prefix = display_prefix(&self.path, basepath);
        Ok(prefix_status_lines(&status, &prefix, 4))
    }
}

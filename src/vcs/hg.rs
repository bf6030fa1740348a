//! Mercurial adapter built on the system `hg` command.

use std::path::{Path, PathBuf};

use log::info;

use super::{display_prefix, prefix_status_lines, prepare_parent, run_checked, run_quiet, VcsClient};
use crate::error::Result;
use crate::path_spec::ScmType;

const HG: &str = "hg";

#[derive(Debug, Clone)]
pub struct HgClient {
    path: PathBuf,
}

impl HgClient {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    fn hg(&self, args: &[&str]) -> Result<String> {
        run_checked(HG, args, &self.path)
    }
}

impl VcsClient for HgClient {
    fn path(&self) -> &Path {
        &self.path
    }

    fn vcs_type(&self) -> ScmType {
        ScmType::Hg
    }

    fn detect_presence(&self) -> bool {
        self.path.join(".hg").is_dir()
    }

    fn get_url(&self) -> Option<String> {
        if !self.detect_presence() {
            return None;
        }
        run_quiet(HG, &["paths", "default"], &self.path)
    }

    fn checkout(&self, uri: &str, version: Option<&str>) -> Result<()> {
        let parent = prepare_parent(&self.path)?;
        let target = self.path.to_string_lossy();
        info!("Cloning {} into {}", uri, target);
        let mut args = vec!["clone", "--noninteractive"];
        if let Some(version) = version {
            args.extend(["--updaterev", version]);
        }
        args.extend([uri, &*target]);
        run_checked(HG, &args, &parent)?;
        Ok(())
    }

    fn update(&self, version: Option<&str>) -> Result<()> {
        self.hg(&["pull", "--noninteractive"])?;
        match version {
            Some(version) => self.hg(&["update", "--noninteractive", version])?,
            None => self.hg(&["update", "--noninteractive"])?,
        };
        Ok(())
    }

    fn get_version(&self, spec: Option<&str>) -> Result<Option<String>> {
        if !self.detect_presence() {
            return Ok(None);
        }
        let rev = spec.unwrap_or(".");
        Ok(run_quiet(
            HG,
            &["log", "-r", rev, "--template", "{node}"],
            &self.path,
        ))
    }

    fn get_diff(&self, basepath: Option<&Path>) -> Result<String> {
        let diff = self.hg(&["diff", "-g"])?;
        let prefix = display_prefix(&self.path, basepath);
        if prefix.is_empty() {
            return Ok(diff);
        }
        Ok(diff
            .lines()
            .map(|line| {
                for marker in ["--- a/", "+++ b/", "diff --git a/"] {
                    if let Some(rest) = line.strip_prefix(marker) {
                        let rest = rest.replacen(" b/", &format!(" b/{}", prefix), 1);
                        return format!("{}{}{}\n", marker, prefix, rest);
                    }
                }
                format!("{}\n", line)
            })
            .collect())
    }

    fn get_status(&self, basepath: Option<&Path>, untracked: bool) -> Result<String> {
        // Without -u, list modified/added/removed/deleted but not unknown files.
        let flags = if untracked { "-mardu" } else { "-mard" };
        let status = self.hg(&["status", flags])?;
        let prefix = display_prefix(&self.path, basepath);
        Ok(prefix_status_lines(&status, &prefix, 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_detect_presence_requires_dot_hg() {
        let temp = TempDir::new().unwrap();
        let client = HgClient::new(temp.path());
        assert!(!client.detect_presence());
        std::fs::create_dir(temp.path().join(".hg")).unwrap();
        assert!(client.detect_presence());
        assert_eq!(client.vcs_type(), ScmType::Hg);
    }
}

//! # Version-Control Clients
//!
//! The workspace engine never speaks a VCS protocol itself. Every
//! version-controlled entry is driven through the [`VcsClient`] trait, one
//! client per `(scm type, path)`.
//!
//! ## Design
//!
//! - **`VcsClient`**: the contract a backend adapter fulfils: presence
//!   detection, remote url, checkout, update, revision lookup, diff and
//!   status.
//! - **`VcsRegistry`**: maps the closed [`ScmType`] enum to a factory that
//!   builds a client for a path. `VcsRegistry::default()` wires the command
//!   line adapters in [`git`], [`hg`], [`svn`] and [`bzr`]; tests register
//!   mocks instead, the same way `RepositoryManager::with_operations` swaps
//!   its git operations.
//!
//! The bundled adapters shell out to the system executables, which pick up
//! the user's SSH keys, credential helpers and configuration.

pub mod bzr;
pub mod git;
pub mod hg;
pub mod svn;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::Arc;

use log::debug;

use crate::error::{Error, Result};
use crate::path_spec::ScmType;

/// Operations the workspace needs from a version-control backend.
///
/// Implementations must be `Send + Sync`: parallel installs call them from
/// worker threads.
pub trait VcsClient: Send + Sync {
    /// The directory this client manages.
    fn path(&self) -> &Path;

    /// Which backend this client drives.
    fn vcs_type(&self) -> ScmType;

    /// Whether anything exists at the managed path.
    fn path_exists(&self) -> bool {
        self.path().exists()
    }

    /// Whether the managed path is a checkout of this backend.
    fn detect_presence(&self) -> bool;

    /// The remote the checkout is configured to track.
    fn get_url(&self) -> Option<String>;

    /// Create a fresh checkout of `uri` at the managed path.
    fn checkout(&self, uri: &str, version: Option<&str>) -> Result<()>;

    /// Bring an existing checkout to `version`, or to the tip of what it
    /// tracks when no version is given.
    fn update(&self, version: Option<&str>) -> Result<()>;

    /// Resolve a revision spec to a unique identifier; `None` means the
    /// revision currently checked out.
    fn get_version(&self, spec: Option<&str>) -> Result<Option<String>>;

    /// Uncommitted changes, with paths relative to `basepath` when given.
    fn get_diff(&self, basepath: Option<&Path>) -> Result<String>;

    /// Short status, with paths relative to `basepath` when given.
    fn get_status(&self, basepath: Option<&Path>, untracked: bool) -> Result<String>;

    /// The backend name, as written in manifests.
    fn get_vcs_type_name(&self) -> &'static str {
        self.vcs_type().as_str()
    }
}

/// Builds a client for a path.
pub type VcsFactory = Arc<dyn Fn(&Path) -> Box<dyn VcsClient> + Send + Sync>;

/// Maps each backend to the factory that builds its clients.
#[derive(Clone)]
pub struct VcsRegistry {
    factories: HashMap<ScmType, VcsFactory>,
}

impl VcsRegistry {
    /// A registry with no backends.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register (or replace) the factory for `scm_type`.
    pub fn register<F>(&mut self, scm_type: ScmType, factory: F) -> &mut Self
    where
        F: Fn(&Path) -> Box<dyn VcsClient> + Send + Sync + 'static,
    {
        self.factories.insert(scm_type, Arc::new(factory));
        self
    }

    /// Whether a factory exists for `scm_type`.
    pub fn supports(&self, scm_type: ScmType) -> bool {
        self.factories.contains_key(&scm_type)
    }

    /// Build a client for `path`, or `None` when the backend is unregistered.
    pub fn client(&self, scm_type: ScmType, path: &Path) -> Option<Box<dyn VcsClient>> {
        self.factories.get(&scm_type).map(|factory| factory(path))
    }
}

impl Default for VcsRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for scm_type in ScmType::ALL {
            match scm_type {
                ScmType::Git => registry.register(scm_type, |p| Box::new(git::GitClient::new(p))),
                ScmType::Hg => registry.register(scm_type, |p| Box::new(hg::HgClient::new(p))),
                ScmType::Svn => registry.register(scm_type, |p| Box::new(svn::SvnClient::new(p))),
                ScmType::Bzr => registry.register(scm_type, |p| Box::new(bzr::BzrClient::new(p))),
            };
        }
        registry
    }
}

impl std::fmt::Debug for VcsRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<&ScmType> = self.factories.keys().collect();
        types.sort();
        f.debug_struct("VcsRegistry").field("types", &types).finish()
    }
}

/// Run a VCS executable in `cwd` and capture its output.
pub(crate) fn run(program: &str, args: &[&str], cwd: &Path) -> Result<Output> {
    debug!("{} {} (in {})", program, args.join(" "), cwd.display());
    Command::new(program)
        .args(args)
        .current_dir(cwd)
        .output()
        .map_err(|e| Error::VcsCommand {
            program: program.to_string(),
            command: args.join(" "),
            cwd: cwd.to_path_buf(),
            stderr: e.to_string(),
        })
}

/// Run a VCS executable and return its stdout, failing on a non-zero exit.
pub(crate) fn run_checked(program: &str, args: &[&str], cwd: &Path) -> Result<String> {
    let output = run(program, args, cwd)?;
    if !output.status.success() {
        return Err(Error::VcsCommand {
            program: program.to_string(),
            command: args.join(" "),
            cwd: cwd.to_path_buf(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Run a VCS executable and return trimmed stdout when it succeeds.
pub(crate) fn run_quiet(program: &str, args: &[&str], cwd: &Path) -> Option<String> {
    let output = run(program, args, cwd).ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// The directory a checkout into `path` has to be started from, created if
/// missing.
pub(crate) fn prepare_parent(path: &Path) -> Result<PathBuf> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&parent)?;
    Ok(parent)
}

/// The prefix status and diff lines get, relative to `basepath`.
pub(crate) fn display_prefix(path: &Path, basepath: Option<&Path>) -> String {
    match basepath {
        Some(base) => {
            let rel = crate::path::relative_to(path, base);
            if rel == Path::new(".") {
                String::new()
            } else {
                format!("{}/", rel.to_string_lossy())
            }
        }
        None => String::new(),
    }
}

/// Rewrite `<flags> <file>` status lines so the file is shown under `prefix`.
///
/// `columns` is the width of the flag column including the separator.
pub(crate) fn prefix_status_lines(status: &str, prefix: &str, columns: usize) -> String {
    if prefix.is_empty() {
        return status.to_string();
    }
    let mut out = String::new();
    for line in status.lines() {
        if line.len() > columns && line.is_char_boundary(columns) {
            let (flags, file) = line.split_at(columns);
            out.push_str(flags);
            out.push_str(prefix);
            out.push_str(file.trim_start());
        } else {
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

//! # Config Elements
//!
//! A `ConfigElement` is a [`PathSpec`] bound to a workspace: its resolved
//! absolute path and, for version-controlled entries, a live [`VcsClient`].
//!
//! ## Install state machine
//!
//! ```text
//! path missing ───────────────────────────────► checkout(uri, version)
//! path present ─┬─ not a checkout ──┐
//!               ├─ url mismatch ────┴─► conflict ─► robust? fail
//!               │                                   else resolve by mode
//!               └─ url matches ───────────────────► update(version)
//! ```
//!
//! `other` and `setup-file` elements have nothing to fetch; installing them
//! always succeeds without touching the filesystem.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::conflict::{ConflictReason, ConflictResolver, InstallConflict, InstallMode, Resolution};
use crate::error::{Error, Result};
use crate::path;
use crate::path_spec::{EntryKind, PathSpec, ScmType};
use crate::vcs::{VcsClient, VcsRegistry};

/// Options shared by every element install in one run.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Where `backup` moves conflicting directories.
    pub backup_path: Option<PathBuf>,
    /// How conflicting directories are handled.
    pub mode: InstallMode,
    /// Fail conflicts immediately instead of resolving them, and keep going
    /// past failed elements in batch installs.
    pub robust: bool,
    /// Number of elements installed at once; 1 means sequential.
    pub parallelism: usize,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            backup_path: None,
            mode: InstallMode::Prompt,
            robust: false,
            parallelism: 1,
        }
    }
}

/// What an install did to one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The path was missing (or cleared) and a fresh checkout was made.
    CheckedOut,
    /// An existing checkout was updated.
    Updated,
    /// A conflicting directory was left untouched.
    Skipped,
    /// Nothing to do for a non-VCS element.
    Unchanged,
}

/// A workspace entry bound to its location and backend.
pub struct ConfigElement {
    spec: PathSpec,
    path: PathBuf,
    client: Option<Box<dyn VcsClient>>,
}

impl std::fmt::Debug for ConfigElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigElement")
            .field("spec", &self.spec)
            .field("path", &self.path)
            .field("has_client", &self.client.is_some())
            .finish()
    }
}

impl ConfigElement {
    /// Bind `spec` under `base_path`, building a client from `registry` for
    /// VCS entries.
    pub fn bind(spec: PathSpec, base_path: &Path, registry: &VcsRegistry) -> Result<Self> {
        let path = path::normalize(base_path, spec.local_name());
        let client = match spec.kind() {
            EntryKind::Vcs(scm_type) => {
                if spec.uri().map_or(true, str::is_empty) {
                    return Err(Error::VcsConfiguration {
                        local_name: spec.local_name().to_string(),
                        message: "version-controlled entry has no uri".to_string(),
                    });
                }
                let client = registry.client(scm_type, &path).ok_or_else(|| {
                    Error::UnknownVcsType {
                        scm_type: scm_type.to_string(),
                        local_name: spec.local_name().to_string(),
                    }
                })?;
                Some(client)
            }
            EntryKind::Other | EntryKind::SetupFile => None,
        };
        Ok(Self { spec, path, client })
    }

    /// Bind with an explicit client, skipping the registry.
    pub fn with_client(spec: PathSpec, path: PathBuf, client: Option<Box<dyn VcsClient>>) -> Self {
        Self { spec, path, client }
    }

    /// The local name as written in the manifest.
    pub fn local_name(&self) -> &str {
        self.spec.local_name()
    }

    /// The normalized absolute path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> EntryKind {
        self.spec.kind()
    }

    pub fn is_vcs(&self) -> bool {
        self.client.is_some()
    }

    pub fn is_setup_file(&self) -> bool {
        self.spec.is_setup_file()
    }

    pub fn vcs_type(&self) -> Option<ScmType> {
        self.client.as_ref().map(|c| c.vcs_type())
    }

    /// The live client, for VCS elements.
    pub fn client(&self) -> Option<&dyn VcsClient> {
        self.client.as_deref()
    }

    /// The declared spec; no VCS query.
    pub fn get_path_spec(&self) -> PathSpec {
        self.spec.clone()
    }

    /// The declared spec plus the identifier `version` resolves to and the
    /// revision currently on disk.
    pub fn get_versioned_path_spec(&self) -> Result<PathSpec> {
        let client = self.client.as_deref().ok_or_else(|| Error::Unversionable {
            local_name: self.local_name().to_string(),
        })?;
        let current = client.get_version(None)?;
        let revision = match self.spec.version() {
            Some(version) => client.get_version(Some(version))?,
            None => current.clone(),
        };
        Ok(self.spec.clone().with_revisions(revision, current))
    }

    /// Reconcile the filesystem with the declared spec.
    pub fn install(
        &self,
        options: &InstallOptions,
        resolver: &dyn ConflictResolver,
    ) -> Result<InstallOutcome> {
        let Some(client) = self.client.as_deref() else {
            return Ok(InstallOutcome::Unchanged);
        };
        let uri = self.spec.uri().unwrap_or_default();
        let version = self.spec.version();

        if !client.path_exists() {
            self.checkout(client, uri, version)?;
            return Ok(InstallOutcome::CheckedOut);
        }

        let conflict = match self.detect_conflict(client, uri) {
            None => {
                info!("Updating {}", self.local_name());
                client.update(version).map_err(|e| Error::UpdateFailed {
                    local_name: self.local_name().to_string(),
                    version: version.map(str::to_string),
                    message: e.to_string(),
                })?;
                return Ok(InstallOutcome::Updated);
            }
            Some(conflict) => conflict,
        };

        if options.robust {
            return Err(conflict.into_error());
        }

        let backup_path = options.backup_path.as_deref();
        let resolution = match Resolution::from_mode(options.mode, backup_path, self.local_name())? {
            Some(resolution) => resolution,
            None => resolver.resolve(&conflict, backup_path)?,
        };

        match resolution {
            Resolution::Abort => Err(conflict.into_error()),
            Resolution::Skip => {
                warn!("Skipping {}: {}", self.local_name(), conflict.reason);
                Ok(InstallOutcome::Skipped)
            }
            Resolution::Delete => {
                info!("Deleting {}", self.path.display());
                remove_path(&self.path)?;
                self.checkout(client, uri, version)?;
                Ok(InstallOutcome::CheckedOut)
            }
            Resolution::Backup(backup_root) => {
                let target = move_to_backup(&self.path, &backup_root)?;
                info!("Backed up {} to {}", self.path.display(), target.display());
                self.checkout(client, uri, version)?;
                Ok(InstallOutcome::CheckedOut)
            }
        }
    }

    /// Uncommitted changes; empty for non-VCS elements.
    pub fn get_diff(&self, basepath: Option<&Path>) -> Result<String> {
        match self.client.as_deref() {
            Some(client) => client.get_diff(basepath),
            None => Ok(String::new()),
        }
    }

    /// Short status; empty for non-VCS elements.
    pub fn get_status(&self, basepath: Option<&Path>, untracked: bool) -> Result<String> {
        match self.client.as_deref() {
            Some(client) => client.get_status(basepath, untracked),
            None => Ok(String::new()),
        }
    }

    fn detect_conflict(&self, client: &dyn VcsClient, uri: &str) -> Option<InstallConflict> {
        let reason = if !client.detect_presence() {
            ConflictReason::NotUnderVcs {
                vcs_type: client.get_vcs_type_name().to_string(),
            }
        } else {
            let found = client.get_url();
            match &found {
                Some(url) if path::uris_match(uri, url) => return None,
                _ => ConflictReason::UrlMismatch {
                    expected: uri.to_string(),
                    found,
                },
            }
        };
        debug!("Conflict for {}: {}", self.local_name(), reason);
        Some(InstallConflict {
            local_name: self.local_name().to_string(),
            path: self.path.clone(),
            reason,
        })
    }

    fn checkout(&self, client: &dyn VcsClient, uri: &str, version: Option<&str>) -> Result<()> {
        info!("Checking out {} into {}", uri, self.local_name());
        client
            .checkout(uri, version)
            .map_err(|e| Error::CheckoutFailed {
                local_name: self.local_name().to_string(),
                uri: uri.to_string(),
                version: version.map(str::to_string),
                message: e.to_string(),
            })
    }
}

/// `<backup_root>/<basename>_<timestamp>`, with `_<n>` appended for the
/// `n`th retry.
fn backup_target(backup_root: &Path, path: &Path, attempt: usize) -> PathBuf {
    let base = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "backup".to_string());
    let stamp = chrono::Local::now().format("%Y-%m-%d-%H-%M-%S");
    match attempt {
        0 => backup_root.join(format!("{}_{}", base, stamp)),
        n => backup_root.join(format!("{}_{}_{}", base, stamp, n)),
    }
}

fn remove_path(path: &Path) -> Result<()> {
    if path.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Move `from` under `backup_root` into a target that did not exist before,
/// returning that target. An existing backup is never written into.
fn move_to_backup(from: &Path, backup_root: &Path) -> Result<PathBuf> {
    fs::create_dir_all(backup_root)?;
    let mut attempt = 0;
    loop {
        let target = backup_target(backup_root, from, attempt);
        attempt += 1;
        if target.symlink_metadata().is_ok() {
            continue;
        }
        match fs::rename(from, &target) {
            Ok(()) => return Ok(target),
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
                let is_dir = from.symlink_metadata()?.is_dir();
                // The target is created before copying; AlreadyExists means
                // another backup took the name.
                let claimed = if is_dir {
                    fs::create_dir(&target).map(|_| ())
                } else {
                    fs::OpenOptions::new()
                        .write(true)
                        .create_new(true)
                        .open(&target)
                        .map(|_| ())
                };
                match claimed {
                    Ok(()) => {}
                    Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                    Err(e) => return Err(e.into()),
                }
                debug!("rename crosses devices, copying {} to {}", from.display(), target.display());
                if is_dir {
                    copy_tree(from, &target)?;
                } else {
                    fs::copy(from, &target)?;
                }
                remove_path(from)?;
                return Ok(target);
            }
            // Another backup claimed the name between the check and the rename.
            Err(_) if target.symlink_metadata().is_ok() => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Copy the tree at `from` into the existing, empty directory `to`.
/// Symlinks are recreated, not followed.
fn copy_tree(from: &Path, to: &Path) -> Result<()> {
    for entry in WalkDir::new(from).min_depth(1) {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        let rel = entry.path().strip_prefix(from).unwrap_or(entry.path());
        let dest = to.join(rel);
        let file_type = entry.file_type();
        if file_type.is_symlink() {
            copy_symlink(entry.path(), &dest)?;
        } else if file_type.is_dir() {
            fs::create_dir(&dest)?;
        } else {
            fs::copy(entry.path(), &dest)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(link: &Path, dest: &Path) -> Result<()> {
    let target = fs::read_link(link)?;
    std::os::unix::fs::symlink(target, dest)?;
    Ok(())
}

#[cfg(windows)]
fn copy_symlink(link: &Path, dest: &Path) -> Result<()> {
    let target = fs::read_link(link)?;
    let resolved = link.parent().map(|p| p.join(&target)).unwrap_or_else(|| target.clone());
    if resolved.is_dir() {
        std::os::windows::fs::symlink_dir(target, dest)?;
    } else {
        std::os::windows::fs::symlink_file(target, dest)?;
    }
    Ok(())
}

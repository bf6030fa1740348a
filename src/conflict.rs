//! # Install Conflict Resolution
//!
//! When an entry's directory exists but is not the checkout the manifest
//! declares (no VCS markers, or a different remote), the install has to
//! decide what to do with it. The *decision* is separated from the
//! *interaction*:
//!
//! - **`InstallMode`** is what the caller asked for (`abort`, `backup`,
//!   `delete`, `skip`, or `prompt`).
//! - **`Resolution`** is what actually happens to this one directory.
//! - **`ConflictResolver`** turns a conflict into a resolution when the mode
//!   is `prompt`. [`ScriptedResolver`] always answers the same way,
//!   [`InteractiveResolver`] asks on the terminal with `dialoguer`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;

use dialoguer::{theme::ColorfulTheme, Input, Select};

use crate::error::{Error, Result};

/// How conflicting directories are handled during install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstallMode {
    /// Fail the element's install.
    Abort,
    /// Move the directory under the backup path, then check out fresh.
    Backup,
    /// Remove the directory, then check out fresh.
    Delete,
    /// Leave the directory alone and report success.
    Skip,
    /// Ask the [`ConflictResolver`].
    #[default]
    Prompt,
}

impl InstallMode {
    pub fn as_str(self) -> &'static str {
        match self {
            InstallMode::Abort => "abort",
            InstallMode::Backup => "backup",
            InstallMode::Delete => "delete",
            InstallMode::Skip => "skip",
            InstallMode::Prompt => "prompt",
        }
    }
}

impl fmt::Display for InstallMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstallMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(InstallMode::Abort),
            "backup" => Ok(InstallMode::Backup),
            "delete" => Ok(InstallMode::Delete),
            "skip" => Ok(InstallMode::Skip),
            "prompt" => Ok(InstallMode::Prompt),
            other => Err(format!(
                "unknown install mode '{}' (expected abort, backup, delete, skip or prompt)",
                other
            )),
        }
    }
}

/// Why the on-disk directory does not match the declared entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictReason {
    /// The directory exists but is not a checkout of the declared backend.
    NotUnderVcs { vcs_type: String },
    /// The checkout tracks a different remote.
    UrlMismatch {
        expected: String,
        found: Option<String>,
    },
}

impl fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictReason::NotUnderVcs { vcs_type } => {
                write!(f, "directory exists but is not a {} checkout", vcs_type)
            }
            ConflictReason::UrlMismatch { expected, found } => write!(
                f,
                "url {} does not match {}",
                found.as_deref().unwrap_or("(none)"),
                expected
            ),
        }
    }
}

/// A detected conflict for one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallConflict {
    pub local_name: String,
    pub path: PathBuf,
    pub reason: ConflictReason,
}

impl InstallConflict {
    pub fn into_error(self) -> Error {
        Error::InstallConflict {
            local_name: self.local_name,
            path: self.path,
            reason: self.reason.to_string(),
        }
    }
}

/// What to do with one conflicting directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Abort,
    /// Move the directory under this backup root.
    Backup(PathBuf),
    Delete,
    Skip,
}

impl Resolution {
    /// The resolution a non-interactive mode implies.
    ///
    /// Returns `None` for [`InstallMode::Prompt`], which needs a resolver, and
    /// an error for `Backup` without a backup path.
    pub fn from_mode(
        mode: InstallMode,
        backup_path: Option<&Path>,
        local_name: &str,
    ) -> Result<Option<Self>> {
        Ok(match mode {
            InstallMode::Abort => Some(Resolution::Abort),
            InstallMode::Delete => Some(Resolution::Delete),
            InstallMode::Skip => Some(Resolution::Skip),
            InstallMode::Backup => {
                let path = backup_path.ok_or_else(|| Error::BackupPathRequired {
                    local_name: local_name.to_string(),
                })?;
                Some(Resolution::Backup(path.to_path_buf()))
            }
            InstallMode::Prompt => None,
        })
    }
}

/// Decides what happens to a conflicting directory when the mode is
/// `prompt`.
pub trait ConflictResolver: Send + Sync {
    fn resolve(&self, conflict: &InstallConflict, backup_path: Option<&Path>) -> Result<Resolution>;
}

/// Answers every conflict with the same mode.
#[derive(Debug, Clone)]
pub struct ScriptedResolver {
    mode: InstallMode,
}

impl ScriptedResolver {
    /// `mode` must not be `prompt`; a prompt answer falls back to abort.
    pub fn new(mode: InstallMode) -> Self {
        Self { mode }
    }
}

impl ConflictResolver for ScriptedResolver {
    fn resolve(&self, conflict: &InstallConflict, backup_path: Option<&Path>) -> Result<Resolution> {
        Ok(Resolution::from_mode(self.mode, backup_path, &conflict.local_name)?
            .unwrap_or(Resolution::Abort))
    }
}

/// Asks the operator on the terminal.
///
/// Prompts are serialized, so parallel installs never interleave two
/// questions.
#[derive(Debug, Default)]
pub struct InteractiveResolver {
    lock: Mutex<()>,
}

impl InteractiveResolver {
    pub fn new() -> Self {
        Self::default()
    }
}

const CHOICES: [(&str, InstallMode); 4] = [
    ("backup the directory and check out fresh", InstallMode::Backup),
    ("delete the directory and check out fresh", InstallMode::Delete),
    ("abort this entry", InstallMode::Abort),
    ("skip this entry, leaving the directory as is", InstallMode::Skip),
];

impl ConflictResolver for InteractiveResolver {
    fn resolve(&self, conflict: &InstallConflict, backup_path: Option<&Path>) -> Result<Resolution> {
        let _guard = self.lock.lock().map_err(|_| Error::Prompt {
            message: "prompt lock poisoned".to_string(),
        })?;

        let theme = ColorfulTheme::default();
        eprintln!(
            "Conflict at {}: {}",
            conflict.path.display(),
            conflict.reason
        );
        let items: Vec<&str> = CHOICES.iter().map(|(label, _)| *label).collect();
        let choice = Select::with_theme(&theme)
            .with_prompt(format!("What should happen to {}?", conflict.local_name))
            .items(&items)
            .default(0)
            .interact()?;

        let mode = CHOICES[choice].1;
        if mode == InstallMode::Backup {
            let mut input = Input::<String>::with_theme(&theme).with_prompt("Backup directory");
            if let Some(default) = backup_path {
                input = input.default(default.to_string_lossy().into_owned());
            }
            let answer = input.interact_text()?;
            return Ok(Resolution::Backup(crate::path::expand_home(answer.trim())));
        }
        Ok(Resolution::from_mode(mode, backup_path, &conflict.local_name)?
            .unwrap_or(Resolution::Abort))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conflict() -> InstallConflict {
        InstallConflict {
            local_name: "foo".to_string(),
            path: PathBuf::from("/ws/foo"),
            reason: ConflictReason::UrlMismatch {
                expected: "https://h/foo.git".to_string(),
                found: Some("https://h/fork.git".to_string()),
            },
        }
    }

    #[test]
    fn test_install_mode_from_str() {
        assert_eq!("delete".parse::<InstallMode>().unwrap(), InstallMode::Delete);
        assert_eq!("BACKUP".parse::<InstallMode>().unwrap(), InstallMode::Backup);
        assert!("explode".parse::<InstallMode>().is_err());
        assert_eq!(InstallMode::default(), InstallMode::Prompt);
    }

    #[test]
    fn test_resolution_from_mode() {
        assert_eq!(
            Resolution::from_mode(InstallMode::Skip, None, "foo").unwrap(),
            Some(Resolution::Skip)
        );
        assert_eq!(
            Resolution::from_mode(InstallMode::Prompt, None, "foo").unwrap(),
            None
        );
        assert_eq!(
            Resolution::from_mode(InstallMode::Backup, Some(Path::new("/bk")), "foo").unwrap(),
            Some(Resolution::Backup(PathBuf::from("/bk")))
        );
    }

    #[test]
    fn test_backup_without_path_fails() {
        let err = Resolution::from_mode(InstallMode::Backup, None, "foo").unwrap_err();
        assert!(matches!(err, Error::BackupPathRequired { .. }));
    }

    #[test]
    fn test_scripted_resolver() {
        let resolver = ScriptedResolver::new(InstallMode::Delete);
        assert_eq!(resolver.resolve(&conflict(), None).unwrap(), Resolution::Delete);

        let resolver = ScriptedResolver::new(InstallMode::Prompt);
        assert_eq!(resolver.resolve(&conflict(), None).unwrap(), Resolution::Abort);
    }

    #[test]
    fn test_conflict_reason_display() {
        let text = conflict().reason.to_string();
        assert_eq!(text, "url https://h/fork.git does not match https://h/foo.git");

        let reason = ConflictReason::NotUnderVcs {
            vcs_type: "git".to_string(),
        };
        assert_eq!(reason.to_string(), "directory exists but is not a git checkout");
    }

    #[test]
    fn test_conflict_into_error() {
        let err = conflict().into_error();
        assert!(matches!(err, Error::InstallConflict { .. }));
        assert!(err.to_string().contains("/ws/foo"));
    }
}

//! # Error Handling
//!
//! This module defines the centralized error type for `wstool`. It uses the
//! `thiserror` library to build one `Error` enum covering every failure the
//! workspace engine can report, with enough context (local name, uri, path)
//! for the CLI to print a useful message.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Variants fall into three groups:
//!   - manifest problems (`ManifestFormat`, `EmptyOrInvalidManifest`,
//!     `VcsConfiguration`, `UnknownVcsType`), fatal when a source is read or
//!     a workspace is built;
//!   - per-element install problems (`InstallConflict`, `BackupPathRequired`,
//!     `CheckoutFailed`, `UpdateFailed`, `Unversionable`), fatal for one
//!     element and recorded rather than raised in robust batch mode;
//!   - plumbing (`VcsCommand`, `Prompt`, `ThreadPool`, I/O and YAML).
//!
//! - **`FormatIssue`**: The reason a manifest record was rejected.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Duplicate local names are deliberately absent from the taxonomy: they are
//! resolved by the merge strategy and never surface as errors.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Why a manifest record could not be turned into a `PathSpec`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatIssue {
    /// The record has no `local-name` sub-key.
    MissingLocalName,
    /// The top-level key is not one of the known entry kinds.
    UnknownKey,
    /// A `uri` was given on an entry without a VCS type.
    UriWithoutScm,
    /// A `version` was given on an entry without a VCS type.
    VersionWithoutScm,
    /// A VCS entry has no `uri`.
    ScmWithoutUri,
    /// The record is not a single-key mapping, or a value has the wrong shape.
    Malformed,
}

impl fmt::Display for FormatIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FormatIssue::MissingLocalName => "missing local-name",
            FormatIssue::UnknownKey => "unknown key",
            FormatIssue::UriWithoutScm => "uri without scm-type",
            FormatIssue::VersionWithoutScm => "version without scm-type",
            FormatIssue::ScmWithoutUri => "scm-type without uri",
            FormatIssue::Malformed => "malformed record",
        };
        f.write_str(text)
    }
}

/// Main error type for wstool operations
#[derive(Error, Debug)]
pub enum Error {
    /// A manifest record is malformed or ambiguous.
    ///
    /// Always fatal to parsing the source it came from.
    #[error("Manifest format error ({issue}): {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ManifestFormat {
        issue: FormatIssue,
        message: String,
        /// Optional hint for how to fix the record
        hint: Option<String>,
    },

    /// A manifest source parsed to zero entries or could not be read at all.
    #[error("Empty or invalid manifest: {source_name}: {message}")]
    EmptyOrInvalidManifest {
        source_name: String,
        message: String,
    },

    /// An entry cannot be bound to a workspace (missing uri or local name).
    #[error("VCS configuration error for {local_name}: {message}")]
    VcsConfiguration { local_name: String, message: String },

    /// No client factory is registered for an entry's scm type.
    #[error("No VCS client registered for type '{scm_type}' (entry {local_name})")]
    UnknownVcsType {
        scm_type: String,
        local_name: String,
    },

    /// The on-disk state disagrees with the declared entry.
    #[error("Install conflict at {}: {reason}", path.display())]
    InstallConflict {
        local_name: String,
        path: PathBuf,
        reason: String,
    },

    /// Backup resolution was requested without a backup directory.
    #[error("Cannot back up {local_name}: no backup path given")]
    BackupPathRequired { local_name: String },

    /// The backend failed to check out a missing entry.
    #[error("Checkout of {uri}{} into {local_name} failed: {message}", version.as_ref().map(|v| format!(" ({})", v)).unwrap_or_default())]
    CheckoutFailed {
        local_name: String,
        uri: String,
        version: Option<String>,
        message: String,
    },

    /// The backend failed to update an existing checkout.
    #[error("Update of {local_name}{} failed: {message}", version.as_ref().map(|v| format!(" to {}", v)).unwrap_or_default())]
    UpdateFailed {
        local_name: String,
        version: Option<String>,
        message: String,
    },

    /// A versioned snapshot was requested for an entry without VCS state.
    #[error("Cannot resolve a revision for {local_name}: entry is not under version control")]
    Unversionable { local_name: String },

    /// One or more elements of a parallel install failed.
    #[error("{failed} of {total} elements failed to install:\n{details}")]
    BatchFailed {
        failed: usize,
        total: usize,
        details: String,
    },

    /// A local name given on the command line matches no workspace entry.
    #[error("Unknown local name: {name}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    UnknownLocalName { name: String, hint: Option<String> },

    /// A VCS executable could not be run or exited unsuccessfully.
    #[error("{program} {command} failed in {}: {stderr}", cwd.display())]
    VcsCommand {
        program: String,
        command: String,
        cwd: PathBuf,
        stderr: String,
    },

    /// Reading an answer from the terminal failed.
    #[error("Prompt failed: {message}")]
    Prompt { message: String },

    /// The worker pool for parallel installs could not be created.
    #[error("Thread pool error: {message}")]
    ThreadPool { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Shorthand for a `ManifestFormat` error without a hint.
    pub fn format(issue: FormatIssue, message: impl Into<String>) -> Self {
        Error::ManifestFormat {
            issue,
            message: message.into(),
            hint: None,
        }
    }

    /// The format issue, if this is a manifest format error.
    pub fn format_issue(&self) -> Option<FormatIssue> {
        match self {
            Error::ManifestFormat { issue, .. } => Some(*issue),
            _ => None,
        }
    }
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Prompt {
            message: err.to_string(),
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

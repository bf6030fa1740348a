//! # wstool Library
//!
//! This library provides the workspace engine behind the `wstool`
//! command-line tool: a workspace is a directory holding a `.rosinstall`
//! manifest that lists named subdirectories, each either a checkout of a
//! version-controlled repository or a plain folder. The library reconciles
//! the filesystem with that manifest and merges manifests from several
//! sources.
//!
//! ## Quick Example
//!
//! ```
//! use std::path::Path;
//! use wstool::aggregate::{ManifestSource, MergeStrategy};
//! use wstool::config::Config;
//! use wstool::vcs::VcsRegistry;
//!
//! let base = ManifestSource::document(
//!     "base",
//!     "- git: {local-name: core, uri: 'https://example.com/core.git', version: v1}\n\
//!      - other: {local-name: docs}\n",
//! );
//! let overlay = ManifestSource::document(
//!     "overlay",
//!     "- git: {local-name: core, uri: 'https://example.com/core.git', version: v2}\n",
//! );
//!
//! let config = Config::from_sources(
//!     &[base, overlay],
//!     Path::new("/ws"),
//!     MergeStrategy::MergeReplace,
//!     VcsRegistry::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(config.len(), 2);
//! assert_eq!(config.path_specs()[0].version(), Some("v2"));
//! assert_eq!(wstool::env::package_path(&config, None), "/ws/docs:/ws/core");
//! ```
//!
//! ## Core Concepts
//!
//! - **Entries (`path_spec`, `manifest`)**: a `PathSpec` is one declared
//!   entry; `manifest` reads and writes lists of them as YAML.
//! - **Paths (`path`)**: local names are compared after lexical
//!   normalization against the workspace root.
//! - **Merging (`aggregate`)**: combines manifest sources into one list with
//!   one entry per local name, under a `MergeStrategy`.
//! - **Elements (`element`)**: an entry bound to its absolute path and a
//!   `VcsClient`, with the install state machine (checkout, update, or
//!   resolve a conflict).
//! - **Backends (`vcs`)**: the `VcsClient` contract and adapters for git,
//!   mercurial, subversion and bazaar, built through a `VcsRegistry`.
//! - **Conflicts (`conflict`)**: what happens to a directory that is not the
//!   declared checkout, decided by an `InstallMode` or a `ConflictResolver`.
//! - **Workspaces (`config`)**: the ordered element list plus bulk
//!   operations: install (sequential or parallel), status, diff, snapshot.
//! - **Environment (`env`)**: the search path and setup script derived from
//!   a workspace.

pub mod aggregate;
pub mod config;
pub mod conflict;
pub mod defaults;
pub mod element;
pub mod env;
pub mod error;
pub mod manifest;
pub mod output;
pub mod path;
pub mod path_spec;
pub mod suggestions;
pub mod vcs;

#[cfg(test)]
mod path_proptest;

//! # Error Suggestions
//!
//! This module provides helper functions for generating helpful error
//! messages with hints and suggestions. Errors should tell users what went
//! wrong AND how to fix it.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wstool::suggestions;
//!
//! // Instead of:
//! anyhow::bail!("Manifest not found: {}", path.display());
//!
//! // Use:
//! return Err(suggestions::manifest_not_found(path));
//! ```

use std::path::Path;

use crate::path_spec::{ScmType, OTHER_KEY, SETUP_FILE_TAG};

/// Generate an error for when no workspace manifest can be found.
///
/// Includes hints about:
/// - Creating a workspace with `wstool init`
/// - Using the -t/--target-workspace flag
pub fn manifest_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "No workspace manifest found at or above {path}\n\n\
         hint: Run 'wstool init' to create a workspace here\n\
         hint: Use -t/--target-workspace to point at an existing workspace",
        path = path.display()
    )
}

/// Generate an error for `wstool init` on a directory that already has a
/// manifest.
pub fn workspace_exists(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "A workspace manifest already exists at {path}\n\n\
         hint: Use 'wstool merge' to add entries to it\n\
         hint: Delete the file first if you want to start over",
        path = path.display()
    )
}

/// Generate an error for `set` without a uri on an entry that does not exist.
pub fn set_requires_uri(local_name: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Entry {local_name} does not exist yet, so a URI is required\n\n\
         hint: wstool set {local_name} <URI> --git"
    )
}

/// Generate an error for a remote manifest source.
pub fn remote_source_unsupported(source: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Remote manifest sources are not fetched: {source}\n\n\
         hint: Download the manifest first and pass the local file"
    )
}

/// The known entry key closest to `input`, if any is within two edits.
pub fn closest_entry_key(input: &str) -> Option<&'static str> {
    let mut candidates: Vec<&'static str> = ScmType::ALL.iter().map(|t| t.as_str()).collect();
    candidates.push(OTHER_KEY);
    candidates.push(SETUP_FILE_TAG);
    closest_match(input, &candidates)
}

/// The candidate closest to `input` by edit distance, within two edits.
pub fn closest_match<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .map(|c| (edit_distance(input, c), *c))
        .filter(|(d, _)| *d <= 2)
        .min_by_key(|(d, _)| *d)
        .map(|(_, c)| c)
}

fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut row = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            row[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(row[j] + 1);
        }
        prev = row;
    }
    prev[b.len()]
}

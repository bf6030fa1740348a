//! # Manifest Aggregation
//!
//! Combines entries from several manifest sources into one ordered list with
//! at most one entry per local name.
//!
//! ## Sources
//!
//! A [`ManifestSource`] resolves to specs as follows:
//!
//! | Source                                   | Result                                      |
//! |------------------------------------------|---------------------------------------------|
//! | manifest file                            | every record, as written                    |
//! | directory containing `.rosinstall`       | every record, demoted to `other` and re-rooted at the directory |
//! | bare directory                           | one `other` entry for the directory         |
//! | raw document                             | every record, as written                    |
//!
//! A source that yields no entries, or does not exist, is an
//! [`Error::EmptyOrInvalidManifest`].
//!
//! ## Merging
//!
//! Entries are appended left to right. When an entry's normalized local name
//! collides with one already collected, the [`MergeStrategy`] decides:
//!
//! - `KillAppend` drops the earlier entry and appends the later one.
//! - `MergeReplace` overwrites the earlier entry in place.
//! - `MergeKeep` drops the later entry.
//!
//! An entry identical to the one it collides with is left alone, except that
//! `KillAppend` still moves it to the end when it is not already last, so an
//! overlay can reorder an entry by listing it again.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{debug, warn};

use crate::defaults::DEFAULT_MANIFEST_FILENAME;
use crate::error::{Error, Result};
use crate::manifest;
use crate::path;
use crate::path_spec::PathSpec;

/// Where a list of entries comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    /// A manifest file or a directory; relative paths resolve against the
    /// base path.
    Path(PathBuf),
    /// Manifest content already in memory, named for error messages.
    Document { name: String, content: String },
}

impl ManifestSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        ManifestSource::Path(path.into())
    }

    pub fn document(name: impl Into<String>, content: impl Into<String>) -> Self {
        ManifestSource::Document {
            name: name.into(),
            content: content.into(),
        }
    }

    fn name(&self) -> String {
        match self {
            ManifestSource::Path(p) => p.display().to_string(),
            ManifestSource::Document { name, .. } => name.clone(),
        }
    }
}

/// How a local-name collision is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeStrategy {
    /// Drop the earlier entry and append the later one at the end.
    #[default]
    KillAppend,
    /// Overwrite the earlier entry in place.
    MergeReplace,
    /// Keep the earlier entry and drop the later one.
    MergeKeep,
}

impl MergeStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            MergeStrategy::KillAppend => "kill-append",
            MergeStrategy::MergeReplace => "merge-replace",
            MergeStrategy::MergeKeep => "merge-keep",
        }
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergeStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "kill-append" => Ok(MergeStrategy::KillAppend),
            "merge-replace" => Ok(MergeStrategy::MergeReplace),
            "merge-keep" => Ok(MergeStrategy::MergeKeep),
            other => Err(format!(
                "unknown merge strategy '{}' (expected kill-append, merge-replace or merge-keep)",
                other
            )),
        }
    }
}

/// What merging one entry did to the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeAction {
    /// No entry had this local name; appended.
    Added,
    /// The earlier entry was overwritten in place.
    Replaced,
    /// The earlier entry was dropped and this one appended.
    MovedToEnd,
    /// The later entry was discarded.
    Kept,
    /// The entry was identical to the existing one.
    Unchanged,
}

impl MergeAction {
    /// Whether the list changed.
    pub fn is_change(self) -> bool {
        matches!(
            self,
            MergeAction::Added | MergeAction::Replaced | MergeAction::MovedToEnd
        )
    }
}

impl fmt::Display for MergeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MergeAction::Added => "added",
            MergeAction::Replaced => "replaced",
            MergeAction::MovedToEnd => "moved to end",
            MergeAction::Kept => "kept existing",
            MergeAction::Unchanged => "unchanged",
        };
        f.write_str(text)
    }
}

/// Merge `spec` into `specs` by normalized local name.
pub fn merge_path_spec(
    specs: &mut Vec<PathSpec>,
    spec: PathSpec,
    base_path: &Path,
    strategy: MergeStrategy,
) -> MergeAction {
    let target = path::normalize(base_path, spec.local_name());
    let Some(index) = specs
        .iter()
        .position(|s| path::normalize(base_path, s.local_name()) == target)
    else {
        specs.push(spec);
        return MergeAction::Added;
    };

    // Under KillAppend an identical entry still moves to the end, unless it
    // is already there.
    let last = index + 1 == specs.len();
    if specs[index] == spec && (strategy != MergeStrategy::KillAppend || last) {
        return MergeAction::Unchanged;
    }

    match strategy {
        MergeStrategy::KillAppend => {
            specs.remove(index);
            if !last {
                warn!(
                    "Replacing {} and moving it to the end; workspace order may shift",
                    spec.local_name()
                );
            }
            specs.push(spec);
            MergeAction::MovedToEnd
        }
        MergeStrategy::MergeReplace => {
            debug!("Replacing {} in place", spec.local_name());
            specs[index] = spec;
            MergeAction::Replaced
        }
        MergeStrategy::MergeKeep => {
            debug!("Keeping existing entry for {}", spec.local_name());
            MergeAction::Kept
        }
    }
}

/// Resolve one source to its entries.
pub fn resolve_source(source: &ManifestSource, base_path: &Path) -> Result<Vec<PathSpec>> {
    let specs = match source {
        ManifestSource::Document { name, content } => manifest::parse(content).map_err(|e| {
            Error::EmptyOrInvalidManifest {
                source_name: name.clone(),
                message: e.to_string(),
            }
        })?,
        ManifestSource::Path(raw) => {
            let location = path::clean(&base_path.join(path::expand_home(&raw.to_string_lossy())));
            resolve_path(&location, base_path)?
        }
    };
    if specs.is_empty() {
        return Err(Error::EmptyOrInvalidManifest {
            source_name: source.name(),
            message: "no entries".to_string(),
        });
    }
    Ok(specs)
}

fn resolve_path(location: &Path, base_path: &Path) -> Result<Vec<PathSpec>> {
    let invalid = |message: String| Error::EmptyOrInvalidManifest {
        source_name: location.display().to_string(),
        message,
    };

    if location.is_file() {
        return manifest::from_file(location).map_err(|e| invalid(e.to_string()));
    }
    if !location.is_dir() {
        return Err(invalid("no such file or directory".to_string()));
    }

    let nested = location.join(DEFAULT_MANIFEST_FILENAME);
    if nested.is_file() {
        debug!("Including workspace {}", location.display());
        let specs = manifest::from_file(&nested).map_err(|e| invalid(e.to_string()))?;
        return Ok(specs
            .into_iter()
            .map(|spec| {
                let full = path::normalize(location, spec.local_name());
                let name = path::display_name(&full, base_path);
                spec.demoted().with_local_name(name)
            })
            .collect());
    }

    let name = path::display_name(location, base_path);
    Ok(vec![PathSpec::other(name)])
}

/// Resolve every source and merge the results in order.
pub fn aggregate_from_sources(
    sources: &[ManifestSource],
    base_path: &Path,
    strategy: MergeStrategy,
) -> Result<Vec<PathSpec>> {
    let mut merged = Vec::new();
    for source in sources {
        for spec in resolve_source(source, base_path)? {
            merge_path_spec(&mut merged, spec, base_path, strategy);
        }
    }
    Ok(merged)
}

//! # Workspace Configuration
//!
//! A [`Config`] is a workspace: a base path plus an ordered list of
//! [`ConfigElement`]s, at most one per normalized local name. It is built from
//! manifest sources, persisted to `<base>/.rosinstall`, and drives the
//! whole-workspace operations (install, status, diff, snapshot).
//!
//! ## Parallel installs
//!
//! With `parallelism > 1` elements are installed on a dedicated rayon pool.
//! Each worker writes only its own result slot and results come back in
//! manifest order. Because every element owns a disjoint directory, no locks
//! are needed.
//!
//! Workers are never cancelled: in non-robust mode a failure makes the whole
//! call fail with [`Error::BatchFailed`], but siblings that already started
//! (or had not started yet) still run to completion. Only the sequential mode
//! guarantees that elements after the first failure are left untouched.

use std::path::{Path, PathBuf};

use log::{debug, info};
use rayon::prelude::*;

use crate::aggregate::{self, ManifestSource, MergeAction, MergeStrategy};
use crate::conflict::ConflictResolver;
use crate::defaults::DEFAULT_MANIFEST_FILENAME;
use crate::element::{ConfigElement, InstallOptions, InstallOutcome};
use crate::error::{Error, Result};
use crate::manifest;
use crate::path;
use crate::path_spec::PathSpec;
use crate::suggestions;
use crate::vcs::VcsRegistry;

/// The outcome of one operation on one element.
#[derive(Debug)]
pub struct ElementResult<T> {
    pub local_name: String,
    pub path: PathBuf,
    pub result: Result<T>,
}

impl<T> ElementResult<T> {
    fn new(element: &ConfigElement, result: Result<T>) -> Self {
        Self {
            local_name: element.local_name().to_string(),
            path: element.path().to_path_buf(),
            result,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-element results of an install, in manifest order.
#[derive(Debug, Default)]
pub struct InstallReport {
    pub results: Vec<ElementResult<InstallOutcome>>,
}

impl InstallReport {
    /// Whether every element installed.
    pub fn is_success(&self) -> bool {
        self.results.iter().all(ElementResult::is_ok)
    }

    /// The results that failed.
    pub fn failures(&self) -> impl Iterator<Item = &ElementResult<InstallOutcome>> {
        self.results.iter().filter(|r| !r.is_ok())
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    /// Number of results with the given outcome.
    pub fn count(&self, outcome: InstallOutcome) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.result, Ok(o) if o == outcome))
            .count()
    }

    fn into_batch_error(self) -> Error {
        let total = self.results.len();
        let details: Vec<String> = self
            .results
            .into_iter()
            .filter_map(|r| r.result.err().map(|e| format!("  {}: {}", r.local_name, e)))
            .collect();
        Error::BatchFailed {
            failed: details.len(),
            total,
            details: details.join("\n"),
        }
    }
}

/// A workspace.
pub struct Config {
    base_path: PathBuf,
    elements: Vec<ConfigElement>,
    manifest_filename: String,
    registry: VcsRegistry,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_path", &self.base_path)
            .field("elements", &self.elements)
            .field("manifest_filename", &self.manifest_filename)
            .finish()
    }
}

impl Config {
    /// Bind `specs` to `base_path`.
    ///
    /// Duplicate local names are folded with kill-append first, so every
    /// element owns its own directory.
    pub fn new(specs: Vec<PathSpec>, base_path: &Path, registry: VcsRegistry) -> Result<Self> {
        let base_path = path::clean(base_path);
        let mut folded = Vec::with_capacity(specs.len());
        for spec in specs {
            aggregate::merge_path_spec(&mut folded, spec, &base_path, MergeStrategy::KillAppend);
        }
        let elements = bind_all(folded, &base_path, &registry)?;
        Ok(Self {
            base_path,
            elements,
            manifest_filename: DEFAULT_MANIFEST_FILENAME.to_string(),
            registry,
        })
    }

    /// Aggregate `sources` and bind the result.
    pub fn from_sources(
        sources: &[ManifestSource],
        base_path: &Path,
        strategy: MergeStrategy,
        registry: VcsRegistry,
    ) -> Result<Self> {
        let base_path = path::clean(base_path);
        let specs = aggregate::aggregate_from_sources(sources, &base_path, strategy)?;
        Self::new(specs, &base_path, registry)
    }

    /// Load the workspace whose manifest lives at `<base_path>/.rosinstall`.
    ///
    /// An existing manifest with no entries is a valid, empty workspace.
    pub fn load(base_path: &Path, registry: VcsRegistry) -> Result<Self> {
        let manifest_path = base_path.join(DEFAULT_MANIFEST_FILENAME);
        if !manifest_path.is_file() {
            return Err(Error::EmptyOrInvalidManifest {
                source_name: manifest_path.display().to_string(),
                message: "workspace has no manifest".to_string(),
            });
        }
        let specs = manifest::from_file(&manifest_path).map_err(|e| Error::EmptyOrInvalidManifest {
            source_name: manifest_path.display().to_string(),
            message: e.to_string(),
        })?;
        debug!("Loaded {} entries from {}", specs.len(), manifest_path.display());
        Self::new(specs, base_path, registry)
    }

    /// Walk up from `start` to the first directory holding a manifest.
    pub fn find_workspace(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .find(|dir| dir.join(DEFAULT_MANIFEST_FILENAME).is_file())
            .map(Path::to_path_buf)
    }

    /// Write the plain manifest to [`Config::manifest_path`].
    pub fn save(&self) -> Result<()> {
        let path = self.manifest_path();
        info!("Writing {}", path.display());
        manifest::write_file(&path, &self.path_specs(), false)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn manifest_filename(&self) -> &str {
        &self.manifest_filename
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.base_path.join(&self.manifest_filename)
    }

    pub fn registry(&self) -> &VcsRegistry {
        &self.registry
    }

    pub fn elements(&self) -> &[ConfigElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Elements backed by a VCS client, in manifest order.
    pub fn vcs_elements(&self) -> Vec<&ConfigElement> {
        self.elements.iter().filter(|e| e.is_vcs()).collect()
    }

    /// The declared specs, in manifest order.
    pub fn path_specs(&self) -> Vec<PathSpec> {
        self.elements.iter().map(ConfigElement::get_path_spec).collect()
    }

    /// The element whose normalized path matches `local_name`.
    pub fn get(&self, local_name: &str) -> Option<&ConfigElement> {
        let target = path::normalize(&self.base_path, local_name);
        self.elements.iter().find(|e| e.path() == target)
    }

    /// Insert or update one entry.
    pub fn add_path_spec(&mut self, spec: PathSpec, strategy: MergeStrategy) -> Result<MergeAction> {
        let mut specs = self.path_specs();
        let action = aggregate::merge_path_spec(&mut specs, spec, &self.base_path, strategy);
        if action.is_change() {
            self.elements = bind_all(specs, &self.base_path, &self.registry)?;
        }
        Ok(action)
    }

    /// Remove the entry for `local_name`; `false` when there is none.
    pub fn remove_element(&mut self, local_name: &str) -> bool {
        let target = path::normalize(&self.base_path, local_name);
        match self.elements.iter().position(|e| e.path() == target) {
            Some(index) => {
                self.elements.remove(index);
                true
            }
            None => false,
        }
    }

    /// Resolve names given on the command line.
    ///
    /// A name matches when it normalizes to an element's path against the
    /// base path, or against `cwd` for spellings relative to where the user
    /// stands. An empty `names` selects every element.
    pub fn select(&self, names: &[String], cwd: &Path) -> Result<Vec<&ConfigElement>> {
        if names.is_empty() {
            return Ok(self.elements.iter().collect());
        }
        let mut selected: Vec<&ConfigElement> = Vec::new();
        for name in names {
            let from_base = path::normalize(&self.base_path, name);
            let from_cwd = path::normalize(cwd, name);
            let element = self
                .elements
                .iter()
                .find(|e| e.path() == from_base || e.path() == from_cwd)
                .ok_or_else(|| self.unknown_name(name))?;
            if !selected.iter().any(|s| std::ptr::eq(*s, element)) {
                selected.push(element);
            }
        }
        Ok(selected)
    }

    fn unknown_name(&self, name: &str) -> Error {
        let candidates: Vec<&str> = self.elements.iter().map(|e| e.local_name()).collect();
        Error::UnknownLocalName {
            name: name.to_string(),
            hint: suggestions::closest_match(name, &candidates)
                .map(|c| format!("did you mean '{}'?", c)),
        }
    }

    /// Install or update every VCS element.
    ///
    /// See the module docs for how `robust` and `parallelism` interact.
    pub fn install_or_update(
        &self,
        options: &InstallOptions,
        resolver: &dyn ConflictResolver,
    ) -> Result<InstallReport> {
        Self::install_elements(&self.vcs_elements(), options, resolver, |_| {})
    }

    /// Install or update the given elements, calling `on_done` as each one
    /// finishes.
    ///
    /// - Sequential, not robust: the first failure is returned and later
    ///   elements are not attempted.
    /// - Sequential, robust: every element is attempted and the report carries
    ///   the failures.
    /// - Parallel: every element is attempted. Not robust, any failure turns
    ///   the call into [`Error::BatchFailed`].
    pub fn install_elements<F>(
        elements: &[&ConfigElement],
        options: &InstallOptions,
        resolver: &dyn ConflictResolver,
        on_done: F,
    ) -> Result<InstallReport>
    where
        F: Fn(&ElementResult<InstallOutcome>) + Sync,
    {
        let elements: Vec<&ConfigElement> = elements.iter().copied().filter(|e| e.is_vcs()).collect();

        if options.parallelism <= 1 || elements.len() <= 1 {
            let mut report = InstallReport::default();
            for element in elements {
                let result = ElementResult::new(element, element.install(options, resolver));
                on_done(&result);
                match result.result {
                    Err(e) if !options.robust => return Err(e),
                    _ => report.results.push(result),
                }
            }
            return Ok(report);
        }

        debug!(
            "Installing {} elements with {} workers",
            elements.len(),
            options.parallelism
        );
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.parallelism)
            .build()
            .map_err(|e| Error::ThreadPool {
                message: e.to_string(),
            })?;
        let results: Vec<ElementResult<InstallOutcome>> = pool.install(|| {
            elements
                .par_iter()
                .map(|element| {
                    let result = ElementResult::new(element, element.install(options, resolver));
                    on_done(&result);
                    result
                })
                .collect()
        });

        let report = InstallReport { results };
        if !options.robust && !report.is_success() {
            return Err(report.into_batch_error());
        }
        Ok(report)
    }

    /// Short status of every VCS element, in manifest order.
    pub fn status(&self, untracked: bool) -> Vec<ElementResult<String>> {
        self.status_of(&self.vcs_elements(), untracked)
    }

    /// Short status of the given elements; non-VCS elements are skipped.
    pub fn status_of(&self, elements: &[&ConfigElement], untracked: bool) -> Vec<ElementResult<String>> {
        elements
            .iter()
            .filter(|e| e.is_vcs())
            .map(|e| ElementResult::new(e, e.get_status(Some(&self.base_path), untracked)))
            .collect()
    }

    /// Uncommitted changes of every VCS element, in manifest order.
    pub fn diff(&self) -> Vec<ElementResult<String>> {
        self.diff_of(&self.vcs_elements())
    }

    /// Uncommitted changes of the given elements; non-VCS elements are skipped.
    pub fn diff_of(&self, elements: &[&ConfigElement]) -> Vec<ElementResult<String>> {
        elements
            .iter()
            .filter(|e| e.is_vcs())
            .map(|e| ElementResult::new(e, e.get_diff(Some(&self.base_path))))
            .collect()
    }

    /// Every entry with VCS elements pinned to their resolved revisions.
    pub fn snapshot(&self) -> Result<Vec<PathSpec>> {
        self.elements
            .iter()
            .map(|e| {
                if e.is_vcs() {
                    e.get_versioned_path_spec()
                } else {
                    Ok(e.get_path_spec())
                }
            })
            .collect()
    }
}

fn bind_all(specs: Vec<PathSpec>, base_path: &Path, registry: &VcsRegistry) -> Result<Vec<ConfigElement>> {
    specs
        .into_iter()
        .map(|spec| ConfigElement::bind(spec, base_path, registry))
        .collect()
}

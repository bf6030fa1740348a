//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the `wstool`
//! command-line tool. Each subcommand is defined in its own file to keep the
//! logic separated and maintainable.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and the shared
//!   [`Context`] and performs the command's logic.
//!
//! The `execute` function is the main entry point for the command and is
//! responsible for orchestrating the necessary operations, calling into the
//! `wstool` library to perform the core logic.

pub mod completions;
pub mod diff;
pub mod info;
pub mod init;
pub mod merge;
pub mod remove;
pub mod set;
pub mod setup_script;
pub mod snapshot;
pub mod status;
pub mod update;

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use dialoguer::{theme::ColorfulTheme, Confirm};
use indicatif::{ProgressBar, ProgressStyle};

use wstool::aggregate::ManifestSource;
use wstool::conflict::{ConflictResolver, InstallMode, InteractiveResolver, ScriptedResolver};
use wstool::config::{Config, ElementResult};
use wstool::defaults::{default_parallelism, DEFAULT_MANIFEST_FILENAME};
use wstool::element::{ConfigElement, InstallOptions, InstallOutcome};
use wstool::output::OutputConfig;
use wstool::path;
use wstool::suggestions;
use wstool::vcs::VcsRegistry;

/// State shared by every command: where the user stands, which workspace
/// they pointed at, and how output is styled.
#[derive(Debug)]
pub struct Context {
    cwd: PathBuf,
    target: Option<PathBuf>,
    pub out: OutputConfig,
}

impl Context {
    pub fn new(target: Option<PathBuf>, color: &str) -> Result<Self> {
        let cwd = env::current_dir().context("Failed to read the current directory")?;
        let target = target.map(|t| absolute(&cwd, &t));
        Ok(Self {
            cwd,
            target,
            out: OutputConfig::from_env_and_flag(color),
        })
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// The `-t` directory, made absolute.
    pub fn target(&self) -> Option<&Path> {
        self.target.as_deref()
    }

    /// The workspace directory: `-t` when given, else the nearest ancestor of
    /// the current directory holding a manifest.
    pub fn workspace(&self) -> Result<PathBuf> {
        match &self.target {
            Some(target) if target.join(DEFAULT_MANIFEST_FILENAME).is_file() => Ok(target.clone()),
            Some(target) => Err(suggestions::manifest_not_found(target)),
            None => Config::find_workspace(&self.cwd)
                .ok_or_else(|| suggestions::manifest_not_found(&self.cwd)),
        }
    }

    /// Load the workspace with the bundled VCS adapters.
    pub fn load(&self) -> Result<Config> {
        let workspace = self.workspace()?;
        Config::load(&workspace, VcsRegistry::default())
            .with_context(|| format!("Failed to load workspace at {}", workspace.display()))
    }

    /// Turn a command line source into a manifest source, resolving relative
    /// paths against the current directory.
    pub fn source(&self, raw: &str) -> Result<ManifestSource> {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            return Err(suggestions::remote_source_unsupported(raw));
        }
        Ok(ManifestSource::Path(absolute(&self.cwd, Path::new(raw))))
    }
}

fn absolute(cwd: &Path, p: &Path) -> PathBuf {
    let expanded = path::expand_home(&p.to_string_lossy());
    path::clean(&cwd.join(expanded))
}

/// Elements named on the command line, or all when none are.
pub fn select<'a>(config: &'a Config, names: &[String], cwd: &Path) -> Result<Vec<&'a ConfigElement>> {
    Ok(config.select(names, cwd)?)
}

/// `-j` as given: absent means sequential, bare `-j` means one worker per CPU.
pub fn parallelism(jobs: Option<usize>) -> usize {
    match jobs {
        None => 1,
        Some(0) => default_parallelism(),
        Some(n) => n,
    }
}

/// The resolver for `mode`; `prompt` only asks when someone is at the
/// terminal and aborts otherwise.
pub fn resolver(mode: InstallMode) -> Box<dyn ConflictResolver> {
    if mode == InstallMode::Prompt && console::user_attended() {
        Box::new(InteractiveResolver::new())
    } else {
        Box::new(ScriptedResolver::new(mode))
    }
}

/// Ask a yes/no question, answering yes without asking when `yes` is set or
/// nobody is at the terminal.
pub fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes || !console::user_attended() {
        return Ok(true);
    }
    let theme = ColorfulTheme::default();
    Ok(Confirm::with_theme(&theme)
        .with_prompt(prompt)
        .default(true)
        .interact()?)
}

/// Install `elements`, show progress and a summary, and fail when any
/// element failed.
pub fn run_install(
    elements: &[&ConfigElement],
    options: &InstallOptions,
    out: &OutputConfig,
) -> Result<()> {
    let resolver = resolver(options.mode);
    let vcs_count = elements.iter().filter(|e| e.is_vcs()).count() as u64;

    // Prompts and a redrawing bar do not share a terminal well.
    let progress = if console::user_attended_stderr() && options.mode != InstallMode::Prompt {
        let bar = ProgressBar::new(vcs_count);
        bar.set_style(ProgressStyle::with_template(
            "{spinner} [{bar:30}] {pos}/{len} {msg}",
        )?);
        bar
    } else {
        ProgressBar::hidden()
    };

    let result = Config::install_elements(elements, options, resolver.as_ref(), |r| {
        progress.set_message(r.local_name.clone());
        progress.inc(1);
    });
    progress.finish_and_clear();
    let report = result?;

    for entry in &report.results {
        println!("{}", describe_outcome(entry, out));
    }
    if !report.is_success() {
        anyhow::bail!(
            "{} of {} elements failed to install",
            report.failed_count(),
            report.results.len()
        );
    }
    Ok(())
}

fn describe_outcome(entry: &ElementResult<InstallOutcome>, out: &OutputConfig) -> String {
    match &entry.result {
        Ok(InstallOutcome::CheckedOut) => format!("{} {}", out.success("[checked out]"), entry.local_name),
        Ok(InstallOutcome::Updated) => format!("{} {}", out.success("[updated]"), entry.local_name),
        Ok(InstallOutcome::Skipped) => format!("{} {}", out.warning("[skipped]"), entry.local_name),
        Ok(InstallOutcome::Unchanged) => format!("{} {}", out.dim("[unchanged]"), entry.local_name),
        Err(e) => format!("{} {}: {}", out.failure("[failed]"), entry.local_name, e),
    }
}

/// Print per-element text output (status or diff) and fail if any element
/// could not be queried.
pub fn print_element_output(results: Vec<ElementResult<String>>, out: &OutputConfig) -> Result<()> {
    let mut failed = 0;
    for entry in results {
        match entry.result {
            Ok(text) if text.trim().is_empty() => {}
            Ok(text) => {
                print!("{}", text);
                if !text.ends_with('\n') {
                    println!();
                }
            }
            Err(e) => {
                failed += 1;
                eprintln!("{} {}: {}", out.failure("[error]"), entry.local_name, e);
            }
        }
    }
    if failed > 0 {
        anyhow::bail!("{} elements could not be queried", failed);
    }
    Ok(())
}

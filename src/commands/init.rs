//! # Init Command Implementation
//!
//! This module implements the `init` subcommand, which creates a workspace:
//! it aggregates the given manifest sources, writes `.rosinstall` into the
//! target directory, and (unless `--no-fetch`) checks out every entry.
//!
//! ## Example
//!
//! ```bash
//! wstool init ~/ws ../base.rosinstall ~/ros/underlay
//! wstool init --no-fetch
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;

use wstool::aggregate::MergeStrategy;
use wstool::conflict::InstallMode;
use wstool::config::Config;
use wstool::defaults::DEFAULT_MANIFEST_FILENAME;
use wstool::element::InstallOptions;
use wstool::vcs::VcsRegistry;

use super::Context;

/// Create a workspace and check out its entries
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to create the workspace in (defaults to -t, then the current directory)
    #[arg(value_name = "TARGET")]
    pub target: Option<PathBuf>,

    /// Manifest files or directories to initialize from
    #[arg(value_name = "SOURCES")]
    pub sources: Vec<String>,

    /// Only write the manifest, do not check anything out
    #[arg(long)]
    pub no_fetch: bool,

    /// Install this many entries at once (one per CPU when no value is given)
    #[arg(short = 'j', long = "parallel", value_name = "N", num_args = 0..=1, default_missing_value = "0")]
    pub jobs: Option<usize>,

    /// Keep going when an entry fails, and report all failures at the end
    #[arg(long)]
    pub continue_on_error: bool,
}

/// Execute the `init` command.
pub fn execute(args: InitArgs, ctx: &Context) -> Result<()> {
    let workspace = match (&args.target, ctx.target()) {
        (Some(target), _) => ctx.cwd().join(target),
        (None, Some(target)) => target.to_path_buf(),
        (None, None) => ctx.cwd().to_path_buf(),
    };
    let workspace = wstool::path::clean(&workspace);

    let manifest_path = workspace.join(DEFAULT_MANIFEST_FILENAME);
    if manifest_path.exists() {
        return Err(wstool::suggestions::workspace_exists(&manifest_path));
    }
    fs::create_dir_all(&workspace)
        .with_context(|| format!("Failed to create {}", workspace.display()))?;

    let sources = args
        .sources
        .iter()
        .map(|s| ctx.source(s))
        .collect::<Result<Vec<_>>>()?;
    let config = if sources.is_empty() {
        Config::new(Vec::new(), &workspace, VcsRegistry::default())?
    } else {
        Config::from_sources(
            &sources,
            &workspace,
            MergeStrategy::KillAppend,
            VcsRegistry::default(),
        )?
    };
    config.save()?;
    println!(
        "{} Wrote {} with {} entries",
        ctx.out.success("[ok]"),
        config.manifest_path().display(),
        config.len()
    );

    if args.no_fetch || config.vcs_elements().is_empty() {
        return Ok(());
    }

    let options = InstallOptions {
        backup_path: None,
        mode: InstallMode::Prompt,
        robust: args.continue_on_error,
        parallelism: super::parallelism(args.jobs),
    };
    super::run_install(&config.vcs_elements(), &options, &ctx.out)?;
    println!(
        "{} Workspace ready; run 'wstool setup-script' to generate the environment",
        ctx.out.success("[ok]")
    );
    Ok(())
}

//! # Merge Command Implementation
//!
//! This module implements the `merge` subcommand, which folds the entries of
//! other manifests into the workspace manifest.
//!
//! ## Functionality
//!
//! - **Strategies**: by default a colliding entry replaces the existing one
//!   and moves to the end (`--merge-kill-append`); `--merge-replace`
//!   overwrites in place and `--merge-keep` leaves the existing entry alone.
//! - **Preview**: the resulting change per entry is printed before anything is
//!   written; `--dry-run` stops there.
//! - **Confirmation**: asks before writing unless `-y` is given.
//!
//! Merging only edits the manifest. Run `wstool update` afterwards to check
//! out new entries.

use anyhow::Result;
use clap::Args;

use wstool::aggregate::{self, MergeAction, MergeStrategy};
use wstool::config::Config;

use super::Context;

/// Merge entries from other manifests into the workspace
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Manifest files or directories to merge
    #[arg(value_name = "SOURCES", required = true)]
    pub sources: Vec<String>,

    /// Replace colliding entries and move them to the end (default)
    #[arg(long, group = "strategy")]
    pub merge_kill_append: bool,

    /// Replace colliding entries in place
    #[arg(long, group = "strategy")]
    pub merge_replace: bool,

    /// Keep existing entries on collision
    #[arg(long, group = "strategy")]
    pub merge_keep: bool,

    /// Do not ask for confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Show what would change without writing the manifest
    #[arg(long)]
    pub dry_run: bool,
}

impl MergeArgs {
    fn strategy(&self) -> MergeStrategy {
        if self.merge_replace {
            MergeStrategy::MergeReplace
        } else if self.merge_keep {
            MergeStrategy::MergeKeep
        } else {
            MergeStrategy::KillAppend
        }
    }
}

/// Execute the `merge` command.
pub fn execute(args: MergeArgs, ctx: &Context) -> Result<()> {
    let config = ctx.load()?;
    let base = config.base_path().to_path_buf();
    let strategy = args.strategy();

    let mut specs = config.path_specs();
    let mut actions: Vec<(String, MergeAction)> = Vec::new();
    for raw in &args.sources {
        let source = ctx.source(raw)?;
        for spec in aggregate::resolve_source(&source, &base)? {
            let name = spec.local_name().to_string();
            let action = aggregate::merge_path_spec(&mut specs, spec, &base, strategy);
            actions.push((name, action));
        }
    }

    for (name, action) in &actions {
        let label = format!("[{}]", action);
        let label = if action.is_change() {
            ctx.out.success(&label)
        } else {
            ctx.out.dim(&label)
        };
        println!("{} {}", label, name);
    }

    if specs == config.path_specs() {
        println!("Workspace manifest already contains these entries");
        return Ok(());
    }
    if args.dry_run {
        println!("Dry run, {} left unchanged", config.manifest_path().display());
        return Ok(());
    }
    if !super::confirm("Write these changes to the workspace manifest?", args.yes)? {
        println!("Merge cancelled.");
        return Ok(());
    }

    let merged = Config::new(specs, &base, config.registry().clone())?;
    merged.save()?;
    println!(
        "{} Updated {}; run 'wstool update' to fetch new entries",
        ctx.out.success("[ok]"),
        merged.manifest_path().display()
    );
    Ok(())
}

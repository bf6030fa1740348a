//! # Update Command Implementation
//!
//! This module implements the `update` subcommand, which reconciles the
//! workspace directories with the manifest: missing entries are checked out,
//! existing checkouts are updated to their declared version.
//!
//! ## Changed uris
//!
//! A directory that is not a checkout of the declared uri is a conflict. How
//! it is handled:
//!
//! - `--abort-changed-uris`: fail that entry
//! - `--backup-changed-uris DIR`: move it under `DIR`, then check out fresh
//! - `--delete-changed-uris`: remove it, then check out fresh
//! - `--skip-changed-uris`: leave it alone
//! - none of these: ask (or fail when nobody is at the terminal)
//!
//! ## Parallelism
//!
//! `-j N` installs `N` entries at once. With `--continue-on-error` every entry
//! is attempted and failures are listed at the end.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use wstool::conflict::InstallMode;
use wstool::element::InstallOptions;

use super::Context;

/// Check out missing entries and update existing ones
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Entries to update (all when omitted)
    #[arg(value_name = "LOCAL_NAME")]
    pub local_names: Vec<String>,

    /// Delete directories whose checkout does not match the declared uri
    #[arg(long, group = "changed_uris")]
    pub delete_changed_uris: bool,

    /// Fail entries whose checkout does not match the declared uri
    #[arg(long, group = "changed_uris")]
    pub abort_changed_uris: bool,

    /// Move mismatched directories under DIR before checking out
    #[arg(long, value_name = "DIR", group = "changed_uris")]
    pub backup_changed_uris: Option<PathBuf>,

    /// Leave mismatched directories untouched
    #[arg(long, group = "changed_uris")]
    pub skip_changed_uris: bool,

    /// Install this many entries at once (one per CPU when no value is given)
    #[arg(short = 'j', long = "parallel", value_name = "N", num_args = 0..=1, default_missing_value = "0")]
    pub jobs: Option<usize>,

    /// Keep going when an entry fails, and report all failures at the end
    #[arg(long)]
    pub continue_on_error: bool,
}

impl UpdateArgs {
    fn mode(&self) -> InstallMode {
        if self.delete_changed_uris {
            InstallMode::Delete
        } else if self.abort_changed_uris {
            InstallMode::Abort
        } else if self.backup_changed_uris.is_some() {
            InstallMode::Backup
        } else if self.skip_changed_uris {
            InstallMode::Skip
        } else {
            InstallMode::Prompt
        }
    }
}

/// Execute the `update` command.
pub fn execute(args: UpdateArgs, ctx: &Context) -> Result<()> {
    let config = ctx.load()?;
    let elements = super::select(&config, &args.local_names, ctx.cwd())?;
    if !elements.iter().any(|e| e.is_vcs()) {
        println!("No version-controlled entries to update");
        return Ok(());
    }

    let backup_path = match &args.backup_changed_uris {
        Some(dir) => Some(ctx.cwd().join(dir)),
        None => Some(wstool::defaults::default_backup_dir(config.base_path())),
    };
    let options = InstallOptions {
        backup_path,
        mode: args.mode(),
        robust: args.continue_on_error,
        parallelism: super::parallelism(args.jobs),
    };
    super::run_install(&elements, &options, &ctx.out)
}

//! # Setup Script Command Implementation
//!
//! Generates `setup.sh` for the workspace: it sources every `setup-file`
//! entry and exports the search path (by default `ROS_PACKAGE_PATH`), with
//! later entries listed first. `--root` names the workspace's metadata root,
//! which is kept off the search path.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;

use wstool::defaults::{DEFAULT_SEARCH_PATH_VAR, SETUP_SCRIPT_FILENAME};
use wstool::env;

use super::Context;

/// Generate the shell setup script for the workspace
#[derive(Args, Debug)]
pub struct SetupScriptArgs {
    /// Environment variable to export the search path as
    #[arg(long, value_name = "NAME", default_value = DEFAULT_SEARCH_PATH_VAR)]
    pub var: String,

    /// Directory to keep off the search path (relative to the workspace)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Print the script instead of writing setup.sh into the workspace
    #[arg(long)]
    pub stdout: bool,
}

/// Execute the `setup-script` command.
pub fn execute(args: SetupScriptArgs, ctx: &Context) -> Result<()> {
    let config = ctx.load()?;
    let root = args.root.as_ref().map(|dir| config.base_path().join(dir));
    let script = env::render_setup_script(&config, &args.var, root.as_deref());

    if args.stdout {
        print!("{}", script);
        return Ok(());
    }
    let target = config.base_path().join(SETUP_SCRIPT_FILENAME);
    fs::write(&target, script).with_context(|| format!("Failed to write {}", target.display()))?;
    println!(
        "{} Wrote {}; run '. {}' to use the workspace",
        ctx.out.success("[ok]"),
        target.display(),
        target.display()
    );
    Ok(())
}

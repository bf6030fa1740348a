//! # Diff Command Implementation
//!
//! This module implements the `diff` subcommand, which concatenates the
//! uncommitted changes of every version-controlled entry into one patch.
//! File paths in the patch are relative to the workspace root, so the output
//! can be applied with `patch -p1` from there.

use anyhow::Result;
use clap::Args;

use super::Context;

/// Show the diff of every entry
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Entries to diff (all when omitted)
    #[arg(value_name = "LOCAL_NAME")]
    pub local_names: Vec<String>,
}

/// Execute the `diff` command.
pub fn execute(args: DiffArgs, ctx: &Context) -> Result<()> {
    let config = ctx.load()?;
    let elements = super::select(&config, &args.local_names, ctx.cwd())?;
    let results = config.diff_of(&elements);
    super::print_element_output(results, &ctx.out)
}

//! # Status Command Implementation
//!
//! Prints the short status of every version-controlled entry, with file paths
//! relative to the workspace root so the output reads as one tree.

use anyhow::Result;
use clap::Args;

use super::Context;

/// Show uncommitted changes per entry
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Also list untracked files
    #[arg(short = 'u', long)]
    pub untracked: bool,

    /// Entries to query (all when omitted)
    #[arg(value_name = "LOCAL_NAME")]
    pub local_names: Vec<String>,
}

/// Execute the `status` command.
pub fn execute(args: StatusArgs, ctx: &Context) -> Result<()> {
    let config = ctx.load()?;
    let elements = super::select(&config, &args.local_names, ctx.cwd())?;
    let results = config.status_of(&elements, args.untracked);
    super::print_element_output(results, &ctx.out)
}

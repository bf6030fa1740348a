//! # Snapshot Command Implementation
//!
//! Writes a manifest that pins every version-controlled entry to the
//! revision its version currently resolves to, so the workspace can be
//! recreated exactly.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;

use wstool::manifest;

use super::Context;

/// Write a manifest pinning every entry to its current revision
#[derive(Args, Debug)]
pub struct SnapshotArgs {
    /// File to write (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Execute the `snapshot` command.
pub fn execute(args: SnapshotArgs, ctx: &Context) -> Result<()> {
    let config = ctx.load()?;
    let specs = config.snapshot().context("Failed to resolve revisions")?;

    match args.output {
        Some(file) => {
            let file = ctx.cwd().join(file);
            manifest::write_file(&file, &specs, true)?;
            println!("{} Wrote {}", ctx.out.success("[ok]"), file.display());
        }
        None => print!("{}", manifest::to_string(&specs, true)?),
    }
    Ok(())
}

//! # Remove Command Implementation
//!
//! Drops entries from the workspace manifest. The directories themselves are
//! left on disk.

use anyhow::Result;
use clap::Args;

use super::Context;

/// Remove entries from the workspace manifest
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Local names of the entries to remove
    #[arg(value_name = "LOCAL_NAME", required = true)]
    pub local_names: Vec<String>,
}

/// Execute the `remove` command.
pub fn execute(args: RemoveArgs, ctx: &Context) -> Result<()> {
    let mut config = ctx.load()?;
    let names: Vec<String> = super::select(&config, &args.local_names, ctx.cwd())?
        .iter()
        .map(|e| e.local_name().to_string())
        .collect();

    for name in &names {
        if config.remove_element(name) {
            println!("{} Removed {}", ctx.out.success("[ok]"), name);
        }
    }
    config.save()?;
    println!("Directories were left on disk");
    Ok(())
}

//! Tab completion for `wstool`.
//!
//! The script is written to stdout; where it goes depends on the shell:
//!
//! ```bash
//! wstool completions bash > ~/.local/share/bash-completion/completions/wstool
//! wstool completions zsh > ~/.zfunc/_wstool
//! wstool completions fish > ~/.config/fish/completions/wstool.fish
//! ```

use std::io::{self, Write};

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};

use crate::cli::Cli;

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// bash, zsh, fish, powershell or elvish
    #[arg(value_enum, value_name = "SHELL")]
    pub shell: Shell,
}

/// Execute the `completions` command.
pub fn execute(args: CompletionsArgs) -> Result<()> {
    let mut out = io::stdout().lock();
    write_completions(args.shell, &mut out);
    out.flush()?;
    Ok(())
}

fn write_completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, out);
}

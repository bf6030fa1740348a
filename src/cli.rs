//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands::{self, Context};

/// wstool - Manage a workspace of version-controlled checkouts
#[derive(Parser, Debug)]
#[command(name = "wstool")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Workspace directory (defaults to the nearest ancestor with a .rosinstall)
    #[arg(
        short = 't',
        long = "target-workspace",
        global = true,
        value_name = "DIR",
        env = "ROS_WORKSPACE"
    )]
    target_workspace: Option<PathBuf>,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace); falls back to RUST_LOG
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a workspace and check out its entries
    Init(commands::init::InitArgs),
    /// Merge entries from other manifests into the workspace
    Merge(commands::merge::MergeArgs),
    /// Add or change one entry
    Set(commands::set::SetArgs),
    /// Remove entries from the workspace manifest
    #[command(alias = "rm")]
    Remove(commands::remove::RemoveArgs),
    /// Show workspace entries
    Info(commands::info::InfoArgs),
    /// Show uncommitted changes per entry
    #[command(alias = "st")]
    Status(commands::status::StatusArgs),
    /// Show the diff of every entry
    #[command(alias = "di")]
    Diff(commands::diff::DiffArgs),
    /// Check out missing entries and update existing ones
    #[command(alias = "up")]
    Update(commands::update::UpdateArgs),
    /// Write a manifest pinning every entry to its current revision
    Snapshot(commands::snapshot::SnapshotArgs),
    /// Generate the shell setup script for the workspace
    SetupScript(commands::setup_script::SetupScriptArgs),
    /// Print a tab-completion script for your shell
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(self.log_level.as_deref());
        let ctx = Context::new(self.target_workspace, &self.color)?;

        match self.command {
            Commands::Init(args) => commands::init::execute(args, &ctx),
            Commands::Merge(args) => commands::merge::execute(args, &ctx),
            Commands::Set(args) => commands::set::execute(args, &ctx),
            Commands::Remove(args) => commands::remove::execute(args, &ctx),
            Commands::Info(args) => commands::info::execute(args, &ctx),
            Commands::Status(args) => commands::status::execute(args, &ctx),
            Commands::Diff(args) => commands::diff::execute(args, &ctx),
            Commands::Update(args) => commands::update::execute(args, &ctx),
            Commands::Snapshot(args) => commands::snapshot::execute(args, &ctx),
            Commands::SetupScript(args) => commands::setup_script::execute(args, &ctx),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

fn init_logging(level: Option<&str>) {
    let env = env_logger::Env::default().default_filter_or("warn");
    let mut builder = env_logger::Builder::from_env(env);
    if let Some(level) = level {
        builder.parse_filters(level);
    }
    builder.format_timestamp(None).format_target(false);
    // A logger may already be installed when the CLI is driven from tests.
    let _ = builder.try_init();
}

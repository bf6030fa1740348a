//! # Set Command Implementation
//!
//! This module implements the `set` subcommand, which adds one entry to the
//! workspace manifest or changes an existing one in place.
//!
//! ## Functionality
//!
//! - `wstool set NAME URI --git` adds (or re-points) a git entry.
//! - `wstool set NAME --version-new v2` re-pins an existing entry, keeping its
//!   type and uri.
//! - `wstool set NAME --detached` turns an entry into a plain directory.
//!
//! Only the manifest changes; run `wstool update NAME` to apply it.

use anyhow::Result;
use clap::Args;

use wstool::aggregate::{MergeAction, MergeStrategy};
use wstool::manifest;
use wstool::path_spec::{PathSpec, ScmType};
use wstool::suggestions;

use super::Context;

/// Add or change one entry
#[derive(Args, Debug)]
pub struct SetArgs {
    /// Local name of the entry
    #[arg(value_name = "LOCAL_NAME")]
    pub local_name: String,

    /// Repository location
    #[arg(value_name = "URI")]
    pub uri: Option<String>,

    /// The entry is a git repository
    #[arg(long, group = "scm")]
    pub git: bool,

    /// The entry is a subversion checkout
    #[arg(long, group = "scm")]
    pub svn: bool,

    /// The entry is a mercurial repository
    #[arg(long, group = "scm")]
    pub hg: bool,

    /// The entry is a bazaar branch
    #[arg(long, group = "scm")]
    pub bzr: bool,

    /// Version (branch, tag or revision) to pin the entry to
    #[arg(short = 'v', long, value_name = "VERSION")]
    pub version_new: Option<String>,

    /// Track the directory without version control
    #[arg(long, group = "scm")]
    pub detached: bool,

    /// Do not ask for confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,
}

impl SetArgs {
    fn scm_flag(&self) -> Option<ScmType> {
        [
            (self.git, ScmType::Git),
            (self.svn, ScmType::Svn),
            (self.hg, ScmType::Hg),
            (self.bzr, ScmType::Bzr),
        ]
        .into_iter()
        .find_map(|(set, scm)| set.then_some(scm))
    }
}

/// Execute the `set` command.
pub fn execute(args: SetArgs, ctx: &Context) -> Result<()> {
    let mut config = ctx.load()?;
    let existing = config
        .select(std::slice::from_ref(&args.local_name), ctx.cwd())
        .ok()
        .and_then(|found| found.first().map(|e| e.get_path_spec()));
    let local_name = existing
        .as_ref()
        .map(|s| s.local_name().to_string())
        .unwrap_or_else(|| args.local_name.clone());

    let spec = if args.detached {
        PathSpec::other(&local_name)
    } else {
        let scm = args
            .scm_flag()
            .or_else(|| existing.as_ref().and_then(PathSpec::scm_type));
        let uri = args
            .uri
            .clone()
            .or_else(|| existing.as_ref().and_then(|s| s.uri().map(str::to_string)));
        match (scm, uri) {
            (Some(scm), Some(uri)) => {
                let same_uri = existing.as_ref().and_then(PathSpec::uri) == Some(uri.as_str());
                let version = args.version_new.clone().or_else(|| {
                    existing
                        .as_ref()
                        .filter(|_| same_uri)
                        .and_then(|s| s.version().map(str::to_string))
                });
                PathSpec::vcs(&local_name, scm, uri, version)
            }
            (None, Some(_)) => {
                anyhow::bail!(
                    "No version control type given for {}\n\n\
                     hint: add one of --git, --svn, --hg or --bzr",
                    local_name
                )
            }
            (_, None) => return Err(suggestions::set_requires_uri(&local_name)),
        }
    };

    if existing.as_ref() == Some(&spec) {
        println!("{} already matches, nothing to do", local_name);
        return Ok(());
    }

    print!("{}", manifest::to_string(std::slice::from_ref(&spec), false)?);
    let prompt = match &existing {
        Some(_) => format!("Change entry {}?", local_name),
        None => format!("Add entry {}?", local_name),
    };
    if !super::confirm(&prompt, args.yes)? {
        println!("Set cancelled.");
        return Ok(());
    }

    let action = config.add_path_spec(spec, MergeStrategy::MergeReplace)?;
    config.save()?;
    let verb = match action {
        MergeAction::Added => "Added",
        _ => "Updated",
    };
    println!(
        "{} {} {}; run 'wstool update {}' to apply",
        ctx.out.success("[ok]"),
        verb,
        local_name,
        local_name
    );
    Ok(())
}

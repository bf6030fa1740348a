//! # Info Command Implementation
//!
//! This module implements the `info` subcommand, which lists workspace
//! entries with their type, uri, declared version and the revision currently
//! checked out.
//!
//! ## Output formats
//!
//! - a table (default)
//! - `--json`: one object per entry, for scripts
//! - `--only-paths`: absolute paths, one per line

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use wstool::element::ConfigElement;
use wstool::path;

use super::Context;

/// Show workspace entries
#[derive(Args, Debug)]
pub struct InfoArgs {
    /// Print entries as JSON
    #[arg(long, conflicts_with = "only_paths")]
    pub json: bool,

    /// Print only the absolute path of each entry
    #[arg(long)]
    pub only_paths: bool,

    /// Entries to show (all when omitted)
    #[arg(value_name = "LOCAL_NAME")]
    pub local_names: Vec<String>,
}

/// One row of `info` output.
#[derive(Debug, Serialize)]
struct EntryInfo {
    local_name: String,
    path: String,
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_revision: Option<String>,
    /// Where the checkout actually points, when it differs from `uri`.
    #[serde(skip_serializing_if = "Option::is_none")]
    actual_uri: Option<String>,
    exists: bool,
}

impl EntryInfo {
    fn from_element(element: &ConfigElement) -> Self {
        let spec = element.get_path_spec();
        let exists = element.path().exists();
        let client = element.client().filter(|c| exists && c.detect_presence());
        let current_revision = client.and_then(|c| c.get_version(None).ok().flatten());
        let actual_uri = client.and_then(|c| c.get_url()).filter(|found| {
            spec.uri()
                .map_or(true, |declared| !path::uris_match(declared, found))
        });
        Self {
            local_name: spec.local_name().to_string(),
            path: element.path().display().to_string(),
            kind: element.kind().key().to_string(),
            uri: spec.uri().map(str::to_string),
            version: spec.version().map(str::to_string),
            current_revision,
            actual_uri,
            exists,
        }
    }
}

/// Execute the `info` command.
pub fn execute(args: InfoArgs, ctx: &Context) -> Result<()> {
    let config = ctx.load()?;
    let elements = super::select(&config, &args.local_names, ctx.cwd())?;

    if args.only_paths {
        for element in elements {
            println!("{}", element.path().display());
        }
        return Ok(());
    }

    let entries: Vec<EntryInfo> = elements.into_iter().map(EntryInfo::from_element).collect();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("Workspace: {}", config.base_path().display());
    if entries.is_empty() {
        println!("{}", ctx.out.dim("(no entries)"));
        return Ok(());
    }
    let width = entries.iter().map(|e| e.local_name.len()).max().unwrap_or(0);
    for entry in &entries {
        let state = if entry.exists {
            String::new()
        } else {
            format!(" {}", ctx.out.warning("(missing)"))
        };
        let mut line = format!("{:<width$}  {:<10}", entry.local_name, entry.kind, width = width);
        if let Some(uri) = &entry.uri {
            line.push_str(&format!("  {}", uri));
        }
        if let Some(version) = &entry.version {
            line.push_str(&format!("  {}", version));
        }
        if let Some(rev) = &entry.current_revision {
            line.push_str(&format!("  {}", ctx.out.dim(&short_revision(rev))));
        }
        if let Some(actual) = &entry.actual_uri {
            line.push_str(&format!("  {}", ctx.out.warning(&format!("(tracks {})", actual))));
        }
        println!("{}{}", line, state);
    }
    Ok(())
}

fn short_revision(rev: &str) -> String {
    rev.chars().take(12).collect()
}

//! # Manifest Parsing and Serialization
//!
//! A manifest is a YAML list of single-key records (see [`crate::path_spec`]).
//! This module is the thin I/O layer around that format: parse a document or
//! file into `Vec<PathSpec>`, and write specs back out.
//!
//! Parsing is all-or-nothing: one bad record fails the whole document, and
//! the error names the record index so the user can find it.

use std::fs;
use std::path::Path;

use serde_yaml::Value;

use crate::error::{Error, FormatIssue, Result};
use crate::path_spec::PathSpec;

/// Header written at the top of every manifest this tool saves.
pub const MANIFEST_HEADER: &str = "# THIS IS AN AUTOGENERATED FILE, LAST GENERATED USING wstool ON ";

/// Parse a manifest document into its entries, in document order.
///
/// An empty document yields an empty list; callers that require entries
/// decide whether that is an error.
pub fn parse(yaml_content: &str) -> Result<Vec<PathSpec>> {
    let value: Value = serde_yaml::from_str(yaml_content).map_err(Error::Yaml)?;
    let records = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Sequence(seq) => seq,
        // A lone record without the list dash is accepted.
        Value::Mapping(_) => vec![value],
        _ => {
            return Err(Error::ManifestFormat {
                issue: FormatIssue::Malformed,
                message: "manifest must be a list of entries".to_string(),
                hint: Some("each entry starts with '- git:', '- other:', ...".to_string()),
            })
        }
    };

    records
        .iter()
        .enumerate()
        .map(|(idx, record)| PathSpec::from_yaml(record).map_err(|e| with_record_index(e, idx)))
        .collect()
}

/// Parse a manifest file.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Vec<PathSpec>> {
    let content = fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}

/// Serialize entries to a YAML document.
///
/// With `versioned` set, resolved revisions are included.
pub fn to_string(specs: &[PathSpec], versioned: bool) -> Result<String> {
    let records: Vec<Value> = specs.iter().map(|s| s.to_yaml(versioned)).collect();
    if records.is_empty() {
        return Ok("[]\n".to_string());
    }
    serde_yaml::to_string(&records).map_err(Error::Yaml)
}

/// Write entries to `path`, prefixed with the generated-file header.
pub fn write_file<P: AsRef<Path>>(path: P, specs: &[PathSpec], versioned: bool) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let body = to_string(specs, versioned)?;
    let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    let content = format!("{}{}\n\n{}", MANIFEST_HEADER, stamp, body);
    fs::write(path, content)?;
    Ok(())
}

fn with_record_index(err: Error, idx: usize) -> Error {
    match err {
        Error::ManifestFormat {
            issue,
            message,
            hint,
        } => Error::ManifestFormat {
            issue,
            message: format!("entry {}: {}", idx + 1, message),
            hint,
        },
        other => other,
    }
}

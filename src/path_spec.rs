//! # Workspace Entries
//!
//! A `PathSpec` is one entry of a workspace manifest: a local directory
//! (or shell setup file) and, for version-controlled entries, where it comes
//! from. This module owns the record-level YAML mapping:
//!
//! ```yaml
//! - git: {local-name: src/foo, uri: https://example.com/foo.git, version: main}
//! - other: {local-name: /opt/tools}
//! - setup-file: {local-name: /opt/ros/setup.sh}
//! ```
//!
//! Exactly one top-level key names the entry kind. VCS entries require a
//! `uri`; `other` and `setup-file` entries must not carry `uri` or `version`.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use log::warn;
use serde_yaml::{Mapping, Value};

use crate::error::{Error, FormatIssue, Result};
use crate::suggestions;

/// Tag marking a non-VCS entry as a shell file to source.
pub const SETUP_FILE_TAG: &str = "setup-file";

/// Top-level key for plain directories.
pub const OTHER_KEY: &str = "other";

const LOCAL_NAME_KEY: &str = "local-name";
const URI_KEY: &str = "uri";
const VERSION_KEY: &str = "version";
const REVISION_KEY: &str = "revision";
// Free-form metadata some manifests carry; accepted without a warning.
const META_KEY: &str = "meta";

/// The version-control backends a workspace entry can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScmType {
    Git,
    Svn,
    Hg,
    Bzr,
}

impl ScmType {
    /// Every supported backend, in display order.
    pub const ALL: [ScmType; 4] = [ScmType::Git, ScmType::Svn, ScmType::Hg, ScmType::Bzr];

    /// The manifest key and type name for this backend.
    pub fn as_str(self) -> &'static str {
        match self {
            ScmType::Git => "git",
            ScmType::Svn => "svn",
            ScmType::Hg => "hg",
            ScmType::Bzr => "bzr",
        }
    }

    /// Parse a manifest key; `None` for anything that is not a VCS key.
    pub fn from_key(key: &str) -> Option<Self> {
        ScmType::ALL.into_iter().find(|t| t.as_str() == key)
    }
}

impl fmt::Display for ScmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScmType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ScmType::from_key(s).ok_or_else(|| Error::ManifestFormat {
            issue: FormatIssue::UnknownKey,
            message: format!("unknown scm type '{}'", s),
            hint: suggestions::closest_entry_key(s).map(|k| format!("did you mean '{}'?", k)),
        })
    }
}

/// How an entry is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Vcs(ScmType),
    Other,
    SetupFile,
}

impl EntryKind {
    /// The manifest key this kind is written under.
    pub fn key(self) -> &'static str {
        match self {
            EntryKind::Vcs(scm) => scm.as_str(),
            EntryKind::Other => OTHER_KEY,
            EntryKind::SetupFile => SETUP_FILE_TAG,
        }
    }
}

/// One declared workspace entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSpec {
    local_name: String,
    scm_type: Option<ScmType>,
    uri: Option<String>,
    version: Option<String>,
    revision: Option<String>,
    current_revision: Option<String>,
    tags: BTreeSet<String>,
}

impl PathSpec {
    /// Build a spec from loose parts, enforcing the classification rules.
    pub fn new(
        local_name: impl Into<String>,
        scm_type: Option<ScmType>,
        uri: Option<String>,
        version: Option<String>,
        tags: BTreeSet<String>,
    ) -> Result<Self> {
        let local_name = local_name.into();
        if local_name.trim().is_empty() {
            return Err(Error::format(
                FormatIssue::MissingLocalName,
                "entry has an empty local-name",
            ));
        }
        match scm_type {
            Some(scm) if uri.is_none() => {
                return Err(Error::ManifestFormat {
                    issue: FormatIssue::ScmWithoutUri,
                    message: format!("{} entry '{}' has no uri", scm, local_name),
                    hint: Some(format!("add 'uri:' to the {} record", scm)),
                });
            }
            None if uri.is_some() => {
                return Err(Error::format(
                    FormatIssue::UriWithoutScm,
                    format!("entry '{}' has a uri but no scm type", local_name),
                ));
            }
            None if version.is_some() => {
                return Err(Error::format(
                    FormatIssue::VersionWithoutScm,
                    format!("entry '{}' has a version but no scm type", local_name),
                ));
            }
            _ => {}
        }
        Ok(Self {
            local_name,
            scm_type,
            uri,
            version,
            revision: None,
            current_revision: None,
            tags,
        })
    }

    /// A version-controlled entry.
    pub fn vcs(
        local_name: impl Into<String>,
        scm_type: ScmType,
        uri: impl Into<String>,
        version: Option<String>,
    ) -> Self {
        Self {
            local_name: local_name.into(),
            scm_type: Some(scm_type),
            uri: Some(uri.into()),
            version,
            revision: None,
            current_revision: None,
            tags: BTreeSet::new(),
        }
    }

    /// A plain directory with no version control.
    pub fn other(local_name: impl Into<String>) -> Self {
        Self {
            local_name: local_name.into(),
            scm_type: None,
            uri: None,
            version: None,
            revision: None,
            current_revision: None,
            tags: BTreeSet::new(),
        }
    }

    /// A shell file sourced by the generated environment.
    pub fn setup_file(local_name: impl Into<String>) -> Self {
        let mut spec = Self::other(local_name);
        spec.tags.insert(SETUP_FILE_TAG.to_string());
        spec
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn scm_type(&self) -> Option<ScmType> {
        self.scm_type
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// The resolved identifier for `version`; only set on versioned specs.
    pub fn revision(&self) -> Option<&str> {
        self.revision.as_deref()
    }

    /// The revision currently checked out on disk; only set on versioned specs.
    pub fn current_revision(&self) -> Option<&str> {
        self.current_revision.as_deref()
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn kind(&self) -> EntryKind {
        match self.scm_type {
            Some(scm) => EntryKind::Vcs(scm),
            None if self.tags.contains(SETUP_FILE_TAG) => EntryKind::SetupFile,
            None => EntryKind::Other,
        }
    }

    pub fn is_vcs(&self) -> bool {
        self.scm_type.is_some()
    }

    pub fn is_setup_file(&self) -> bool {
        self.kind() == EntryKind::SetupFile
    }

    /// The same entry under a different local name.
    pub fn with_local_name(mut self, local_name: impl Into<String>) -> Self {
        self.local_name = local_name.into();
        self
    }

    /// The same entry pinned to another version.
    pub fn with_version(mut self, version: Option<String>) -> Self {
        if self.scm_type.is_some() {
            self.version = version;
        }
        self
    }

    /// Attach resolved revisions, producing a versioned spec.
    pub fn with_revisions(mut self, revision: Option<String>, current: Option<String>) -> Self {
        self.revision = revision;
        self.current_revision = current;
        self
    }

    /// Strip all VCS information, keeping the path and the setup-file tag.
    pub fn demoted(mut self) -> Self {
        self.scm_type = None;
        self.uri = None;
        self.version = None;
        self.revision = None;
        self.current_revision = None;
        self
    }

    /// Parse one manifest record.
    pub fn from_yaml(record: &Value) -> Result<Self> {
        let map = record.as_mapping().ok_or_else(|| {
            Error::format(
                FormatIssue::Malformed,
                format!("expected a single-key mapping, found {}", describe(record)),
            )
        })?;
        if map.len() != 1 {
            let keys: Vec<String> = map
                .keys()
                .map(|k| k.as_str().unwrap_or("?").to_string())
                .collect();
            return Err(Error::ManifestFormat {
                issue: FormatIssue::Malformed,
                message: format!(
                    "a record must have exactly one top-level key, found {} ({})",
                    map.len(),
                    keys.join(", ")
                ),
                hint: Some("start each entry with its own '- ' list item".to_string()),
            });
        }
        let (key, body) = map
            .iter()
            .next()
            .ok_or_else(|| Error::format(FormatIssue::Malformed, "empty record"))?;
        let key = key
            .as_str()
            .ok_or_else(|| Error::format(FormatIssue::Malformed, "record key must be a string"))?;

        let (scm_type, tags) = match key {
            OTHER_KEY => (None, BTreeSet::new()),
            SETUP_FILE_TAG => (None, BTreeSet::from([SETUP_FILE_TAG.to_string()])),
            other => match ScmType::from_key(other) {
                Some(scm) => (Some(scm), BTreeSet::new()),
                None => {
                    return Err(Error::ManifestFormat {
                        issue: FormatIssue::UnknownKey,
                        message: format!("unknown entry type '{}'", other),
                        hint: suggestions::closest_entry_key(other)
                            .map(|k| format!("did you mean '{}'?", k)),
                    });
                }
            },
        };

        let body = body.as_mapping().ok_or_else(|| {
            Error::format(
                FormatIssue::Malformed,
                format!("'{}' entry must be a mapping, found {}", key, describe(body)),
            )
        })?;

        let local_name = string_field(body, LOCAL_NAME_KEY)?.ok_or_else(|| {
            Error::format(
                FormatIssue::MissingLocalName,
                format!("'{}' entry has no local-name", key),
            )
        })?;
        let uri = string_field(body, URI_KEY)?;
        let version = string_field(body, VERSION_KEY)?;
        let revision = string_field(body, REVISION_KEY)?;

        for sub_key in body.keys() {
            let name = sub_key.as_str().unwrap_or_default();
            if ![LOCAL_NAME_KEY, URI_KEY, VERSION_KEY, REVISION_KEY, META_KEY].contains(&name) {
                warn!("Ignoring unknown key '{}' in entry '{}'", name, local_name);
            }
        }

        let mut spec = PathSpec::new(local_name, scm_type, uri, version, tags)?;
        if spec.is_vcs() {
            spec.revision = revision;
        }
        Ok(spec)
    }

    /// Serialize to a manifest record.
    ///
    /// `revision` is written only when `versioned` is set.
    pub fn to_yaml(&self, versioned: bool) -> Value {
        let mut body = Mapping::new();
        body.insert(key_value(LOCAL_NAME_KEY), Value::String(self.local_name.clone()));
        if self.is_vcs() {
            if let Some(uri) = &self.uri {
                body.insert(key_value(URI_KEY), Value::String(uri.clone()));
            }
            if let Some(version) = &self.version {
                body.insert(key_value(VERSION_KEY), Value::String(version.clone()));
            }
            if versioned {
                if let Some(revision) = &self.revision {
                    body.insert(key_value(REVISION_KEY), Value::String(revision.clone()));
                }
            }
        }
        let mut record = Mapping::new();
        record.insert(key_value(self.kind().key()), Value::Mapping(body));
        Value::Mapping(record)
    }
}

fn key_value(key: &str) -> Value {
    Value::String(key.to_string())
}

/// Read an optional scalar sub-key as a string; numbers are accepted so that
/// `version: 1.0` works unquoted.
fn string_field(body: &Mapping, key: &str) -> Result<Option<String>> {
    match body.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(Error::format(
            FormatIssue::Malformed,
            format!("'{}' must be a scalar, found {}", key, describe(other)),
        )),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

//! Path manipulation utilities for wstool
//!
//! Local names are compared textually: `normalize` resolves `.` and `..`
//! lexically and never consults the filesystem, so two spellings that only
//! meet through a symlink are different entries.

use std::path::{Component, Path, PathBuf};

use url::Url;

/// Lexically normalize a path, dropping `.` and folding `..` into its parent.
///
/// A `..` that would climb above the root of an absolute path is dropped; on a
/// relative path with nothing left to pop it is kept.
pub fn clean(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

/// Resolve a declared local name against the workspace base path.
///
/// Absolute names are normalized but otherwise used as-is.
pub fn normalize(base_path: &Path, local_name: &str) -> PathBuf {
    let name = expand_home(local_name);
    if name.is_absolute() {
        clean(&name)
    } else {
        clean(&base_path.join(name))
    }
}

/// Normalize a relative local name without anchoring it to a base path.
///
/// `"./foo/../foo/"` becomes `"foo"`. Absolute names stay absolute.
pub fn normalize_textual(local_name: &str) -> String {
    let cleaned = clean(Path::new(local_name));
    cleaned.to_string_lossy().into_owned()
}

/// Whether two local names denote the same entry under `base_path`.
pub fn same_entry(base_path: &Path, a: &str, b: &str) -> bool {
    normalize(base_path, a) == normalize(base_path, b)
}

/// Express `path` relative to `base` when it lies inside it.
///
/// Paths outside `base` are returned unchanged, so absolute local names are
/// never relativized by accident.
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    match path.strip_prefix(base) {
        Ok(rel) if rel.as_os_str().is_empty() => PathBuf::from("."),
        Ok(rel) => rel.to_path_buf(),
        Err(_) => path.to_path_buf(),
    }
}

/// The shortest display form of an element path: relative to the base when
/// inside it, absolute otherwise.
pub fn display_name(path: &Path, base: &Path) -> String {
    relative_to(path, base).to_string_lossy().into_owned()
}

/// Strip trailing slashes from a uri, keeping a lone `/`.
pub fn strip_trailing_slashes(uri: &str) -> &str {
    let trimmed = uri.trim_end_matches('/');
    if trimmed.is_empty() && !uri.is_empty() {
        "/"
    } else {
        trimmed
    }
}

/// Interpret a uri as a local filesystem path, if it is one.
///
/// Accepts absolute paths and `file://` URLs. Anything with another scheme
/// (`https://`, `git@host:`) is remote.
pub fn uri_local_path(uri: &str) -> Option<PathBuf> {
    let uri = strip_trailing_slashes(uri);
    if let Ok(url) = Url::parse(uri) {
        if url.scheme() == "file" {
            return url.to_file_path().ok().map(|p| clean(&p));
        }
        // A Windows drive letter parses as a one-letter scheme.
        if url.scheme().len() > 1 {
            return None;
        }
    }
    let path = Path::new(uri);
    if path.is_absolute() {
        Some(clean(path))
    } else {
        None
    }
}

/// Compare a declared uri with the one a VCS reports.
///
/// Trailing slashes are ignored, and two uris that both denote local paths
/// match when they normalize to the same path.
pub fn uris_match(declared: &str, reported: &str) -> bool {
    if strip_trailing_slashes(declared) == strip_trailing_slashes(reported) {
        return true;
    }
    match (uri_local_path(declared), uri_local_path(reported)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

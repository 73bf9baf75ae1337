//! Path helpers for source-tree and VFS paths.
//!
//! All paths handled here use forward slashes. VFS folders end with `/`,
//! VFS files never do.

use std::path::Path;

/// Convert a host path to a forward-slash string
#[must_use]
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Convert a host path to a forward-slash string, failing on non-UTF-8 names
pub fn path_to_slash(path: &Path) -> anyhow::Result<String> {
    let s = path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid path encoding: {}", path.display()))?;
    Ok(normalize_separators(s))
}

/// Append a trailing `/` unless present
#[must_use]
pub fn ensure_trailing_slash(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{path}/")
    }
}

/// Prepend a leading `/` unless present
#[must_use]
pub fn ensure_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Directory part of a file path, including the trailing `/`
#[must_use]
pub fn parent_dir(path: &str) -> &str {
    match path.trim_end_matches('/').rfind('/') {
        Some(idx) => &path[..=idx],
        None => "",
    }
}

/// Last segment of a path, without trailing `/`
#[must_use]
pub fn file_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// Split a file name into base name and extension (without the dot).
///
/// Only the last segment is considered, so `"a.b/c"` has no extension.
#[must_use]
pub fn split_extension(path: &str) -> (&str, Option<&str>) {
    let name_start = path.rfind('/').map_or(0, |i| i + 1);
    match path[name_start..].rfind('.') {
        Some(dot) if dot > 0 => {
            let dot = name_start + dot;
            (&path[..dot], Some(&path[dot + 1..]))
        }
        _ => (path, None),
    }
}

/// Insert `_<n>` before the extension of `path`
#[must_use]
pub fn insert_suffix(path: &str, n: usize) -> String {
    match split_extension(path) {
        (base, Some(ext)) => format!("{base}_{n}.{ext}"),
        (base, None) => format!("{base}_{n}"),
    }
}

/// Longest common leading sequence of whole path segments of two paths.
///
/// The result ends with `/` (or is empty when the paths share nothing).
#[must_use]
pub fn get_base_path(path1: &str, path2: &str) -> String {
    let path1 = normalize_separators(path1);
    let path2 = normalize_separators(path2);

    // The last segment of a path without trailing slash is a file, not a folder
    let dirs1 = parent_dir_owned(&path1);
    let dirs2 = parent_dir_owned(&path2);

    let mut base = String::new();
    for (a, b) in dirs1.split('/').zip(dirs2.split('/')) {
        if a != b {
            break;
        }
        base.push_str(a);
        base.push('/');
    }

    // Trailing empty segment of "a/" pairs adds a spurious '/'
    while base.ends_with("//") {
        base.pop();
    }
    base
}

fn parent_dir_owned(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        parent_dir(path).to_string()
    }
}

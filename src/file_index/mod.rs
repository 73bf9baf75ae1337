//! Source → destination index of an import run.
//!
//! Built once before anything is copied, so every link in every document can
//! be rewritten to the final location of its target.

mod parent_paths;

pub use parent_paths::{ParentPathMap, build_parent_paths};

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use anyhow::Context;

use crate::path_resolver::PathResolver;
use crate::report::{Report, ReportSeverity};
use crate::utils::{ensure_trailing_slash, path_to_slash};
use crate::vfs::Repository;

/// Absolute source path → destination VFS path.
///
/// Folder keys and values end with `/`. Also tracks the set of destinations
/// for collision checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileIndex {
    entries: BTreeMap<String, String>,
    destinations: HashSet<String>,
}

impl FileIndex {
    pub fn insert(&mut self, source: &str, destination: &str) {
        self.destinations.insert(destination.to_string());
        self.entries.insert(source.to_string(), destination.to_string());
    }

    #[must_use]
    pub fn get(&self, source: &str) -> Option<&str> {
        self.entries.get(source).map(String::as_str)
    }

    #[must_use]
    pub fn contains_destination(&self, destination: &str) -> bool {
        self.destinations.contains(destination)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in source path order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Index every entry below `input_root`.
///
/// Entries are visited in sorted order, folders before their contents. A
/// failing entry is reported and skipped; its siblings are still indexed.
pub fn build_file_index(
    input_root: &Path,
    resolver: &PathResolver<'_>,
    repo: &dyn Repository,
    report: &Report,
) -> FileIndex {
    let mut index = FileIndex::default();
    let root = match path_to_slash(input_root) {
        Ok(root) => ensure_trailing_slash(&root),
        Err(e) => {
            report_failure(report, &input_root.display().to_string(), &e);
            return index;
        }
    };

    index_dir(input_root, &root, resolver, repo, report, &mut index);
    log::debug!("Indexed {} entries below {root}", index.len());
    index
}

fn index_dir(
    dir: &Path,
    root: &str,
    resolver: &PathResolver<'_>,
    repo: &dyn Repository,
    report: &Report,
    index: &mut FileIndex,
) {
    let entries = match sorted_entries(dir) {
        Ok(entries) => entries,
        Err(e) => {
            report_failure(report, &dir.display().to_string(), &e);
            return;
        }
    };

    for path in entries {
        let result = index_entry(&path, root, resolver, repo, index);
        match result {
            Ok(true) => index_dir(&path, root, resolver, repo, report, index),
            Ok(false) => {}
            Err(e) => report_failure(report, &path.display().to_string(), &e),
        }
    }
}

/// Record one entry. Returns `true` if it is a directory to descend into.
fn index_entry(
    path: &Path,
    root: &str,
    resolver: &PathResolver<'_>,
    repo: &dyn Repository,
    index: &mut FileIndex,
) -> anyhow::Result<bool> {
    let absolute = path_to_slash(path)?;
    let relative = absolute
        .strip_prefix(root)
        .with_context(|| format!("{absolute} is outside of {root}"))?
        .to_string();
    let name = crate::utils::file_name(&relative).to_string();
    let is_dir = fs::metadata(path)
        .with_context(|| format!("Failed to read metadata of {absolute}"))?
        .is_dir();

    let destination = resolver.resolve(&relative, &name, is_dir, index, repo);
    if is_dir {
        index.insert(&ensure_trailing_slash(&absolute), &destination);
    } else {
        index.insert(&absolute, &destination);
    }
    Ok(is_dir)
}

/// Directory entries sorted by name
pub(crate) fn sorted_entries(dir: &Path) -> anyhow::Result<Vec<std::path::PathBuf>> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to list {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to list {}", dir.display()))?;
    entries.sort();
    Ok(entries)
}

fn report_failure(report: &Report, path: &str, error: &anyhow::Error) {
    log::error!("Failed to index {path}: {error:#}");
    report.println(format!("Failed to index {path}: {error:#}"), ReportSeverity::Error);
}

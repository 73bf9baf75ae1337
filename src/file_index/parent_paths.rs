use std::collections::BTreeMap;

use crate::utils::ensure_trailing_slash;

/// Ancestor folders of the input root → matching ancestors of the destination.
///
/// Lets links that leave the imported tree (`../../shared/x.html`) land on
/// the corresponding place next to the destination folder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentPathMap {
    map: BTreeMap<String, String>,
}

impl ParentPathMap {
    #[must_use]
    pub fn get(&self, source_folder: &str) -> Option<&str> {
        self.map.get(source_folder).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Walk `input_root` and `destination` upward in lock-step.
///
/// Stops as soon as either path has no segment left, so the file system
/// root is never mapped.
#[must_use]
pub fn build_parent_paths(input_root: &str, destination: &str) -> ParentPathMap {
    let input_root = ensure_trailing_slash(&input_root.replace('\\', "/"));
    let destination = ensure_trailing_slash(destination);

    let mut source_segments: Vec<&str> = input_root.split('/').filter(|s| !s.is_empty()).collect();
    let mut dest_segments: Vec<&str> = destination.split('/').filter(|s| !s.is_empty()).collect();
    let source_rooted = input_root.starts_with('/');

    let mut map = BTreeMap::new();
    while !source_segments.is_empty() && !dest_segments.is_empty() {
        map.insert(
            join_folder(&source_segments, source_rooted),
            join_folder(&dest_segments, true),
        );
        source_segments.pop();
        dest_segments.pop();
    }

    ParentPathMap { map }
}

fn join_folder(segments: &[&str], rooted: bool) -> String {
    let joined = format!("{}/", segments.join("/"));
    if rooted { format!("/{joined}") } else { joined }
}

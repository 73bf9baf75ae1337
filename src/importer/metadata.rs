//! Data collected while converting HTML documents and consumed afterwards.

use std::collections::{BTreeMap, HashSet};

/// Resolved image destination → alt text found in some document
pub type ImageInfoMap = BTreeMap<String, String>;

/// External URLs in first-seen order, without duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExternalLinkSet {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl ExternalLinkSet {
    /// Add a URL. Returns `false` if it was already present.
    pub fn insert(&mut self, url: &str) -> bool {
        if self.seen.contains(url) {
            return false;
        }
        self.seen.insert(url.to_string());
        self.order.push(url.to_string());
        true
    }

    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

/// Output of the HTML pass, input of the pass over all other files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportMetadata {
    pub image_info: ImageInfoMap,
    pub external_links: ExternalLinkSet,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_links_dedup_in_order() {
        let mut links = ExternalLinkSet::default();
        assert!(links.insert("http://b.example.org/"));
        assert!(links.insert("http://a.example.org/"));
        assert!(!links.insert("http://b.example.org/"));
        assert_eq!(
            links.iter().collect::<Vec<_>>(),
            vec!["http://b.example.org/", "http://a.example.org/"]
        );
    }
}

//! File extension to resource type mapping.
//!
//! The map is a plain lookup injected into the path resolver and the copy
//! passes, so both can be exercised without a repository.

use std::collections::HashMap;

use crate::utils::{HIDDEN_FILE_PREFIX, TYPE_BINARY, TYPE_IMAGE, TYPE_PLAIN, split_extension};

const PLAIN_EXTENSIONS: &[&str] = &["html", "htm", "shtml", "xhtml", "txt"];

const IMAGE_EXTENSIONS: &[&str] = &[
    "gif", "jpg", "jpeg", "jpe", "png", "bmp", "tif", "tiff", "svg", "ico", "webp",
];

/// Lower-cased extension → resource type name
#[derive(Debug, Clone)]
pub struct ExtensionTypeMap {
    mappings: HashMap<String, String>,
}

impl Default for ExtensionTypeMap {
    fn default() -> Self {
        let mut mappings = HashMap::new();
        for ext in PLAIN_EXTENSIONS {
            mappings.insert((*ext).to_string(), TYPE_PLAIN.to_string());
        }
        for ext in IMAGE_EXTENSIONS {
            mappings.insert((*ext).to_string(), TYPE_IMAGE.to_string());
        }
        Self { mappings }
    }
}

impl ExtensionTypeMap {
    /// Create a map without any mappings; every file resolves to `binary`
    #[must_use]
    pub fn empty() -> Self {
        Self {
            mappings: HashMap::new(),
        }
    }

    /// Add or replace the type for an extension
    #[must_use]
    pub fn with_mapping(mut self, extension: &str, type_name: &str) -> Self {
        self.insert(extension, type_name);
        self
    }

    pub fn insert(&mut self, extension: &str, type_name: &str) {
        self.mappings.insert(
            extension.trim_start_matches('.').to_ascii_lowercase(),
            type_name.to_string(),
        );
    }

    /// Resource type name for a file name.
    ///
    /// Names starting with a dot are treated as having that suffix as their
    /// extension. Unmapped or missing extensions fall back to `binary`.
    #[must_use]
    pub fn type_for(&self, file_name: &str) -> &str {
        let name = if file_name.starts_with('.') {
            format!("{HIDDEN_FILE_PREFIX}{file_name}")
        } else {
            file_name.to_string()
        };

        match split_extension(&name) {
            (_, Some(ext)) => self
                .mappings
                .get(&ext.to_ascii_lowercase())
                .map_or(TYPE_BINARY, String::as_str),
            (_, None) => TYPE_BINARY,
        }
    }

    /// Check if the file goes through the HTML rewrite engine
    #[must_use]
    pub fn is_plain(&self, file_name: &str) -> bool {
        self.type_for(file_name) == TYPE_PLAIN
    }

    #[must_use]
    pub fn is_image(&self, file_name: &str) -> bool {
        self.type_for(file_name) == TYPE_IMAGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mappings() {
        let map = ExtensionTypeMap::default();
        assert_eq!(map.type_for("index.html"), TYPE_PLAIN);
        assert_eq!(map.type_for("INDEX.HTM"), TYPE_PLAIN);
        assert_eq!(map.type_for("logo.PNG"), TYPE_IMAGE);
        assert_eq!(map.type_for("manual.pdf"), TYPE_BINARY);
        assert_eq!(map.type_for("Makefile"), TYPE_BINARY);
    }

    #[test]
    fn test_leading_dot_names_use_suffix() {
        let map = ExtensionTypeMap::empty().with_mapping("htaccess", TYPE_PLAIN);
        assert_eq!(map.type_for(".htaccess"), TYPE_PLAIN);
        assert_eq!(ExtensionTypeMap::default().type_for(".htaccess"), TYPE_BINARY);
    }

    #[test]
    fn test_custom_mapping_overrides() {
        let map = ExtensionTypeMap::default().with_mapping(".html", TYPE_BINARY);
        assert_eq!(map.type_for("a.html"), TYPE_BINARY);
        assert!(!map.is_plain("a.html"));
    }
}

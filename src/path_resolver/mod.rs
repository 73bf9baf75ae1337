//! Destination naming for imported files and folders.
//!
//! Maps a source-relative path to the VFS path it is imported to: routes
//! images and downloads into their galleries, collapses `name.html` next to a
//! `name/` directory into `name/index.html` and keeps destinations unique by
//! appending `_<n>` before the extension.

use std::path::Path;

use crate::config::ImportConfig;
use crate::file_index::FileIndex;
use crate::resource_types::ExtensionTypeMap;
use crate::utils::{INDEX_HTML, TYPE_IMAGE, TYPE_PLAIN, insert_suffix, is_external, split_extension};
use crate::vfs::Repository;

/// Computes destination paths for one import run
#[derive(Debug, Clone, Copy)]
pub struct PathResolver<'a> {
    config: &'a ImportConfig,
    types: &'a ExtensionTypeMap,
    input_root: &'a Path,
}

impl<'a> PathResolver<'a> {
    /// `input_root` is the directory the relative paths are taken from
    #[must_use]
    pub fn new(config: &'a ImportConfig, types: &'a ExtensionTypeMap, input_root: &'a Path) -> Self {
        Self {
            config,
            types,
            input_root,
        }
    }

    #[must_use]
    pub fn types(&self) -> &'a ExtensionTypeMap {
        self.types
    }

    #[must_use]
    pub fn config(&self) -> &'a ImportConfig {
        self.config
    }

    /// Destination of a source entry.
    ///
    /// `relative` uses `/` separators and has no leading `/`; `name` is its
    /// last segment. Folder destinations end with `/`. In non-overwrite mode
    /// the result is neither in `index` nor in `repo`.
    pub fn resolve(
        &self,
        relative: &str,
        name: &str,
        is_folder: bool,
        index: &FileIndex,
        repo: &dyn Repository,
    ) -> String {
        if is_external(relative) {
            return relative.to_string();
        }

        let destination = self.config.destination_dir();
        let relative = relative.trim_matches('/');

        if is_folder {
            return format!("{destination}{}/", repo.translate_file_name(relative));
        }

        let candidate = self.route(relative, name, repo);
        if self.config.overwrite() {
            return candidate;
        }

        let mut unique = candidate.clone();
        let mut n = 0;
        while index.contains_destination(&unique) || repo.exists(&unique) {
            n += 1;
            unique = insert_suffix(&candidate, n);
        }
        if n > 0 {
            log::debug!("Destination {candidate} taken, using {unique}");
        }
        unique
    }

    fn route(&self, relative: &str, name: &str, repo: &dyn Repository) -> String {
        let type_name = self.types.type_for(name);
        let image_gallery = self.config.image_gallery();
        let download_gallery = self.config.download_gallery();

        if type_name == TYPE_IMAGE
            && let Some(gallery) = image_gallery
        {
            return format!("{gallery}{}", repo.translate_file_name(name));
        }

        match download_gallery {
            Some(gallery) if type_name != TYPE_PLAIN && image_gallery.is_some() => {
                format!("{gallery}{}", repo.translate_file_name(name))
            }
            _ => {
                let destination = self.config.destination_dir();
                if type_name == TYPE_PLAIN
                    && let Some(folder) = self.sibling_folder(relative)
                {
                    let collapsed = format!("{folder}/{INDEX_HTML}");
                    return format!("{destination}{}", repo.translate_file_name(&collapsed));
                }
                format!("{destination}{}", repo.translate_file_name(relative))
            }
        }
    }

    /// `docs` for `docs.html` when a source directory `docs/` sits next to it
    fn sibling_folder<'r>(&self, relative: &'r str) -> Option<&'r str> {
        match split_extension(relative) {
            (base, Some(_)) if self.input_root.join(base).is_dir() => Some(base),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::MemoryRepository;
    use proptest::prelude::*;
    use std::path::PathBuf;

    fn config(image: Option<&str>, download: Option<&str>, overwrite: bool) -> ImportConfig {
        let mut builder = ImportConfig::builder()
            .input_dir("/tmp/in")
            .destination_dir("/content/site/")
            .overwrite(overwrite);
        if let Some(g) = image {
            builder = builder.image_gallery(g);
        }
        if let Some(g) = download {
            builder = builder.download_gallery(g);
        }
        builder.build().unwrap()
    }

    fn resolve(config: &ImportConfig, root: &Path, relative: &str, index: &FileIndex) -> String {
        let types = ExtensionTypeMap::default();
        let repo = MemoryRepository::new();
        let resolver = PathResolver::new(config, &types, root);
        let name = crate::utils::file_name(relative);
        resolver.resolve(relative, name, false, index, &repo)
    }

    #[test]
    fn test_folder_destination() {
        let config = config(None, None, false);
        let types = ExtensionTypeMap::default();
        let repo = MemoryRepository::new();
        let root = PathBuf::from("/nonexistent");
        let resolver = PathResolver::new(&config, &types, &root);
        let dest = resolver.resolve("old docs", "old docs", true, &FileIndex::default(), &repo);
        assert_eq!(dest, "/content/site/old_docs/");
    }

    #[test]
    fn test_gallery_routing() {
        let root = PathBuf::from("/nonexistent");
        let index = FileIndex::default();
        let both = config(Some("/galleries/img/"), Some("/galleries/dl/"), false);

        assert_eq!(resolve(&both, &root, "pics/logo.png", &index), "/galleries/img/logo.png");
        assert_eq!(resolve(&both, &root, "files/report.pdf", &index), "/galleries/dl/report.pdf");
        assert_eq!(resolve(&both, &root, "docs/a.html", &index), "/content/site/docs/a.html");

        // Without an image gallery, downloads stay in the tree as well
        let download_only = config(None, Some("/galleries/dl/"), false);
        assert_eq!(
            resolve(&download_only, &root, "files/report.pdf", &index),
            "/content/site/files/report.pdf"
        );
        assert_eq!(
            resolve(&download_only, &root, "pics/logo.png", &index),
            "/content/site/pics/logo.png"
        );
    }

    #[test]
    fn test_unknown_extension_goes_to_download_gallery() {
        let root = PathBuf::from("/nonexistent");
        let both = config(Some("/galleries/img/"), Some("/galleries/dl/"), false);
        assert_eq!(
            resolve(&both, &root, ".htaccess", &FileIndex::default()),
            "/galleries/dl/.htaccess"
        );
    }

    #[test]
    fn test_sibling_directory_collapses_to_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        let config = config(None, None, false);

        assert_eq!(
            resolve(&config, dir.path(), "docs.html", &FileIndex::default()),
            "/content/site/docs/index.html"
        );
        assert_eq!(
            resolve(&config, dir.path(), "other.html", &FileIndex::default()),
            "/content/site/other.html"
        );
    }

    #[test]
    fn test_collision_appends_suffix() {
        let root = PathBuf::from("/nonexistent");
        let config = config(Some("/galleries/img/"), None, false);
        let mut index = FileIndex::default();

        let first = resolve(&config, &root, "a/logo.png", &index);
        index.insert("/tmp/in/a/logo.png", &first);
        let second = resolve(&config, &root, "b/logo.png", &index);
        index.insert("/tmp/in/b/logo.png", &second);
        let third = resolve(&config, &root, "c/logo.png", &index);

        assert_eq!(first, "/galleries/img/logo.png");
        assert_eq!(second, "/galleries/img/logo_1.png");
        assert_eq!(third, "/galleries/img/logo_2.png");
    }

    #[test]
    fn test_collision_with_repository() {
        let config = config(None, None, false);
        let types = ExtensionTypeMap::default();
        let mut repo = MemoryRepository::new();
        repo.create_folders("/content/site/", crate::utils::TYPE_FOLDER).unwrap();
        repo.create_resource("/content/site/a.html", 1, vec![], vec![]).unwrap();

        let root = PathBuf::from("/nonexistent");
        let resolver = PathResolver::new(&config, &types, &root);
        let dest = resolver.resolve("a.html", "a.html", false, &FileIndex::default(), &repo);
        assert_eq!(dest, "/content/site/a_1.html");
    }

    #[test]
    fn test_overwrite_skips_collision_check() {
        let root = PathBuf::from("/nonexistent");
        let config = config(Some("/galleries/img/"), None, true);
        let mut index = FileIndex::default();
        index.insert("/tmp/in/a/logo.png", "/galleries/img/logo.png");
        assert_eq!(resolve(&config, &root, "b/logo.png", &index), "/galleries/img/logo.png");
    }

    #[test]
    fn test_external_name_unchanged() {
        let root = PathBuf::from("/nonexistent");
        let config = config(None, None, false);
        assert_eq!(
            resolve(&config, &root, "http://example.org/x", &FileIndex::default()),
            "http://example.org/x"
        );
    }

    proptest! {
        #[test]
        fn prop_routing_is_deterministic(name in "[a-zA-Z0-9 _]{1,12}\\.(html|png|pdf|txt)") {
            let root = PathBuf::from("/nonexistent");
            let config = config(Some("/galleries/img/"), Some("/galleries/dl/"), false);
            let index = FileIndex::default();
            let first = resolve(&config, &root, &name, &index);
            let second = resolve(&config, &root, &name, &index);
            prop_assert_eq!(&first, &second);
            prop_assert!(!first.ends_with('/'));
        }

        #[test]
        fn prop_collisions_get_distinct_suffixes(count in 1usize..12) {
            let root = PathBuf::from("/nonexistent");
            let config = config(Some("/galleries/img/"), None, false);
            let mut index = FileIndex::default();
            let mut seen = Vec::new();

            for i in 0..count {
                let dest = resolve(&config, &root, &format!("d{i}/pic.gif"), &index);
                index.insert(&format!("/tmp/in/d{i}/pic.gif"), &dest);
                seen.push(dest);
            }

            for (i, dest) in seen.iter().enumerate() {
                let expected = if i == 0 {
                    "/galleries/img/pic.gif".to_string()
                } else {
                    format!("/galleries/img/pic_{i}.gif")
                };
                prop_assert_eq!(dest, &expected);
            }
        }
    }
}

//! Rewriting of `href`/`src` references found in imported documents.
//!
//! A reference is translated in this order:
//! 1. `mailto:` and `javascript:` stay as they are.
//! 2. External URLs go to the link gallery (when one is configured).
//! 3. References to indexed source files map to their destination.
//! 4. Fragment-only references stay as they are; empty and query-only
//!    references point at the document's own destination.
//! 5. Root-relative references are kept if their target exists.
//! 6. Other relative references are mapped through the parent-path map.
//!
//! Whatever is left is a broken link and becomes `#`.

use crate::config::ImportConfig;
use crate::file_index::{FileIndex, ParentPathMap};
use crate::importer::ExternalLinkSet;
use crate::utils::{
    BROKEN_LINK_TARGET, INDEX_HTML, SCHEME_SEPARATOR, get_absolute_uri, get_base_path,
    is_external, is_passthrough, parent_dir,
};
use crate::vfs::Repository;

/// Resolves references against the file index of one import run
pub struct LinkTranslator<'a> {
    config: &'a ImportConfig,
    index: &'a FileIndex,
    parents: &'a ParentPathMap,
    repo: &'a dyn Repository,
    /// Input root with `/` separators and a trailing `/`
    input_root: &'a str,
}

impl<'a> LinkTranslator<'a> {
    #[must_use]
    pub fn new(
        config: &'a ImportConfig,
        index: &'a FileIndex,
        parents: &'a ParentPathMap,
        repo: &'a dyn Repository,
        input_root: &'a str,
    ) -> Self {
        Self {
            config,
            index,
            parents,
            repo,
            input_root,
        }
    }

    /// Translate `link` found in the source document `document`.
    ///
    /// External links are registered in `external_links` when a link gallery
    /// is configured.
    pub fn translate(&self, link: &str, document: &str, external_links: &mut ExternalLinkSet) -> String {
        if is_passthrough(link) {
            return link.to_string();
        }

        if is_external(link) {
            return match self.config.link_gallery() {
                Some(gallery) => {
                    external_links.insert(link);
                    format!("{gallery}{}", external_link_file_name(link, self.repo))
                }
                None => link.to_string(),
            };
        }

        let (path, suffix) = split_suffix(link);
        let document_dir = parent_dir(document);

        if let Some(destination) = self.lookup(path, document_dir) {
            return finish(destination, suffix);
        }

        if link.starts_with('#') {
            return link.to_string();
        }

        // `""` and `?query` point at the document itself
        if path.is_empty() {
            return match self.index.get(document) {
                Some(destination) => finish(destination, suffix),
                None => link.to_string(),
            };
        }

        let candidate = if path.starts_with('/') {
            Some(self.strip_context(path).to_string())
        } else {
            self.map_outside_reference(path, document_dir)
        };

        if let Some(candidate) = candidate
            && (self.config.keep_broken_links() || self.repo.exists(&candidate))
        {
            return finish(&candidate, suffix);
        }

        log::debug!("Broken link '{link}' in {document}");
        BROKEN_LINK_TARGET.to_string()
    }

    /// Exact index match of the reference or its absolute form
    fn lookup(&self, path: &str, document_dir: &str) -> Option<&'a str> {
        if path.is_empty() {
            return None;
        }
        if let Some(destination) = self.index.get(path) {
            return Some(destination);
        }
        let absolute = get_absolute_uri(path, document_dir);
        self.index
            .get(&absolute)
            .or_else(|| self.index.get(&format!("{absolute}/")))
    }

    fn strip_context<'p>(&self, path: &'p str) -> &'p str {
        match self.repo.context_prefix() {
            Some(prefix) if !prefix.is_empty() => match path.strip_prefix(prefix) {
                Some(rest) if rest.starts_with('/') => rest,
                _ => path,
            },
            _ => path,
        }
    }

    /// Map a relative reference through the closest common ancestor of the
    /// referenced file and the input root
    fn map_outside_reference(&self, path: &str, document_dir: &str) -> Option<String> {
        let absolute = get_absolute_uri(path, document_dir);
        let base = get_base_path(&absolute, self.input_root);
        let destination = self.parents.get(&base)?;
        let remainder = absolute.get(base.len()..)?;
        Some(format!("{destination}{remainder}"))
    }
}

/// Split off `?query` and `#fragment`
fn split_suffix(link: &str) -> (&str, &str) {
    let end = link.find(['?', '#']).unwrap_or(link.len());
    link.split_at(end)
}

fn finish(target: &str, suffix: &str) -> String {
    if target.ends_with('/') {
        format!("{target}{INDEX_HTML}{suffix}")
    } else {
        format!("{target}{suffix}")
    }
}

/// File name of the pointer created for an external URL.
///
/// The scheme is dropped, `/` become `-` and the result is made safe for the
/// repository.
#[must_use]
pub fn external_link_file_name(url: &str, repo: &dyn Repository) -> String {
    let without_scheme = url
        .find(SCHEME_SEPARATOR)
        .map_or(url, |i| &url[i + SCHEME_SEPARATOR.len()..]);
    let flat = without_scheme.trim_end_matches('/').replace('/', "-");
    let safe = sanitize_filename::sanitize(&flat);
    repo.translate_file_name(&safe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_index::build_parent_paths;
    use crate::utils::TYPE_FOLDER;
    use crate::vfs::MemoryRepository;

    const ROOT: &str = "/tmp/in/";
    const DOC: &str = "/tmp/in/docs/page.html";

    struct Fixture {
        config: ImportConfig,
        index: FileIndex,
        parents: ParentPathMap,
        repo: MemoryRepository,
    }

    impl Fixture {
        fn new(link_gallery: Option<&str>, keep_broken: bool) -> Self {
            let mut builder = ImportConfig::builder()
                .input_dir("/tmp/in")
                .destination_dir("/content/site/")
                .keep_broken_links(keep_broken);
            if let Some(g) = link_gallery {
                builder = builder.link_gallery(g);
            }
            let config = builder.build().unwrap();

            let mut index = FileIndex::default();
            index.insert("/tmp/in/docs/", "/content/site/docs/");
            index.insert("/tmp/in/docs/page.html", "/content/site/docs/page.html");
            index.insert("/tmp/in/docs/other.html", "/content/site/docs/other.html");
            index.insert("/tmp/in/img/logo.png", "/content/images/logo.png");

            let mut repo = MemoryRepository::new().with_context_prefix("/opencms");
            repo.create_folders("/content/shared/", TYPE_FOLDER).unwrap();
            repo.create_resource("/content/shared/common.html", 1, vec![], vec![])
                .unwrap();

            Self {
                config,
                index,
                parents: build_parent_paths(ROOT, "/content/site/"),
                repo,
            }
        }

        fn translate(&self, link: &str, links: &mut ExternalLinkSet) -> String {
            LinkTranslator::new(&self.config, &self.index, &self.parents, &self.repo, ROOT)
                .translate(link, DOC, links)
        }
    }

    #[test]
    fn test_passthrough_references() {
        let fixture = Fixture::new(Some("/links/"), false);
        let mut links = ExternalLinkSet::default();
        assert_eq!(fixture.translate("#top", &mut links), "#top");
        assert_eq!(fixture.translate("mailto:a@example.org", &mut links), "mailto:a@example.org");
        assert_eq!(fixture.translate("javascript:void(0)", &mut links), "javascript:void(0)");
        assert!(links.is_empty());
    }

    #[test]
    fn test_indexed_references() {
        let fixture = Fixture::new(None, false);
        let mut links = ExternalLinkSet::default();
        assert_eq!(fixture.translate("other.html", &mut links), "/content/site/docs/other.html");
        assert_eq!(
            fixture.translate("../img/logo.png", &mut links),
            "/content/images/logo.png"
        );
        assert_eq!(
            fixture.translate("/tmp/in/docs/other.html", &mut links),
            "/content/site/docs/other.html"
        );
        assert_eq!(
            fixture.translate("other.html#part", &mut links),
            "/content/site/docs/other.html#part"
        );
    }

    #[test]
    fn test_folder_reference_gets_index_html() {
        let fixture = Fixture::new(None, false);
        let mut links = ExternalLinkSet::default();
        assert_eq!(fixture.translate("../docs/", &mut links), "/content/site/docs/index.html");
    }

    #[test]
    fn test_empty_and_query_only_references() {
        let fixture = Fixture::new(None, false);
        let mut links = ExternalLinkSet::default();
        assert_eq!(fixture.translate("", &mut links), "/content/site/docs/page.html");
        assert_eq!(
            fixture.translate("?p=2", &mut links),
            "/content/site/docs/page.html?p=2"
        );
    }

    #[test]
    fn test_external_with_gallery() {
        let fixture = Fixture::new(Some("/links/"), false);
        let mut links = ExternalLinkSet::default();
        let first = fixture.translate("http://example.org/a/b", &mut links);
        let second = fixture.translate("http://example.org/a/b", &mut links);
        assert_eq!(first, "/links/example.org-a-b");
        assert_eq!(first, second);
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn test_external_without_gallery() {
        let fixture = Fixture::new(None, false);
        let mut links = ExternalLinkSet::default();
        assert_eq!(
            fixture.translate("https://example.org/", &mut links),
            "https://example.org/"
        );
        assert!(links.is_empty());
    }

    #[test]
    fn test_root_relative_reference() {
        let fixture = Fixture::new(None, false);
        let mut links = ExternalLinkSet::default();
        assert_eq!(
            fixture.translate("/opencms/content/shared/common.html", &mut links),
            "/content/shared/common.html"
        );
        assert_eq!(fixture.translate("/content/missing.html", &mut links), "#");
    }

    #[test]
    fn test_reference_outside_input_root() {
        let fixture = Fixture::new(None, false);
        let mut links = ExternalLinkSet::default();
        assert_eq!(
            fixture.translate("../../shared/common.html", &mut links),
            "/content/shared/common.html"
        );
    }

    #[test]
    fn test_broken_reference() {
        let fixture = Fixture::new(None, false);
        let mut links = ExternalLinkSet::default();
        assert_eq!(fixture.translate("missing.html", &mut links), "#");

        let keeping = Fixture::new(None, true);
        assert_eq!(
            keeping.translate("missing.html", &mut links),
            "/content/site/docs/missing.html"
        );
    }

    #[test]
    fn test_external_link_file_name() {
        let repo = MemoryRepository::new();
        assert_eq!(
            external_link_file_name("https://www.example.org/path/page.html?x=1", &repo),
            "www.example.org-path-page.htmlx_1"
        );
        assert_eq!(external_link_file_name("http://example.org/", &repo), "example.org");
    }
}

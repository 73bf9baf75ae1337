//! URL and reference helpers.
//!
//! This module classifies raw `href`/`src` references and resolves relative
//! references against source-tree directories.

use url::Url;

use super::constants::SCHEME_SEPARATOR;

/// Synthetic base used to resolve source-tree paths with URL semantics
const FILE_ROOT: &str = "file:///";

/// Check if a reference points outside the imported tree (`scheme://...`)
#[must_use]
pub fn is_external(reference: &str) -> bool {
    reference.contains(SCHEME_SEPARATOR)
}

/// Check if a reference must never be rewritten
#[must_use]
pub fn is_passthrough(reference: &str) -> bool {
    let lower = reference.trim_start().to_ascii_lowercase();
    lower.starts_with("mailto:") || lower.starts_with("javascript:")
}

/// Resolve `reference` against `base_dir` and return an absolute source path.
///
/// `.` and `..` segments are collapsed, percent-escapes in the path are
/// decoded, query and fragment are preserved. Malformed input is returned
/// unchanged.
///
/// # Examples
/// ```
/// # use vfs_html_import::utils::get_absolute_uri;
/// assert_eq!(get_absolute_uri("../img/a.png", "/src/site/docs/"), "/src/site/img/a.png");
/// assert_eq!(get_absolute_uri("b.html#top", "/src/"), "/src/b.html#top");
/// ```
#[must_use]
pub fn get_absolute_uri(reference: &str, base_dir: &str) -> String {
    if is_external(reference) {
        return reference.to_string();
    }

    let base_dir = base_dir.replace('\\', "/");
    let Some(base) = directory_url(&base_dir) else {
        log::debug!("Cannot use '{base_dir}' as base for '{reference}'");
        return reference.to_string();
    };

    let resolved = match base.join(&reference.replace('\\', "/")) {
        Ok(url) => url,
        Err(e) => {
            log::debug!("Cannot resolve '{reference}' against '{base_dir}': {e}");
            return reference.to_string();
        }
    };

    let path = match urlencoding::decode(resolved.path()) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => resolved.path().to_string(),
    };

    // Drive letters come back as "/C:/..." on the synthetic scheme
    let mut absolute = if !base_dir.starts_with('/') {
        path.trim_start_matches('/').to_string()
    } else {
        path
    };

    if let Some(query) = resolved.query() {
        absolute.push('?');
        absolute.push_str(query);
    }
    if let Some(fragment) = resolved.fragment() {
        absolute.push('#');
        absolute.push_str(fragment);
    }

    absolute
}

/// `file:` URL of a directory with every segment percent-encoded, so names
/// containing `#`, `?` or `%` stay part of the path
fn directory_url(dir: &str) -> Option<Url> {
    let mut url = Url::parse(FILE_ROOT).ok()?;
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .extend(dir.split('/').filter(|s| !s.is_empty()))
        .push("");
    Some(url)
}

/// Strip query string and fragment from a reference
#[must_use]
pub fn strip_query_and_fragment(reference: &str) -> &str {
    let end = reference
        .find(['?', '#'])
        .unwrap_or(reference.len());
    &reference[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_detection() {
        assert!(is_external("https://example.org/x"));
        assert!(is_external("ftp://files.example.org"));
        assert!(!is_external("/content/site/a.html"));
        assert!(!is_external("mailto:someone@example.org"));
    }

    #[test]
    fn test_passthrough_schemes() {
        assert!(is_passthrough("mailto:someone@example.org"));
        assert!(is_passthrough("JavaScript:void(0)"));
        assert!(!is_passthrough("#top"));
        assert!(!is_passthrough("about.html"));
    }

    #[test]
    fn test_absolute_uri_collapses_dots() {
        assert_eq!(get_absolute_uri("a.html", "/in/"), "/in/a.html");
        assert_eq!(get_absolute_uri("./a.html", "/in/sub/"), "/in/sub/a.html");
        assert_eq!(get_absolute_uri("../a.html", "/in/sub/"), "/in/a.html");
        assert_eq!(get_absolute_uri("../../x/a.html", "/in/sub/"), "/x/a.html");
    }

    #[test]
    fn test_absolute_uri_keeps_query_and_fragment() {
        assert_eq!(
            get_absolute_uri("page.html?id=3#part", "/in/"),
            "/in/page.html?id=3#part"
        );
    }

    #[test]
    fn test_absolute_uri_special_characters_in_base() {
        assert_eq!(get_absolute_uri("b.html", "/src/a#b/"), "/src/a#b/b.html");
        assert_eq!(get_absolute_uri("b.html", "/src/100%/"), "/src/100%/b.html");
        assert_eq!(get_absolute_uri("../x.png?v=2", "/src/q?/d/"), "/src/q?/x.png?v=2");
    }

    #[test]
    fn test_absolute_uri_decodes_spaces() {
        assert_eq!(get_absolute_uri("my page.html", "/in/"), "/in/my page.html");
    }

    #[test]
    fn test_absolute_uri_rooted_reference() {
        assert_eq!(get_absolute_uri("/other/a.html", "/in/sub/"), "/other/a.html");
    }

    #[test]
    fn test_absolute_uri_external_unchanged() {
        assert_eq!(
            get_absolute_uri("https://example.org/x", "/in/"),
            "https://example.org/x"
        );
    }

    #[test]
    fn test_strip_query_and_fragment() {
        assert_eq!(strip_query_and_fragment("/a.html?x=1#y"), "/a.html");
        assert_eq!(strip_query_and_fragment("/a.html#y"), "/a.html");
        assert_eq!(strip_query_and_fragment("/a.html"), "/a.html");
    }
}

//! Optional cut-out of the interesting part of a page.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::config::ImportConfig;

static HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<head[^>]*>(.*?)</head\s*>").expect("HEAD: hardcoded regex is valid")
});

/// Cuts the text between the first match of the start pattern and the
/// following match of the end pattern
#[derive(Debug, Clone, Default)]
pub struct ContentExtractor {
    start: Option<Regex>,
    end: Option<Regex>,
}

impl ContentExtractor {
    /// Compile the configured patterns (case-insensitive)
    pub fn new(config: &ImportConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            start: config.start_pattern().map(compile).transpose()?,
            end: config.end_pattern().map(compile).transpose()?,
        })
    }

    /// Extracted part of `html`, re-wrapped into a document that keeps the
    /// original head. Returns `html` unchanged unless both patterns are set
    /// and match.
    pub fn extract<'h>(&self, html: &'h str) -> Cow<'h, str> {
        let (Some(start), Some(end)) = (&self.start, &self.end) else {
            return Cow::Borrowed(html);
        };

        let Some(from) = start.find(html).map(|m| m.end()) else {
            return Cow::Borrowed(html);
        };
        let Some(to) = end.find(&html[from..]).map(|m| from + m.start()) else {
            return Cow::Borrowed(html);
        };

        let extract = &html[from..to];
        if extract == html {
            return Cow::Borrowed(html);
        }

        let head = HEAD
            .captures(html)
            .and_then(|c| c.get(1))
            .map_or("", |m| m.as_str());
        Cow::Owned(format!("<html><head>{head}</head><body>{extract}</body></html>"))
    }
}

fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor(start: &str, end: &str) -> ContentExtractor {
        let config = ImportConfig::builder()
            .input_dir("/tmp/in")
            .destination_dir("/content/")
            .content_patterns(start, end)
            .build()
            .unwrap();
        ContentExtractor::new(&config).unwrap()
    }

    #[test]
    fn test_no_patterns_keeps_text() {
        let extractor = ContentExtractor::default();
        assert!(matches!(extractor.extract("<p>x</p>"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_extract_keeps_head() {
        let html = "<html><head><title>T</title></head><body><div>nav</div>\
                    <!-- CONTENT START --><p>main</p><!-- content end --><div>foot</div></body></html>";
        let out = extractor("<!-- content start -->", "<!-- content end -->").extract(html);
        assert_eq!(
            out,
            "<html><head><title>T</title></head><body><p>main</p></body></html>"
        );
    }

    #[test]
    fn test_single_pattern_keeps_text() {
        let html = "<div>menu</div><!-- main --><p>Body</p>";
        let out = extractor("<!-- main -->", "").extract(html);
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(out, html);
    }

    #[test]
    fn test_missing_end_keeps_text() {
        let html = "<p>start here</p>";
        let out = extractor("start", "never").extract(html);
        assert_eq!(out, html);
    }
}

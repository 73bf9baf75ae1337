//! HTML rewrite engine.
//!
//! Converts one legacy HTML document into the markup stored in a content
//! page: cuts out the configured content area, drops the document wrapper,
//! moves `<title>` and `<meta>` into properties and rewrites every link and
//! image reference through the [`LinkTranslator`].

mod dom_walker;
mod escapes;
mod extraction;
mod node_util;

pub use extraction::ContentExtractor;

use std::collections::BTreeMap;

use html5ever::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::RcDom;

use crate::config::ImportConfig;
use crate::importer::ImportMetadata;
use crate::link_translator::LinkTranslator;

use dom_walker::{Walker, walk_document};

/// Markup and properties of a converted document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionResult {
    pub content: String,
    pub properties: BTreeMap<String, String>,
}

/// Converts documents of one import run
#[derive(Debug, Clone)]
pub struct HtmlConverter {
    extractor: ContentExtractor,
}

impl HtmlConverter {
    /// # Errors
    ///
    /// Returns an error if a configured extraction pattern does not compile.
    pub fn new(config: &ImportConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            extractor: ContentExtractor::new(config)?,
        })
    }

    /// Convert `html`, the text of the source file `document`.
    ///
    /// Never fails: the parser recovers from any markup error.
    pub fn convert(
        &self,
        translator: &LinkTranslator<'_>,
        html: &str,
        document: &str,
        metadata: &mut ImportMetadata,
    ) -> ConversionResult {
        let extracted = self.extractor.extract(html);
        let protected = escapes::protect_entities(&extracted);

        let dom = parse_document(RcDom::default(), ParseOpts::default()).one(protected.as_str());
        for error in dom.errors.borrow().iter() {
            log::debug!("Parse error in {document}: {error}");
        }

        let mut walker = Walker::new(translator, document, metadata);
        let mut buffer = String::with_capacity(protected.len());
        walk_document(&dom.document, &mut buffer, &mut walker);

        let content = escapes::post_process(&escapes::restore_entities(&buffer));
        ConversionResult {
            content,
            properties: walker.properties,
        }
    }
}

/// Decode raw file content with the given charset label.
///
/// Unknown labels fall back to UTF-8. Malformed input is decoded lossily.
#[must_use]
pub fn decode_input(bytes: &[u8], label: &str, path: &str) -> String {
    let encoding = encoding_rs::Encoding::for_label(label.as_bytes()).unwrap_or_else(|| {
        log::warn!("Unknown encoding '{label}' for {path}, using UTF-8");
        encoding_rs::UTF_8
    });
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        log::warn!("{path} contains bytes that are not valid {}", encoding.name());
    }
    text.into_owned()
}

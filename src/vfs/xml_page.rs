//! Structured content page: named, locale-specific HTML elements plus the
//! link table extracted from each element.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use scraper::{Html, Selector};

use crate::utils::{is_external, is_passthrough};

static LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a[href], img[src]").expect("LINK_SELECTOR: hardcoded selector is valid")
});

/// One entry of an element's link table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDescriptor {
    /// Name of the link inside the element, `link0`, `link1`, ...
    pub name: String,
    /// Tag the link came from (`a` or `img`)
    pub tag: String,
    pub target: String,
    /// True for links into the repository, false for external URLs and anchors
    pub internal: bool,
}

#[derive(Debug, Clone, Default)]
struct PageElement {
    value: String,
    links: Vec<LinkDescriptor>,
}

/// A page holding named HTML elements for a single locale
#[derive(Debug, Clone)]
pub struct XmlPage {
    locale: String,
    encoding: &'static Encoding,
    elements: BTreeMap<String, PageElement>,
}

impl XmlPage {
    /// Create an empty page. Unknown encoding labels fall back to UTF-8.
    #[must_use]
    pub fn new(locale: &str, encoding: &str) -> Self {
        let encoding = Encoding::for_label(encoding.as_bytes()).unwrap_or_else(|| {
            log::warn!("Unknown page encoding '{encoding}', using UTF-8");
            UTF_8
        });
        Self {
            locale: locale.to_string(),
            encoding,
            elements: BTreeMap::new(),
        }
    }

    pub fn add_element(&mut self, name: &str) {
        self.elements.entry(name.to_string()).or_default();
    }

    #[must_use]
    pub fn has_element(&self, name: &str) -> bool {
        self.elements.contains_key(name)
    }

    /// Set the HTML of an element and rebuild its link table.
    ///
    /// Returns `false` if the element was never added.
    pub fn set_string_value(&mut self, name: &str, html: &str) -> bool {
        let Some(element) = self.elements.get_mut(name) else {
            return false;
        };
        element.value = html.to_string();
        element.links = extract_links(html);
        true
    }

    #[must_use]
    pub fn string_value(&self, name: &str) -> Option<&str> {
        self.elements.get(name).map(|e| e.value.as_str())
    }

    /// Link table of an element
    #[must_use]
    pub fn links(&self, name: &str) -> &[LinkDescriptor] {
        self.elements.get(name).map_or(&[], |e| e.links.as_slice())
    }

    /// Point a link at a new target, updating the element's HTML too
    pub fn set_link_target(&mut self, name: &str, index: usize, target: &str) -> bool {
        let Some(element) = self.elements.get_mut(name) else {
            return false;
        };
        let Some(link) = element.links.get_mut(index) else {
            return false;
        };
        if link.target == target {
            return true;
        }

        let attr = if link.tag == "img" { "src" } else { "href" };
        let old = format!(
            "{attr}=\"{}\"",
            html_escape::encode_double_quoted_attribute(&link.target)
        );
        let new = format!(
            "{attr}=\"{}\"",
            html_escape::encode_double_quoted_attribute(target)
        );
        element.value = element.value.replace(&old, &new);
        link.target = target.to_string();
        true
    }

    /// Check that every element's link table still matches its markup
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.elements.values().all(|element| {
            let current = extract_links(&element.value);
            current.len() == element.links.len()
                && current
                    .iter()
                    .zip(&element.links)
                    .all(|(a, b)| a.tag == b.tag && a.target == b.target)
        })
    }

    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    #[must_use]
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Serialize to XML bytes in the page encoding
    #[must_use]
    pub fn marshal(&self) -> Vec<u8> {
        let mut xml = format!(
            "<?xml version=\"1.0\" encoding=\"{}\"?>\n<pages>\n",
            self.encoding.name()
        );

        for (name, element) in &self.elements {
            xml.push_str(&format!(
                "  <element name=\"{}\" language=\"{}\">\n",
                html_escape::encode_double_quoted_attribute(name),
                html_escape::encode_double_quoted_attribute(&self.locale)
            ));
            xml.push_str("    <links>\n");
            for link in &element.links {
                xml.push_str(&format!(
                    "      <link name=\"{}\" type=\"{}\" internal=\"{}\"><target>{}</target></link>\n",
                    link.name,
                    link.tag.to_ascii_uppercase(),
                    link.internal,
                    cdata(&link.target)
                ));
            }
            xml.push_str("    </links>\n");
            xml.push_str(&format!("    <content>{}</content>\n", cdata(&element.value)));
            xml.push_str("  </element>\n");
        }
        xml.push_str("</pages>\n");

        let (bytes, _, had_errors) = self.encoding.encode(&xml);
        if had_errors {
            log::warn!(
                "Some characters are not representable in {}, replaced by references",
                self.encoding.name()
            );
        }
        bytes.into_owned()
    }
}

fn cdata(text: &str) -> String {
    format!("<![CDATA[{}]]>", text.replace("]]>", "]]]]><![CDATA[>"))
}

fn extract_links(html: &str) -> Vec<LinkDescriptor> {
    let fragment = Html::parse_fragment(html);
    fragment
        .select(&LINK_SELECTOR)
        .filter_map(|el| {
            let tag = el.value().name().to_string();
            let target = match tag.as_str() {
                "img" => el.value().attr("src"),
                _ => el.value().attr("href"),
            }?;
            Some((tag, target.to_string()))
        })
        .enumerate()
        .map(|(i, (tag, target))| LinkDescriptor {
            name: format!("link{i}"),
            internal: !is_external(&target) && !is_passthrough(&target) && !target.starts_with('#'),
            tag,
            target,
        })
        .collect()
}

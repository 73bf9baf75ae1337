use std::collections::BTreeMap;
use std::rc::Rc;

use html5ever::Attribute;
use markup5ever_rcdom::{Node, NodeData};
use phf::phf_set;

use super::node_util::{attr_name, get_attr, text_content};
use crate::importer::ImportMetadata;
use crate::link_translator::LinkTranslator;
use crate::utils::{BROKEN_LINK_TARGET, PROPERTY_NAVTEXT, PROPERTY_TITLE, is_external, is_passthrough};

/// Walk state for one document
pub(crate) struct Walker<'a, 'm> {
    translator: &'a LinkTranslator<'a>,
    document: &'a str,
    metadata: &'m mut ImportMetadata,
    pub(crate) properties: BTreeMap<String, String>,
    /// Nesting depth of elements whose output is suppressed
    suppressed: usize,
}

impl<'a, 'm> Walker<'a, 'm> {
    pub(crate) fn new(
        translator: &'a LinkTranslator<'a>,
        document: &'a str,
        metadata: &'m mut ImportMetadata,
    ) -> Self {
        Self {
            translator,
            document,
            metadata,
            properties: BTreeMap::new(),
            suppressed: 0,
        }
    }
}

/// Pending work of the serializer
enum Frame {
    Enter { node: Rc<Node>, raw_text: bool },
    /// Leaving an element whose output was suppressed
    Unsuppress,
    /// Closing tag of an emitted element
    Close(String),
}

/// Serialize the document below `root` into `buffer`.
///
/// Uses an explicit stack, so the nesting depth of the input is bounded only
/// by memory.
pub(crate) fn walk_document(root: &Rc<Node>, buffer: &mut String, walker: &mut Walker<'_, '_>) {
    let mut stack = vec![Frame::Enter {
        node: Rc::clone(root),
        raw_text: false,
    }];

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Enter { node, raw_text } => enter_node(&node, raw_text, buffer, walker, &mut stack),
            Frame::Unsuppress => walker.suppressed -= 1,
            Frame::Close(tag) => {
                buffer.push_str("</");
                buffer.push_str(&tag);
                buffer.push('>');
                if is_block_element(&tag) {
                    buffer.push('\n');
                }
            }
        }
    }
}

/// Queue the children of `node` so the first child is visited next
fn push_children(node: &Rc<Node>, raw_text: bool, stack: &mut Vec<Frame>) {
    for child in node.children.borrow().iter().rev() {
        stack.push(Frame::Enter {
            node: Rc::clone(child),
            raw_text,
        });
    }
}

fn enter_node(
    node: &Rc<Node>,
    raw_text: bool,
    buffer: &mut String,
    walker: &mut Walker<'_, '_>,
    stack: &mut Vec<Frame>,
) {
    match node.data {
        NodeData::Document => push_children(node, false, stack),

        NodeData::Text { ref contents } => {
            if walker.suppressed > 0 {
                return;
            }
            let borrowed = contents.borrow();
            let text: &str = &borrowed;
            if raw_text {
                buffer.push_str(text);
            } else {
                buffer.push_str(&html_escape::encode_text(text));
            }
        }

        NodeData::Element {
            ref name,
            ref attrs,
            ..
        } => {
            let tag = &*name.local;
            match tag {
                "html" | "body" => push_children(node, false, stack),
                "head" => {
                    walker.suppressed += 1;
                    stack.push(Frame::Unsuppress);
                    push_children(node, false, stack);
                }
                _ => enter_element(node, tag, &attrs.borrow(), buffer, walker, stack),
            }
        }

        // Comments, doctype and processing instructions are not carried over
        NodeData::Comment { .. } | NodeData::Doctype { .. } | NodeData::ProcessingInstruction { .. } => {}
    }
}

fn enter_element(
    node: &Rc<Node>,
    tag: &str,
    attrs: &[Attribute],
    buffer: &mut String,
    walker: &mut Walker<'_, '_>,
    stack: &mut Vec<Frame>,
) {
    match tag {
        "title" => capture_title(node, walker),
        "meta" => capture_meta(attrs, walker),
        _ => {}
    }

    if walker.suppressed > 0 {
        push_children(node, is_raw_text_element(tag), stack);
        return;
    }

    buffer.push('<');
    buffer.push_str(tag);
    for attr in attrs {
        let value = rewrite_attribute(tag, attr, attrs, walker);
        buffer.push(' ');
        buffer.push_str(&attr_name(attr));
        buffer.push_str("=\"");
        buffer.push_str(&html_escape::encode_double_quoted_attribute(&value));
        buffer.push('"');
    }
    buffer.push('>');

    if is_void_element(tag) {
        return;
    }

    stack.push(Frame::Close(tag.to_string()));
    push_children(node, is_raw_text_element(tag), stack);
}

fn rewrite_attribute(tag: &str, attr: &Attribute, attrs: &[Attribute], walker: &mut Walker<'_, '_>) -> String {
    let value = attr.value.to_string();
    let local = &*attr.name.local;

    if tag == "a" && local == "href" {
        if is_passthrough(&value) {
            return value;
        }
        return walker
            .translator
            .translate(&value, walker.document, &mut walker.metadata.external_links);
    }

    if tag == "img" && local == "src" {
        if is_external(&value) {
            return value;
        }
        let target = walker
            .translator
            .translate(&value, walker.document, &mut walker.metadata.external_links);
        if target != BROKEN_LINK_TARGET
            && let Some(alt) = get_attr(attrs, "alt").filter(|a| !a.trim().is_empty())
        {
            walker.metadata.image_info.insert(target.clone(), alt);
        }
        return target;
    }

    value
}

fn capture_title(node: &Rc<Node>, walker: &mut Walker<'_, '_>) {
    let title = text_content(node).trim().to_string();
    if title.is_empty() {
        return;
    }
    walker
        .properties
        .entry(PROPERTY_NAVTEXT.to_string())
        .or_insert_with(|| title.clone());
    walker.properties.insert(PROPERTY_TITLE.to_string(), title);
}

fn capture_meta(attrs: &[Attribute], walker: &mut Walker<'_, '_>) {
    let name = get_attr(attrs, "name").map(|n| n.trim().to_string());
    let content = get_attr(attrs, "content").map(|c| c.trim().to_string());
    if let (Some(name), Some(content)) = (name, content)
        && !name.is_empty()
        && !content.is_empty()
    {
        walker.properties.insert(name, content);
    }
}

/// Closing tags of these elements are followed by a newline
static BLOCK_ELEMENTS: phf::Set<&'static str> = phf_set! {
    "body",
    "caption",
    "col",
    "colgroup",
    "dd",
    "dl",
    "dt",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "head",
    "li",
    "ol",
    "p",
    "pre",
    "script",
    "style",
    "table",
    "tbody",
    "td",
    "tfoot",
    "th",
    "thead",
    "title",
    "tr",
    "ul",
};

static VOID_ELEMENTS: phf::Set<&'static str> = phf_set! {
    "area",
    "base",
    "br",
    "col",
    "embed",
    "hr",
    "img",
    "input",
    "link",
    "meta",
    "param",
    "source",
    "track",
    "wbr",
};

fn is_block_element(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(tag)
}

fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(tag)
}

fn is_raw_text_element(tag: &str) -> bool {
    matches!(tag, "script" | "style")
}

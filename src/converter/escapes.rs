//! Entity protection and output clean-up around the parser.
//!
//! The parser decodes character references. `&#...;`, `&lt;` and `&gt;` in
//! the source must survive the round trip unchanged, so they are swapped for
//! private-use characters before parsing and swapped back afterwards.

use std::sync::LazyLock;

use regex::Regex;

const NUMERIC_REF: (&str, char) = ("&#", '\u{E000}');
const LESS_THAN: (&str, char) = ("&lt;", '\u{E001}');
const GREATER_THAN: (&str, char) = ("&gt;", '\u{E002}');

static EMPTY_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br(\s[^>]*)?></br>").expect("EMPTY_BREAK: hardcoded regex is valid")
});

static ANCHOR_FOLLOWED_BY_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</a>(\w)").expect("ANCHOR_FOLLOWED_BY_WORD: hardcoded regex is valid")
});

/// Swap protected references for placeholders
pub(crate) fn protect_entities(html: &str) -> String {
    html.replace(NUMERIC_REF.0, &NUMERIC_REF.1.to_string())
        .replace(LESS_THAN.0, &LESS_THAN.1.to_string())
        .replace(GREATER_THAN.0, &GREATER_THAN.1.to_string())
}

/// Turn placeholders back into the original references
pub(crate) fn restore_entities(html: &str) -> String {
    html.replace(NUMERIC_REF.1, NUMERIC_REF.0)
        .replace(LESS_THAN.1, LESS_THAN.0)
        .replace(GREATER_THAN.1, GREATER_THAN.0)
}

/// `<br></br>` → `<br>`, and a space between `</a>` and following text
pub(crate) fn post_process(html: &str) -> String {
    let html = EMPTY_BREAK.replace_all(html, "<br$1>");
    ANCHOR_FOLLOWED_BY_WORD.replace_all(&html, "</a> $1").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protect_and_restore() {
        let source = "a &lt;b&gt; &#169; &amp; c";
        let protected = protect_entities(source);
        assert!(!protected.contains("&lt;"));
        assert!(!protected.contains("&#"));
        assert!(protected.contains("&amp;"));
        assert_eq!(restore_entities(&protected), source);
    }

    #[test]
    fn test_post_process() {
        assert_eq!(post_process("a<br></br>b"), "a<br>b");
        assert_eq!(post_process(r#"<br class="x"></br>"#), r#"<br class="x">"#);
        assert_eq!(post_process("<a href=\"x\">x</a>and"), "<a href=\"x\">x</a> and");
        assert_eq!(post_process("<a href=\"x\">x</a>, and"), "<a href=\"x\">x</a>, and");
    }
}

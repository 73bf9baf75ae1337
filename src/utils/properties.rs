//! Parser for `meta.properties` folder property files.
//!
//! Accepts the `key=value` / `key: value` line format with `#` and `!`
//! comment lines. Continuation lines and unicode escapes are not supported.

use std::collections::BTreeMap;

/// Parse a properties file into an ordered map.
///
/// Later duplicates win. Lines without a separator are ignored.
#[must_use]
pub fn parse_properties(text: &str) -> BTreeMap<String, String> {
    let mut properties = BTreeMap::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let Some(sep) = line.find(['=', ':']) else {
            log::debug!("Ignoring properties line without separator: {line}");
            continue;
        };

        let key = line[..sep].trim();
        let value = line[sep + 1..].trim();
        if key.is_empty() {
            continue;
        }
        properties.insert(key.to_string(), value.to_string());
    }

    properties
}

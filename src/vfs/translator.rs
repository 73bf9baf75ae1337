//! Regex-based file name translation.
//!
//! Rules are applied in order to every name stored in the repository, so
//! source names with spaces, umlauts or punctuation become safe VFS names.

use std::sync::LazyLock;

use regex::Regex;

/// Rules applied by [`FileNameTranslator::default`], in order
static DEFAULT_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\\", "/"),
        (r"\s+", "_"),
        ("ä", "ae"),
        ("ö", "oe"),
        ("ü", "ue"),
        ("Ä", "Ae"),
        ("Ö", "Oe"),
        ("Ü", "Ue"),
        ("ß", "ss"),
        (r"[^0-9A-Za-z_$~./\-]", "_"),
        (r"_{2,}", "_"),
        (r"/{2,}", "/"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(pattern).expect("DEFAULT_RULES: hardcoded regex is valid"),
            replacement,
        )
    })
    .collect()
});

/// Ordered list of `pattern → replacement` rules
#[derive(Debug, Clone)]
pub struct FileNameTranslator {
    rules: Vec<(Regex, String)>,
}

impl Default for FileNameTranslator {
    fn default() -> Self {
        Self {
            rules: DEFAULT_RULES
                .iter()
                .map(|(re, rep)| (re.clone(), (*rep).to_string()))
                .collect(),
        }
    }
}

impl FileNameTranslator {
    /// A translator that returns every name unchanged
    #[must_use]
    pub fn identity() -> Self {
        Self { rules: Vec::new() }
    }

    /// Build a translator from `(pattern, replacement)` pairs
    pub fn from_rules<'a>(
        rules: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, regex::Error> {
        let rules = rules
            .into_iter()
            .map(|(pattern, replacement)| Ok((Regex::new(pattern)?, replacement.to_string())))
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { rules })
    }

    #[must_use]
    pub fn translate(&self, name: &str) -> String {
        let mut result = name.to_string();
        for (pattern, replacement) in &self.rules {
            if pattern.is_match(&result) {
                result = pattern
                    .replace_all(&result, replacement.as_str())
                    .into_owned();
            }
        }
        result
    }
}

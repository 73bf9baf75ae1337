//! Type-safe builder for `ImportConfig` using the typestate pattern
//!
//! `build()` is only available once both the source and the destination
//! folder have been set.

use regex::RegexBuilder;
use std::marker::PhantomData;
use std::path::PathBuf;

use super::types::{ImportConfig, ImportSource};
use crate::error::{ConfigField, ValidationError};
use crate::utils::{DEFAULT_ELEMENT, DEFAULT_ENCODING, DEFAULT_LOCALE, ensure_leading_slash, ensure_trailing_slash};

// Type states for the builder
pub struct WithSource;
pub struct Complete;

pub struct ImportConfigBuilder<State = ()> {
    pub(crate) source: Option<ImportSource>,
    pub(crate) destination_dir: Option<String>,
    pub(crate) image_gallery: Option<String>,
    pub(crate) download_gallery: Option<String>,
    pub(crate) link_gallery: Option<String>,
    pub(crate) template: String,
    pub(crate) element: String,
    pub(crate) locale: String,
    pub(crate) input_encoding: String,
    pub(crate) start_pattern: Option<String>,
    pub(crate) end_pattern: Option<String>,
    pub(crate) overwrite: bool,
    pub(crate) keep_broken_links: bool,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for ImportConfigBuilder<()> {
    fn default() -> Self {
        Self {
            source: None,
            destination_dir: None,
            image_gallery: None,
            download_gallery: None,
            link_gallery: None,
            template: String::new(),
            element: DEFAULT_ELEMENT.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            input_encoding: DEFAULT_ENCODING.to_string(),
            start_pattern: None,
            end_pattern: None,
            overwrite: false,
            keep_broken_links: false,
            _phantom: PhantomData,
        }
    }
}

impl ImportConfig {
    /// Create a builder for configuring an `ImportConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> ImportConfigBuilder<()> {
        ImportConfigBuilder::default()
    }
}

impl<State> ImportConfigBuilder<State> {
    fn into_state<Next>(self) -> ImportConfigBuilder<Next> {
        ImportConfigBuilder {
            source: self.source,
            destination_dir: self.destination_dir,
            image_gallery: self.image_gallery,
            download_gallery: self.download_gallery,
            link_gallery: self.link_gallery,
            template: self.template,
            element: self.element,
            locale: self.locale,
            input_encoding: self.input_encoding,
            start_pattern: self.start_pattern,
            end_pattern: self.end_pattern,
            overwrite: self.overwrite,
            keep_broken_links: self.keep_broken_links,
            _phantom: PhantomData,
        }
    }

    #[must_use]
    pub fn image_gallery(mut self, folder: impl Into<String>) -> Self {
        self.image_gallery = Some(folder.into());
        self
    }

    #[must_use]
    pub fn download_gallery(mut self, folder: impl Into<String>) -> Self {
        self.download_gallery = Some(folder.into());
        self
    }

    #[must_use]
    pub fn link_gallery(mut self, folder: impl Into<String>) -> Self {
        self.link_gallery = Some(folder.into());
        self
    }

    #[must_use]
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    #[must_use]
    pub fn element(mut self, element: impl Into<String>) -> Self {
        self.element = element.into();
        self
    }

    #[must_use]
    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    #[must_use]
    pub fn input_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.input_encoding = encoding.into();
        self
    }

    /// Extract only the text between the first matches of `start` and `end`
    #[must_use]
    pub fn content_patterns(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.start_pattern = Some(start.into());
        self.end_pattern = Some(end.into());
        self
    }

    #[must_use]
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    #[must_use]
    pub fn keep_broken_links(mut self, keep: bool) -> Self {
        self.keep_broken_links = keep;
        self
    }
}

impl ImportConfigBuilder<()> {
    /// Import from a directory on the local file system
    pub fn input_dir(self, dir: impl Into<PathBuf>) -> ImportConfigBuilder<WithSource> {
        self.source(ImportSource::Directory(dir.into()))
    }

    /// Import from an uploaded zip archive
    pub fn archive(self, file: impl Into<PathBuf>) -> ImportConfigBuilder<WithSource> {
        self.source(ImportSource::Archive(file.into()))
    }

    pub fn source(mut self, source: ImportSource) -> ImportConfigBuilder<WithSource> {
        self.source = Some(source);
        self.into_state()
    }
}

impl ImportConfigBuilder<WithSource> {
    pub fn destination_dir(mut self, folder: impl Into<String>) -> ImportConfigBuilder<Complete> {
        self.destination_dir = Some(folder.into());
        self.into_state()
    }
}

impl ImportConfigBuilder<Complete> {
    /// Build the configuration.
    ///
    /// Normalizes folder paths, turns empty gallery settings into `None` and
    /// checks the encoding label and extraction patterns.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` naming the offending field.
    pub fn build(self) -> Result<ImportConfig, ValidationError> {
        let source = self
            .source
            .ok_or_else(|| ValidationError::new(ConfigField::InputDir, "no source configured"))?;

        let destination_dir = self
            .destination_dir
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| {
                ValidationError::new(ConfigField::DestinationDir, "no destination folder configured")
            })?;

        if self.element.trim().is_empty() {
            return Err(ValidationError::new(ConfigField::Element, "element name is empty"));
        }

        if encoding_rs::Encoding::for_label(self.input_encoding.trim().as_bytes()).is_none() {
            return Err(ValidationError::new(
                ConfigField::Encoding,
                format!("unknown character encoding '{}'", self.input_encoding),
            ));
        }

        let start_pattern = non_empty(self.start_pattern);
        let end_pattern = non_empty(self.end_pattern);
        check_pattern(start_pattern.as_deref(), ConfigField::StartPattern)?;
        check_pattern(end_pattern.as_deref(), ConfigField::EndPattern)?;

        Ok(ImportConfig {
            source,
            destination_dir: normalize_folder(&destination_dir),
            image_gallery: non_empty(self.image_gallery).map(|g| normalize_folder(&g)),
            download_gallery: non_empty(self.download_gallery).map(|g| normalize_folder(&g)),
            link_gallery: non_empty(self.link_gallery).map(|g| normalize_folder(&g)),
            template: self.template.trim().to_string(),
            element: self.element.trim().to_string(),
            locale: self.locale.trim().to_string(),
            input_encoding: self.input_encoding.trim().to_string(),
            start_pattern,
            end_pattern,
            overwrite: self.overwrite,
            keep_broken_links: self.keep_broken_links,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn normalize_folder(folder: &str) -> String {
    ensure_trailing_slash(&ensure_leading_slash(&folder.trim().replace('\\', "/")))
}

fn check_pattern(pattern: Option<&str>, field: ConfigField) -> Result<(), ValidationError> {
    if let Some(pattern) = pattern {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| ValidationError::new(field, format!("invalid pattern '{pattern}': {e}")))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folders_are_normalized() {
        let config = ImportConfig::builder()
            .input_dir("/tmp/in")
            .destination_dir("content/site")
            .image_gallery("/content/images")
            .download_gallery("")
            .build()
            .unwrap();

        assert_eq!(config.destination_dir(), "/content/site/");
        assert_eq!(config.image_gallery(), Some("/content/images/"));
        assert_eq!(config.download_gallery(), None);
        assert_eq!(config.link_gallery(), None);
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = ImportConfig::builder()
            .input_dir("/tmp/in")
            .destination_dir("/content/")
            .content_patterns("<!-- start", "(unclosed")
            .build()
            .unwrap_err();
        assert_eq!(err.field, ConfigField::EndPattern);
    }

    #[test]
    fn test_unknown_encoding_rejected() {
        let err = ImportConfig::builder()
            .input_dir("/tmp/in")
            .destination_dir("/content/")
            .input_encoding("no-such-charset")
            .build()
            .unwrap_err();
        assert_eq!(err.field, ConfigField::Encoding);
    }

    #[test]
    fn test_empty_destination_rejected() {
        let err = ImportConfig::builder()
            .input_dir("/tmp/in")
            .destination_dir("  ")
            .build()
            .unwrap_err();
        assert_eq!(err.field, ConfigField::DestinationDir);
    }
}

//! Getter methods for `ImportConfig`

use super::types::{ImportConfig, ImportSource};

impl ImportConfig {
    #[must_use]
    pub fn source(&self) -> &ImportSource {
        &self.source
    }

    #[must_use]
    pub fn destination_dir(&self) -> &str {
        &self.destination_dir
    }

    #[must_use]
    pub fn image_gallery(&self) -> Option<&str> {
        self.image_gallery.as_deref()
    }

    #[must_use]
    pub fn download_gallery(&self) -> Option<&str> {
        self.download_gallery.as_deref()
    }

    #[must_use]
    pub fn link_gallery(&self) -> Option<&str> {
        self.link_gallery.as_deref()
    }

    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    #[must_use]
    pub fn element(&self) -> &str {
        &self.element
    }

    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    #[must_use]
    pub fn input_encoding(&self) -> &str {
        &self.input_encoding
    }

    #[must_use]
    pub fn start_pattern(&self) -> Option<&str> {
        self.start_pattern.as_deref()
    }

    #[must_use]
    pub fn end_pattern(&self) -> Option<&str> {
        self.end_pattern.as_deref()
    }

    #[must_use]
    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    #[must_use]
    pub fn keep_broken_links(&self) -> bool {
        self.keep_broken_links
    }
}

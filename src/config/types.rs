//! Core configuration types for an HTML import
//!
//! This module contains the `ImportConfig` struct describing one import run
//! and the `ImportSource` it reads from.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::utils::{DEFAULT_ELEMENT, DEFAULT_ENCODING, DEFAULT_LOCALE};

/// Where the files to import come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportSource {
    /// A directory on the local file system
    Directory(PathBuf),
    /// An uploaded zip archive, extracted to a temporary directory before import
    Archive(PathBuf),
}

impl ImportSource {
    #[must_use]
    pub fn is_archive(&self) -> bool {
        matches!(self, ImportSource::Archive(_))
    }

    #[must_use]
    pub fn path(&self) -> &PathBuf {
        match self {
            ImportSource::Directory(p) | ImportSource::Archive(p) => p,
        }
    }
}

/// Settings of one import run.
///
/// Immutable while the import runs. Folder paths are normalized by the
/// builder to absolute VFS paths ending with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    pub(crate) source: ImportSource,

    /// VFS folder receiving the converted tree
    pub(crate) destination_dir: String,

    /// Flat gallery for images. `None` keeps images in the tree.
    pub(crate) image_gallery: Option<String>,

    /// Flat gallery for other binary files. `None` keeps them in the tree.
    pub(crate) download_gallery: Option<String>,

    /// Gallery receiving one pointer per external link.
    ///
    /// When `None`, external links are left untouched and not collected.
    pub(crate) link_gallery: Option<String>,

    /// Template property value attached to every converted page
    pub(crate) template: String,

    /// Element of the page that receives the converted markup
    pub(crate) element: String,

    pub(crate) locale: String,

    /// Character encoding of the source HTML files
    pub(crate) input_encoding: String,

    /// Regex marking the start of the content to extract (case-insensitive)
    pub(crate) start_pattern: Option<String>,

    /// Regex marking the end of the content to extract (case-insensitive)
    pub(crate) end_pattern: Option<String>,

    /// Replace existing resources instead of renaming new ones
    pub(crate) overwrite: bool,

    /// Keep links whose targets cannot be found instead of replacing them by `#`
    pub(crate) keep_broken_links: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            source: ImportSource::Directory(PathBuf::new()),
            destination_dir: "/".to_string(),
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
        }
    }
}

//! Shared constants for the importer
//!
//! Resource type names, property names and file names used throughout the
//! codebase to avoid magic strings.

/// Resource type name for folders
pub const TYPE_FOLDER: &str = "folder";

/// Resource type name for plain text and HTML sources
pub const TYPE_PLAIN: &str = "plain";

/// Resource type name for unmapped binary files
pub const TYPE_BINARY: &str = "binary";

/// Resource type name for images
pub const TYPE_IMAGE: &str = "image";

/// Resource type name for structured content pages
pub const TYPE_XMLPAGE: &str = "xmlpage";

/// Resource type name for external link pointers
pub const TYPE_POINTER: &str = "pointer";

pub const TYPE_IMAGE_GALLERY: &str = "imagegallery";
pub const TYPE_DOWNLOAD_GALLERY: &str = "downloadgallery";
pub const TYPE_LINK_GALLERY: &str = "linkgallery";

pub const PROPERTY_TITLE: &str = "Title";
pub const PROPERTY_DESCRIPTION: &str = "Description";
pub const PROPERTY_NAVTEXT: &str = "NavText";
pub const PROPERTY_NAVPOS: &str = "NavPos";
pub const PROPERTY_TEMPLATE: &str = "template";

/// File holding folder properties inside a source directory
///
/// Never imported as a resource of its own.
pub const META_PROPERTIES: &str = "meta.properties";

/// File name a folder's index page gets
pub const INDEX_HTML: &str = "index.html";

/// Separator that marks a reference as external
pub const SCHEME_SEPARATOR: &str = "://";

/// Prefix given to leading-dot file names before extension lookup
pub const HIDDEN_FILE_PREFIX: &str = "unnamed";

/// Fallback for a broken link: stay on the current page
pub const BROKEN_LINK_TARGET: &str = "#";

/// Prefix of the title property of external link pointers
pub const EXTERNAL_LINK_TITLE_PREFIX: &str = "Link to ";

/// Default locale of created content pages
pub const DEFAULT_LOCALE: &str = "en";

/// Default input character encoding
pub const DEFAULT_ENCODING: &str = "UTF-8";

/// Default element name of created content pages
pub const DEFAULT_ELEMENT: &str = "body";

/// Directory name prefix for archive extraction
pub const EXTRACTION_DIR_PREFIX: &str = "htmlimport-";

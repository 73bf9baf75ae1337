//! Error types for the importer
//!
//! Repository failures, configuration validation failures and the top-level
//! import error that wraps both.

use std::fmt;

use thiserror::Error;

/// Result type alias for repository operations
pub type VfsResult<T> = Result<T, VfsError>;

/// Errors raised by a [`crate::vfs::Repository`] implementation
#[derive(Debug, Error)]
pub enum VfsError {
    /// No resource exists at the path
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// A resource already exists at the path
    #[error("Resource already exists: {0}")]
    AlreadyExists(String),

    /// The parent folder of the path does not exist
    #[error("Parent folder missing for: {0}")]
    ParentMissing(String),

    /// The resource type name is not registered
    #[error("Unknown resource type: {0}")]
    UnknownResourceType(String),

    /// The resource is locked by another user
    #[error("Resource is locked by another user: {0}")]
    Locked(String),

    /// The repository is in the online project and cannot be modified
    #[error("Cannot modify resources in the online project: {0}")]
    OnlineProject(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl VfsError {
    /// Check if the error only means the resource is missing
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, VfsError::NotFound(_))
    }
}

/// Configuration field a validation error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigField {
    InputDir,
    Archive,
    DestinationDir,
    ImageGallery,
    DownloadGallery,
    LinkGallery,
    Template,
    Element,
    Locale,
    Encoding,
    StartPattern,
    EndPattern,
    Project,
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigField::InputDir => "input directory",
            ConfigField::Archive => "uploaded archive",
            ConfigField::DestinationDir => "destination folder",
            ConfigField::ImageGallery => "image gallery",
            ConfigField::DownloadGallery => "download gallery",
            ConfigField::LinkGallery => "link gallery",
            ConfigField::Template => "template",
            ConfigField::Element => "element",
            ConfigField::Locale => "locale",
            ConfigField::Encoding => "input encoding",
            ConfigField::StartPattern => "start pattern",
            ConfigField::EndPattern => "end pattern",
            ConfigField::Project => "project",
        };
        f.write_str(name)
    }
}

/// A user-facing configuration problem, raised before any resource is touched
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid {field}: {message}")]
pub struct ValidationError {
    pub field: ConfigField,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: ConfigField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Top-level error for an import run
#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Vfs(#[from] VfsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive could not be opened or read
    #[error("Archive error: {0}")]
    Archive(String),

    /// Invalid extraction pattern
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for ImportError {
    fn from(error: anyhow::Error) -> Self {
        ImportError::Other(format!("{error:#}"))
    }
}

impl From<zip::result::ZipError> for ImportError {
    fn from(error: zip::result::ZipError) -> Self {
        ImportError::Archive(error.to_string())
    }
}

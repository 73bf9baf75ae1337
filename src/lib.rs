//! Import of legacy HTML trees into a managed virtual file system.
//!
//! Walks a directory (or an uploaded zip archive) of HTML pages and assets,
//! relocates every file into the repository under collision-free names,
//! rewrites links and image references to the new locations, moves page
//! metadata into properties and reports progress while it runs.
//!
//! ```no_run
//! use vfs_html_import::{HtmlImport, ImportConfig, MemoryRepository};
//!
//! let config = ImportConfig::builder()
//!     .input_dir("/srv/legacy-site")
//!     .destination_dir("/sites/default/legacy/")
//!     .build()?;
//! let mut import = HtmlImport::new(config, MemoryRepository::new());
//! import.validate()?;
//! import.start_import();
//! print!("{}", import.report().text());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod converter;
pub mod error;
pub mod file_index;
pub mod importer;
pub mod link_translator;
pub mod path_resolver;
pub mod report;
pub mod resource_types;
pub mod utils;
pub mod vfs;

pub use config::{ImportConfig, ImportSession, ImportSource, validate_config};
pub use converter::{ConversionResult, HtmlConverter};
pub use error::{ConfigField, ImportError, ValidationError, VfsError, VfsResult};
pub use file_index::{FileIndex, ParentPathMap, build_file_index, build_parent_paths};
pub use importer::{
    ExternalLinkSet, FsUploadedFile, HtmlImport, ImageInfoMap, ImportMetadata, ImportPhase,
    ImportThread, PreparedImport, UploadedFile,
};
pub use link_translator::{LinkTranslator, external_link_file_name};
pub use path_resolver::PathResolver;
pub use report::{Report, ReportEntry, ReportSeverity};
pub use resource_types::ExtensionTypeMap;
pub use vfs::{Existence, MemoryRepository, Property, Repository, ResourceInfo, SiblingMode, XmlPage};

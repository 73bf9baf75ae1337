//! Contracts of the managed virtual file system the importer writes into.
//!
//! The importer only talks to the [`Repository`] trait. [`MemoryRepository`]
//! is a complete in-memory implementation used for dry runs and tests.

mod memory;
mod translator;
mod xml_page;

pub use memory::MemoryRepository;
pub use translator::FileNameTranslator;
pub use xml_page::{LinkDescriptor, XmlPage};

use serde::{Deserialize, Serialize};

use crate::error::{VfsError, VfsResult};

/// A named string value attached to a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Header data of a stored resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceInfo {
    pub path: String,
    pub type_id: u32,
    pub is_folder: bool,
    pub size: usize,
}

/// Outcome of probing a path
#[derive(Debug)]
pub enum Existence {
    Exists(ResourceInfo),
    Absent,
    Error(VfsError),
}

impl Existence {
    #[must_use]
    pub fn exists(&self) -> bool {
        matches!(self, Existence::Exists(_))
    }
}

/// How deleting a file treats other links to the same content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiblingMode {
    Preserve,
    Delete,
}

/// Repository operations the importer depends on.
///
/// Paths are absolute VFS paths with `/` separators; folder paths end with `/`.
pub trait Repository: Send {
    /// Create a resource. Fails if the path exists or the parent folder is missing.
    fn create_resource(
        &mut self,
        path: &str,
        type_id: u32,
        content: Vec<u8>,
        properties: Vec<Property>,
    ) -> VfsResult<ResourceInfo>;

    fn read_resource(&self, path: &str) -> VfsResult<ResourceInfo>;

    /// Read the content of a file resource
    fn read_file(&self, path: &str) -> VfsResult<Vec<u8>>;

    fn delete_resource(&mut self, path: &str, siblings: SiblingMode) -> VfsResult<()>;

    fn lock_resource(&mut self, path: &str) -> VfsResult<()>;

    /// Check if the current user holds an exclusive lock on the resource
    fn has_exclusive_lock(&self, path: &str) -> bool;

    fn read_properties(&self, path: &str) -> VfsResult<Vec<Property>>;

    /// Write properties, replacing values of properties with the same name
    fn write_properties(&mut self, path: &str, properties: &[Property]) -> VfsResult<()>;

    fn exists(&self, path: &str) -> bool {
        self.read_resource(path).is_ok()
    }

    /// Tri-state existence check
    fn probe(&self, path: &str) -> Existence {
        match self.read_resource(path) {
            Ok(info) => Existence::Exists(info),
            Err(e) if e.is_not_found() => Existence::Absent,
            Err(e) => Existence::Error(e),
        }
    }

    /// Apply the repository's file name translation rules
    fn translate_file_name(&self, name: &str) -> String;

    /// Numeric id of a resource type name
    fn resource_type_id(&self, type_name: &str) -> VfsResult<u32>;

    /// Check if the current context is the published ("online") project
    fn is_online_project(&self) -> bool;

    /// Paths of all known templates
    fn templates(&self) -> Vec<String>;

    /// Element names declared by a template
    fn template_elements(&self, template: &str) -> VfsResult<Vec<String>>;

    /// Web application context prefixed to root-relative links, e.g. `/opencms`
    fn context_prefix(&self) -> Option<&str> {
        None
    }
}

/// Check if a resource exists and carries the given type
pub fn has_type(repo: &dyn Repository, path: &str, type_name: &str) -> VfsResult<bool> {
    let info = repo.read_resource(path)?;
    let type_id = repo.resource_type_id(type_name)?;
    Ok(info.type_id == type_id)
}

/// Overlay `new` on `old`: properties from `new` win, others from `old` survive
#[must_use]
pub fn merge_properties(old: Vec<Property>, new: Vec<Property>) -> Vec<Property> {
    let mut merged: Vec<Property> = old
        .into_iter()
        .filter(|o| !new.iter().any(|n| n.name == o.name))
        .collect();
    merged.extend(new);
    merged
}

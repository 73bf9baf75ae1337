//! In-memory repository.
//!
//! Keeps resources in an ordered map keyed by path. Folders must be created
//! before their children, just like in a real VFS.

use std::collections::{BTreeMap, HashMap};

use super::{FileNameTranslator, Property, Repository, ResourceInfo, SiblingMode};
use crate::error::{VfsError, VfsResult};
use crate::utils::{
    TYPE_BINARY, TYPE_DOWNLOAD_GALLERY, TYPE_FOLDER, TYPE_IMAGE, TYPE_IMAGE_GALLERY,
    TYPE_LINK_GALLERY, TYPE_PLAIN, TYPE_POINTER, TYPE_XMLPAGE, parent_dir,
};

/// Type ids registered by [`MemoryRepository::new`]
const DEFAULT_TYPES: &[(&str, u32)] = &[
    (TYPE_FOLDER, 0),
    (TYPE_PLAIN, 1),
    (TYPE_BINARY, 2),
    (TYPE_IMAGE, 3),
    (TYPE_POINTER, 4),
    (TYPE_XMLPAGE, 6),
    (TYPE_IMAGE_GALLERY, 16),
    (TYPE_DOWNLOAD_GALLERY, 17),
    (TYPE_LINK_GALLERY, 18),
];

#[derive(Debug, Clone)]
struct StoredResource {
    type_id: u32,
    content: Vec<u8>,
    properties: BTreeMap<String, String>,
    locked: bool,
}

/// A [`Repository`] held entirely in memory
#[derive(Debug, Clone)]
pub struct MemoryRepository {
    resources: BTreeMap<String, StoredResource>,
    types: HashMap<String, u32>,
    translator: FileNameTranslator,
    templates: BTreeMap<String, Vec<String>>,
    online: bool,
    context_prefix: Option<String>,
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRepository {
    /// Empty repository containing only the root folder
    #[must_use]
    pub fn new() -> Self {
        let mut resources = BTreeMap::new();
        resources.insert(
            "/".to_string(),
            StoredResource {
                type_id: 0,
                content: Vec::new(),
                properties: BTreeMap::new(),
                locked: false,
            },
        );

        Self {
            resources,
            types: DEFAULT_TYPES
                .iter()
                .map(|(name, id)| ((*name).to_string(), *id))
                .collect(),
            translator: FileNameTranslator::default(),
            templates: BTreeMap::new(),
            online: false,
            context_prefix: None,
        }
    }

    #[must_use]
    pub fn with_translator(mut self, translator: FileNameTranslator) -> Self {
        self.translator = translator;
        self
    }

    /// Register a template and the element names it declares
    #[must_use]
    pub fn with_template(mut self, path: &str, elements: &[&str]) -> Self {
        self.templates.insert(
            path.to_string(),
            elements.iter().map(|e| (*e).to_string()).collect(),
        );
        self
    }

    #[must_use]
    pub fn with_context_prefix(mut self, prefix: &str) -> Self {
        self.context_prefix = Some(prefix.trim_end_matches('/').to_string());
        self
    }

    pub fn set_online(&mut self, online: bool) {
        self.online = online;
    }

    pub fn register_type(&mut self, name: &str, id: u32) {
        self.types.insert(name.to_string(), id);
    }

    /// Create a folder and all missing ancestors with the given type
    pub fn create_folders(&mut self, path: &str, type_name: &str) -> VfsResult<()> {
        let type_id = self.resource_type_id(type_name)?;
        let folder_id = self.resource_type_id(TYPE_FOLDER)?;
        let path = crate::utils::ensure_trailing_slash(path);

        let mut current = String::from("/");
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        for (i, segment) in segments.iter().enumerate() {
            current.push_str(segment);
            current.push('/');
            if !self.resources.contains_key(&current) {
                let id = if i + 1 == segments.len() { type_id } else { folder_id };
                self.resources.insert(
                    current.clone(),
                    StoredResource {
                        type_id: id,
                        content: Vec::new(),
                        properties: BTreeMap::new(),
                        locked: false,
                    },
                );
            }
        }
        Ok(())
    }

    /// All stored paths in order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    /// Paths of direct and indirect children of a folder
    #[must_use]
    pub fn children_of(&self, folder: &str) -> Vec<String> {
        self.resources
            .keys()
            .filter(|p| p.starts_with(folder) && p.as_str() != folder)
            .cloned()
            .collect()
    }

    /// Value of a single property
    #[must_use]
    pub fn property(&self, path: &str, name: &str) -> Option<&str> {
        self.resources
            .get(path)
            .and_then(|r| r.properties.get(name))
            .map(String::as_str)
    }

    fn check_writable(&self, path: &str) -> VfsResult<()> {
        if self.online {
            return Err(VfsError::OnlineProject(path.to_string()));
        }
        Ok(())
    }

    fn require(&self, path: &str) -> VfsResult<&StoredResource> {
        self.resources
            .get(path)
            .ok_or_else(|| VfsError::NotFound(path.to_string()))
    }
}

impl Repository for MemoryRepository {
    fn create_resource(
        &mut self,
        path: &str,
        type_id: u32,
        content: Vec<u8>,
        properties: Vec<Property>,
    ) -> VfsResult<ResourceInfo> {
        self.check_writable(path)?;

        let folder_id = self.resource_type_id(TYPE_FOLDER)?;
        let is_folder = path.ends_with('/');
        if is_folder && type_id != folder_id && !self.is_folder_type(type_id) {
            return Err(VfsError::Other(format!(
                "Type {type_id} is not a folder type for {path}"
            )));
        }

        if self.resources.contains_key(path) {
            return Err(VfsError::AlreadyExists(path.to_string()));
        }

        let parent = parent_dir(path);
        if parent.is_empty() || !self.resources.contains_key(parent) {
            return Err(VfsError::ParentMissing(path.to_string()));
        }

        let size = content.len();
        self.resources.insert(
            path.to_string(),
            StoredResource {
                type_id,
                content,
                properties: properties.into_iter().map(|p| (p.name, p.value)).collect(),
                locked: true,
            },
        );

        Ok(ResourceInfo {
            path: path.to_string(),
            type_id,
            is_folder,
            size,
        })
    }

    fn read_resource(&self, path: &str) -> VfsResult<ResourceInfo> {
        let resource = self.require(path)?;
        Ok(ResourceInfo {
            path: path.to_string(),
            type_id: resource.type_id,
            is_folder: path.ends_with('/'),
            size: resource.content.len(),
        })
    }

    fn read_file(&self, path: &str) -> VfsResult<Vec<u8>> {
        Ok(self.require(path)?.content.clone())
    }

    fn delete_resource(&mut self, path: &str, _siblings: SiblingMode) -> VfsResult<()> {
        self.check_writable(path)?;
        if path == "/" {
            return Err(VfsError::Other("Cannot delete the root folder".to_string()));
        }
        if !self.require(path)?.locked {
            return Err(VfsError::Locked(path.to_string()));
        }

        if path.ends_with('/') {
            let children = self.children_of(path);
            for child in children {
                self.resources.remove(&child);
            }
        }
        self.resources.remove(path);
        Ok(())
    }

    fn lock_resource(&mut self, path: &str) -> VfsResult<()> {
        self.check_writable(path)?;
        let resource = self
            .resources
            .get_mut(path)
            .ok_or_else(|| VfsError::NotFound(path.to_string()))?;
        resource.locked = true;
        Ok(())
    }

    fn has_exclusive_lock(&self, path: &str) -> bool {
        self.resources.get(path).is_some_and(|r| r.locked)
    }

    fn read_properties(&self, path: &str) -> VfsResult<Vec<Property>> {
        Ok(self
            .require(path)?
            .properties
            .iter()
            .map(|(k, v)| Property::new(k.clone(), v.clone()))
            .collect())
    }

    fn write_properties(&mut self, path: &str, properties: &[Property]) -> VfsResult<()> {
        self.check_writable(path)?;
        let resource = self
            .resources
            .get_mut(path)
            .ok_or_else(|| VfsError::NotFound(path.to_string()))?;
        for property in properties {
            resource
                .properties
                .insert(property.name.clone(), property.value.clone());
        }
        Ok(())
    }

    fn translate_file_name(&self, name: &str) -> String {
        self.translator.translate(name)
    }

    fn resource_type_id(&self, type_name: &str) -> VfsResult<u32> {
        self.types
            .get(type_name)
            .copied()
            .ok_or_else(|| VfsError::UnknownResourceType(type_name.to_string()))
    }

    fn is_online_project(&self) -> bool {
        self.online
    }

    fn templates(&self) -> Vec<String> {
        self.templates.keys().cloned().collect()
    }

    fn template_elements(&self, template: &str) -> VfsResult<Vec<String>> {
        self.templates
            .get(template)
            .cloned()
            .ok_or_else(|| VfsError::NotFound(template.to_string()))
    }

    fn context_prefix(&self) -> Option<&str> {
        self.context_prefix.as_deref()
    }
}

impl MemoryRepository {
    fn is_folder_type(&self, type_id: u32) -> bool {
        [TYPE_IMAGE_GALLERY, TYPE_DOWNLOAD_GALLERY, TYPE_LINK_GALLERY]
            .iter()
            .filter_map(|name| self.types.get(*name))
            .any(|id| *id == type_id)
    }
}

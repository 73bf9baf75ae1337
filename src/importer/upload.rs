//! Uploaded archive handed over by the caller.

use std::fs;
use std::path::{Path, PathBuf};

/// An uploaded file the import consumes
pub trait UploadedFile: Send {
    /// Original file name
    fn name(&self) -> &str;

    /// File content
    fn get(&self) -> std::io::Result<Vec<u8>>;

    /// Remove the upload once it is no longer needed
    fn delete(&mut self) -> std::io::Result<()>;
}

/// Upload stored as a file on the local file system
#[derive(Debug, Clone)]
pub struct FsUploadedFile {
    path: PathBuf,
    name: String,
}

impl FsUploadedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, name }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl UploadedFile for FsUploadedFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self) -> std::io::Result<Vec<u8>> {
        fs::read(&self.path)
    }

    fn delete(&mut self) -> std::io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

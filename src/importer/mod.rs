//! Import orchestration.
//!
//! An import runs through these phases:
//!
//! `Idle → Extracting? → Indexing → BuildingParentPaths → CopyingHtml →
//! CopyingOther → CreatingExternalLinks → CleaningUp? → Done`
//!
//! Extraction and clean-up only happen for archive sources. Every phase
//! isolates failures per file: a broken file is reported and the run goes
//! on with the next one.

pub mod archive;
mod copy;
mod external_links;
mod folders;
mod metadata;
mod thread;
mod upload;

pub use metadata::{ExternalLinkSet, ImageInfoMap, ImportMetadata};
pub use thread::ImportThread;
pub use upload::{FsUploadedFile, UploadedFile};

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use crate::config::{ImportConfig, validate_config};
use crate::converter::HtmlConverter;
use crate::error::{ImportError, ValidationError};
use crate::file_index::{FileIndex, ParentPathMap, build_file_index, build_parent_paths};
use crate::path_resolver::PathResolver;
use crate::report::{Report, ReportSeverity};
use crate::resource_types::ExtensionTypeMap;
use crate::utils::{ensure_trailing_slash, path_to_slash};
use crate::vfs::Repository;

/// Phase an import is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportPhase {
    Idle,
    Extracting,
    Indexing,
    BuildingParentPaths,
    CopyingHtml,
    CopyingOther,
    CreatingExternalLinks,
    CleaningUp,
    Done,
}

impl fmt::Display for ImportPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImportPhase::Idle => "idle",
            ImportPhase::Extracting => "extracting archive",
            ImportPhase::Indexing => "building file index",
            ImportPhase::BuildingParentPaths => "building parent paths",
            ImportPhase::CopyingHtml => "importing HTML files",
            ImportPhase::CopyingOther => "importing other files",
            ImportPhase::CreatingExternalLinks => "creating external links",
            ImportPhase::CleaningUp => "cleaning up",
            ImportPhase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Read-only state shared by the copy passes
pub(crate) struct ImportContext<'a> {
    pub config: &'a ImportConfig,
    pub types: &'a ExtensionTypeMap,
    pub index: &'a FileIndex,
    pub parents: &'a ParentPathMap,
    pub input_root: &'a Path,
    /// `input_root` with `/` separators and a trailing `/`
    pub input_root_slash: &'a str,
    pub report: &'a Report,
}

/// Source tree and index of a run, produced by [`HtmlImport::prepare`]
#[derive(Debug)]
pub struct PreparedImport {
    input_root: PathBuf,
    input_root_slash: String,
    index: FileIndex,
    parents: ParentPathMap,
    /// Keeps the extracted archive alive until clean-up
    extraction: Option<TempDir>,
}

impl PreparedImport {
    #[must_use]
    pub fn input_root(&self) -> &Path {
        &self.input_root
    }

    #[must_use]
    pub fn index(&self) -> &FileIndex {
        &self.index
    }

    #[must_use]
    pub fn parents(&self) -> &ParentPathMap {
        &self.parents
    }
}

/// One HTML import run against a repository
pub struct HtmlImport<R: Repository> {
    config: ImportConfig,
    repo: R,
    types: ExtensionTypeMap,
    report: Arc<Report>,
    phase: ImportPhase,
    upload: Option<Box<dyn UploadedFile>>,
}

impl<R: Repository> HtmlImport<R> {
    #[must_use]
    pub fn new(config: ImportConfig, repo: R) -> Self {
        Self {
            config,
            repo,
            types: ExtensionTypeMap::default(),
            report: Arc::new(Report::new()),
            phase: ImportPhase::Idle,
            upload: None,
        }
    }

    #[must_use]
    pub fn with_types(mut self, types: ExtensionTypeMap) -> Self {
        self.types = types;
        self
    }

    #[must_use]
    pub fn with_report(mut self, report: Arc<Report>) -> Self {
        self.report = report;
        self
    }

    /// Archive to import when the source is an archive.
    ///
    /// Without an explicit upload the archive file named by the source is used.
    #[must_use]
    pub fn with_upload(mut self, upload: Box<dyn UploadedFile>) -> Self {
        self.upload = Some(upload);
        self
    }

    #[must_use]
    pub fn report(&self) -> Arc<Report> {
        Arc::clone(&self.report)
    }

    #[must_use]
    pub fn phase(&self) -> ImportPhase {
        self.phase
    }

    #[must_use]
    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    #[must_use]
    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn repository_mut(&mut self) -> &mut R {
        &mut self.repo
    }

    #[must_use]
    pub fn into_repository(self) -> R {
        self.repo
    }

    /// Check the configuration against the repository.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_config(&self.config, &self.repo)
    }

    /// Run the whole import.
    ///
    /// Never fails: anything that stops the run is written to the report,
    /// and the import always ends in [`ImportPhase::Done`].
    pub fn start_import(&mut self) {
        let _span = tracing::info_span!(
            "html_import",
            destination = %self.config.destination_dir()
        )
        .entered();

        self.report.println(
            format!(
                "Importing {} into {}",
                self.config.source().path().display(),
                self.config.destination_dir()
            ),
            ReportSeverity::Headline,
        );

        if let Err(e) = self.run() {
            tracing::error!("HTML import aborted: {e}");
            self.report
                .println(format!("Import aborted: {e}"), ReportSeverity::Error);
        }

        self.phase = ImportPhase::Done;
        self.report.mark_finished();
        self.report.println(
            format!("Import finished after {}", self.report.formatted_runtime()),
            ReportSeverity::Headline,
        );
    }

    fn run(&mut self) -> Result<(), ImportError> {
        self.validate()?;
        let prepared = self.prepare()?;
        let metadata = self.extract_metadata(&prepared)?;
        self.apply_metadata(&prepared, &metadata);
        self.create_external_links(&metadata);
        self.cleanup(prepared);
        Ok(())
    }

    /// Extract the archive (if any), index the source tree and build the
    /// parent-path map.
    ///
    /// # Errors
    ///
    /// Fails if the archive cannot be read or the input root is not a valid
    /// path. Problems with single entries are only reported.
    pub fn prepare(&mut self) -> Result<PreparedImport, ImportError> {
        let extraction = if self.config.source().is_archive() {
            self.enter(ImportPhase::Extracting);
            let upload = self
                .upload
                .get_or_insert_with(|| {
                    Box::new(FsUploadedFile::new(self.config.source().path())) as Box<dyn UploadedFile>
                });
            Some(archive::extract_to_temp_dir(&**upload, &self.report)?)
        } else {
            None
        };

        let input_root = match &extraction {
            Some(dir) => dir.path().to_path_buf(),
            None => self.config.source().path().clone(),
        };
        let input_root_slash = ensure_trailing_slash(&path_to_slash(&input_root)?);

        self.enter(ImportPhase::Indexing);
        let resolver = PathResolver::new(&self.config, &self.types, &input_root);
        let index = build_file_index(&input_root, &resolver, &self.repo, &self.report);
        tracing::info!(entries = index.len(), "File index built");

        self.enter(ImportPhase::BuildingParentPaths);
        let parents = build_parent_paths(&input_root_slash, self.config.destination_dir());
        tracing::debug!(entries = parents.len(), "Parent paths built");

        Ok(PreparedImport {
            input_root,
            input_root_slash,
            index,
            parents,
            extraction,
        })
    }

    /// Create the folders and convert every HTML file.
    ///
    /// Returns the image alt texts and external links found on the way.
    ///
    /// # Errors
    ///
    /// Fails only if an extraction pattern does not compile.
    pub fn extract_metadata(&mut self, prepared: &PreparedImport) -> Result<ImportMetadata, ImportError> {
        self.enter(ImportPhase::CopyingHtml);
        let converter = HtmlConverter::new(&self.config)?;
        let ctx = ImportContext {
            config: &self.config,
            types: &self.types,
            index: &prepared.index,
            parents: &prepared.parents,
            input_root: &prepared.input_root,
            input_root_slash: &prepared.input_root_slash,
            report: &self.report,
        };

        let mut metadata = ImportMetadata::default();
        copy::copy_html_tree(&ctx, &converter, &mut self.repo, &mut metadata);
        tracing::info!(
            images = metadata.image_info.len(),
            external_links = metadata.external_links.len(),
            "HTML files imported"
        );
        Ok(metadata)
    }

    /// Copy every file that is not HTML, attaching collected image texts
    pub fn apply_metadata(&mut self, prepared: &PreparedImport, metadata: &ImportMetadata) {
        self.enter(ImportPhase::CopyingOther);
        let ctx = ImportContext {
            config: &self.config,
            types: &self.types,
            index: &prepared.index,
            parents: &prepared.parents,
            input_root: &prepared.input_root,
            input_root_slash: &prepared.input_root_slash,
            report: &self.report,
        };
        copy::copy_other_tree(&ctx, &mut self.repo, metadata);
    }

    /// Create one pointer per external link in the link gallery
    pub fn create_external_links(&mut self, metadata: &ImportMetadata) {
        let Some(gallery) = self.config.link_gallery().map(str::to_string) else {
            return;
        };
        self.enter(ImportPhase::CreatingExternalLinks);
        let created = external_links::create_external_links(
            &gallery,
            self.config.overwrite(),
            &mut self.repo,
            &metadata.external_links,
        );
        tracing::info!(created, "External links created");
    }

    /// Remove the extracted archive and the upload
    pub fn cleanup(&mut self, prepared: PreparedImport) {
        let Some(extraction) = prepared.extraction else {
            return;
        };
        self.enter(ImportPhase::CleaningUp);

        if let Err(e) = extraction.close() {
            log::warn!("Failed to remove extraction directory: {e}");
            self.report.println(
                format!("Failed to remove extraction directory: {e}"),
                ReportSeverity::Warning,
            );
        }
        if let Some(upload) = self.upload.as_mut()
            && let Err(e) = upload.delete()
        {
            log::warn!("Failed to delete uploaded archive {}: {e}", upload.name());
            self.report.println(
                format!("Failed to delete uploaded archive {}: {e}", upload.name()),
                ReportSeverity::Warning,
            );
        }
    }

    fn enter(&mut self, phase: ImportPhase) {
        tracing::debug!(%phase, "Entering import phase");
        self.phase = phase;
        let headline = match phase {
            ImportPhase::Extracting => "Extracting archive",
            ImportPhase::Indexing => "Building file index",
            ImportPhase::CopyingHtml => "Importing HTML files",
            ImportPhase::CopyingOther => "Importing other files",
            ImportPhase::CreatingExternalLinks => "Creating external links",
            ImportPhase::CleaningUp => "Cleaning up",
            ImportPhase::Idle | ImportPhase::BuildingParentPaths | ImportPhase::Done => return,
        };
        self.report.println(headline, ReportSeverity::Headline);
    }
}

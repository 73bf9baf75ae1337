//! Pre-flight validation of an `ImportConfig` against the repository
//!
//! Runs before anything is written. Every failure names the field that
//! has to be corrected.

use crate::error::{ConfigField, ValidationError};
use crate::utils::{TYPE_DOWNLOAD_GALLERY, TYPE_IMAGE_GALLERY, TYPE_LINK_GALLERY};
use crate::vfs::{Repository, has_type};

use super::types::{ImportConfig, ImportSource};

/// Validate all settings of `config`.
///
/// # Errors
///
/// Returns the first violated rule as a `ValidationError`.
pub fn validate_config(config: &ImportConfig, repo: &dyn Repository) -> Result<(), ValidationError> {
    validate_source(config.source())?;

    if repo.is_online_project() {
        return Err(ValidationError::new(
            ConfigField::Project,
            "imports cannot run in the online project",
        ));
    }

    if !repo.exists(config.destination_dir()) {
        return Err(ValidationError::new(
            ConfigField::DestinationDir,
            format!("folder '{}' does not exist", config.destination_dir()),
        ));
    }

    validate_gallery(repo, config.image_gallery(), TYPE_IMAGE_GALLERY, ConfigField::ImageGallery)?;
    validate_gallery(
        repo,
        config.download_gallery(),
        TYPE_DOWNLOAD_GALLERY,
        ConfigField::DownloadGallery,
    )?;
    validate_gallery(repo, config.link_gallery(), TYPE_LINK_GALLERY, ConfigField::LinkGallery)?;

    validate_template(config, repo)
}

fn validate_source(source: &ImportSource) -> Result<(), ValidationError> {
    match source {
        ImportSource::Directory(dir) => {
            if !dir.is_dir() {
                return Err(ValidationError::new(
                    ConfigField::InputDir,
                    format!("'{}' is not a directory", dir.display()),
                ));
            }
        }
        ImportSource::Archive(file) => {
            if !file.is_file() {
                return Err(ValidationError::new(
                    ConfigField::Archive,
                    format!("'{}' is not a file", file.display()),
                ));
            }
        }
    }
    Ok(())
}

fn validate_gallery(
    repo: &dyn Repository,
    gallery: Option<&str>,
    type_name: &str,
    field: ConfigField,
) -> Result<(), ValidationError> {
    let Some(gallery) = gallery else {
        return Ok(());
    };

    match has_type(repo, gallery, type_name) {
        Ok(true) => Ok(()),
        Ok(false) => Err(ValidationError::new(
            field,
            format!("folder '{gallery}' is not of type {type_name}"),
        )),
        Err(e) if e.is_not_found() => Err(ValidationError::new(
            field,
            format!("folder '{gallery}' does not exist"),
        )),
        Err(e) => Err(ValidationError::new(field, e.to_string())),
    }
}

/// Without a template the element must be declared by some template.
/// Otherwise the template must exist and declare the element.
fn validate_template(config: &ImportConfig, repo: &dyn Repository) -> Result<(), ValidationError> {
    let element = config.element();
    let template = config.template();

    if template.is_empty() {
        let known_anywhere = repo.templates().iter().any(|t| {
            repo.template_elements(t)
                .map(|elements| elements.iter().any(|e| e == element))
                .unwrap_or(false)
        });
        if known_anywhere {
            return Ok(());
        }
        return Err(ValidationError::new(
            ConfigField::Element,
            format!("element '{element}' is not declared by any template"),
        ));
    }

    let exists = repo.exists(template) || repo.templates().iter().any(|t| t == template);
    if !exists {
        return Err(ValidationError::new(
            ConfigField::Template,
            format!("template '{template}' does not exist"),
        ));
    }

    match repo.template_elements(template) {
        Ok(elements) if elements.iter().any(|e| e == element) => Ok(()),
        Ok(_) => Err(ValidationError::new(
            ConfigField::Element,
            format!("element '{element}' is not declared by template '{template}'"),
        )),
        Err(e) => Err(ValidationError::new(
            ConfigField::Template,
            format!("cannot read elements of template '{template}': {e}"),
        )),
    }
}

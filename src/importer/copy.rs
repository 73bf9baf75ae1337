//! The two copy passes over the source tree.
//!
//! The HTML pass creates folders and content pages and collects
//! [`ImportMetadata`]; the second pass copies all other files and attaches
//! what the first one collected.

use std::fs;
use std::path::Path;

use anyhow::{Context, anyhow, bail};

use super::ImportContext;
use super::folders::materialize_folder;
use super::metadata::ImportMetadata;
use crate::converter::{ConversionResult, HtmlConverter, decode_input};
use crate::file_index::sorted_entries;
use crate::link_translator::LinkTranslator;
use crate::report::{Report, ReportSeverity};
use crate::utils::{
    META_PROPERTIES, PROPERTY_DESCRIPTION, PROPERTY_TEMPLATE, PROPERTY_TITLE, TYPE_XMLPAGE,
    is_external, path_to_slash, strip_query_and_fragment,
};
use crate::vfs::{Existence, Property, Repository, SiblingMode, XmlPage, merge_properties};

/// Entry visited by [`walk_tree`]
enum Entry<'p> {
    /// A directory and its position among its sibling directories
    Folder(&'p Path, usize),
    File(&'p Path),
}

/// Visit every entry below `dir` in sorted order, folders before their contents
fn walk_tree(dir: &Path, report: &Report, visit: &mut dyn FnMut(Entry<'_>)) {
    let entries = match sorted_entries(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::error!("{e:#}");
            report.println(format!("{e:#}"), ReportSeverity::Error);
            return;
        }
    };

    let mut folders = 0;
    for path in entries {
        if path.is_dir() {
            visit(Entry::Folder(&path, folders));
            folders += 1;
            walk_tree(&path, report, visit);
        } else {
            visit(Entry::File(&path));
        }
    }
}

pub(crate) fn copy_html_tree(
    ctx: &ImportContext<'_>,
    converter: &HtmlConverter,
    repo: &mut dyn Repository,
    metadata: &mut ImportMetadata,
) {
    walk_tree(ctx.input_root, ctx.report, &mut |entry| match entry {
        Entry::Folder(path, position) => {
            if let Err(e) = materialize_folder(ctx, repo, path, position) {
                report_failure(ctx.report, path, &e);
            }
        }
        Entry::File(path) => {
            let name = file_name_of(path);
            if name == META_PROPERTIES || !ctx.types.is_plain(&name) {
                return;
            }
            import_file(ctx, path, |source, destination| {
                copy_html_file(ctx, converter, repo, path, source, destination, metadata)
            });
        }
    });
}

pub(crate) fn copy_other_tree(ctx: &ImportContext<'_>, repo: &mut dyn Repository, metadata: &ImportMetadata) {
    walk_tree(ctx.input_root, ctx.report, &mut |entry| {
        let Entry::File(path) = entry else {
            return;
        };
        let name = file_name_of(path);
        if name == META_PROPERTIES || ctx.types.is_plain(&name) {
            return;
        }
        import_file(ctx, path, |_, destination| {
            copy_other_file(ctx, repo, path, &name, destination, metadata)
        });
    });
}

/// Look up the destination of `path`, run `copy` and report the outcome
fn import_file(
    ctx: &ImportContext<'_>,
    path: &Path,
    copy: impl FnOnce(&str, &str) -> anyhow::Result<()>,
) {
    let source = match path_to_slash(path) {
        Ok(source) => source,
        Err(e) => {
            report_failure(ctx.report, path, &e);
            return;
        }
    };
    let Some(destination) = ctx.index.get(&source) else {
        report_failure(ctx.report, path, &anyhow!("{source} is not in the file index"));
        return;
    };

    if is_external(destination) {
        ctx.report
            .println(format!("Skipping external {destination}"), ReportSeverity::Note);
        return;
    }

    ctx.report.print(
        format!("Importing {source} to {destination} ... "),
        ReportSeverity::Note,
    );
    match copy(&source, destination) {
        Ok(()) => ctx.report.println("ok", ReportSeverity::Ok),
        Err(e) => {
            log::error!("Failed to import {source}: {e:#}");
            ctx.report
                .println(format!("failed: {e:#}"), ReportSeverity::Error);
        }
    }
}

fn copy_html_file(
    ctx: &ImportContext<'_>,
    converter: &HtmlConverter,
    repo: &mut dyn Repository,
    path: &Path,
    source: &str,
    destination: &str,
    metadata: &mut ImportMetadata,
) -> anyhow::Result<()> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {source}"))?;
    let text = decode_input(&bytes, ctx.config.input_encoding(), source);

    let ConversionResult { content, properties } = {
        let translator = LinkTranslator::new(
            ctx.config,
            ctx.index,
            ctx.parents,
            &*repo,
            ctx.input_root_slash,
        );
        converter.convert(&translator, &text, source, metadata)
    };

    let mut properties: Vec<Property> = properties
        .into_iter()
        .map(|(name, value)| Property::new(name, value))
        .collect();
    if !ctx.config.template().is_empty() {
        properties.push(Property::new(PROPERTY_TEMPLATE, ctx.config.template()));
    }

    let element = ctx.config.element();
    let mut page = XmlPage::new(ctx.config.locale(), ctx.config.input_encoding());
    page.add_element(element);
    page.set_string_value(element, &content);
    revalidate_links(ctx, &*repo, &mut page, element, destination);

    write_resource(
        repo,
        destination,
        TYPE_XMLPAGE,
        page.marshal(),
        properties,
        ctx.config.overwrite(),
    )
}

/// Run internal link targets through the repository's name translation
fn revalidate_links(
    ctx: &ImportContext<'_>,
    repo: &dyn Repository,
    page: &mut XmlPage,
    element: &str,
    destination: &str,
) {
    let links = page.links(element).to_vec();
    for (i, link) in links.iter().enumerate().filter(|(_, l)| l.internal) {
        let path = strip_query_and_fragment(&link.target);
        let suffix = &link.target[path.len()..];
        let translated = repo.translate_file_name(path);

        if !repo.exists(&translated) && !ctx.index.contains_destination(&translated) {
            log::debug!("Link target {translated} in {destination} does not exist");
        }
        if translated != path {
            page.set_link_target(element, i, &format!("{translated}{suffix}"));
        }
    }

    if !page.is_consistent() {
        log::warn!("Link table of {destination} out of sync, rebuilding");
        let html = page.string_value(element).unwrap_or_default().to_string();
        page.set_string_value(element, &html);
    }
}

fn copy_other_file(
    ctx: &ImportContext<'_>,
    repo: &mut dyn Repository,
    path: &Path,
    name: &str,
    destination: &str,
    metadata: &ImportMetadata,
) -> anyhow::Result<()> {
    let content = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let mut properties = Vec::new();
    if let Some(alt) = metadata.image_info.get(destination) {
        properties.push(Property::new(PROPERTY_TITLE, alt.as_str()));
        properties.push(Property::new(PROPERTY_DESCRIPTION, alt.as_str()));
    }

    write_resource(
        repo,
        destination,
        ctx.types.type_for(name),
        content,
        properties,
        ctx.config.overwrite(),
    )
}

/// Create a resource, replacing an existing one in overwrite mode.
///
/// Properties of a replaced resource are kept unless overwritten by
/// `properties`.
pub(crate) fn write_resource(
    repo: &mut dyn Repository,
    path: &str,
    type_name: &str,
    content: Vec<u8>,
    properties: Vec<Property>,
    overwrite: bool,
) -> anyhow::Result<()> {
    let type_id = repo.resource_type_id(type_name)?;

    match repo.probe(path) {
        Existence::Absent => {
            repo.create_resource(path, type_id, content, properties)?;
        }
        Existence::Exists(_) if overwrite => {
            let old = repo.read_properties(path).unwrap_or_default();
            if !repo.has_exclusive_lock(path) {
                repo.lock_resource(path)?;
            }
            repo.delete_resource(path, SiblingMode::Preserve)?;
            repo.create_resource(path, type_id, content, merge_properties(old, properties))?;
        }
        Existence::Exists(_) => bail!("{path} already exists"),
        Existence::Error(e) => return Err(e.into()),
    }
    Ok(())
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub(crate) fn report_failure(report: &Report, path: &Path, error: &anyhow::Error) {
    log::error!("Failed to import {}: {error:#}", path.display());
    report.println(
        format!("Failed to import {}: {error:#}", path.display()),
        ReportSeverity::Error,
    );
}

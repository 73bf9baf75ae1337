use super::metadata::ExternalLinkSet;
use crate::link_translator::external_link_file_name;
use crate::utils::{EXTERNAL_LINK_TITLE_PREFIX, PROPERTY_TITLE, TYPE_POINTER};
use crate::vfs::{Property, Repository};

use super::copy::write_resource;

/// Create a pointer resource for every collected URL below `gallery`.
///
/// Failures are only logged. Returns the number of pointers written.
pub(crate) fn create_external_links(
    gallery: &str,
    overwrite: bool,
    repo: &mut dyn Repository,
    links: &ExternalLinkSet,
) -> usize {
    let mut created = 0;
    for url in links.iter() {
        let path = format!("{gallery}{}", external_link_file_name(url, repo));
        if !overwrite && repo.exists(&path) {
            log::debug!("Pointer {path} for {url} already exists");
            continue;
        }

        let properties = vec![Property::new(
            PROPERTY_TITLE,
            format!("{EXTERNAL_LINK_TITLE_PREFIX}{url}"),
        )];
        match write_resource(repo, &path, TYPE_POINTER, url.as_bytes().to_vec(), properties, true) {
            Ok(()) => created += 1,
            Err(e) => log::debug!("Failed to create pointer {path} for {url}: {e:#}"),
        }
    }
    created
}

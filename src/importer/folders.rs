use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, anyhow};

use super::ImportContext;
use crate::utils::{
    META_PROPERTIES, PROPERTY_NAVPOS, PROPERTY_NAVTEXT, TYPE_FOLDER, ensure_trailing_slash,
    file_name, parse_properties, path_to_slash,
};
use crate::vfs::{Existence, Property, Repository};

/// Create the destination folder of `path`, or lock it if it already exists.
///
/// `NavText` defaults to the folder name and `NavPos` to the position among
/// sibling folders. Values from a `meta.properties` file in the source folder
/// take precedence over both.
pub(crate) fn materialize_folder(
    ctx: &ImportContext<'_>,
    repo: &mut dyn Repository,
    path: &Path,
    position: usize,
) -> anyhow::Result<()> {
    let source = ensure_trailing_slash(&path_to_slash(path)?);
    let destination = ctx
        .index
        .get(&source)
        .ok_or_else(|| anyhow!("{source} is not in the file index"))?;

    let mut defaults = BTreeMap::new();
    defaults.insert(PROPERTY_NAVTEXT.to_string(), file_name(&source).to_string());
    defaults.insert(PROPERTY_NAVPOS.to_string(), (position + 1).to_string());
    let overrides = read_meta_properties(path)?;

    match repo.probe(destination) {
        Existence::Absent => {
            defaults.extend(overrides);
            let type_id = repo.resource_type_id(TYPE_FOLDER)?;
            repo.create_resource(destination, type_id, Vec::new(), to_properties(defaults))?;
            log::debug!("Created folder {destination}");
        }
        Existence::Exists(_) => {
            if !repo.has_exclusive_lock(destination) {
                repo.lock_resource(destination)?;
            }
            let existing = repo.read_properties(destination)?;
            defaults.retain(|name, _| !existing.iter().any(|p| &p.name == name));
            defaults.extend(overrides);
            repo.write_properties(destination, &to_properties(defaults))?;
        }
        Existence::Error(e) => return Err(e.into()),
    }
    Ok(())
}

fn read_meta_properties(dir: &Path) -> anyhow::Result<BTreeMap<String, String>> {
    let file = dir.join(META_PROPERTIES);
    if !file.is_file() {
        return Ok(BTreeMap::new());
    }
    let text = fs::read_to_string(&file).with_context(|| format!("Failed to read {}", file.display()))?;
    Ok(parse_properties(&text))
}

fn to_properties(map: BTreeMap<String, String>) -> Vec<Property> {
    map.into_iter().map(|(name, value)| Property::new(name, value)).collect()
}

//! Unpacking of uploaded zip archives.

use std::fs::{self, File};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use anyhow::{Context, anyhow};
use tempfile::TempDir;
use zip::ZipArchive;

use super::upload::UploadedFile;
use crate::error::ImportError;
use crate::report::{Report, ReportSeverity};
use crate::utils::EXTRACTION_DIR_PREFIX;

/// Extract an uploaded archive into a fresh temporary directory.
///
/// The directory is removed when the returned `TempDir` is dropped.
pub fn extract_to_temp_dir(upload: &dyn UploadedFile, report: &Report) -> Result<TempDir, ImportError> {
    let payload = upload.get()?;
    let target = tempfile::Builder::new()
        .prefix(EXTRACTION_DIR_PREFIX)
        .tempdir()?;
    extract_archive(Cursor::new(payload), target.path(), report)?;
    Ok(target)
}

/// Unpack every entry of a zip payload below `target`, keeping its structure.
///
/// Entries that cannot be read or written are reported and skipped. Returns
/// the number of extracted files.
///
/// # Errors
///
/// Fails only if the payload is not a readable zip archive.
pub fn extract_archive<R: Read + Seek>(reader: R, target: &Path, report: &Report) -> Result<usize, ImportError> {
    let mut archive = ZipArchive::new(reader)?;
    let mut extracted = 0;

    for i in 0..archive.len() {
        match extract_entry(&mut archive, i, target) {
            Ok(true) => extracted += 1,
            Ok(false) => {}
            Err(e) => {
                log::error!("Failed to extract archive entry {i}: {e:#}");
                report.println(format!("Failed to extract archive entry {i}: {e:#}"), ReportSeverity::Error);
            }
        }
    }

    log::debug!("Extracted {extracted} files to {}", target.display());
    Ok(extracted)
}

/// Returns `true` if a file was written
fn extract_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, i: usize, target: &Path) -> anyhow::Result<bool> {
    let mut entry = archive.by_index(i).context("Failed to read entry")?;
    let relative = entry
        .enclosed_name()
        .ok_or_else(|| anyhow!("Entry '{}' points outside of the archive", entry.name()))?;
    let destination = target.join(relative);

    if entry.is_dir() {
        fs::create_dir_all(&destination)
            .with_context(|| format!("Failed to create {}", destination.display()))?;
        return Ok(false);
    }

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let mut out = File::create(&destination)
        .with_context(|| format!("Failed to create {}", destination.display()))?;
    std::io::copy(&mut entry, &mut out)
        .with_context(|| format!("Failed to write {}", destination.display()))?;
    Ok(true)
}

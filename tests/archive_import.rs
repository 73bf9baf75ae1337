//! Imports from an uploaded zip archive

mod common;

use std::io::Write;
use std::path::Path;

use common::*;
use vfs_html_import::{HtmlImport, ImportConfig, ImportPhase, Repository};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

fn write_archive(path: &Path, files: &[(&str, &str)]) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    for (name, content) in files {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

#[test]
fn archive_is_extracted_imported_and_removed() {
    let upload_dir = tempfile::tempdir().unwrap();
    let archive = upload_dir.path().join("site.zip");
    write_archive(
        &archive,
        &[
            ("index.html", "<p><a href=\"news/today.html\">Today</a></p>"),
            ("news/today.html", "<p>News</p>"),
            ("news/chart.bin", "0101"),
        ],
    );

    let config = ImportConfig::builder()
        .archive(&archive)
        .destination_dir(DESTINATION)
        .template(TEMPLATE)
        .build()
        .unwrap();
    let mut import = HtmlImport::new(config, repository());
    import.validate().unwrap();
    import.start_import();

    let report = import.report();
    assert!(!report.has_errors(), "{}", report.text());
    assert!(report.text().contains("== Extracting archive\n"));
    assert!(report.text().contains("== Cleaning up\n"));
    assert_eq!(import.phase(), ImportPhase::Done);
    assert!(!archive.exists());

    let repo = import.into_repository();
    assert!(repo.exists("/content/site/index.html"));
    assert!(repo.exists("/content/site/news/"));
    assert!(repo.exists("/content/site/news/today.html"));
    assert_eq!(repo.read_file("/content/site/news/chart.bin").unwrap(), b"0101");

    let xml = page_xml(&repo, "/content/site/index.html");
    assert!(xml.contains(r#"href="/content/site/news/today.html""#), "{xml}");
}

#[test]
fn unreadable_archive_aborts_but_finishes() {
    let upload_dir = tempfile::tempdir().unwrap();
    let archive = upload_dir.path().join("broken.zip");
    std::fs::write(&archive, b"this is not a zip file").unwrap();

    let config = ImportConfig::builder()
        .archive(&archive)
        .destination_dir(DESTINATION)
        .template(TEMPLATE)
        .build()
        .unwrap();
    let mut import = HtmlImport::new(config, repository());
    import.start_import();

    let text = import.report().text();
    assert!(text.contains("ERROR: Import aborted: "), "{text}");
    assert!(text.contains("== Import finished after "), "{text}");
    assert_eq!(import.phase(), ImportPhase::Done);
    assert!(import.repository().children_of(DESTINATION).is_empty());
}

//! Test utilities shared by the integration tests

use std::sync::Arc;

use assert_fs::TempDir;
use assert_fs::prelude::*;
use vfs_html_import::utils::{
    TYPE_DOWNLOAD_GALLERY, TYPE_FOLDER, TYPE_IMAGE_GALLERY, TYPE_LINK_GALLERY,
};
use vfs_html_import::{HtmlImport, ImportConfig, MemoryRepository, Report};

pub const DESTINATION: &str = "/content/site/";
pub const IMAGE_GALLERY: &str = "/content/images/";
pub const DOWNLOAD_GALLERY: &str = "/content/downloads/";
pub const LINK_GALLERY: &str = "/content/links/";
pub const TEMPLATE: &str = "/system/templates/main";

/// Route `log` and `tracing` output to the test writer (`RUST_LOG=debug`)
#[allow(dead_code)]
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Create a source tree from `(relative path, content)` pairs
#[allow(dead_code)]
pub fn source_tree(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for (path, content) in files {
        dir.child(path).write_str(content).unwrap();
    }
    dir
}

/// Repository with the destination folder, all galleries and one template
#[allow(dead_code)]
pub fn repository() -> MemoryRepository {
    let mut repo = MemoryRepository::new().with_template(TEMPLATE, &["body"]);
    repo.create_folders(DESTINATION, TYPE_FOLDER).unwrap();
    repo.create_folders(IMAGE_GALLERY, TYPE_IMAGE_GALLERY).unwrap();
    repo.create_folders(DOWNLOAD_GALLERY, TYPE_DOWNLOAD_GALLERY).unwrap();
    repo.create_folders(LINK_GALLERY, TYPE_LINK_GALLERY).unwrap();
    repo
}

/// Plain configuration importing `dir` into [`DESTINATION`]
#[allow(dead_code)]
pub fn config(dir: &TempDir) -> ImportConfig {
    ImportConfig::builder()
        .input_dir(dir.path())
        .destination_dir(DESTINATION)
        .template(TEMPLATE)
        .build()
        .unwrap()
}

/// Validate and run an import, returning the repository and the report
#[allow(dead_code)]
pub fn run_import(config: ImportConfig, repo: MemoryRepository) -> (MemoryRepository, Arc<Report>) {
    init_logging();
    let mut import = HtmlImport::new(config, repo);
    import.validate().unwrap();
    import.start_import();
    let report = import.report();
    (import.into_repository(), report)
}

/// Stored XML of a content page as text
#[allow(dead_code)]
pub fn page_xml(repo: &MemoryRepository, path: &str) -> String {
    use vfs_html_import::Repository;
    String::from_utf8(repo.read_file(path).unwrap()).unwrap()
}

//! Running an import on the background worker

mod common;

use common::*;
use vfs_html_import::{HtmlImport, ImportConfig, ImportPhase, ImportThread, Repository};

#[test]
fn progress_can_be_polled_while_running() {
    init_logging();
    let files: Vec<(String, String)> = (0..20)
        .map(|i| (format!("section/page{i:02}.html"), format!("<p>Page {i}</p>")))
        .collect();
    let borrowed: Vec<(&str, &str)> = files.iter().map(|(p, c)| (p.as_str(), c.as_str())).collect();
    let dir = source_tree(&borrowed);

    let import = HtmlImport::new(config(&dir), repository());
    let worker = ImportThread::start(import).unwrap();

    let mut progress = String::new();
    while !worker.is_finished() {
        progress.push_str(&worker.poll_update());
        std::thread::yield_now();
    }
    let import = worker.join().unwrap();
    progress.push_str(&import.report().poll_update());

    assert!(progress.contains("== Importing HTML files\n"), "{progress}");
    assert!(progress.ends_with('\n'));
    assert!(progress.lines().last().unwrap().starts_with("== Import finished after "));
    assert_eq!(progress, import.report().text());
    assert_eq!(import.phase(), ImportPhase::Done);

    let repo = import.into_repository();
    assert_eq!(repo.children_of("/content/site/section/").len(), 20);
    assert!(repo.exists("/content/site/section/page19.html"));
}

#[test]
fn invalid_configuration_is_reported_by_the_worker() {
    let dir = source_tree(&[("a.html", "<p>a</p>")]);
    let config = ImportConfig::builder()
        .input_dir(dir.path())
        .destination_dir("/content/missing/")
        .template(TEMPLATE)
        .build()
        .unwrap();

    let worker = ImportThread::start(HtmlImport::new(config, repository())).unwrap();
    let import = worker.join().unwrap();

    let text = import.report().text();
    assert!(text.contains("ERROR: Import aborted: "), "{text}");
    assert!(!import.repository().exists("/content/missing/a.html"));
}

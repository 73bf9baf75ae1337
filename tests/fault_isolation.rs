//! A broken source entry never stops the rest of the import

mod common;

use common::*;
use vfs_html_import::Repository;

#[cfg(target_os = "linux")]
#[test]
fn undecodable_file_name_is_reported_and_skipped() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = source_tree(&[("a.html", "<p>a</p>"), ("z.html", "<p>z</p>")]);
    let bad = OsStr::from_bytes(b"caf\xe9.html");
    std::fs::write(dir.path().join(bad), "<p>bad</p>").unwrap();

    let (repo, report) = run_import(config(&dir), repository());

    assert!(report.has_errors());
    assert!(report.text().contains("Invalid path encoding"), "{}", report.text());
    assert!(repo.exists("/content/site/a.html"));
    assert!(repo.exists("/content/site/z.html"));
    assert_eq!(repo.children_of(DESTINATION).len(), 2);
}

#[test]
fn existing_target_without_overwrite_is_renamed_not_failed() {
    let dir = source_tree(&[("img/logo.png", "new"), ("index.html", "<img src=\"img/logo.png\">")]);
    let mut repo = repository();
    repo.create_folders("/content/site/img/", vfs_html_import::utils::TYPE_FOLDER)
        .unwrap();
    repo.create_resource("/content/site/img/logo.png", 3, b"old".to_vec(), Vec::new())
        .unwrap();

    let (repo, report) = run_import(config(&dir), repo);

    assert!(!report.has_errors(), "{}", report.text());
    assert_eq!(repo.read_file("/content/site/img/logo.png").unwrap(), b"old");
    assert_eq!(repo.read_file("/content/site/img/logo_1.png").unwrap(), b"new");
    let xml = page_xml(&repo, "/content/site/index.html");
    assert!(xml.contains(r#"src="/content/site/img/logo_1.png""#), "{xml}");
}

#[test]
fn deeply_nested_page_does_not_stop_the_run() {
    let deep = format!("{}deep", "<div>".repeat(10_000));
    let dir = source_tree(&[("a.html", deep.as_str()), ("b.html", "<p>b</p>")]);

    let (repo, report) = run_import(config(&dir), repository());

    assert!(!report.has_errors(), "{}", report.text());
    assert!(report.text().contains("== Import finished after "));
    assert!(page_xml(&repo, "/content/site/a.html").contains("deep</div>"));
    assert!(repo.exists("/content/site/b.html"));
}

//! End-to-end builds of small content trees.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use quire::site::{self, BuildError};

// =========================================================================
// Helpers
// =========================================================================

struct Workspace {
    _tmp: TempDir,
    content: PathBuf,
    site: PathBuf,
}

impl Workspace {
    fn new(files: &[(&str, &str)]) -> Self {
        let tmp = TempDir::new().unwrap();
        let content = tmp.path().join("content");
        let site = tmp.path().join("site");
        for (relative, contents) in files {
            let path = content.join(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }
        fs::create_dir_all(&content).unwrap();
        Self {
            _tmp: tmp,
            content,
            site,
        }
    }

    fn build(&self) -> site::BuildReport {
        site::build(&self.content, &self.site).unwrap()
    }

    fn read(&self, relative: &str) -> String {
        let path = self.site.join(relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("could not read {}: {e}", path.display()))
    }
}

/// Relative path and bytes of every file under `root`, sorted.
fn snapshot(root: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    let mut files: Vec<(PathBuf, Vec<u8>)> = walkdir::WalkDir::new(root)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let relative = e.path().strip_prefix(root).unwrap().to_path_buf();
            (relative, fs::read(e.path()).unwrap())
        })
        .collect();
    files.sort();
    files
}

fn main_section(html: &str) -> &str {
    let start = html.find("<main>").unwrap();
    let end = html.find("</main>").unwrap();
    &html[start..end]
}

const ALPHA: &str = "---\ntitle: \"Alpha\"\ndate: 2024-01-05\ntags: [x, y]\n---\nFirst letter.\n";

// =========================================================================
// Page decoration
// =========================================================================

#[test]
fn alpha_round_trip() {
    let ws = Workspace::new(&[("index.md", "Home"), ("alpha.md", ALPHA)]);
    ws.build();

    let page = ws.read("alpha.html");
    assert!(page.contains("<title>Alpha</title>"));
    assert!(main_section(&page).starts_with(
        "<main><h1>Alpha</h1><span class=\"date\"><p>2024-01-05</p></span>"
    ));

    let tags = ws.read("tags.html");
    for tag in ["x", "y"] {
        let start = tags.find(&format!("<li class=\"tag\" id=\"{tag}\">")).unwrap();
        let section = &tags[start..];
        let section = &section[..section.find("</li></ul></li>").unwrap()];
        assert_eq!(section.matches("href=\"/alpha.html\"").count(), 1);
    }
}

#[test]
fn undecorated_page_has_no_badge_heading_or_tags() {
    let ws = Workspace::new(&[("index.md", "Home"), ("plain.md", "Just words.\n")]);
    ws.build();

    let page = ws.read("plain.html");
    assert_eq!(main_section(&page), "<main><p>Just words.</p>\n");
    let tags = ws.read("tags.html");
    assert!(tags.contains("<a href=\"/plain.html\">plain</a>"));
    assert!(!main_section(&tags).contains("plain"));
}

// =========================================================================
// Folders
// =========================================================================

#[test]
fn folder_lists_newest_first() {
    let ws = Workspace::new(&[
        ("index.md", "Home"),
        ("notes/a.md", "---\ndate: 2024-02-01\n---\nA\n"),
        ("notes/b.md", "---\ndate: 2024-03-01\n---\nB\n"),
    ]);
    ws.build();

    let listing = ws.read("notes/index.html");
    let b = listing.find("<a href=\"/notes/b.html\">b</a>").unwrap();
    let a = listing.find("<a href=\"/notes/a.html\">a</a>").unwrap();
    assert!(b < a);
    assert!(listing.contains("<h1>notes/</h1>"));
    assert!(listing.contains("<title>notes</title>"));
}

#[test]
fn folder_index_document_becomes_intro() {
    let ws = Workspace::new(&[
        ("index.md", "Home"),
        ("notes/index.md", "Field notes from the road.\n"),
        ("notes/a.md", "A\n"),
    ]);
    ws.build();

    let listing = ws.read("notes/index.html");
    assert!(listing.contains(
        "<h1>notes/</h1><p>Field notes from the road.</p>\n<ul class=\"page-list\">"
    ));
}

// =========================================================================
// Tag page
// =========================================================================

#[test]
fn tag_page_ordering() {
    let ws = Workspace::new(&[
        ("index.md", "Home"),
        ("old.md", "---\ndate: 2022-01-01\ntags: [archive, rust]\n---\n"),
        ("new.md", "---\ndate: 2024-06-01\ntags: [rust]\n---\n"),
        ("trips/lisbon.md", "---\ndate: 2023-05-01\ntags: [travel]\n---\n"),
    ]);
    ws.build();

    let tags = ws.read("tags.html");
    let rust = tags.find("id=\"rust\"").unwrap();
    let travel = tags.find("id=\"travel\"").unwrap();
    let archive = tags.find("id=\"archive\"").unwrap();
    assert!(rust < travel && travel < archive);

    let rust_section = &tags[rust..travel];
    assert!(rust_section.find("/new.html").unwrap() < rust_section.find("/old.html").unwrap());
    assert!(tags.contains("<a href=\"/trips/lisbon.html\">trips/lisbon</a>"));
}

// =========================================================================
// Destination handling
// =========================================================================

#[test]
fn rebuild_over_existing_destination_matches_fresh_build() {
    let files = [
        ("index.md", "Home"),
        ("alpha.md", ALPHA),
        ("notes/a.md", "---\ndate: 2024-02-01\ntags: [x]\n---\nA\n"),
        ("imgs/dot.png", "png"),
    ];

    let fresh = Workspace::new(&files);
    fresh.build();

    let reused = Workspace::new(&files);
    fs::create_dir_all(reused.site.join("stale/deep")).unwrap();
    fs::write(reused.site.join("stale/deep/old.html"), "old").unwrap();
    fs::write(reused.site.join("index.html"), "outdated").unwrap();
    reused.build();

    assert!(!reused.site.join("stale").exists());
    assert_eq!(snapshot(&fresh.site), snapshot(&reused.site));
}

#[test]
fn destination_inside_source_is_refused() {
    let ws = Workspace::new(&[("index.md", "Home"), ("notes/a.md", "A\n")]);
    let nested = ws.content.join("site");

    let err = site::build(&ws.content, &nested).unwrap_err();
    assert!(matches!(err, BuildError::DestinationOverlapsSource(_)));
    assert!(!nested.exists());

    ws.build();
    assert!(!ws.read("index.html").contains("href=\"/site\""));
}

#[test]
fn missing_index_is_fatal_before_touching_destination() {
    let ws = Workspace::new(&[("about.md", "no landing page")]);
    fs::create_dir_all(&ws.site).unwrap();
    fs::write(ws.site.join("keep.html"), "keep").unwrap();

    let err = site::build(&ws.content, &ws.site).unwrap_err();
    assert!(matches!(err, BuildError::Scan(_)));
    assert!(err.to_string().contains("index.md"));
    assert!(ws.site.join("keep.html").exists());
}

// =========================================================================
// Assets and config
// =========================================================================

#[test]
fn assets_and_defaults_copied() {
    let ws = Workspace::new(&[
        ("index.md", "![](/imgs/a.jpg \"Dunes, pano\")\n"),
        ("imgs/a.jpg", "jpg"),
        ("static/extra.css", "body {}"),
    ]);
    let report = ws.build();

    assert_eq!(ws.read("imgs/a.jpg"), "jpg");
    assert_eq!(ws.read("static/extra.css"), "body {}");
    assert!(ws.site.join("static/quire-style.css").is_file());
    assert!(ws.site.join("static/quire-favicon-96.png").is_file());
    assert_eq!(report.assets, 6);

    let index = ws.read("index.html");
    assert!(index.contains(
        "<img class=\"pano\" src=\"/imgs/a.jpg\" alt=\"Dunes\"><span class=\"image-title\">Dunes</span>"
    ));
}

#[test]
fn config_drives_shell() {
    let ws = Workspace::new(&[
        ("index.md", "Home"),
        (
            "config.json",
            r#"{
                "lang": "fr",
                "title": "Carnet",
                "footer": "<p>fin</p>",
                "nav": ["[Accueil](/)", "[Journal](/notes)"],
                "disable_default_style": true
            }"#,
        ),
        ("notes/a.md", "A"),
    ]);
    ws.build();

    let index = ws.read("index.html");
    assert!(index.contains("<html lang=\"fr\">"));
    assert!(index.contains("<title>Carnet</title>"));
    assert!(index.contains("<nav><a href=\"/\">Accueil</a><a href=\"/notes\">Journal</a></nav>"));
    assert!(index.contains("<footer><p>fin</p></footer>"));
    assert!(!index.contains("quire-style.css"));
    assert!(!ws.site.join("static/quire-style.css").exists());
    assert!(ws.read("notes/index.html").contains("<title>Journal</title>"));
}

#[test]
fn invalid_config_is_fatal() {
    let ws = Workspace::new(&[("index.md", "Home"), ("config.json", r#"{ "nav": ["plain"] }"#)]);
    let err = site::build(&ws.content, &ws.site).unwrap_err();
    assert!(matches!(err, BuildError::Config(_)));
    assert!(!ws.site.exists());
}

// =========================================================================
// 404 and check
// =========================================================================

#[test]
fn not_found_page_variants() {
    let bare = Workspace::new(&[("index.md", "Home")]);
    bare.build();
    assert!(bare.read("404.html").contains("<main><h1>404</h1></main>"));

    let custom = Workspace::new(&[("index.md", "Home"), ("404.md", "Try the [index](/).\n")]);
    custom.build();
    let page = custom.read("404.html");
    assert!(page.contains("<title>404</title>"));
    assert!(page.contains("<main><h1>404</h1><p>Try the <a href=\"/\">index</a>.</p>"));
    assert!(!custom.site.join("404.md").exists());
}

#[test]
fn check_writes_nothing() {
    let ws = Workspace::new(&[("index.md", "Home"), ("alpha.md", ALPHA)]);
    let report = site::check(&ws.content).unwrap();
    assert_eq!(report.documents, 2);
    assert_eq!(report.tags, 2);
    assert!(!ws.site.exists());
}

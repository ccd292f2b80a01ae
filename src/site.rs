//! Build driver.
//!
//! Sequences one full build:
//!
//! ```text
//! config.json ─┐
//! scan ────────┼→ shell ─→ reset destination ─→ assets ─→ BuildSession
//! outer docs ──┘                                           ├─ index.html
//!                                                          ├─ 404.html
//!                                                          ├─ <page>.html ...
//!                                                          ├─ <folder>/<page>.html ...
//!                                                          ├─ <folder>/index.html
//!                                                          └─ tags.html  (finish)
//! ```
//!
//! Everything that can fail without touching the destination (config, scan,
//! outer page front-matter) is done before the destination is removed.
//! After that the build is not atomic: an error leaves a partial site.

use maud::Markup;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::assets::{self, AssetError};
use crate::config::{self, ConfigError, SiteConfig};
use crate::document::{Document, DocumentError};
use crate::generate;
use crate::naming::{self, Location};
use crate::scan::{self, Folder, ScanError, SiteTree};
use crate::shell::{NavSource, Shell};
use crate::tags::TagIndex;
use crate::types::PageRecord;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to remove existing destination {path}: {source}")]
    RemoveDestination {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("refusing to build into {0}: it overlaps the source directory")]
    DestinationOverlapsSource(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Index,
    NotFound,
    Page,
    FolderIndex,
    InnerPage,
    Tags,
}

/// A page written by the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenPage {
    pub kind: PageKind,
    pub title: String,
    /// Relative to the destination root.
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub destination: PathBuf,
    pub pages: Vec<WrittenPage>,
    pub assets: usize,
    pub tags: usize,
}

impl BuildReport {
    pub fn count(&self, kind: PageKind) -> usize {
        self.pages.iter().filter(|p| p.kind == kind).count()
    }
}

/// Result of validating a source tree without writing anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub documents: usize,
    pub pages: usize,
    pub folders: usize,
    pub tags: usize,
}

/// Build the site in `source` into `destination`, replacing its contents.
pub fn build(source: &Path, destination: &Path) -> Result<BuildReport, BuildError> {
    let config = config::load_config(source)?;
    let tree = scan::scan(source)?;
    let outer = load_all(&tree.pages)?;
    let shell = Shell::new(&config, &nav_source(&tree, &outer));

    reset_destination(source, destination)?;
    let asset_count = assets::copy_assets(source, destination, &config)?;

    let mut session = BuildSession::new(shell, &config, destination);
    session.report.assets = asset_count;
    session.index_page(&tree)?;
    session.not_found_page(&tree)?;
    for doc in &outer {
        session.outer_page(doc)?;
    }
    for folder in &tree.folders {
        session.folder(folder)?;
    }
    session.finish()
}

/// Validate config, layout and every document's front-matter.
pub fn check(source: &Path) -> Result<CheckReport, BuildError> {
    let config = config::load_config(source)?;
    let tree = scan::scan(source)?;
    let mut tags = TagIndex::new();
    let mut documents = 0;
    for path in tree.markdown_files() {
        let doc = Document::load(path)?;
        documents += 1;
        if tree.is_page(path) {
            let record = PageRecord::build(&doc.front_matter, Location::Root, &doc.stem(), false);
            tags.record(&record.tags, &record);
        }
    }
    tracing::debug!(title = %config.title, documents, "source tree is valid");
    Ok(CheckReport {
        documents,
        pages: tree.page_count(),
        folders: tree.folders.len(),
        tags: tags.finalize().len(),
    })
}

fn load_all(paths: &[PathBuf]) -> Result<Vec<Document>, DocumentError> {
    paths.iter().map(|p| Document::load(p)).collect()
}

fn nav_source(tree: &SiteTree, outer: &[Document]) -> NavSource {
    NavSource {
        folders: tree.folders.iter().map(|f| f.name.clone()).collect(),
        pages: outer
            .iter()
            .map(|doc| (doc.stem(), doc.front_matter.title.clone()))
            .collect(),
    }
}

/// Remove `destination` if present and recreate it empty.
fn reset_destination(source: &Path, destination: &Path) -> Result<(), BuildError> {
    if overlaps(source, destination) {
        return Err(BuildError::DestinationOverlapsSource(
            destination.to_path_buf(),
        ));
    }
    if destination.exists() {
        tracing::warn!(path = %destination.display(), "removing existing destination");
        let removed = if destination.is_dir() {
            fs::remove_dir_all(destination)
        } else {
            fs::remove_file(destination)
        };
        removed.map_err(|source| BuildError::RemoveDestination {
            path: destination.to_path_buf(),
            source,
        })?;
    }
    fs::create_dir_all(destination).map_err(|source| BuildError::Write {
        path: destination.to_path_buf(),
        source,
    })
}

/// Whether one of the two trees contains the other. Removing the destination
/// would then remove the source, or the next scan would read the output.
fn overlaps(source: &Path, destination: &Path) -> bool {
    match (resolve(source), resolve(destination)) {
        (Some(source), Some(destination)) => {
            source.starts_with(&destination) || destination.starts_with(&source)
        }
        _ => false,
    }
}

/// Canonical form of `path`, which need not exist yet. The nearest existing
/// ancestor is canonicalized and the missing components appended.
fn resolve(path: &Path) -> Option<PathBuf> {
    let absolute = std::path::absolute(path).ok()?;
    let mut missing = Vec::new();
    let mut existing = absolute.as_path();
    loop {
        if let Ok(canonical) = fs::canonicalize(existing) {
            return Some(missing.iter().rev().fold(canonical, |acc, part| acc.join(part)));
        }
        missing.push(existing.file_name()?);
        existing = existing.parent()?;
    }
}

/// State owned for the duration of one build: the shared shell, the tag
/// index and the report. [`BuildSession::finish`] consumes it, so the tag
/// index is read exactly once.
struct BuildSession<'a> {
    shell: Shell,
    config: &'a SiteConfig,
    destination: &'a Path,
    tags: TagIndex,
    report: BuildReport,
}

impl<'a> BuildSession<'a> {
    fn new(shell: Shell, config: &'a SiteConfig, destination: &'a Path) -> Self {
        Self {
            shell,
            config,
            destination,
            tags: TagIndex::new(),
            report: BuildReport {
                destination: destination.to_path_buf(),
                pages: Vec::new(),
                assets: 0,
                tags: 0,
            },
        }
    }

    fn write(
        &mut self,
        kind: PageKind,
        title: &str,
        relative: PathBuf,
        page: Markup,
    ) -> Result<(), BuildError> {
        let path = self.destination.join(&relative);
        let write_err = |source| BuildError::Write {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(&path, page.into_string()).map_err(write_err)?;
        tracing::debug!(file = %path.display(), "wrote page");
        self.report.pages.push(WrittenPage {
            kind,
            title: title.to_string(),
            path: relative,
        });
        Ok(())
    }

    fn index_page(&mut self, tree: &SiteTree) -> Result<(), BuildError> {
        let doc = Document::load(&tree.index)?;
        let page = generate::index_page(&self.shell, &doc);
        let title = self.shell.site_title().to_string();
        self.write(PageKind::Index, &title, naming::INDEX_HTML.into(), page)
    }

    fn not_found_page(&mut self, tree: &SiteTree) -> Result<(), BuildError> {
        let doc = tree.not_found.as_deref().map(Document::load).transpose()?;
        let page = generate::not_found_page(&self.shell, doc.as_ref());
        self.write(
            PageKind::NotFound,
            generate::NOT_FOUND_TITLE,
            naming::NOT_FOUND_HTML.into(),
            page,
        )
    }

    fn outer_page(&mut self, doc: &Document) -> Result<(), BuildError> {
        let stem = doc.stem();
        let record = PageRecord::build(&doc.front_matter, Location::Root, &stem, false);
        let page = generate::content_page(&self.shell, doc);
        self.write(
            PageKind::Page,
            &record.title,
            naming::output_path(Location::Root, &stem),
            page,
        )?;
        self.tags.record(&record.tags, &record);
        Ok(())
    }

    /// Inner pages first, then the folder index listing them.
    fn folder(&mut self, folder: &Folder) -> Result<(), BuildError> {
        let location = Location::Folder(&folder.name);
        let mut listed = Vec::with_capacity(folder.pages.len());

        for path in &folder.pages {
            let doc = Document::load(path)?;
            let stem = doc.stem();
            let record = PageRecord::build(&doc.front_matter, location, &stem, false);
            let page = generate::content_page(&self.shell, &doc);
            self.write(
                PageKind::InnerPage,
                &record.title,
                naming::output_path(location, &stem),
                page,
            )?;
            let tagged = PageRecord::build(&doc.front_matter, location, &stem, true);
            self.tags.record(&tagged.tags, &tagged);
            listed.push(record);
        }

        let index = folder.index.as_deref().map(Document::load).transpose()?;
        let title = self
            .config
            .folder_title(&folder.name)
            .unwrap_or_else(|| folder.name.clone());
        let page =
            generate::folder_index_page(&self.shell, &folder.name, &title, index.as_ref(), &listed);
        self.write(
            PageKind::FolderIndex,
            &title,
            naming::output_path(location, "index"),
            page,
        )
    }

    /// Write the tag page and hand back the report.
    fn finish(mut self) -> Result<BuildReport, BuildError> {
        let tags = std::mem::take(&mut self.tags).finalize();
        let page = generate::tags_page(&self.shell, &tags);
        self.write(
            PageKind::Tags,
            generate::TAGS_TITLE,
            naming::TAGS_HTML.into(),
            page,
        )?;
        self.report.tags = tags.len();
        Ok(self.report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{content_tree, front_matter_page, read_output};
    use tempfile::TempDir;

    fn build_into(content: &TempDir) -> (TempDir, BuildReport) {
        let out = TempDir::new().unwrap();
        let dst = out.path().join("site");
        let report = build(content.path(), &dst).unwrap();
        (out, report)
    }

    #[test]
    fn writes_every_page_kind() {
        let content = content_tree(&[
            ("index.md", "Home"),
            ("about.md", front_matter_page("About", None, &[], "Me.").as_str()),
            ("notes/a.md", front_matter_page("A", Some("2024-02-01"), &["x"], "a").as_str()),
        ]);
        let (out, report) = build_into(&content);
        let site = out.path().join("site");

        for file in ["index.html", "404.html", "about.html", "notes/a.html", "notes/index.html", "tags.html"] {
            assert!(site.join(file).is_file(), "missing {file}");
        }
        assert_eq!(report.count(PageKind::Page), 1);
        assert_eq!(report.count(PageKind::InnerPage), 1);
        assert_eq!(report.count(PageKind::FolderIndex), 1);
        assert_eq!(report.tags, 1);
        assert_eq!(report.assets, 4);
    }

    #[test]
    fn report_lists_pages_in_build_order() {
        let content = content_tree(&[
            ("index.md", "Home"),
            ("b.md", "b"),
            ("notes/a.md", "a"),
        ]);
        let (_out, report) = build_into(&content);
        let kinds: Vec<PageKind> = report.pages.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                PageKind::Index,
                PageKind::NotFound,
                PageKind::Page,
                PageKind::InnerPage,
                PageKind::FolderIndex,
                PageKind::Tags,
            ]
        );
        assert_eq!(report.pages[3].path, PathBuf::from("notes").join("a.html"));
        assert_eq!(report.pages[3].title, "a");
    }

    #[test]
    fn missing_index_leaves_destination_untouched() {
        let content = content_tree(&[("about.md", "x")]);
        let out = TempDir::new().unwrap();
        let dst = out.path().join("site");
        fs::create_dir(&dst).unwrap();
        fs::write(dst.join("keep.txt"), "old").unwrap();

        let result = build(content.path(), &dst);
        assert!(matches!(result, Err(BuildError::Scan(ScanError::MissingIndex(_)))));
        assert!(dst.join("keep.txt").exists());
    }

    #[test]
    fn malformed_front_matter_is_fatal() {
        let content = content_tree(&[
            ("index.md", "Home"),
            ("bad.md", "---\ntitle: [unclosed\n---\nx\n"),
        ]);
        let out = TempDir::new().unwrap();
        let result = build(content.path(), &out.path().join("site"));
        assert!(matches!(
            result,
            Err(BuildError::Document(DocumentError::FrontMatter { .. }))
        ));
    }

    #[test]
    fn refuses_destination_containing_source() {
        let out = TempDir::new().unwrap();
        let content = out.path().join("content");
        fs::create_dir(&content).unwrap();
        fs::write(content.join("index.md"), "Home").unwrap();

        let result = build(&content, out.path());
        assert!(matches!(result, Err(BuildError::DestinationOverlapsSource(_))));
        assert!(content.join("index.md").exists());

        let result = build(&content, &content);
        assert!(matches!(result, Err(BuildError::DestinationOverlapsSource(_))));
    }

    #[test]
    fn refuses_destination_inside_source() {
        let content = content_tree(&[("index.md", "Home")]);
        let nested = content.path().join("site");

        let result = build(content.path(), &nested);
        assert!(matches!(result, Err(BuildError::DestinationOverlapsSource(_))));
        assert!(!nested.exists());

        let deeper = content.path().join("out").join("site");
        let result = build(content.path(), &deeper);
        assert!(matches!(result, Err(BuildError::DestinationOverlapsSource(_))));
    }

    #[test]
    fn sibling_destination_with_shared_prefix_is_allowed() {
        let out = TempDir::new().unwrap();
        let content = out.path().join("content");
        fs::create_dir(&content).unwrap();
        fs::write(content.join("index.md"), "Home").unwrap();

        build(&content, &out.path().join("content-site")).unwrap();
        assert!(out.path().join("content-site/index.html").is_file());
    }

    #[test]
    fn folder_title_from_custom_nav() {
        let content = content_tree(&[
            ("index.md", "Home"),
            ("config.json", r#"{ "nav": ["[Home](/)", "[Journal](/notes)"] }"#),
            ("notes/a.md", "a"),
        ]);
        let (out, _) = build_into(&content);
        let html = read_output(&out.path().join("site"), "notes/index.html");
        assert!(html.contains("<title>Journal</title>"));
        assert!(html.contains("<h1>notes/</h1>"));
    }

    #[test]
    fn inner_pages_use_qualified_titles_in_tag_index() {
        let content = content_tree(&[
            ("index.md", "Home"),
            ("notes/untitled.md", front_matter_page("", Some("2024-01-01"), &["x"], "u").as_str()),
        ]);
        let (out, _) = build_into(&content);
        let site = out.path().join("site");

        let tags = read_output(&site, "tags.html");
        assert!(tags.contains(r#"<a href="/notes/untitled.html">notes/untitled</a>"#));
        let listing = read_output(&site, "notes/index.html");
        assert!(listing.contains(r#"<a href="/notes/untitled.html">untitled</a>"#));
    }

    #[test]
    fn default_nav_uses_outer_page_titles() {
        let content = content_tree(&[
            ("index.md", "Home"),
            ("about.md", front_matter_page("About Me", None, &[], "x").as_str()),
            ("notes/a.md", "a"),
        ]);
        let (out, _) = build_into(&content);
        let html = read_output(&out.path().join("site"), "index.html");
        assert!(html.contains(r#"<a href="/notes">notes</a><a href="/about.html">About Me</a>"#));
    }

    #[test]
    fn check_counts_without_writing() {
        let content = content_tree(&[
            ("index.md", "Home"),
            ("about.md", front_matter_page("About", None, &["x"], "a").as_str()),
            ("notes/index.md", "intro"),
            ("notes/a.md", front_matter_page("A", None, &["x", "y"], "a").as_str()),
        ]);
        let report = check(content.path()).unwrap();
        assert_eq!(
            report,
            CheckReport {
                documents: 4,
                pages: 2,
                folders: 1,
                tags: 2,
            }
        );
    }

    #[test]
    fn check_reports_bad_front_matter() {
        let content = content_tree(&[("index.md", "Home"), ("notes/a.md", "---\ntags: {a: 1}\n---\n")]);
        assert!(matches!(check(content.path()), Err(BuildError::Document(_))));
    }
}

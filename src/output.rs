//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every written page is shown by its title first, with the output path as
//! secondary context after an arrow. Inner pages are grouped under their
//! folder's index, even though the index is written after them.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! My Quire Site → index.html
//! 404 → 404.html
//! About → about.html
//! Journal → notes/index.html
//!     First post → notes/first.html
//!     second → notes/second.html
//! Tags → tags.html
//!
//! Generated 1 page, 1 folder, 2 inner pages, 3 tags, 4 assets
//! ```
//!
//! ## Check
//!
//! ```text
//! 5 documents: 3 pages in 1 folder, 2 tags
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use std::path::Path;

use crate::site::{BuildReport, CheckReport, PageKind, WrittenPage};

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn page_line(page: &WrittenPage, depth: usize) -> String {
    format!(
        "{}{} → {}",
        indent(depth),
        page.title,
        display_path(&page.path)
    )
}

/// Forward slashes on every platform, matching site URLs.
fn display_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();
    let mut inner: Vec<&WrittenPage> = Vec::new();

    for page in &report.pages {
        match page.kind {
            PageKind::InnerPage => inner.push(page),
            PageKind::FolderIndex => {
                lines.push(page_line(page, 0));
                lines.extend(inner.drain(..).map(|p| page_line(p, 1)));
            }
            _ => lines.push(page_line(page, 0)),
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {}, {}, {}, {}",
        plural(report.count(PageKind::Page), "page", "pages"),
        plural(report.count(PageKind::FolderIndex), "folder", "folders"),
        plural(report.count(PageKind::InnerPage), "inner page", "inner pages"),
        plural(report.tags, "tag", "tags"),
        plural(report.assets, "asset", "assets"),
    ));
    lines
}

pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

pub fn format_check_output(report: &CheckReport) -> Vec<String> {
    vec![format!(
        "{}: {} in {}, {}",
        plural(report.documents, "document", "documents"),
        plural(report.pages, "page", "pages"),
        plural(report.folders, "folder", "folders"),
        plural(report.tags, "tag", "tags"),
    )]
}

pub fn print_check_output(report: &CheckReport) {
    for line in format_check_output(report) {
        println!("{}", line);
    }
}

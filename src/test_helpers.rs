//! Shared test utilities for the quire test suite.
//!
//! Builds throwaway content trees and reads generated output back.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let content = content_tree(&[
//!     ("index.md", "Welcome"),
//!     ("notes/a.md", front_matter_page("A", Some("2024-02-01"), &["x"], "Body").as_str()),
//! ]);
//! let tree = scan(content.path()).unwrap();
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

// =========================================================================
// Fixture setup
// =========================================================================

/// Write `(relative path, contents)` pairs into a fresh temp directory.
///
/// Parent directories are created as needed.
pub fn content_tree(files: &[(&str, &str)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (relative, contents) in files {
        write_file(tmp.path(), relative, contents);
    }
    tmp
}

pub fn write_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
}

/// A Markdown document with front-matter. Empty `title`, `None` date and
/// empty `tags` leave the key out.
pub fn front_matter_page(title: &str, date: Option<&str>, tags: &[&str], body: &str) -> String {
    let mut text = String::from("---\n");
    if !title.is_empty() {
        text.push_str(&format!("title: \"{title}\"\n"));
    }
    if let Some(date) = date {
        text.push_str(&format!("date: {date}\n"));
    }
    if !tags.is_empty() {
        text.push_str(&format!("tags: [{}]\n", tags.join(", ")));
    }
    text.push_str("---\n");
    text.push_str(body);
    text.push('\n');
    text
}

// =========================================================================
// Output lookups: panic with a clear message on miss
// =========================================================================

/// Read a generated file. Panics if missing.
pub fn read_output(site: &Path, relative: &str) -> String {
    let path = site.join(relative);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("could not read {}: {e}", path.display()))
}

//! Source tree classification.
//!
//! Walks the content root and one level of folders beneath it, deciding which
//! entries are pages, which are folders, and which are reserved.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                     # Content root
//! ├── config.json              # Site configuration (optional, reserved)
//! ├── index.md                 # Landing page (required)
//! ├── 404.md                   # Not-found page (optional)
//! ├── static/                  # Copied verbatim (reserved)
//! ├── imgs/                    # Copied verbatim (reserved)
//! ├── about.md                 # Outer page
//! └── notes/                   # Folder
//!     ├── index.md             # Folder intro (optional)
//!     ├── first.md             # Inner page
//!     ├── second.md
//!     └── drafts/              # Ignored: only two levels are read
//! ```
//!
//! ## Rules
//!
//! - Entries whose names start with `.` are skipped everywhere.
//! - Pages are regular files with a `.md` extension, in any case.
//! - `404.md` is reserved at the root only. Inside a folder it is an
//!   ordinary page.
//! - Every list is sorted by file name, so traversal order (and with it
//!   tag index tie-breaking) is deterministic.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::assets::{IMGS_DIR, STATIC_DIR};
use crate::config::CONFIG_FILE;

pub const INDEX_MD: &str = "index.md";
pub const NOT_FOUND_MD: &str = "404.md";

const RESERVED: &[&str] = &[CONFIG_FILE, INDEX_MD, STATIC_DIR, IMGS_DIR];

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("failed to read directory {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("source is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("missing required index.md in {0}")]
    MissingIndex(PathBuf),
}

/// The classified source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteTree {
    pub root: PathBuf,
    pub index: PathBuf,
    pub not_found: Option<PathBuf>,
    /// Outer pages.
    pub pages: Vec<PathBuf>,
    pub folders: Vec<Folder>,
}

/// A top-level folder and its inner pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub name: String,
    pub path: PathBuf,
    pub index: Option<PathBuf>,
    pub pages: Vec<PathBuf>,
}

impl SiteTree {
    /// Every Markdown file the build will read, in build order.
    pub fn markdown_files(&self) -> Vec<&Path> {
        let mut files = vec![self.index.as_path()];
        files.extend(self.not_found.as_deref());
        files.extend(self.pages.iter().map(PathBuf::as_path));
        for folder in &self.folders {
            files.extend(folder.pages.iter().map(PathBuf::as_path));
            files.extend(folder.index.as_deref());
        }
        files
    }

    /// Whether `path` is an outer or inner page.
    pub fn is_page(&self, path: &Path) -> bool {
        self.pages.iter().any(|p| p == path)
            || self.folders.iter().any(|f| f.pages.iter().any(|p| p == path))
    }

    pub fn page_count(&self) -> usize {
        self.pages.len() + self.folders.iter().map(|f| f.pages.len()).sum::<usize>()
    }
}

pub fn scan(root: &Path) -> Result<SiteTree, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }
    let index = root.join(INDEX_MD);
    if !index.is_file() {
        return Err(ScanError::MissingIndex(root.to_path_buf()));
    }
    let not_found = Some(root.join(NOT_FOUND_MD)).filter(|p| p.is_file());

    let mut pages = Vec::new();
    let mut folders = Vec::new();
    for path in collect_entries(root)? {
        if is_reserved(&path, true) {
            continue;
        }
        if path.is_dir() {
            folders.push(scan_folder(path)?);
        } else if is_markdown(&path) {
            pages.push(path);
        }
    }

    Ok(SiteTree {
        root: root.to_path_buf(),
        index,
        not_found,
        pages,
        folders,
    })
}

fn scan_folder(path: PathBuf) -> Result<Folder, ScanError> {
    let index = Some(path.join(INDEX_MD)).filter(|p| p.is_file());
    let pages = collect_entries(&path)?
        .into_iter()
        .filter(|p| !is_reserved(p, false) && !p.is_dir() && is_markdown(p))
        .collect();
    Ok(Folder {
        name: file_name(&path),
        path,
        index,
        pages,
    })
}

/// Non-hidden entries of a directory, sorted by name.
fn collect_entries(path: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let io_err = |source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut entries = Vec::new();
    for entry in fs::read_dir(path).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        entries.push(entry.path());
    }
    entries.sort();
    Ok(entries)
}

fn is_reserved(path: &Path, at_root: bool) -> bool {
    let name = file_name(path);
    RESERVED.contains(&name.as_str()) || (at_root && name == NOT_FOUND_MD)
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

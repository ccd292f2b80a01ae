//! Output names and site URLs.
//!
//! Every source file maps to exactly one output file by swapping `.md` for
//! `.html`, mirroring its position in the two-level tree:
//!
//! ```text
//! content/about.md          → site/about.html         /about.html
//! content/notes/index.md    → site/notes/index.html   /notes/index.html
//! content/notes/first.md    → site/notes/first.html   /notes/first.html
//! ```

use std::path::PathBuf;

pub const INDEX_HTML: &str = "index.html";
pub const NOT_FOUND_HTML: &str = "404.html";
pub const TAGS_HTML: &str = "tags.html";

/// Where a page sits in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location<'a> {
    /// A page directly under the source root.
    Root,
    /// A page inside the named top-level folder.
    Folder(&'a str),
}

/// `first` → `first.html`
pub fn html_file_name(stem: &str) -> String {
    format!("{stem}.html")
}

/// Output path relative to the destination root.
pub fn output_path(location: Location<'_>, stem: &str) -> PathBuf {
    match location {
        Location::Root => PathBuf::from(html_file_name(stem)),
        Location::Folder(folder) => PathBuf::from(folder).join(html_file_name(stem)),
    }
}

/// Absolute site URL of a page.
pub fn page_url(location: Location<'_>, stem: &str) -> String {
    match location {
        Location::Root => format!("/{}", html_file_name(stem)),
        Location::Folder(folder) => format!("/{folder}/{}", html_file_name(stem)),
    }
}

/// Site URL of a top-level folder, as used in navigation.
pub fn folder_url(folder: &str) -> String {
    format!("/{folder}")
}

/// Link target for a tag on the tag page.
pub fn tag_url(tag: &str) -> String {
    format!("/{TAGS_HTML}#{tag}")
}

/// Title used in the global tag index for an untitled page: `folder/name`
/// for inner pages, `name` for outer ones.
pub fn qualified_name(location: Location<'_>, stem: &str) -> String {
    match location {
        Location::Root => stem.to_string(),
        Location::Folder(folder) => format!("{folder}/{stem}"),
    }
}

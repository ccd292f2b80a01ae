//! Static assets: user directories copied verbatim plus bundled defaults.
//!
//! ```text
//! content/static/**   → site/static/**
//! content/imgs/**     → site/imgs/**
//! (bundled)           → site/static/quire-style.css
//!                       site/static/quire-favicon-{16,32,96}.png
//! ```
//!
//! The bundled files are embedded at compile time and skipped when the
//! matching `disable_default_*` config flag is set. They are written after
//! the user's `static/` copy, so a user file with the same name is replaced.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use crate::config::SiteConfig;

pub const STATIC_DIR: &str = "static";
pub const IMGS_DIR: &str = "imgs";

pub const FAVICON_SIZES: [u32; 3] = [16, 32, 96];
pub const STYLE_URL: &str = "/static/quire-style.css";
const STYLE_FILE: &str = "quire-style.css";

const STYLE_CSS: &str = include_str!("../static/quire-style.css");
const FAVICON_16: &[u8] = include_bytes!("../static/quire-favicon-16.png");
const FAVICON_32: &[u8] = include_bytes!("../static/quire-favicon-32.png");
const FAVICON_96: &[u8] = include_bytes!("../static/quire-favicon-96.png");

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },
}

pub fn favicon_file_name(size: u32) -> String {
    format!("quire-favicon-{size}.png")
}

/// Site URL of a bundled favicon.
pub fn favicon_url(size: u32) -> String {
    format!("/{STATIC_DIR}/{}", favicon_file_name(size))
}

fn favicon_bytes(size: u32) -> &'static [u8] {
    match size {
        16 => FAVICON_16,
        32 => FAVICON_32,
        _ => FAVICON_96,
    }
}

/// Copy user assets and write bundled defaults into `destination`.
///
/// Returns the number of files written.
pub fn copy_assets(
    source: &Path,
    destination: &Path,
    config: &SiteConfig,
) -> Result<usize, AssetError> {
    let mut count = 0;
    for dir in [STATIC_DIR, IMGS_DIR] {
        let from = source.join(dir);
        if is_non_empty_dir(&from) {
            count += copy_tree(&from, &destination.join(dir))?;
        }
    }

    let static_dst = destination.join(STATIC_DIR);
    create_dir(&static_dst)?;

    if !config.disable_default_favicon {
        for size in FAVICON_SIZES {
            write_file(&static_dst.join(favicon_file_name(size)), favicon_bytes(size))?;
            count += 1;
        }
    }
    if !config.disable_default_style {
        write_file(&static_dst.join(STYLE_FILE), STYLE_CSS.as_bytes())?;
        count += 1;
    }
    Ok(count)
}

fn is_non_empty_dir(path: &Path) -> bool {
    fs::read_dir(path).is_ok_and(|mut entries| entries.next().is_some())
}

/// Recursively copy `from` into `to`, returning the number of files copied.
fn copy_tree(from: &Path, to: &Path) -> Result<usize, AssetError> {
    let mut copied = 0;
    for entry in WalkDir::new(from).sort_by_file_name() {
        let entry = entry.map_err(|source| AssetError::Walk {
            path: from.to_path_buf(),
            source,
        })?;
        let Ok(relative) = entry.path().strip_prefix(from) else {
            continue;
        };
        let target = to.join(relative);
        if entry.file_type().is_dir() {
            create_dir(&target)?;
        } else {
            fs::copy(entry.path(), &target).map_err(|source| AssetError::Copy {
                from: entry.path().to_path_buf(),
                to: target.clone(),
                source,
            })?;
            tracing::debug!(file = %target.display(), "copied asset");
            copied += 1;
        }
    }
    Ok(copied)
}

fn create_dir(path: &Path) -> Result<(), AssetError> {
    fs::create_dir_all(path).map_err(|source| AssetError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), AssetError> {
    fs::write(path, contents).map_err(|source| AssetError::Write {
        path: path.to_path_buf(),
        source,
    })
}

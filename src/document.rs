//! Markdown documents and their front-matter.
//!
//! A document may open with a YAML block fenced by `---` lines:
//!
//! ```text
//! ---
//! title: Alpha
//! date: 2024-01-05
//! tags: [x, y]
//! ---
//! Body text...
//! ```
//!
//! Only `title`, `date` and `tags` are interpreted; other keys are ignored.
//! A missing closing fence means the file has no front-matter and the whole
//! text is body.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed front-matter in {path}: {source}")]
    FrontMatter {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// Recognized front-matter keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FrontMatter {
    #[serde(default, deserialize_with = "non_empty_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "date_value")]
    pub date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "tag_list")]
    pub tags: Vec<String>,
}

/// A single Markdown source file, split into metadata and body.
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub front_matter: FrontMatter,
    pub body: String,
}

impl Document {
    /// Read and parse a document from disk.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let text = fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &text)
    }

    /// Parse document text. `path` is only used for error context.
    pub fn parse(path: &Path, text: &str) -> Result<Self, DocumentError> {
        let (yaml, body) = split_front_matter(text);
        let front_matter = match yaml {
            Some(yaml) if !yaml.trim().is_empty() => {
                serde_yaml::from_str(yaml).map_err(|source| DocumentError::FrontMatter {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            _ => FrontMatter::default(),
        };
        Ok(Self {
            path: path.to_path_buf(),
            front_matter,
            body: body.to_string(),
        })
    }

    /// File name without the `.md` extension.
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

fn is_fence(line: &str) -> bool {
    line.trim_end() == "---"
}

/// Split text into `(front-matter, body)`.
///
/// Returns `(None, text)` when the text doesn't open with a fence or the
/// fence is never closed.
pub fn split_front_matter(text: &str) -> (Option<&str>, &str) {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let Some(first_end) = text.find('\n') else {
        return (None, text);
    };
    if !is_fence(&text[..first_end]) {
        return (None, text);
    }

    let yaml_start = first_end + 1;
    let mut offset = yaml_start;
    for line in text[yaml_start..].split_inclusive('\n') {
        let bare = line.trim_end_matches(['\n', '\r']);
        if is_fence(bare) || bare.trim_end() == "..." {
            let yaml = &text[yaml_start..offset];
            let body = &text[offset + line.len()..];
            return (Some(yaml), body);
        }
        offset += line.len();
    }
    (None, text)
}

fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = scalar_text(Value::deserialize(deserializer)?)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// A single tag or a list of them.
fn tag_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Sequence(items) => items,
        other => vec![other],
    };
    let mut tags = Vec::with_capacity(items.len());
    for item in items {
        if let Some(tag) = scalar_text(item)? {
            let tag = tag.trim();
            if !tag.is_empty() {
                tags.push(tag.to_string());
            }
        }
    }
    Ok(tags)
}

/// Text of a YAML scalar. Numbers and booleans are written out as they
/// read, `null` is absent.
fn scalar_text<E: serde::de::Error>(value: Value) -> Result<Option<String>, E> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Tagged(tagged) => scalar_text(tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => {
            Err(E::custom("expected a string, found a list or mapping"))
        }
    }
}

fn date_value<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(raw) => parse_date(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognized date {raw:?}"))),
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a front-matter date.
///
/// Accepts a bare date, a date with time (space or `T` separated), or
/// RFC 3339. Offsets are dropped; the local wall-clock time is kept.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.naive_local())
}

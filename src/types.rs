//! Shared types passed between the page generators and the tag index.

use chrono::{NaiveDate, NaiveDateTime};

use crate::document::FrontMatter;
use crate::naming::{self, Location};

/// Date given to pages without a `date` key: 1970-01-01 00:00.
pub fn epoch() -> NaiveDateTime {
    // chrono's default is the unix epoch
    NaiveDateTime::default()
}

/// Derived summary of one rendered page.
///
/// Built once per document and never mutated. Consumed by folder page lists
/// and the tag index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    /// Front-matter date, or [`epoch`] when absent.
    pub date: NaiveDateTime,
    /// Front-matter title, or a name derived from the file.
    pub title: String,
    /// Absolute site URL.
    pub url: String,
    /// Tags in declared order.
    pub tags: Vec<String>,
}

impl PageRecord {
    /// Build a record for a page at `location`.
    ///
    /// The fallback title is the file stem, or `folder/stem` when
    /// `qualified` is set (the tag index form for inner pages).
    pub fn build(
        front_matter: &FrontMatter,
        location: Location<'_>,
        stem: &str,
        qualified: bool,
    ) -> Self {
        let title = match &front_matter.title {
            Some(title) => title.clone(),
            None if qualified => naming::qualified_name(location, stem),
            None => stem.to_string(),
        };
        Self {
            date: front_matter.date.unwrap_or_else(epoch),
            title,
            url: naming::page_url(location, stem),
            tags: front_matter.tags.clone(),
        }
    }

    /// Calendar date shown in page lists.
    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }

    pub fn is_tagged(&self) -> bool {
        !self.tags.is_empty()
    }
}

/// Whether a date should be shown as a badge.
pub fn has_date_badge(date: Option<NaiveDateTime>) -> bool {
    date.is_some_and(|d| d != epoch())
}

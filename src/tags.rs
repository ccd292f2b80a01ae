//! Global tag index.
//!
//! Records are appended during traversal in visit order and read back once,
//! through [`TagIndex::finalize`], which consumes the index:
//!
//! ```text
//! record(["rust", "notes"], a)   rust:  [a, c]        rust:  [c, a]   (by date desc)
//! record(["rust"], c)         →  notes: [a]     →     notes: [a]
//!                                                     tags ordered by newest record
//! ```

use std::collections::HashMap;

use crate::types::PageRecord;

/// One tag with its pages, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    pub tag: String,
    pub records: Vec<PageRecord>,
}

/// Append-only accumulator of tagged page records.
#[derive(Debug, Clone, Default)]
pub struct TagIndex {
    entries: Vec<TagEntry>,
    positions: HashMap<String, usize>,
}

impl TagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `record` under every tag in `tags`. Repeated tags count once.
    pub fn record(&mut self, tags: &[String], record: &PageRecord) {
        for (i, tag) in tags.iter().enumerate() {
            if tags[..i].contains(tag) {
                continue;
            }
            let position = match self.positions.get(tag) {
                Some(&position) => position,
                None => {
                    self.entries.push(TagEntry {
                        tag: tag.clone(),
                        records: Vec::new(),
                    });
                    self.positions.insert(tag.clone(), self.entries.len() - 1);
                    self.entries.len() - 1
                }
            };
            self.entries[position].records.push(record.clone());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Order every tag's records by date, newest first, then order the tags
    /// by their newest record. Both sorts are stable, so ties keep the order
    /// in which pages (and tags) were first recorded.
    pub fn finalize(self) -> Vec<TagEntry> {
        let mut entries = self.entries;
        for entry in &mut entries {
            entry.records.sort_by(|a, b| b.date.cmp(&a.date));
        }
        entries.sort_by(|a, b| newest(b).cmp(&newest(a)));
        entries
    }
}

fn newest(entry: &TagEntry) -> Option<chrono::NaiveDateTime> {
    entry.records.first().map(|r| r.date)
}

//! Page assembly.
//!
//! Each page kind is a pure function from the shared [`Shell`] and its
//! inputs to a complete document. Nothing here touches the filesystem.
//!
//! ## Page Kinds
//!
//! | Page | Title | Heading | Date | Content | List | Tags |
//! |------|-------|---------|------|---------|------|------|
//! | index | site | | | `index.md` | | |
//! | 404 | `404` | `404` | | `404.md` if present | | |
//! | outer / inner page | front-matter | front-matter | front-matter | body | | links |
//! | folder index | folder or nav label | `folder/` | | `index.md` if present | page list | |
//! | tags | `Tags` | `Tags` | | | tag list | |
//!
//! Front-matter of `index.md`, `404.md` and folder `index.md` files is
//! ignored.

use maud::{Markup, PreEscaped, html};

use crate::document::Document;
use crate::markdown;
use crate::naming;
use crate::shell::{PageSlots, Shell};
use crate::tags::TagEntry;
use crate::types::{self, PageRecord};

pub const NOT_FOUND_TITLE: &str = "404";
pub const TAGS_TITLE: &str = "Tags";

fn rendered_body(doc: &Document) -> Markup {
    PreEscaped(markdown::render(&doc.body))
}

pub fn index_page(shell: &Shell, doc: &Document) -> Markup {
    shell.render(PageSlots {
        content: Some(rendered_body(doc)),
        ..PageSlots::default()
    })
}

pub fn not_found_page(shell: &Shell, doc: Option<&Document>) -> Markup {
    shell.render(PageSlots {
        title: Some(NOT_FOUND_TITLE),
        heading: Some(NOT_FOUND_TITLE),
        content: doc.map(rendered_body),
        ..PageSlots::default()
    })
}

/// An outer or inner page, decorated from its front-matter.
pub fn content_page(shell: &Shell, doc: &Document) -> Markup {
    let fm = &doc.front_matter;
    let date = fm
        .date
        .filter(|_| types::has_date_badge(fm.date))
        .map(|d| d.date());
    shell.render(PageSlots {
        title: fm.title.as_deref(),
        heading: fm.title.as_deref(),
        date,
        content: Some(rendered_body(doc)),
        tags: (!fm.tags.is_empty()).then(|| tag_links(&fm.tags)),
        ..PageSlots::default()
    })
}

/// The index of a top-level folder, listing its pages newest first.
pub fn folder_index_page(
    shell: &Shell,
    folder: &str,
    title: &str,
    index: Option<&Document>,
    records: &[PageRecord],
) -> Markup {
    let heading = format!("{folder}/");
    shell.render(PageSlots {
        title: Some(title),
        heading: Some(&heading),
        content: index.map(rendered_body),
        list: Some(page_list(records)),
        ..PageSlots::default()
    })
}

pub fn tags_page(shell: &Shell, entries: &[TagEntry]) -> Markup {
    shell.render(PageSlots {
        title: Some(TAGS_TITLE),
        heading: Some(TAGS_TITLE),
        list: Some(tag_list(entries)),
        ..PageSlots::default()
    })
}

/// Date and link per record, sorted by date descending. Ties keep their
/// given order.
pub fn page_list(records: &[PageRecord]) -> Markup {
    let mut sorted: Vec<&PageRecord> = records.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    html! {
        ul.page-list {
            @for record in sorted {
                li {
                    span.date { (record.day().to_string()) }
                    a href=(record.url) { (record.title) }
                }
            }
        }
    }
}

fn tag_list(entries: &[TagEntry]) -> Markup {
    html! {
        ul.tags {
            @for entry in entries {
                li.tag id=(entry.tag) {
                    (entry.tag)
                    (page_list(&entry.records))
                }
            }
        }
    }
}

/// One link per tag into the tag page.
pub fn tag_links(tags: &[String]) -> Markup {
    html! {
        small {
            p.tags {
                @for tag in tags {
                    a href=(naming::tag_url(tag)) { "# " (tag) }
                }
            }
        }
    }
}

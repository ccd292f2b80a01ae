//! The page shell shared by every generated page.
//!
//! The shell is built once per build from the site config and the scanned
//! tree, then each page fills its slots:
//!
//! | Slot | When empty |
//! |------|------------|
//! | `title` | site title |
//! | `heading` | no `<h1>` |
//! | `date` | no date badge |
//! | `content` | nothing |
//! | `list` | nothing |
//! | `tags` | nothing |
//!
//! Inside `<main>` the slots appear in the order heading, date, content,
//! list, tags. Navigation and everything in `<head>` come from the shell.

use chrono::NaiveDate;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Event, Parser, Tag, TagEnd};

use crate::assets;
use crate::config::SiteConfig;
use crate::markdown;
use crate::naming;

/// A navigation link written as Markdown, e.g. `[Journal](/journal)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: String,
    pub url: String,
}

impl NavLink {
    /// Extract the first link from a Markdown snippet.
    pub fn parse(markdown: &str) -> Option<Self> {
        let mut events = Parser::new(markdown);
        let url = events.find_map(|event| match event {
            Event::Start(Tag::Link { dest_url, .. }) => Some(dest_url.to_string()),
            _ => None,
        })?;
        let mut label = String::new();
        for event in events {
            match event {
                Event::End(TagEnd::Link) => break,
                Event::Text(text) | Event::Code(text) => label.push_str(&text),
                _ => {}
            }
        }
        Some(Self { label, url })
    }
}

/// Inputs for the generated navigation.
#[derive(Debug, Clone, Default)]
pub struct NavSource {
    /// Top-level folder names.
    pub folders: Vec<String>,
    /// `(stem, title)` for top-level pages.
    pub pages: Vec<(String, Option<String>)>,
}

/// Per-page slot values.
#[derive(Debug, Default)]
pub struct PageSlots<'a> {
    pub title: Option<&'a str>,
    pub heading: Option<&'a str>,
    pub date: Option<NaiveDate>,
    pub content: Option<Markup>,
    pub list: Option<Markup>,
    pub tags: Option<Markup>,
}

/// Shared, read-only page skeleton.
#[derive(Debug)]
pub struct Shell {
    lang: String,
    author: String,
    site_title: String,
    footer: Option<String>,
    head: Markup,
    nav: Markup,
}

impl Shell {
    pub fn new(config: &SiteConfig, nav: &NavSource) -> Self {
        Self {
            lang: config.lang.clone(),
            author: config.author.clone(),
            site_title: config.title.clone(),
            footer: config.footer.clone(),
            head: head_links(config),
            nav: if config.nav.is_empty() {
                default_nav(nav)
            } else {
                custom_nav(&config.nav)
            },
        }
    }

    pub fn site_title(&self) -> &str {
        &self.site_title
    }

    /// Fill the shell's slots into a complete document.
    pub fn render(&self, slots: PageSlots<'_>) -> Markup {
        let title = slots.title.unwrap_or(&self.site_title);
        html! {
            (DOCTYPE)
            html lang=(self.lang) {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    meta name="author" content=(self.author);
                    (self.head)
                    title { (title) }
                }
                body {
                    header {
                        h2 { (self.site_title) }
                        nav { (self.nav) }
                    }
                    main {
                        @if let Some(heading) = slots.heading {
                            h1 { (heading) }
                        }
                        @if let Some(date) = slots.date {
                            span.date { p { (date.to_string()) } }
                        }
                        @if let Some(content) = slots.content {
                            (content)
                        }
                        @if let Some(list) = slots.list {
                            (list)
                        }
                        @if let Some(tags) = slots.tags {
                            (tags)
                        }
                    }
                    @if let Some(footer) = &self.footer {
                        footer { (PreEscaped(footer)) }
                    }
                }
            }
        }
    }
}

const RAW_ICON: &str = r#"<link rel="icon""#;
const RAW_STYLESHEET: &str = r#"<link rel="stylesheet""#;
const RAW_SCRIPT: &str = "<script";

/// Favicons, stylesheets and scripts for `<head>`.
///
/// Config entries that are already complete tags are copied verbatim.
fn head_links(config: &SiteConfig) -> Markup {
    html! {
        @if !config.disable_default_favicon {
            @for size in assets::FAVICON_SIZES {
                link rel="icon" type="image/png"
                    href=(assets::favicon_url(size))
                    sizes={ (size) "x" (size) };
            }
        }
        @for favicon in &config.favicons {
            @if favicon.starts_with(RAW_ICON) {
                (PreEscaped(favicon))
            }
        }
        @if !config.disable_default_style {
            link rel="stylesheet" type="text/css" href=(assets::STYLE_URL);
        }
        @for style in &config.styles {
            @if style.starts_with(RAW_STYLESHEET) {
                (PreEscaped(style))
            } @else {
                link rel="stylesheet" type="text/css" href=(style);
            }
        }
        @for script in &config.scripts {
            @if script.starts_with(RAW_SCRIPT) {
                (PreEscaped(script))
            } @else {
                script src=(script) {}
            }
        }
    }
}

/// Home, then folders, then top-level pages.
fn default_nav(source: &NavSource) -> Markup {
    html! {
        a href="/" { "Home" }
        @for folder in &source.folders {
            a href=(naming::folder_url(folder)) { (folder) }
        }
        @for (stem, title) in &source.pages {
            a href=(naming::page_url(naming::Location::Root, stem)) {
                (title.as_deref().unwrap_or(stem))
            }
        }
    }
}

fn custom_nav(items: &[String]) -> Markup {
    html! {
        @for item in items {
            (PreEscaped(markdown::render_inline(item)))
        }
    }
}

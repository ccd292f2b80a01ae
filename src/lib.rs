//! # Quire
//!
//! A small static site generator for Markdown notebooks. Your filesystem is
//! the data source: the root holds outer pages, each top-level folder becomes
//! a dated listing of its own pages, and front-matter tags are collected into
//! one cross-site tag page.
//!
//! # Architecture: One Forward Pass
//!
//! A build reads, renders and writes each document in turn. Data only flows
//! forward:
//!
//! ```text
//! scan      content/   →  SiteTree        (index, 404, pages, folders)
//! document  *.md       →  Document        (front-matter + body)
//! markdown  body       →  tokens → HTML   (annotated images, merged pairs)
//! types     Document   →  PageRecord      (date, title, url, tags)
//! generate  Shell + …  →  Markup          (one function per page kind)
//! site      all of it  →  site/           (writes, tag page last)
//! ```
//!
//! The only state that spans documents is the [`tags::TagIndex`]. It lives
//! inside the build session, grows by appending, and is consumed once to
//! render `tags.html`.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.json` loading, defaults, validation |
//! | [`scan`] | Classifies the two-level source tree |
//! | [`document`] | Front-matter splitting and YAML parsing |
//! | [`markdown`] | pulldown-cmark rendering with image layout annotations |
//! | [`pairs`] | Merges adjacent `pair_h` / `pair_v` images into one block |
//! | [`types`] | `PageRecord` and its defaults |
//! | [`naming`] | Output paths and site URLs |
//! | [`tags`] | The tag index and its ordering rules |
//! | [`shell`] | The shared page skeleton: head, navigation, typed slots |
//! | [`generate`] | Pure page constructors for every page kind |
//! | [`assets`] | User asset copying and bundled defaults |
//! | [`site`] | The build driver and `check` |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Token-Level Image Pairs
//!
//! Pair merging runs over parsed tokens rather than rendered HTML. Two pair
//! images are adjacent exactly when their tokens are, so whitespace and
//! attribute order in the rendered markup can't break the match, and the
//! document is still written in a single pulldown-cmark pass (footnotes and
//! tables keep their state).
//!
//! ## Typed Slots Over String Splicing
//!
//! Pages fill a [`shell::PageSlots`] value instead of replacing marker text
//! in an HTML string. Each slot has one documented default and a fixed
//! position inside `<main>`, and every interpolated value is escaped by Maud
//! unless it is rendered Markdown or configured raw HTML.
//!
//! ## Replace-All Builds
//!
//! The destination is removed and rebuilt on every build. There is no
//! incremental mode and no atomic swap: a failed build may leave a partial
//! site, but everything that can be validated up front (config, layout,
//! outer page front-matter) is validated before anything is removed.

pub mod assets;
pub mod config;
pub mod document;
pub mod generate;
pub mod markdown;
pub mod naming;
pub mod output;
pub mod pairs;
pub mod scan;
pub mod shell;
pub mod site;
pub mod tags;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

//! Markdown to HTML with annotated images.
//!
//! Rendering is pulldown-cmark with tables, footnotes, strikethrough, task
//! lists, superscript (`^x^`) and subscript (`~x~`), plus one extension: an
//! image title may end with a layout annotation. Superscript and subscript
//! also work inside a word (`H~2~O`, `x^2^`).
//!
//! ```markdown
//! ![](imgs/dunes.jpg "Dunes at dusk, pano")
//! ```
//!
//! | Suffix | Class |
//! |--------|-------|
//! | `, fit` | `fit` |
//! | `, pano` | `pano` |
//! | `, pair` / `, pair_h` | `pair_h` |
//! | `, pair_v` | `pair_v` |
//!
//! The suffix is stripped and the rest of the title becomes a caption under
//! the image. Unrecognized suffixes stay in the caption verbatim.
//!
//! ## Token Stream
//!
//! The parser's events are regrouped into [`Token`]s: a paragraph holding
//! nothing but one image becomes a [`Token::Image`] block, everything else
//! passes through as [`Token::Event`]. The pair merger
//! ([`crate::pairs::merge_image_pairs`]) runs over this stream before the
//! final HTML is written, so two pair images are "adjacent" exactly when
//! their tokens are. Pair images must therefore sit in their own paragraphs:
//!
//! ```markdown
//! ![](imgs/a.jpg "Left, pair")
//!
//! ![](imgs/b.jpg "Right, pair")
//! ```

use maud::{Markup, html};
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, TextMergeStream, html as md_html};
use std::iter::Peekable;

use crate::pairs::{self, ImagePair};

/// Image layout selected by a title annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Plain,
    Fit,
    Pano,
    PairH,
    PairV,
}

impl Layout {
    /// CSS class applied to the `<img>`.
    pub fn class(self) -> Option<&'static str> {
        match self {
            Layout::Plain => None,
            Layout::Fit => Some("fit"),
            Layout::Pano => Some("pano"),
            Layout::PairH => Some("pair_h"),
            Layout::PairV => Some("pair_v"),
        }
    }

    pub fn is_pair(self) -> bool {
        matches!(self, Layout::PairH | Layout::PairV)
    }
}

/// Annotations in match priority order.
const ANNOTATIONS: &[(&str, Layout)] = &[
    (", fit", Layout::Fit),
    (", pano", Layout::Pano),
    (", pair", Layout::PairH),
    (", pair_h", Layout::PairH),
    (", pair_v", Layout::PairV),
];

/// Strip the first matching annotation from an image title.
pub fn split_annotation(title: &str) -> (&str, Layout) {
    ANNOTATIONS
        .iter()
        .find_map(|&(suffix, layout)| title.strip_suffix(suffix).map(|rest| (rest, layout)))
        .unwrap_or((title, Layout::Plain))
}

/// An image with its annotation resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlock {
    pub src: String,
    pub alt: String,
    pub caption: String,
    pub layout: Layout,
}

impl ImageBlock {
    pub fn new(src: &str, alt: &str, title: &str) -> Self {
        let (caption, layout) = split_annotation(title);
        let alt = if alt.is_empty() { caption } else { alt };
        Self {
            src: src.to_string(),
            alt: alt.to_string(),
            caption: caption.to_string(),
            layout,
        }
    }

    /// The image and its caption, without a block wrapper.
    pub fn inline_markup(&self) -> Markup {
        html! {
            img class=[self.layout.class()] src=(self.src) alt=(self.alt);
            (caption(&self.caption))
        }
    }

    pub fn block_markup(&self) -> Markup {
        html! {
            p { (self.inline_markup()) }
        }
    }
}

pub(crate) fn caption(text: &str) -> Markup {
    html! {
        @if !text.is_empty() {
            span.image-title { (text) }
        }
    }
}

/// One unit of the rendered stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    /// A parser event passed through untouched.
    Event(Event<'a>),
    /// A paragraph consisting of exactly one image.
    Image(ImageBlock),
    /// Two pair images merged into one block.
    Pair(ImagePair),
}

impl<'a> Token<'a> {
    fn into_event(self) -> Event<'a> {
        match self {
            Token::Event(event) => event,
            Token::Image(image) => block_event(image.block_markup()),
            Token::Pair(pair) => block_event(pair.markup()),
        }
    }
}

fn block_event<'a>(markup: Markup) -> Event<'a> {
    let mut html = markup.into_string();
    html.push('\n');
    Event::Html(html.into())
}

pub fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_SUPERSCRIPT
        | Options::ENABLE_SUBSCRIPT
}

/// Render a document body to an HTML fragment, merging adjacent pairs.
pub fn render(markdown: &str) -> String {
    render_tokens(pairs::merge_image_pairs(tokenize(markdown)))
}

/// Write a token stream as HTML.
pub fn render_tokens(tokens: Vec<Token<'_>>) -> String {
    let mut out = String::with_capacity(tokens.len() * 16);
    md_html::push_html(&mut out, tokens.into_iter().map(Token::into_event));
    out
}

/// Parse markdown into the token stream, resolving every image.
pub fn tokenize(markdown: &str) -> Vec<Token<'_>> {
    let mut events = TextMergeStream::new(Parser::new_ext(markdown, parser_options())).peekable();
    let mut tokens = Vec::new();
    let mut in_code = false;

    while let Some(event) = events.next() {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                in_code = true;
                tokens.push(Token::Event(Event::Start(Tag::CodeBlock(kind))));
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code = false;
                tokens.push(Token::Event(Event::End(TagEnd::CodeBlock)));
            }
            Event::Text(text) if !in_code => match script_spans(&text) {
                Some(spans) => tokens.extend(spans.into_iter().map(Token::Event)),
                None => tokens.push(Token::Event(Event::Text(text))),
            },
            Event::Start(Tag::Paragraph) => {
                let image = take_image(&mut events);
                let closed = image.is_some()
                    && events
                        .next_if(|e| matches!(e, Event::End(TagEnd::Paragraph)))
                        .is_some();
                match image {
                    Some(image) if closed => tokens.push(Token::Image(image)),
                    Some(image) => {
                        tokens.push(Token::Event(Event::Start(Tag::Paragraph)));
                        tokens.push(inline_token(&image));
                    }
                    None => tokens.push(Token::Event(Event::Start(Tag::Paragraph))),
                }
            }
            Event::Start(Tag::Image {
                dest_url, title, ..
            }) => {
                let alt = collect_alt(&mut events);
                tokens.push(inline_token(&ImageBlock::new(&dest_url, &alt, &title)));
            }
            other => tokens.push(Token::Event(other)),
        }
    }
    tokens
}

/// Split in-word `~sub~` and `^sup^` spans out of a text run.
///
/// The parser only recognizes these with flanking whitespace, so `H~2~O`
/// arrives as plain text. A span is a run of non-space characters without
/// the delimiter, closed by a single delimiter. Returns `None` when the text
/// holds no span.
fn script_spans<'a>(text: &str) -> Option<Vec<Event<'a>>> {
    let bytes = text.as_bytes();
    let mut events = Vec::new();
    let mut plain = 0;
    let mut i = 0;
    while i < bytes.len() {
        let delim = bytes[i];
        let opens = matches!(delim, b'~' | b'^') && (i == 0 || bytes[i - 1] != delim);
        if let Some(len) = opens.then(|| span_len(&text[i + 1..], delim)).flatten() {
            if plain < i {
                events.push(Event::Text(text[plain..i].to_string().into()));
            }
            let (start, end) = if delim == b'~' {
                (Tag::Subscript, TagEnd::Subscript)
            } else {
                (Tag::Superscript, TagEnd::Superscript)
            };
            events.push(Event::Start(start));
            events.push(Event::Text(text[i + 1..i + 1 + len].to_string().into()));
            events.push(Event::End(end));
            i += len + 2;
            plain = i;
        } else {
            i += 1;
        }
    }
    if events.is_empty() {
        return None;
    }
    if plain < text.len() {
        events.push(Event::Text(text[plain..].to_string().into()));
    }
    Some(events)
}

/// Byte length of a span's content, if `after` closes one.
fn span_len(after: &str, delim: u8) -> Option<usize> {
    let end = after.find(|c: char| c.is_whitespace() || c == char::from(delim))?;
    let rest = &after.as_bytes()[end..];
    let closed = end > 0 && rest.first() == Some(&delim) && rest.get(1) != Some(&delim);
    closed.then_some(end)
}

fn inline_token<'a>(image: &ImageBlock) -> Token<'a> {
    Token::Event(Event::InlineHtml(image.inline_markup().into_string().into()))
}

/// Consume an image if it is the next event.
fn take_image<'a, I>(events: &mut Peekable<I>) -> Option<ImageBlock>
where
    I: Iterator<Item = Event<'a>>,
{
    match events.next_if(|e| matches!(e, Event::Start(Tag::Image { .. })))? {
        Event::Start(Tag::Image {
            dest_url, title, ..
        }) => {
            let alt = collect_alt(events);
            Some(ImageBlock::new(&dest_url, &alt, &title))
        }
        _ => None,
    }
}

/// Gather plain alt text up to the image's end tag.
fn collect_alt<'a, I>(events: &mut I) -> String
where
    I: Iterator<Item = Event<'a>>,
{
    let mut alt = String::new();
    let mut depth = 0usize;
    for event in events.by_ref() {
        match event {
            Event::Start(Tag::Image { .. }) => depth += 1,
            Event::End(TagEnd::Image) if depth == 0 => break,
            Event::End(TagEnd::Image) => depth -= 1,
            Event::Text(text) | Event::Code(text) => alt.push_str(&text),
            Event::SoftBreak | Event::HardBreak => alt.push(' '),
            _ => {}
        }
    }
    alt
}

/// Render a one-line snippet without the surrounding paragraph.
///
/// Used for navigation entries written as Markdown links.
pub fn render_inline(markdown: &str) -> String {
    let events = Parser::new_ext(markdown, parser_options()).filter(|e| {
        !matches!(
            e,
            Event::Start(Tag::Paragraph) | Event::End(TagEnd::Paragraph)
        )
    });
    let mut out = String::new();
    md_html::push_html(&mut out, events);
    out.trim_end().to_string()
}

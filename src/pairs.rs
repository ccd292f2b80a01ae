//! Merging of adjacent paired images.
//!
//! Two consecutive image blocks with the same pair orientation collapse into
//! one grouped block:
//!
//! ```text
//! Image(pair_h, a.jpg, "Left")    ─┐
//! Image(pair_h, b.jpg, "Right")   ─┴→  Pair(pair_h, [a.jpg, b.jpg], "Right")
//! Image(pair_v, c.jpg, "")           →  Image(pair_v, c.jpg, "")   (no partner)
//! ```
//!
//! The scan is a single left-to-right pass holding at most one pending
//! image, so each image joins at most one pair. Merged blocks are never
//! pending, which makes the pass idempotent.

use maud::{Markup, html};

use crate::markdown::{self, ImageBlock, Layout, Token};

/// Two images rendered side by side (`pair_h`) or stacked (`pair_v`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePair {
    pub orientation: Layout,
    pub sources: [String; 2],
    pub alt: String,
    pub caption: String,
}

impl ImagePair {
    /// Merge two blocks. Alt and caption come from the second block unless
    /// it has none.
    pub fn merge(first: ImageBlock, second: ImageBlock) -> Self {
        let pick = |a: String, b: String| if b.is_empty() { a } else { b };
        Self {
            orientation: first.layout,
            alt: pick(first.alt, second.alt),
            caption: pick(first.caption, second.caption),
            sources: [first.src, second.src],
        }
    }

    pub fn markup(&self) -> Markup {
        html! {
            div.image-pair {
                div class=[self.orientation.class()] {
                    @for src in &self.sources {
                        img.pair src=(src) alt=(self.alt);
                    }
                }
                (markdown::caption(&self.caption))
            }
        }
    }
}

/// Merge every run of two same-orientation pair images.
pub fn merge_image_pairs(tokens: Vec<Token<'_>>) -> Vec<Token<'_>> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut pending: Option<ImageBlock> = None;

    for token in tokens {
        match token {
            Token::Image(image) if image.layout.is_pair() => match pending.take() {
                Some(first) if first.layout == image.layout => {
                    out.push(Token::Pair(ImagePair::merge(first, image)));
                }
                Some(first) => {
                    out.push(Token::Image(first));
                    pending = Some(image);
                }
                None => pending = Some(image),
            },
            other => {
                if let Some(first) = pending.take() {
                    out.push(Token::Image(first));
                }
                out.push(other);
            }
        }
    }
    if let Some(first) = pending {
        out.push(Token::Image(first));
    }
    out
}

// file: src/parser/markdown.rs
// description: markdown rendering into top-level html blocks with stable ids
// reference: https://docs.rs/pulldown-cmark, https://docs.rs/scraper

use crate::parser::slug::generate_slug;
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html};
use scraper::{ElementRef, Html};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tracing::debug;

const CONTENT_KEY_LEN: usize = 12;

pub struct MarkdownRenderer {
    options: Options,
}

/// One direct child of the rendered document root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedBlock {
    pub index: usize,
    /// Unique within the document.
    pub id: String,
    /// Derived from tag and text only; repeated content shares a key.
    pub content_key: String,
    pub tag: String,
    pub anchor: Option<String>,
    pub text: String,
    pub html: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderedDocument {
    pub html: String,
    pub blocks: Vec<RenderedBlock>,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        Self { options }
    }

    pub fn render(&self, markdown: &str) -> RenderedDocument {
        let html = self.render_html(markdown);
        let blocks = split_blocks(&html);
        debug!("Rendered markdown into {} blocks", blocks.len());
        RenderedDocument { html, blocks }
    }

    /// Renders to HTML, giving every heading without an explicit id the slug
    /// of its text.
    pub fn render_html(&self, markdown: &str) -> String {
        let mut events: Vec<Event> = Parser::new_ext(markdown, self.options).collect();

        let mut heading_start: Option<usize> = None;
        let mut heading_text = String::new();

        for idx in 0..events.len() {
            let closes_heading = match &events[idx] {
                Event::Start(Tag::Heading { .. }) => {
                    heading_start = Some(idx);
                    heading_text.clear();
                    false
                }
                Event::Text(text) | Event::Code(text) => {
                    if heading_start.is_some() {
                        heading_text.push_str(text);
                    }
                    false
                }
                Event::End(TagEnd::Heading(_)) => true,
                _ => false,
            };

            if closes_heading
                && let Some(start) = heading_start.take()
                && let Event::Start(Tag::Heading { id, .. }) = &mut events[start]
                && id.is_none()
            {
                *id = Some(CowStr::from(generate_slug(heading_text.trim())));
            }
        }

        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut out, events.into_iter());
        out
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderedDocument {
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn tag_sequence(&self) -> Vec<&str> {
        self.blocks.iter().map(|b| b.tag.as_str()).collect()
    }

    pub fn block(&self, id: &str) -> Option<&RenderedBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Last heading carrying the anchor wins, as with duplicate DOM ids.
    pub fn heading(&self, slug: &str) -> Option<&RenderedBlock> {
        self.blocks
            .iter()
            .rev()
            .find(|b| is_heading_tag(&b.tag) && b.anchor.as_deref() == Some(slug))
    }
}

pub fn is_heading_tag(tag: &str) -> bool {
    matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

/// Content-derived block key: tag plus whitespace-collapsed text.
pub fn content_key(tag: &str, text: &str) -> String {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut hasher = Sha256::new();
    hasher.update(tag.to_ascii_lowercase().as_bytes());
    hasher.update(b"\n");
    hasher.update(normalized.as_bytes());
    let digest = format!("{:x}", hasher.finalize());

    format!("blk-{}", &digest[..CONTENT_KEY_LEN])
}

/// Content key of an element. Text nodes are joined with spaces so that
/// formatting whitespace between child elements does not change the key.
pub fn element_key(element: &ElementRef<'_>) -> String {
    let text = element.text().collect::<Vec<_>>().join(" ");
    content_key(element.value().name(), &text)
}

/// Top-level elements of an HTML fragment, in order.
pub fn top_level_elements(fragment: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    fragment.root_element().children().filter_map(ElementRef::wrap)
}

fn split_blocks(html: &str) -> Vec<RenderedBlock> {
    let fragment = Html::parse_fragment(html);
    let mut seen: HashMap<String, usize> = HashMap::new();

    top_level_elements(&fragment)
        .enumerate()
        .map(|(index, element)| {
            let tag = element.value().name().to_ascii_lowercase();
            let text: String = element.text().collect();
            let key = element_key(&element);

            let count = seen.entry(key.clone()).or_insert(0);
            *count += 1;
            let id = if *count == 1 {
                key.clone()
            } else {
                format!("{}-{}", key, count)
            };

            RenderedBlock {
                index,
                id,
                content_key: key,
                anchor: element.value().attr("id").map(str::to_string),
                tag,
                text,
                html: element.html(),
            }
        })
        .collect()
}

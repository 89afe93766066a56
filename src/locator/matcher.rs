// file: src/locator/matcher.rs
// description: finds the rendered blocks a cited html fragment came from
// reference: longest contiguous run alignment over block tag names

use crate::config::LocatorConfig;
use crate::locator::fragment::parse_fragment;
use crate::parser::markdown::RenderedDocument;
use serde::Serialize;
use std::ops::Range;
use tracing::{debug, warn};

/// A contiguous run of haystack positions, `len >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchRange {
    pub start: usize,
    pub len: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Every fragment block matched a rendered block by content key.
    ContentKey,
    /// Fallback: longest run of equal tag names.
    TagRun,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub range: MatchRange,
    pub strategy: MatchStrategy,
    pub scroll_target: String,
    pub block_ids: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SectionLocator {
    extend_highlight: bool,
}

impl MatchRange {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Positions to highlight. With `extend`, one extra trailing position is
    /// included, never past `haystack_len`.
    pub fn highlight_range(&self, haystack_len: usize, extend: bool) -> Range<usize> {
        let end = if extend { self.end() + 1 } else { self.end() };
        self.start.min(haystack_len)..end.min(haystack_len)
    }
}

impl SectionLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &LocatorConfig) -> Self {
        Self {
            extend_highlight: config.extend_highlight,
        }
    }

    pub fn with_extend_highlight(mut self, extend: bool) -> Self {
        self.extend_highlight = extend;
        self
    }

    /// For every start in `haystack`, counts how many consecutive positions
    /// agree with `needle` from its first element, stopping at the first
    /// mismatch. Returns the longest such run; ties go to the earliest start.
    pub fn find_longest_run<N, H>(needle: &[N], haystack: &[H]) -> Option<MatchRange>
    where
        N: AsRef<str>,
        H: AsRef<str>,
    {
        let mut best: Option<MatchRange> = None;

        for start in 0..haystack.len() {
            let len = needle
                .iter()
                .zip(&haystack[start..])
                .take_while(|(n, h)| n.as_ref().eq_ignore_ascii_case(h.as_ref()))
                .count();

            if len > best.map_or(0, |b| b.len) {
                best = Some(MatchRange { start, len });
            }
        }

        best
    }

    /// First position where every key of `keys` lines up with consecutive
    /// rendered blocks.
    pub fn find_by_content_keys(keys: &[String], document: &RenderedDocument) -> Option<MatchRange> {
        if keys.is_empty() || keys.len() > document.blocks.len() {
            return None;
        }

        document
            .blocks
            .windows(keys.len())
            .position(|window| window.iter().zip(keys).all(|(b, k)| &b.content_key == k))
            .map(|start| MatchRange {
                start,
                len: keys.len(),
            })
    }

    /// Locates `fragment_html` inside `document`. `None` means nothing
    /// matched; that is only logged since failing to highlight is cosmetic.
    pub fn locate(&self, document: &RenderedDocument, fragment_html: &str) -> Option<Highlight> {
        let fragment = parse_fragment(fragment_html);
        if fragment.is_empty() || document.is_empty() {
            warn!(
                fragment_blocks = fragment.len(),
                document_blocks = document.len(),
                "No matching elements found"
            );
            return None;
        }

        let keys: Vec<String> = fragment.iter().map(|b| b.content_key.clone()).collect();
        if let Some(range) = Self::find_by_content_keys(&keys, document) {
            debug!("Fragment matched by content at block {}", range.start);
            return Some(self.highlight(document, range, MatchStrategy::ContentKey));
        }

        let needle: Vec<&str> = fragment.iter().map(|b| b.tag.as_str()).collect();
        match Self::find_longest_run(&needle, &document.tag_sequence()) {
            Some(range) => {
                debug!(
                    "Fragment matched by tag run at block {} (length {})",
                    range.start, range.len
                );
                Some(self.highlight(document, range, MatchStrategy::TagRun))
            }
            None => {
                warn!(
                    fragment_tags = ?needle,
                    "No matching elements found"
                );
                None
            }
        }
    }

    /// Highlight for a single block addressed by its stable id.
    pub fn locate_block(&self, document: &RenderedDocument, block_id: &str) -> Option<Highlight> {
        let block = document.block(block_id)?;
        Some(self.highlight(
            document,
            MatchRange {
                start: block.index,
                len: 1,
            },
            MatchStrategy::ContentKey,
        ))
    }

    fn highlight(
        &self,
        document: &RenderedDocument,
        range: MatchRange,
        strategy: MatchStrategy,
    ) -> Highlight {
        let block_ids: Vec<String> = document.blocks
            [range.highlight_range(document.len(), self.extend_highlight)]
            .iter()
            .map(|b| b.id.clone())
            .collect();

        Highlight {
            range,
            strategy,
            scroll_target: document.blocks[range.start].id.clone(),
            block_ids,
        }
    }
}

// file: src/parser/outline.rs
// description: builds the table-of-contents forest from flat heading records
// reference: stack-based nesting of markdown headings

use crate::config::OutlineConfig;
use crate::models::{HeadingRecord, SectionNode};
use crate::parser::headings::{HeadingExtractor, drop_page_title};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct OutlineBuilder {
    extractor: HeadingExtractor,
    drop_page_title: bool,
}

impl OutlineBuilder {
    pub fn new() -> Self {
        Self {
            extractor: HeadingExtractor::new(),
            drop_page_title: true,
        }
    }

    pub fn from_config(config: &OutlineConfig) -> Self {
        Self {
            extractor: HeadingExtractor::from_config(config),
            drop_page_title: config.drop_page_title,
        }
    }

    pub fn with_drop_page_title(mut self, drop: bool) -> Self {
        self.drop_page_title = drop;
        self
    }

    pub fn extractor(&self) -> &HeadingExtractor {
        &self.extractor
    }

    /// Extracts headings from `markdown` and nests them. `page_title` is the
    /// title the page is already displayed under, if known.
    pub fn build(&self, markdown: &str, page_title: Option<&str>) -> Vec<SectionNode> {
        let mut records = self.extractor.extract(markdown);

        if self.drop_page_title
            && let Some(title) = page_title
            && drop_page_title(&mut records, title)
        {
            debug!("Dropped leading heading matching page title {:?}", title);
        }

        build_forest(records)
    }
}

impl Default for OutlineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Nests records by level in one pass.
///
/// `open` holds the path from the current root down to the last heading
/// seen. Each new heading closes every open ancestor whose level is not
/// strictly lower, then becomes a root or the last child of the remaining
/// top, and is itself left open.
pub fn build_forest(records: Vec<HeadingRecord>) -> Vec<SectionNode> {
    let mut roots: Vec<SectionNode> = Vec::new();
    let mut open: Vec<SectionNode> = Vec::new();

    for record in records {
        while open.last().is_some_and(|top| top.level >= record.level) {
            close_top(&mut open, &mut roots);
        }
        open.push(SectionNode::from(record));
    }

    while !open.is_empty() {
        close_top(&mut open, &mut roots);
    }

    roots
}

fn close_top(open: &mut Vec<SectionNode>, roots: &mut Vec<SectionNode>) {
    if let Some(node) = open.pop() {
        match open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => roots.push(node),
        }
    }
}

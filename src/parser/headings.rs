// file: src/parser/headings.rs
// description: line-based markdown heading extraction for the table of contents
// reference: https://docs.rs/regex

use crate::config::OutlineConfig;
use crate::models::HeadingRecord;
use crate::parser::slug::generate_slug;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    static ref HEADING_LINE: Regex = Regex::new(r"^(#{1,6})[ \t]+(.+)$")
        .expect("HEADING_LINE regex is valid");

    static ref INLINE_LINK: Regex = Regex::new(r"\[([^\]]*)\]\([^)]*\)")
        .expect("INLINE_LINK regex is valid");
}

/// Scans raw markdown for ATX heading lines.
///
/// Fenced code is not understood by default, so a `# comment` inside a shell
/// block is reported as a heading. `skip_fenced_code` turns on fence tracking.
#[derive(Debug, Clone)]
pub struct HeadingExtractor {
    skip_fenced_code: bool,
    max_level: u8,
}

impl HeadingExtractor {
    pub fn new() -> Self {
        Self {
            skip_fenced_code: false,
            max_level: 6,
        }
    }

    pub fn from_config(config: &OutlineConfig) -> Self {
        Self {
            skip_fenced_code: config.skip_fenced_code,
            max_level: config.max_level.clamp(1, 6),
        }
    }

    pub fn with_skip_fenced_code(mut self, skip: bool) -> Self {
        self.skip_fenced_code = skip;
        self
    }

    pub fn with_max_level(mut self, max_level: u8) -> Self {
        self.max_level = max_level.clamp(1, 6);
        self
    }

    pub fn extract(&self, markdown: &str) -> Vec<HeadingRecord> {
        let mut records = Vec::new();
        let mut fence: Option<char> = None;

        for line in markdown.lines() {
            if self.skip_fenced_code {
                if let Some(marker) = fence_marker(line) {
                    fence = match fence {
                        Some(open) if open == marker => None,
                        Some(open) => Some(open),
                        None => Some(marker),
                    };
                    continue;
                }
                if fence.is_some() {
                    continue;
                }
            }

            let Some(caps) = HEADING_LINE.captures(line) else {
                continue;
            };

            let level = caps[1].len() as u8;
            if level > self.max_level {
                continue;
            }

            let title = strip_links(caps[2].trim());
            let id = generate_slug(&title);

            records.push(HeadingRecord { level, title, id });
        }

        debug!("Extracted {} headings", records.len());
        records
    }
}

impl Default for HeadingExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Replaces every `[text](url)` with `text`.
pub fn strip_links(title: &str) -> String {
    INLINE_LINK.replace_all(title, "$1").trim().to_string()
}

/// Removes the first level-1 heading when it repeats the page title.
pub fn drop_page_title(records: &mut Vec<HeadingRecord>, page_title: &str) -> bool {
    let page_title = page_title.trim();
    if page_title.is_empty() {
        return false;
    }

    match records.iter().position(|r| r.level == 1) {
        Some(idx) if records[idx].title == page_title => {
            records.remove(idx);
            true
        }
        _ => false,
    }
}

fn fence_marker(line: &str) -> Option<char> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return None;
    }

    let rest = &line[indent..];
    if rest.starts_with("```") {
        Some('`')
    } else if rest.starts_with("~~~") {
        Some('~')
    } else {
        None
    }
}

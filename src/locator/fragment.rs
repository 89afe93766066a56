// file: src/locator/fragment.rs
// description: reduces an html fragment to the block shape the locator aligns on
// reference: https://docs.rs/scraper

use crate::parser::markdown::{element_key, top_level_elements};
use scraper::Html;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentBlock {
    pub tag: String,
    pub content_key: String,
}

/// One entry per top-level element of `html`; loose text between elements is
/// dropped.
pub fn parse_fragment(html: &str) -> Vec<FragmentBlock> {
    let fragment = Html::parse_fragment(html);

    top_level_elements(&fragment)
        .map(|element| FragmentBlock {
            tag: element.value().name().to_ascii_lowercase(),
            content_key: element_key(&element),
        })
        .collect()
}

pub fn tag_sequence(html: &str) -> Vec<String> {
    parse_fragment(html).into_iter().map(|b| b.tag).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tag_sequence_ignores_text_and_nesting() {
        let tags = tag_sequence(
            "leading text<UL class=\"x\"><li>a</li></UL><p>b <em>c</em></p>trailing",
        );
        assert_eq!(tags, vec!["ul", "p"]);
    }

    #[test]
    fn test_loose_list_items() {
        assert_eq!(tag_sequence("<li>a</li><li>b</li>"), vec!["li", "li"]);
    }

    #[test]
    fn test_plain_text_has_no_blocks() {
        assert!(tag_sequence("just words").is_empty());
        assert!(tag_sequence("").is_empty());
    }

    #[test]
    fn test_content_keys_follow_text() {
        let blocks = parse_fragment("<p>Same</p><p class=\"quoted\">Same</p><p>Other</p>");
        assert_eq!(blocks[0].content_key, blocks[1].content_key);
        assert_ne!(blocks[0].content_key, blocks[2].content_key);
    }
}

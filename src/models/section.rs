// file: src/models/section.rs
// description: heading records and the section forest used for the table of contents
// reference: internal data structures

use serde::{Deserialize, Serialize};

/// A single markdown heading in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingRecord {
    pub level: u8,
    pub title: String,
    pub id: String,
}

/// A heading together with the headings nested beneath it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionNode {
    pub id: String,
    pub title: String,
    pub level: u8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SectionNode>,
}

impl SectionNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }

    /// Pre-order search; the first node with a matching id wins.
    pub fn find(&self, id: &str) -> Option<&SectionNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

impl From<HeadingRecord> for SectionNode {
    fn from(record: HeadingRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            level: record.level,
            children: Vec::new(),
        }
    }
}

pub fn flatten_preorder(forest: &[SectionNode]) -> Vec<&SectionNode> {
    let mut out = Vec::new();
    let mut pending: Vec<&SectionNode> = forest.iter().rev().collect();

    while let Some(node) = pending.pop() {
        out.push(node);
        pending.extend(node.children.iter().rev());
    }

    out
}

pub fn find_section<'a>(forest: &'a [SectionNode], id: &str) -> Option<&'a SectionNode> {
    forest.iter().find_map(|root| root.find(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn node(id: &str, level: u8, children: Vec<SectionNode>) -> SectionNode {
        SectionNode {
            id: id.to_string(),
            title: id.to_uppercase(),
            level,
            children,
        }
    }

    #[test]
    fn test_flatten_preorder() {
        let forest = vec![
            node("a", 2, vec![node("a1", 3, vec![node("a1x", 4, vec![])])]),
            node("b", 2, vec![node("b1", 3, vec![])]),
        ];

        let ids: Vec<&str> = flatten_preorder(&forest)
            .into_iter()
            .map(|n| n.id.as_str())
            .collect();

        assert_eq!(ids, vec!["a", "a1", "a1x", "b", "b1"]);
    }

    #[test]
    fn test_find_and_counts() {
        let forest = vec![node("a", 1, vec![node("a1", 2, vec![]), node("a2", 2, vec![])])];

        assert_eq!(forest[0].descendant_count(), 2);
        assert!(!forest[0].is_leaf());
        assert_eq!(find_section(&forest, "a2").map(|n| n.level), Some(2));
        assert!(find_section(&forest, "missing").is_none());
    }

    #[test]
    fn test_leaf_serializes_without_children() {
        let json = serde_json::to_string(&node("x", 2, vec![])).unwrap();
        assert_eq!(json, r#"{"id":"x","title":"X","level":2}"#);
    }
}

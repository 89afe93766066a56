// file: src/models/page.rs
// description: documentation page record served by the docs backend
// reference: internal data structures

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub const PAGE_ERROR_MARKDOWN: &str = "An error occurred while fetching the documentation page.";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentationPage {
    pub id: String,
    pub url: String,
    pub markdown: String,
    pub title: String,
    pub path: String,
}

impl DocumentationPage {
    pub fn new(
        id: impl Into<String>,
        url: impl Into<String>,
        markdown: impl Into<String>,
        title: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            markdown: markdown.into(),
            title: title.into(),
            path: path.into(),
        }
    }

    /// Stand-in record shown when a page could not be fetched.
    pub fn error_placeholder() -> Self {
        Self {
            markdown: PAGE_ERROR_MARKDOWN.to_string(),
            ..Self::default()
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id.is_empty() && self.markdown == PAGE_ERROR_MARKDOWN
    }

    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.markdown.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_missing_fields() {
        let page: DocumentationPage =
            serde_json::from_str(r##"{"id":"42","markdown":"# Hi","title":"Hi"}"##).unwrap();

        assert_eq!(page.id, "42");
        assert_eq!(page.title, "Hi");
        assert!(page.url.is_empty());
        assert!(page.path.is_empty());
    }

    #[test]
    fn test_error_placeholder() {
        let page = DocumentationPage::error_placeholder();
        assert!(page.is_placeholder());
        assert!(page.title.is_empty());
        assert_eq!(page.markdown, PAGE_ERROR_MARKDOWN);

        let real = DocumentationPage::new("1", "https://x", PAGE_ERROR_MARKDOWN, "", "");
        assert!(!real.is_placeholder());
    }

    #[test]
    fn test_hash_consistency() {
        let a = DocumentationPage::new("1", "", "same", "", "");
        let b = DocumentationPage::new("2", "", "same", "", "");
        assert_eq!(a.content_hash(), b.content_hash());
    }
}

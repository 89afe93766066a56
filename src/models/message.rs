// file: src/models/message.rs
// description: chat messages and cited sources exchanged with the RAG backend
// reference: Used for chat history and answer citations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

pub const GREETING: &str = "Hello! I can help you understand this API documentation. Ask me anything about the endpoints, parameters, or workflows.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    #[default]
    Bot,
}

/// A cited passage. `text` is the fragment shown to the user, `url` points
/// back into the documentation (a page URL or an in-page section).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Source {
    pub text: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default = "new_message_id")]
    pub id: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub sender: Sender,

    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub sources: Vec<Source>,
}

fn new_message_id() -> String {
    Uuid::new_v4().to_string()
}

/// Reads an explicit `null` as the type's default. The backend encodes empty
/// lists as `null`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Source {
    pub fn new(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: url.into(),
        }
    }
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: new_message_id(),
            content: content.into(),
            sender: Sender::User,
            timestamp: Utc::now(),
            sources: Vec::new(),
        }
    }

    pub fn bot(content: impl Into<String>, sources: Vec<Source>) -> Self {
        Self {
            id: new_message_id(),
            content: content.into(),
            sender: Sender::Bot,
            timestamp: Utc::now(),
            sources,
        }
    }

    pub fn greeting() -> Self {
        Self::bot(GREETING, Vec::new())
    }

    /// Format as a summary string for display
    pub fn format_summary(&self, max_content_len: usize) -> String {
        let who = match self.sender {
            Sender::User => "you",
            Sender::Bot => "assistant",
        };

        let mut out = format!(
            "[{}] {}: {}",
            self.timestamp.format("%H:%M:%S"),
            who,
            crate::utils::Validator::truncate_text(&self.content, max_content_len)
        );

        for (idx, source) in self.sources.iter().enumerate() {
            out.push_str(&format!(
                "\n  {}. {} ({})",
                idx + 1,
                crate::utils::Validator::truncate_text(&source.text, max_content_len),
                source.url
            ));
        }

        out
    }
}

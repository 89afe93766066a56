// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod message;
pub mod page;
pub mod section;

pub use message::{Message, Sender, Source, null_as_default};
pub use page::DocumentationPage;
pub use section::{HeadingRecord, SectionNode, find_section, flatten_preorder};

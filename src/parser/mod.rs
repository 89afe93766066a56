// file: src/parser/mod.rs
// description: markdown parsing module exports
// reference: internal module structure

pub mod headings;
pub mod markdown;
pub mod outline;
pub mod slug;

pub use headings::{HeadingExtractor, drop_page_title, strip_links};
pub use markdown::{MarkdownRenderer, RenderedBlock, RenderedDocument, content_key};
pub use outline::{OutlineBuilder, build_forest};
pub use slug::generate_slug;

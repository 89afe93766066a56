// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod api;
pub mod config;
pub mod error;
pub mod exporter;
pub mod locator;
pub mod models;
pub mod parser;
pub mod session;
pub mod store;
pub mod utils;

pub use api::DocsApiClient;
pub use config::{ApiConfig, Config, FetchConfig, LocatorConfig, OutlineConfig};
pub use error::{ExplorerError, Result};
pub use exporter::{ExportManifest, JsonExporter};
pub use locator::{Highlight, MatchRange, MatchStrategy, SectionLocator};
pub use models::{DocumentationPage, HeadingRecord, Message, SectionNode, Sender, Source};
pub use parser::{
    HeadingExtractor, MarkdownRenderer, OutlineBuilder, RenderedBlock, RenderedDocument,
    generate_slug,
};
pub use session::{ExplorerSession, FetchStats, ProgressTracker};
pub use store::{ChatStore, MarkdownStore, Store, SubscriptionId};
pub use utils::Validator;

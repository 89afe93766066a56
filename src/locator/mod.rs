// file: src/locator/mod.rs
// description: cited-passage location module exports
// reference: internal module structure

pub mod fragment;
pub mod matcher;

pub use fragment::{FragmentBlock, parse_fragment, tag_sequence};
pub use matcher::{Highlight, MatchRange, MatchStrategy, SectionLocator};

// file: src/api/mod.rs
// description: documentation backend client module exports
// reference: internal module structure

pub mod client;

pub use client::DocsApiClient;

// file: src/session/mod.rs
// description: explorer session module exports
// reference: internal module structure

pub mod explorer;
pub mod progress;

pub use explorer::ExplorerSession;
pub use progress::{FetchStats, ProgressTracker};

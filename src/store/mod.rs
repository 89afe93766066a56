// file: src/store/mod.rs
// description: observable client-side state module exports
// reference: internal module structure

pub mod chat;
pub mod markdown;
pub mod observable;

pub use chat::{ChatState, ChatStore};
pub use markdown::{MarkdownState, MarkdownStore};
pub use observable::{Listener, Store, SubscriptionId};

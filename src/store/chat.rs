// file: src/store/chat.rs
// description: observable chat history
// reference: internal state management

use crate::models::Message;
use crate::store::observable::{Store, SubscriptionId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatState {
    pub messages: Vec<Message>,
}

#[derive(Default)]
pub struct ChatStore {
    inner: Store<ChatState>,
}

impl ChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the conversation with the assistant greeting.
    pub fn with_greeting() -> Self {
        let store = Self::new();
        store.add_message(Message::greeting());
        store
    }

    pub fn messages(&self) -> Vec<Message> {
        self.inner.with_state(|s| s.messages.clone())
    }

    pub fn len(&self) -> usize {
        self.inner.with_state(|s| s.messages.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn last(&self) -> Option<Message> {
        self.inner.with_state(|s| s.messages.last().cloned())
    }

    pub fn add_message(&self, message: Message) {
        self.inner.set_state(|s| s.messages.push(message));
    }

    pub fn clear_messages(&self) {
        self.inner.set_state(|s| s.messages.clear());
    }

    pub fn subscribe(&self, listener: impl Fn(&ChatState) + Send + Sync + 'static) -> SubscriptionId {
        self.inner.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.unsubscribe(id)
    }
}

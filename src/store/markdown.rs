// file: src/store/markdown.rs
// description: observable state for the page currently shown in the viewer
// reference: internal state management

use crate::models::DocumentationPage;
use crate::store::observable::{Store, SubscriptionId};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkdownState {
    pub page: Option<DocumentationPage>,
    pub is_loading: bool,
    pub error: Option<String>,
    /// HTML of a cited passage awaiting highlighting.
    pub active_section: Option<String>,
    /// Heading slug the viewer should scroll to.
    pub active_title: Option<String>,
}

#[derive(Default)]
pub struct MarkdownStore {
    inner: Store<MarkdownState>,
}

impl MarkdownStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MarkdownState {
        self.inner.snapshot()
    }

    pub fn page(&self) -> Option<DocumentationPage> {
        self.inner.with_state(|s| s.page.clone())
    }

    pub fn is_loading(&self) -> bool {
        self.inner.with_state(|s| s.is_loading)
    }

    pub fn set_page(&self, page: DocumentationPage) {
        debug!("Showing page {:?} ({})", page.title, page.id);
        self.inner.set_state(|s| s.page = Some(page));
    }

    pub fn set_loading(&self, is_loading: bool) {
        self.inner.set_state(|s| s.is_loading = is_loading);
    }

    pub fn set_error(&self, error: Option<String>) {
        self.inner.set_state(|s| s.error = error);
    }

    pub fn set_active_section(&self, section: Option<String>) {
        self.inner.set_state(|s| s.active_section = section);
    }

    pub fn set_active_title(&self, title: Option<String>) {
        self.inner.set_state(|s| s.active_title = title);
    }

    pub fn subscribe(
        &self,
        listener: impl Fn(&MarkdownState) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.inner.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_setters_update_only_their_field() {
        let store = MarkdownStore::new();
        store.set_loading(true);
        store.set_page(DocumentationPage::new("1", "https://x", "# A", "A", "/a"));
        store.set_active_title(Some("a".to_string()));

        let state = store.state();
        assert!(state.is_loading);
        assert_eq!(state.page.map(|p| p.id), Some("1".to_string()));
        assert_eq!(state.active_title.as_deref(), Some("a"));
        assert!(state.error.is_none());
        assert!(state.active_section.is_none());
    }

    #[test]
    fn test_subscribers_see_each_change() {
        let store = MarkdownStore::new();
        let loading_flags = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&loading_flags);
        let id = store.subscribe(move |state| sink.lock().push(state.is_loading));

        store.set_loading(true);
        store.set_loading(false);
        assert!(store.unsubscribe(id));
        store.set_loading(true);

        assert_eq!(*loading_flags.lock(), vec![true, false]);
    }
}

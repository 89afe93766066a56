// file: src/store/observable.rs
// description: state owner with listener registration
// reference: https://docs.rs/parking_lot

use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

pub type Listener<S> = Arc<dyn Fn(&S) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Owns a value of `S`. Every mutation notifies subscribers with a snapshot
/// of the new state. Listeners run after the lock is released, so they may
/// read or mutate the store themselves.
pub struct Store<S: Clone> {
    state: RwLock<S>,
    listeners: Mutex<Vec<(SubscriptionId, Listener<S>)>>,
    next_id: AtomicU64,
}

impl<S: Clone> Store<S> {
    pub fn new(initial: S) -> Self {
        Self {
            state: RwLock::new(initial),
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn snapshot(&self) -> S {
        self.state.read().clone()
    }

    /// Runs `f` on a snapshot, so `f` may call back into the store.
    pub fn with_state<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        let snapshot = self.snapshot();
        f(&snapshot)
    }

    pub fn set_state(&self, update: impl FnOnce(&mut S)) {
        let snapshot = {
            let mut state = self.state.write();
            update(&mut state);
            state.clone()
        };
        self.notify(&snapshot);
    }

    pub fn subscribe(&self, listener: impl Fn(&S) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        self.listeners.lock().push((id, Arc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.lock().len()
    }

    fn notify(&self, snapshot: &S) {
        let listeners: Vec<Listener<S>> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();

        trace!("Notifying {} listeners", listeners.len());
        for listener in listeners {
            listener(snapshot);
        }
    }
}

impl<S: Clone + Default> Default for Store<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_set_state_notifies_with_new_state() {
        let store = Store::new(0u32);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        store.subscribe(move |value| sink.lock().push(*value));

        store.set_state(|v| *v += 1);
        store.set_state(|v| *v += 2);

        assert_eq!(*seen.lock(), vec![1, 3]);
        assert_eq!(store.snapshot(), 3);
    }

    #[test]
    fn test_unsubscribe() {
        let store = Store::new(String::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&calls);
        let id = store.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        store.set_state(|s| s.push('a'));
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.set_state(|s| s.push('b'));

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.subscriber_count(), 0);
        assert_eq!(store.with_state(|s| s.len()), 2);
    }

    #[test]
    fn test_listener_may_read_store() {
        let store = Arc::new(Store::new(1u32));
        let observed = Arc::new(AtomicUsize::new(0));

        let inner = Arc::clone(&store);
        let out = Arc::clone(&observed);
        store.subscribe(move |_| {
            out.store(inner.snapshot() as usize, Ordering::SeqCst);
        });

        store.set_state(|v| *v = 7);
        assert_eq!(observed.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn test_with_state_closure_may_write() {
        let store = Store::new(vec![1u32]);

        let len = store.with_state(|items| {
            store.set_state(|v| v.push(items.len() as u32 + 1));
            items.len()
        });

        assert_eq!(len, 1);
        assert_eq!(store.snapshot(), vec![1, 2]);
    }
}

//! In-process record store.
//!
//! Delivers events synchronously on the caller's thread. Used by tests and
//! demos that need a store without a network.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::game::RecordPath;

use super::{RecordStore, SubscriptionHandle, SubscriptionListener};

#[derive(Default)]
pub struct MemoryRecordStore {
    inner: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    next_id: u64,
    data: HashMap<RecordPath, JsonValue>,
    active: Vec<Subscription>,
    /// Every listener ever registered, for replaying late events.
    history: Vec<Subscription>,
    registrations: usize,
    deregistrations: usize,
    refuse_next: Option<String>,
    unreachable: Option<String>,
}

#[derive(Clone)]
struct Subscription {
    id: u64,
    path: RecordPath,
    listener: Arc<dyn SubscriptionListener>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn listeners_for(&self, path: RecordPath) -> Vec<Arc<dyn SubscriptionListener>> {
        self.state()
            .active
            .iter()
            .filter(|s| s.path == path)
            .map(|s| Arc::clone(&s.listener))
            .collect()
    }

    /// Replace the value at `path` and notify its subscribers.
    pub fn set(&self, path: RecordPath, value: JsonValue) {
        self.state().data.insert(path, value.clone());
        for listener in self.listeners_for(path) {
            listener.on_snapshot(value.clone());
        }
    }

    /// Report an error to every subscriber of `path`.
    pub fn fail(&self, path: RecordPath, description: &str) {
        for listener in self.listeners_for(path) {
            listener.on_error(description.to_string());
        }
    }

    /// Make the next `subscribe` call return a connection error.
    pub fn refuse_next_subscribe(&self, description: &str) {
        self.state().refuse_next = Some(description.to_string());
    }

    /// Make `check_connection` fail until cleared with `None`.
    pub fn set_unreachable(&self, description: Option<&str>) {
        self.state().unreachable = description.map(str::to_string);
    }

    /// Listeners ever registered on `path`, in registration order, including
    /// released ones.
    pub fn registered_listeners(&self, path: RecordPath) -> Vec<Arc<dyn SubscriptionListener>> {
        self.state()
            .history
            .iter()
            .filter(|s| s.path == path)
            .map(|s| Arc::clone(&s.listener))
            .collect()
    }

    pub fn active_subscriptions(&self) -> usize {
        self.state().active.len()
    }

    pub fn active_paths(&self) -> Vec<RecordPath> {
        self.state().active.iter().map(|s| s.path).collect()
    }

    pub fn registrations(&self) -> usize {
        self.state().registrations
    }

    pub fn deregistrations(&self) -> usize {
        self.state().deregistrations
    }
}

impl RecordStore for MemoryRecordStore {
    fn subscribe(
        &self,
        path: RecordPath,
        listener: Arc<dyn SubscriptionListener>,
    ) -> Result<SubscriptionHandle> {
        let (id, initial) = {
            let mut state = self.state();
            if let Some(description) = state.refuse_next.take() {
                return Err(Error::Connection(description));
            }

            state.next_id += 1;
            let id = state.next_id;
            let subscription = Subscription {
                id,
                path,
                listener: Arc::clone(&listener),
            };
            state.active.push(subscription.clone());
            state.history.push(subscription);
            state.registrations += 1;
            (id, state.data.get(&path).cloned())
        };

        debug!("Memory store: subscription {} on {}", id, path);

        // Existing data is delivered right away, as a realtime store would.
        if let Some(value) = initial {
            listener.on_snapshot(value);
        }

        Ok(SubscriptionHandle::new(id, path))
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) {
        let mut state = self.state();
        let before = state.active.len();
        state.active.retain(|s| s.id != handle.id());
        if state.active.len() == before {
            warn!("Memory store: unknown subscription {}", handle.id());
            return;
        }
        state.deregistrations += 1;
        debug!("Memory store: released subscription {}", handle.id());
    }

    fn check_connection(&self) -> Result<()> {
        match &self.state().unreachable {
            Some(description) => Err(Error::Connection(description.clone())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameType;
    use serde_json::json;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl SubscriptionListener for Recorder {
        fn on_snapshot(&self, snapshot: JsonValue) {
            self.events.lock().unwrap().push(snapshot.to_string());
        }

        fn on_error(&self, description: String) {
            self.events.lock().unwrap().push(format!("error: {}", description));
        }
    }

    const TRIVIA: RecordPath = RecordPath::Game(GameType::Trivia);

    #[test]
    fn test_set_notifies_subscribers() {
        let store = MemoryRecordStore::new();
        let recorder = Arc::new(Recorder::default());
        let _handle = store.subscribe(TRIVIA, recorder.clone()).unwrap();

        store.set(TRIVIA, json!({"a": 1}));
        store.set(RecordPath::Legacy, json!({"b": 2}));
        store.fail(TRIVIA, "boom");

        let events = recorder.events.lock().unwrap();
        assert_eq!(*events, vec![r#"{"a":1}"#.to_string(), "error: boom".to_string()]);
    }

    #[test]
    fn test_existing_data_delivered_on_subscribe() {
        let store = MemoryRecordStore::new();
        store.set(TRIVIA, json!({"a": 1}));

        let recorder = Arc::new(Recorder::default());
        let _handle = store.subscribe(TRIVIA, recorder.clone()).unwrap();

        assert_eq!(recorder.events.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let store = MemoryRecordStore::new();
        let recorder = Arc::new(Recorder::default());
        let handle = store.subscribe(TRIVIA, recorder.clone()).unwrap();

        store.unsubscribe(handle);
        store.set(TRIVIA, json!({"a": 1}));

        assert!(recorder.events.lock().unwrap().is_empty());
        assert_eq!(store.active_subscriptions(), 0);
        assert_eq!(store.registrations(), 1);
        assert_eq!(store.deregistrations(), 1);
        assert_eq!(store.registered_listeners(TRIVIA).len(), 1);
    }

    #[test]
    fn test_refused_subscribe() {
        let store = MemoryRecordStore::new();
        store.refuse_next_subscribe("offline");

        let result = store.subscribe(TRIVIA, Arc::new(Recorder::default()));
        assert!(matches!(result, Err(Error::Connection(_))));
        assert_eq!(store.registrations(), 0);

        assert!(store.subscribe(TRIVIA, Arc::new(Recorder::default())).is_ok());
    }

    #[test]
    fn test_check_connection() {
        let store = MemoryRecordStore::new();
        assert!(store.check_connection().is_ok());
        store.set_unreachable(Some("dns"));
        assert!(store.check_connection().is_err());
        store.set_unreachable(None);
        assert!(store.check_connection().is_ok());
    }
}

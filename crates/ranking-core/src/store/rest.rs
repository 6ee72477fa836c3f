//! Realtime database REST client.
//!
//! Each subscription polls `<database_url>/<path>.json` on its own thread and
//! forwards the body whenever it differs from the previous read. Failures are
//! reported once per outage; polling continues, so a recovered database
//! delivers again without resubscribing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::game::RecordPath;

use super::{RecordStore, SubscriptionHandle, SubscriptionListener};

pub struct RestRecordStore {
    base_url: String,
    auth: Option<String>,
    poll_interval: Duration,
    agent: ureq::Agent,
    next_id: AtomicU64,
    workers: Mutex<HashMap<u64, PollWorker>>,
}

struct PollWorker {
    stopped: Arc<AtomicBool>,
    // Dropping the sender wakes the worker out of its wait.
    _wake: Sender<()>,
}

impl PollWorker {
    fn stop(self) {
        self.stopped.store(true, Ordering::SeqCst);
    }
}

impl RestRecordStore {
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let base_url = config.database_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(Error::ConfigParseError(
                "store.database_url is not set".to_string(),
            ));
        }

        let agent_config = ureq::Agent::config_builder()
            .timeout_global(Some(config.timeout()))
            .build();

        Ok(Self {
            base_url,
            auth: config.auth.clone(),
            poll_interval: config.poll_interval(),
            agent: agent_config.into(),
            next_id: AtomicU64::new(1),
            workers: Mutex::new(HashMap::new()),
        })
    }

    pub fn url_for(&self, path: &RecordPath) -> String {
        format!("{}/{}.json", self.base_url, path)
    }

    fn fetch(agent: &ureq::Agent, url: &str, auth: Option<&str>) -> Result<String> {
        let mut request = agent.get(url);
        if let Some(token) = auth {
            request = request.query("auth", token);
        }
        let mut response = request.call()?;
        let body = response.body_mut().read_to_string()?;
        Ok(body)
    }
}

impl RecordStore for RestRecordStore {
    fn subscribe(
        &self,
        path: RecordPath,
        listener: Arc<dyn SubscriptionListener>,
    ) -> Result<SubscriptionHandle> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stopped = Arc::new(AtomicBool::new(false));
        let (wake_tx, wake_rx) = mpsc::channel::<()>();

        let poller = Poller {
            id,
            url: self.url_for(&path),
            auth: self.auth.clone(),
            interval: self.poll_interval,
            agent: self.agent.clone(),
            stopped: Arc::clone(&stopped),
            listener,
        };

        // Detached: the worker exits on its own once stopped.
        let _worker = thread::Builder::new()
            .name(format!("ranking-poll-{}", id))
            .spawn(move || poller.run(wake_rx))?;

        self.workers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                id,
                PollWorker {
                    stopped,
                    _wake: wake_tx,
                },
            );

        info!("Subscribed to {} (subscription {})", path, id);
        Ok(SubscriptionHandle::new(id, path))
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) {
        let worker = self
            .workers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&handle.id());

        match worker {
            Some(worker) => {
                worker.stop();
                info!("Unsubscribed from {} (subscription {})", handle.path(), handle.id());
            }
            None => warn!("Unknown subscription {}", handle.id()),
        }
    }

    fn check_connection(&self) -> Result<()> {
        let url = format!("{}/.json", self.base_url);
        let mut request = self.agent.get(&url).query("shallow", "true");
        if let Some(token) = &self.auth {
            request = request.query("auth", token);
        }
        request
            .call()
            .map_err(|e| Error::Connection(Error::from(e).to_string()))?;
        Ok(())
    }
}

impl Drop for RestRecordStore {
    fn drop(&mut self) {
        let workers = std::mem::take(
            self.workers.get_mut().unwrap_or_else(PoisonError::into_inner),
        );
        for (_, worker) in workers {
            worker.stop();
        }
    }
}

struct Poller {
    id: u64,
    url: String,
    auth: Option<String>,
    interval: Duration,
    agent: ureq::Agent,
    stopped: Arc<AtomicBool>,
    listener: Arc<dyn SubscriptionListener>,
}

impl Poller {
    fn run(self, wake: mpsc::Receiver<()>) {
        let mut state = PollState::default();

        loop {
            let read = RestRecordStore::fetch(&self.agent, &self.url, self.auth.as_deref());

            if self.stopped.load(Ordering::SeqCst) {
                break;
            }

            match state.observe(read) {
                PollAction::Snapshot(value) => {
                    debug!("Subscription {}: snapshot changed", self.id);
                    self.listener.on_snapshot(value);
                }
                PollAction::Error(description) => {
                    warn!("Subscription {}: {}", self.id, description);
                    self.listener.on_error(description);
                }
                PollAction::Unchanged => {}
            }

            match wake.recv_timeout(self.interval) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
            if self.stopped.load(Ordering::SeqCst) {
                break;
            }
        }

        debug!("Subscription {}: poller exiting", self.id);
    }
}

/// What a poller forwards after one read.
#[derive(Debug, PartialEq)]
enum PollAction {
    Snapshot(JsonValue),
    Error(String),
    Unchanged,
}

/// Per-subscription memory of the last delivered body and outage state.
#[derive(Debug, Default)]
struct PollState {
    last_body: Option<String>,
    failing: bool,
}

impl PollState {
    fn observe(&mut self, read: Result<String>) -> PollAction {
        let parsed = read.and_then(|body| {
            if self.last_body.as_deref() == Some(body.as_str()) {
                return Ok(None);
            }
            let value: JsonValue = serde_json::from_str(&body)?;
            Ok(Some((body, value)))
        });

        match parsed {
            Ok(None) => {
                self.failing = false;
                PollAction::Unchanged
            }
            Ok(Some((body, value))) => {
                self.failing = false;
                self.last_body = Some(body);
                PollAction::Snapshot(value)
            }
            Err(_) if self.failing => PollAction::Unchanged,
            Err(e) => {
                self.failing = true;
                // The first good read after an outage is always delivered.
                self.last_body = None;
                PollAction::Error(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameType;
    use serde_json::json;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::time::Instant;

    fn config(url: &str) -> StoreConfig {
        StoreConfig {
            database_url: url.to_string(),
            ..StoreConfig::default()
        }
    }

    #[test]
    fn test_requires_database_url() {
        let result = RestRecordStore::new(&config(""));
        assert!(matches!(result, Err(Error::ConfigParseError(_))));
    }

    #[test]
    fn test_url_for_paths() {
        let store = RestRecordStore::new(&config("https://db.example.com/")).unwrap();
        assert_eq!(
            store.url_for(&RecordPath::Game(GameType::Memotest)),
            "https://db.example.com/games/memotest/usuarios.json"
        );
        assert_eq!(
            store.url_for(&RecordPath::Legacy),
            "https://db.example.com/usuarios.json"
        );
    }

    #[test]
    fn test_unknown_unsubscribe_is_ignored() {
        let store = RestRecordStore::new(&config("https://db.example.com")).unwrap();
        store.unsubscribe(SubscriptionHandle::new(42, RecordPath::Legacy));
        assert!(store.workers.lock().unwrap().is_empty());
    }

    fn body(text: &str) -> Result<String> {
        Ok(text.to_string())
    }

    fn outage() -> Result<String> {
        Err(Error::Connection("connection refused".to_string()))
    }

    #[test]
    fn test_first_read_is_delivered() {
        let mut state = PollState::default();
        assert_eq!(
            state.observe(body(r#"{"a":{"Puntaje":"1"}}"#)),
            PollAction::Snapshot(json!({"a": {"Puntaje": "1"}}))
        );
    }

    #[test]
    fn test_null_body_is_delivered() {
        let mut state = PollState::default();
        assert_eq!(state.observe(body("null")), PollAction::Snapshot(JsonValue::Null));
        assert_eq!(state.observe(body("null")), PollAction::Unchanged);
    }

    #[test]
    fn test_only_changed_bodies_are_delivered() {
        let mut state = PollState::default();
        assert!(matches!(state.observe(body(r#"{"a":1}"#)), PollAction::Snapshot(_)));
        assert_eq!(state.observe(body(r#"{"a":1}"#)), PollAction::Unchanged);
        assert_eq!(state.observe(body(r#"{"a":1}"#)), PollAction::Unchanged);
        assert_eq!(
            state.observe(body(r#"{"a":2}"#)),
            PollAction::Snapshot(json!({"a": 2}))
        );
    }

    #[test]
    fn test_error_reported_once_per_outage() {
        let mut state = PollState::default();
        assert!(matches!(state.observe(outage()), PollAction::Error(_)));
        assert_eq!(state.observe(outage()), PollAction::Unchanged);
        assert_eq!(state.observe(outage()), PollAction::Unchanged);

        assert!(matches!(state.observe(body("{}")), PollAction::Snapshot(_)));

        // A new outage is reported again.
        match state.observe(outage()) {
            PollAction::Error(description) => assert!(description.contains("refused")),
            other => panic!("Expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_same_body_after_outage_is_delivered_again() {
        let mut state = PollState::default();
        assert!(matches!(state.observe(body(r#"{"a":1}"#)), PollAction::Snapshot(_)));
        assert!(matches!(state.observe(outage()), PollAction::Error(_)));
        assert_eq!(
            state.observe(body(r#"{"a":1}"#)),
            PollAction::Snapshot(json!({"a": 1}))
        );
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let mut state = PollState::default();
        assert!(matches!(state.observe(body("{not json")), PollAction::Error(_)));
        assert_eq!(state.observe(body("{not json")), PollAction::Unchanged);
        assert!(matches!(state.observe(body("{}")), PollAction::Snapshot(_)));
    }

    #[derive(Default)]
    struct RecordingListener {
        snapshots: Mutex<Vec<JsonValue>>,
        errors: Mutex<Vec<String>>,
    }

    impl RecordingListener {
        fn snapshot_count(&self) -> usize {
            self.snapshots.lock().unwrap().len()
        }
    }

    impl SubscriptionListener for RecordingListener {
        fn on_snapshot(&self, snapshot: JsonValue) {
            self.snapshots.lock().unwrap().push(snapshot);
        }

        fn on_error(&self, description: String) {
            self.errors.lock().unwrap().push(description);
        }
    }

    /// Serve `/...json` over plain HTTP on a local port. `respond` gets the
    /// 1-based request number and returns the body.
    fn serve<F>(respond: F) -> (String, Arc<AtomicU64>)
    where
        F: Fn(u64) -> String + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&requests);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                let body = respond(n);
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes());
            }
        });

        (url, requests)
    }

    fn fast_store(url: &str) -> RestRecordStore {
        RestRecordStore::new(&StoreConfig {
            database_url: url.to_string(),
            poll_interval_ms: 0,
            timeout_secs: 2,
            ..StoreConfig::default()
        })
        .unwrap()
    }

    fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(20));
        }
        false
    }

    #[test]
    fn test_unchanged_data_is_delivered_once() {
        let (url, requests) = serve(|_| r#"{"a":{"Nombre":"Ana","Puntaje":"5"}}"#.to_string());
        let store = fast_store(&url);
        let listener = Arc::new(RecordingListener::default());

        let handle = store
            .subscribe(RecordPath::Game(GameType::Memotest), listener.clone())
            .unwrap();
        assert!(wait_until(|| requests.load(Ordering::SeqCst) >= 3));
        store.unsubscribe(handle);

        assert_eq!(listener.snapshot_count(), 1);
        assert!(listener.errors.lock().unwrap().is_empty());
    }

    #[test]
    fn test_nothing_delivered_after_unsubscribe() {
        let (url, requests) = serve(|n| format!(r#"{{"a":{{"Nombre":"Ana","Puntaje":"{}"}}}}"#, n));
        let store = fast_store(&url);
        let listener = Arc::new(RecordingListener::default());

        let handle = store
            .subscribe(RecordPath::Game(GameType::Trivia), listener.clone())
            .unwrap();
        assert!(wait_until(|| listener.snapshot_count() >= 2));

        store.unsubscribe(handle);
        assert!(store.workers.lock().unwrap().is_empty());

        // Let a read that was already in flight finish.
        thread::sleep(Duration::from_millis(300));
        let delivered = listener.snapshot_count();
        let served = requests.load(Ordering::SeqCst);

        thread::sleep(Duration::from_millis(500));
        assert_eq!(listener.snapshot_count(), delivered);
        assert_eq!(requests.load(Ordering::SeqCst), served);
    }
}

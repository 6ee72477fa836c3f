//! Live ranking controller.
//!
//! Owns at most one record store subscription and turns the snapshots it
//! receives into the latest [`RankingList`]. Every `start`/`stop` bumps an
//! epoch; events tagged with an older epoch are dropped, so a snapshot still
//! in flight from an abandoned subscription never reaches the new state.
//!
//! Snapshot handling (projection and state replacement) runs under one mutex,
//! so events are applied one at a time in delivery order.

mod status;

pub use status::RankingStatus;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

use crate::game::RecordPath;
use crate::ranking::{RankingList, project};
use crate::store::{RecordStore, SubscriptionHandle, SubscriptionListener};

/// Shown when a snapshot cannot be interpreted.
pub const MALFORMED_SNAPSHOT_MESSAGE: &str = "Could not read ranking data";

/// Called with the new status after every change, while the controller's
/// lock is held. Must not call back into the controller.
pub type StatusObserver = Box<dyn Fn(&RankingStatus) + Send + Sync>;

pub struct LiveRankingController<S: RecordStore + ?Sized> {
    store: Arc<S>,
    shared: Arc<Shared>,
}

struct Shared {
    state: Mutex<ControllerState>,
    observer: Option<StatusObserver>,
}

#[derive(Default)]
struct ControllerState {
    epoch: u64,
    revision: u64,
    status: RankingStatus,
    subscription: Option<SubscriptionHandle>,
}

enum StoreEvent {
    Snapshot(JsonValue),
    Error(String),
}

impl<S: RecordStore + ?Sized> LiveRankingController<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::build(store, None)
    }

    pub fn with_observer(store: Arc<S>, observer: StatusObserver) -> Self {
        Self::build(store, Some(observer))
    }

    fn build(store: Arc<S>, observer: Option<StatusObserver>) -> Self {
        Self {
            store,
            shared: Arc::new(Shared {
                state: Mutex::new(ControllerState::default()),
                observer,
            }),
        }
    }

    /// Subscribe to `path`, releasing any current subscription first.
    ///
    /// Subscription failures are reported through [`RankingStatus::Failed`].
    pub fn start(&self, path: RecordPath) {
        let (epoch, previous) = {
            let mut state = self.shared.lock();
            state.epoch += 1;
            let previous = state.subscription.take();
            self.shared
                .set_status(&mut state, RankingStatus::Loading { path });
            (state.epoch, previous)
        };

        if let Some(handle) = previous {
            debug!("Releasing subscription {} on {}", handle.id(), handle.path());
            self.store.unsubscribe(handle);
        }

        info!("Watching ranking at {}", path);
        let listener = Arc::new(EpochListener {
            shared: Arc::downgrade(&self.shared),
            epoch,
        });

        match self.store.subscribe(path, listener) {
            Ok(handle) => {
                let mut state = self.shared.lock();
                if state.epoch == epoch {
                    state.subscription = Some(handle);
                } else {
                    // A concurrent start/stop already replaced this one.
                    drop(state);
                    self.store.unsubscribe(handle);
                }
            }
            Err(e) => {
                warn!("Failed to subscribe to {}: {}", path, e);
                self.shared.handle(epoch, StoreEvent::Error(e.to_string()));
            }
        }
    }

    /// Release the current subscription and return to idle.
    pub fn stop(&self) {
        let previous = {
            let mut state = self.shared.lock();
            state.epoch += 1;
            let previous = state.subscription.take();
            if state.status != RankingStatus::Idle {
                self.shared.set_status(&mut state, RankingStatus::Idle);
            }
            previous
        };

        if let Some(handle) = previous {
            info!("Stopped watching {}", handle.path());
            self.store.unsubscribe(handle);
        }
    }

    pub fn status(&self) -> RankingStatus {
        self.shared.lock().status.clone()
    }

    /// Latest ranking, if the controller is ready.
    pub fn ranking(&self) -> Option<Arc<RankingList>> {
        self.shared.lock().status.ranking().cloned()
    }

    /// Incremented on every status change.
    pub fn revision(&self) -> u64 {
        self.shared.lock().revision
    }

    pub fn current_path(&self) -> Option<RecordPath> {
        self.shared.lock().status.path()
    }

    pub fn is_subscribed(&self) -> bool {
        self.shared.lock().subscription.is_some()
    }
}

impl<S: RecordStore + ?Sized> Drop for LiveRankingController<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_status(&self, state: &mut ControllerState, status: RankingStatus) {
        state.status = status;
        state.revision += 1;
        if let Some(observer) = &self.observer {
            observer(&state.status);
        }
    }

    fn handle(&self, epoch: u64, event: StoreEvent) {
        let mut state = self.lock();
        if state.epoch != epoch {
            debug!(
                "Dropping event from stale subscription (epoch {}, current {})",
                epoch, state.epoch
            );
            return;
        }
        let Some(path) = state.status.path() else {
            return;
        };

        let status = match event {
            StoreEvent::Snapshot(snapshot) => match project(&snapshot) {
                Ok(ranking) => {
                    debug!("Ranking at {} updated: {} entries", path, ranking.len());
                    RankingStatus::Ready {
                        path,
                        ranking: Arc::new(ranking),
                    }
                }
                Err(e) => {
                    warn!("Rejected snapshot at {}: {}", path, e);
                    RankingStatus::Failed {
                        path,
                        message: MALFORMED_SNAPSHOT_MESSAGE.to_string(),
                    }
                }
            },
            StoreEvent::Error(description) => {
                warn!("Store error at {}: {}", path, description);
                RankingStatus::Failed {
                    path,
                    message: description,
                }
            }
        };

        self.set_status(&mut state, status);
    }
}

/// Forwards store events tagged with the epoch they were subscribed under.
struct EpochListener {
    shared: Weak<Shared>,
    epoch: u64,
}

impl SubscriptionListener for EpochListener {
    fn on_snapshot(&self, snapshot: JsonValue) {
        if let Some(shared) = self.shared.upgrade() {
            shared.handle(self.epoch, StoreEvent::Snapshot(snapshot));
        }
    }

    fn on_error(&self, description: String) {
        if let Some(shared) = self.shared.upgrade() {
            shared.handle(self.epoch, StoreEvent::Error(description));
        }
    }
}

//! Record store abstraction.
//!
//! A record store delivers the full contents of a subscribed path every time
//! it changes. Implementations call their listener from whatever thread they
//! own; listeners must not assume the caller.

mod memory;
mod rest;
pub mod shared;

pub use memory::MemoryRecordStore;
pub use rest::RestRecordStore;

use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::error::Result;
use crate::game::RecordPath;

/// Receives events for one subscription.
pub trait SubscriptionListener: Send + Sync {
    /// Full value at the subscribed path; `Null` when the path is empty.
    fn on_snapshot(&self, snapshot: JsonValue);

    /// Transport or decoding failure, as a human-readable description.
    fn on_error(&self, description: String);
}

/// Registration returned by [`RecordStore::subscribe`].
///
/// Not `Clone`: giving it back to [`RecordStore::unsubscribe`] consumes it,
/// so every subscription is released at most once.
#[derive(Debug, PartialEq, Eq)]
pub struct SubscriptionHandle {
    id: u64,
    path: RecordPath,
}

impl SubscriptionHandle {
    pub fn new(id: u64, path: RecordPath) -> Self {
        Self { id, path }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn path(&self) -> RecordPath {
        self.path
    }
}

pub trait RecordStore: Send + Sync {
    /// Start delivering snapshots of `path` to `listener`.
    fn subscribe(
        &self,
        path: RecordPath,
        listener: Arc<dyn SubscriptionListener>,
    ) -> Result<SubscriptionHandle>;

    /// Stop delivering to the subscription. No event for it is delivered
    /// after this returns, except one already executing.
    fn unsubscribe(&self, handle: SubscriptionHandle);

    /// Check that the store is reachable.
    fn check_connection(&self) -> Result<()>;
}

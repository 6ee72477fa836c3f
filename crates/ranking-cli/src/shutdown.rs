//! Shutdown signal shared between the Ctrl+C handler and the main loop.

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

use anyhow::Result;

#[derive(Default)]
pub struct ShutdownSignal {
    triggered: Mutex<bool>,
    condvar: Condvar,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        *self.triggered.lock().unwrap_or_else(PoisonError::into_inner) = true;
        self.condvar.notify_all();
    }

    pub fn is_shutdown(&self) -> bool {
        *self.triggered.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wait up to `timeout`; returns true if shutdown was triggered.
    pub fn wait(&self, timeout: Duration) -> bool {
        let guard = self.triggered.lock().unwrap_or_else(PoisonError::into_inner);
        let (guard, _) = self
            .condvar
            .wait_timeout_while(guard, timeout, |triggered| !*triggered)
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }
}

/// Install a Ctrl+C handler that triggers the returned signal.
pub fn install() -> Result<Arc<ShutdownSignal>> {
    let shutdown = Arc::new(ShutdownSignal::new());
    let shutdown_ctrlc = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        shutdown_ctrlc.trigger();
    })?;
    Ok(shutdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_wait_times_out() {
        let signal = ShutdownSignal::new();
        assert!(!signal.wait(Duration::from_millis(10)));
        assert!(!signal.is_shutdown());
    }

    #[test]
    fn test_trigger_wakes_waiter() {
        let signal = Arc::new(ShutdownSignal::new());
        let remote = Arc::clone(&signal);
        let handle = thread::spawn(move || remote.trigger());

        assert!(signal.wait(Duration::from_secs(5)));
        handle.join().unwrap();
        assert!(signal.is_shutdown());
    }
}

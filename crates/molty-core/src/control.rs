//! Cooperative stop signal shared between the game loop and the process.
//!
//! The signal handler (or a test) calls [`StopSignal::request_stop`]; the
//! loop checks [`StopSignal::is_stop_requested`] before every phase and
//! races every sleep against [`StopSignal::wait`].

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

/// Shared stop request flag with wake-up notification.
#[derive(Debug, Default)]
pub struct StopSignal {
    /// Whether a stop has been requested.
    stop_requested: AtomicBool,

    /// Wakes a sleeping loop when a stop is requested.
    notify: Notify,
}

impl StopSignal {
    /// Create a signal with no stop requested.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a clean stop and wake any waiter.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.notify.notify_waiters();
        // Also store a permit for a waiter that has not registered yet.
        self.notify.notify_one();
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Resolve once a stop has been requested.
    ///
    /// Returns immediately if the stop was requested earlier.
    pub async fn wait(&self) {
        while !self.is_stop_requested() {
            self.notify.notified().await;
        }
    }
}

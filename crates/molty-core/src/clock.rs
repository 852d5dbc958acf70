//! Wall-clock access and the daily maintenance window.
//!
//! The game loop never calls `Utc::now` or `tokio::time::sleep` directly.
//! Both go through [`Clock`] so tests can drive a simulated day in
//! microseconds.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Source of the current time and of delays.
pub trait Clock: Send + Sync {
    /// Current UTC time.
    fn now(&self) -> DateTime<Utc>;

    /// Wait for `duration`.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// [`Clock`] backed by the system time and the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

/// A fixed daily UTC interval during which the game server is down.
///
/// Both ends are inclusive: with the default window, 09:30:00 and
/// 10:30:00 are inside, 10:30:01 is outside. Windows that wrap midnight
/// (`start > end`) are supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceWindow {
    /// Start of the window, inclusive.
    pub start: NaiveTime,
    /// End of the window, inclusive.
    pub end: NaiveTime,
}

impl MaintenanceWindow {
    /// Build a window from `HH:MM` bounds.
    pub const fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Whether `now` falls inside the window.
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        let time = now.time();
        if self.start <= self.end {
            self.start <= time && time <= self.end
        } else {
            time >= self.start || time <= self.end
        }
    }
}

impl Default for MaintenanceWindow {
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(9, 30, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(10, 30, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

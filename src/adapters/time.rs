//! Wall-clock adapter.
//!
//! The controller takes `now` as plain epoch seconds; this is where the
//! daemon gets them.  Sensor debounce and the refresh cycle only need
//! seconds, request deadlines use the monotonic clock separately.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// UTC seconds since the Unix epoch; 0 if the clock is before it.
    pub fn now_secs(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    /// Seconds since this clock was created (monotonic).
    pub fn uptime_secs(&self) -> u64 {
        self.start.elapsed().as_secs()
    }
}

//! Busy-wait delay for RF pulse timing.
//!
//! `thread::sleep` overshoots by tens of microseconds on a Pi; RF receivers
//! decode by pulse width, so the transmitter spins on the monotonic clock.

use std::time::{Duration, Instant};

use embedded_hal::delay::DelayNs;

#[derive(Debug, Clone, Copy, Default)]
pub struct SpinDelay;

impl DelayNs for SpinDelay {
    fn delay_ns(&mut self, ns: u32) {
        let until = Instant::now() + Duration::from_nanos(u64::from(ns));
        while Instant::now() < until {
            core::hint::spin_loop();
        }
    }
}

/// Delay that returns immediately and sums what it was asked for.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay {
    pub total_ns: u64,
}

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

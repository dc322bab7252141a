//! Level-sensor debounce (rain / soil).
//!
//! ```text
//!   raw active   ──▶ arm On(now + delay)  ──(now > deadline)──▶ latch active
//!   raw inactive ──▶ arm Off(now + delay) ──(now > deadline)──▶ latch inactive
//! ```
//!
//! Only one deadline exists at a time; arming one replaces the other.
//! Delays are floored at [`MIN_DELAY_SECS`] to reject glitches.

/// Minimum on/off delay, seconds.
pub const MIN_DELAY_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Armed {
    #[default]
    None,
    On(u64),
    Off(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LevelSensor {
    armed: Armed,
    active: bool,
    last_active: Option<u64>,
}

fn delay_secs(minutes: u8) -> u64 {
    (u64::from(minutes) * 60).max(MIN_DELAY_SECS)
}

impl LevelSensor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Debounced state.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Time the sensor last latched active.
    pub fn last_active(&self) -> Option<u64> {
        self.last_active
    }

    /// Pending on-delay deadline, if armed.
    pub fn on_deadline(&self) -> Option<u64> {
        match self.armed {
            Armed::On(t) => Some(t),
            _ => None,
        }
    }

    /// Pending off-delay deadline, if armed.
    pub fn off_deadline(&self) -> Option<u64> {
        match self.armed {
            Armed::Off(t) => Some(t),
            _ => None,
        }
    }

    /// Feed one raw sample.  Returns the new debounced state when it changes.
    pub fn poll(&mut self, raw_active: bool, now: u64, on_delay_min: u8, off_delay_min: u8) -> Option<bool> {
        let before = self.active;
        match (raw_active, self.armed) {
            (true, Armed::On(deadline)) => {
                if now > deadline {
                    self.active = true;
                }
            }
            (true, _) => self.armed = Armed::On(now + delay_secs(on_delay_min)),
            (false, Armed::Off(deadline)) => {
                if now > deadline {
                    self.active = false;
                }
            }
            (false, _) => self.armed = Armed::Off(now + delay_secs(off_delay_min)),
        }
        if self.active == before {
            return None;
        }
        if self.active {
            self.last_active = Some(now);
        }
        Some(self.active)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

//! Program-switch edge detector.
//!
//! A press is a raw-active sample followed by a raw-inactive sample at a
//! later time.  One press yields exactly one event; holding the switch
//! yields nothing until release.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgramSwitch {
    pressed_at: Option<u64>,
}

impl ProgramSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_down(&self) -> bool {
        self.pressed_at.is_some()
    }

    /// Feed one raw sample.  Returns `true` on the release that completes a press.
    pub fn poll(&mut self, raw_active: bool, now: u64) -> bool {
        match (raw_active, self.pressed_at) {
            (true, None) => {
                self.pressed_at = Some(now);
                false
            }
            (false, Some(t)) if now > t => {
                self.pressed_at = None;
                true
            }
            _ => false,
        }
    }

    pub fn reset(&mut self) {
        self.pressed_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_fires_once() {
        let mut p = ProgramSwitch::new();
        assert!(!p.poll(false, 0));
        assert!(!p.poll(true, 1));
        assert!(!p.poll(true, 2));
        assert!(p.poll(false, 3));
        assert!(!p.poll(false, 4));
    }

    #[test]
    fn release_in_same_second_waits() {
        let mut p = ProgramSwitch::new();
        p.poll(true, 10);
        assert!(!p.poll(false, 10));
        assert!(p.is_down());
        assert!(p.poll(false, 11));
    }
}

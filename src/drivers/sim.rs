//! Simulated output pins for host runs and tests.
//!
//! Every [`SimPin`] appends `(gpio, level)` to a shared [`PinLog`], so a
//! whole bus can be checked for ordering after the fact.

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, OutputPin};

/// Shared, ordered record of pin writes.
#[derive(Debug, Clone, Default)]
pub struct PinLog {
    writes: Rc<RefCell<Vec<(u8, bool)>>>,
    /// Cap on retained entries; 0 keeps everything.
    limit: usize,
}

impl PinLog {
    /// Log that keeps only the most recent `limit` writes.
    pub fn bounded(limit: usize) -> Self {
        Self {
            writes: Rc::default(),
            limit,
        }
    }

    fn push(&self, gpio: u8, level: bool) {
        let mut w = self.writes.borrow_mut();
        if self.limit != 0 && w.len() >= self.limit {
            w.remove(0);
        }
        w.push((gpio, level));
    }

    pub fn writes(&self) -> Vec<(u8, bool)> {
        self.writes.borrow().clone()
    }

    /// Last level written to `gpio`.
    pub fn level(&self, gpio: u8) -> Option<bool> {
        self.writes
            .borrow()
            .iter()
            .rev()
            .find(|(p, _)| *p == gpio)
            .map(|&(_, l)| l)
    }

    pub fn clear(&self) {
        self.writes.borrow_mut().clear();
    }
}

#[derive(Debug, Clone)]
pub struct SimPin {
    gpio: u8,
    log: PinLog,
}

impl SimPin {
    pub fn new(gpio: u8, log: PinLog) -> Self {
        Self { gpio, log }
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.log.push(self.gpio, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.log.push(self.gpio, true);
        Ok(())
    }
}

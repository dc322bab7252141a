//! Daisy-chained 74HC595 station bus.
//!
//! ## Protocol
//!
//! ```text
//!   latch ▔▔╲______________________________________╱▔▔
//!   clock     ╲╱▔╲╱▔╲╱▔ ... (8 per board, boards high → low)
//!   data      MSB of each frame first
//! ```
//!
//! Output-enable is active-low: high gates every relay off regardless of
//! the shifted pattern.  A shift-out cannot be interrupted part way; a
//! crash mid-sequence leaves stale relays until the next full push.

use embedded_hal::digital::{OutputPin, PinState};

use crate::error::HwError;

pub struct ShiftRegister<P: OutputPin> {
    clock: P,
    latch: P,
    data: P,
    output_enable: P,
}

impl<P: OutputPin> ShiftRegister<P> {
    pub fn new(clock: P, latch: P, data: P, output_enable: P) -> Self {
        Self {
            clock,
            latch,
            data,
            output_enable,
        }
    }

    /// Shift `frames` out in order, MSB first, then latch.
    pub fn shift_out(&mut self, frames: &[u8]) -> Result<(), HwError> {
        let fail = |_| HwError::ShiftOutFailed;
        self.latch.set_low().map_err(fail)?;
        for &frame in frames {
            for bit in (0..8).rev() {
                self.clock.set_low().map_err(fail)?;
                self.data
                    .set_state(PinState::from((frame >> bit) & 1 != 0))
                    .map_err(fail)?;
                self.clock.set_high().map_err(fail)?;
            }
        }
        self.latch.set_high().map_err(fail)
    }

    pub fn set_outputs_enabled(&mut self, enabled: bool) -> Result<(), HwError> {
        self.output_enable
            .set_state(PinState::from(!enabled))
            .map_err(|_| HwError::ShiftOutFailed)
    }

    /// Power-up state: outputs gated off, latch idle high.
    pub fn init(&mut self) -> Result<(), HwError> {
        self.set_outputs_enabled(false)?;
        self.latch.set_high().map_err(|_| HwError::ShiftOutFailed)
    }
}

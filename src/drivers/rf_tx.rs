//! RF transmitter: plays a [`PulseTrain`] on one output line.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};

use crate::dispatch::rf::PulseTrain;
use crate::error::HwError;

pub struct RfTransmitter<P: OutputPin, D: DelayNs> {
    pin: P,
    delay: D,
}

impl<P: OutputPin, D: DelayNs> RfTransmitter<P, D> {
    pub fn new(pin: P, delay: D) -> Self {
        Self { pin, delay }
    }

    /// Drive the line through every pulse, leaving it low.
    pub fn transmit(&mut self, pulses: PulseTrain) -> Result<(), HwError> {
        for p in pulses {
            self.pin
                .set_state(PinState::from(p.high))
                .map_err(|_| HwError::RfTransmitFailed)?;
            self.delay.delay_us(p.duration_us);
        }
        self.pin.set_low().map_err(|_| HwError::RfTransmitFailed)
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }
}

//! Individually addressed GPIO lines: sensor inputs and GPIO-station relays.
//!
//! - [`SimGpio`] — in-memory lines, inputs idle high as with pull-ups.
//! - [`CdevGpio`] — `/dev/gpiochipN` character device via
//!   `linux-embedded-hal` (`hardware` feature).  Lines are requested on
//!   first use and kept open.

use std::collections::HashMap;

use crate::error::HwError;

pub trait GpioPort {
    fn write(&mut self, pin: u8, high: bool) -> Result<(), HwError>;
    fn read(&mut self, pin: u8) -> Result<bool, HwError>;
}

#[derive(Debug, Default, Clone)]
pub struct SimGpio {
    inputs: HashMap<u8, bool>,
    outputs: HashMap<u8, bool>,
}

impl SimGpio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive a simulated input line.
    pub fn set_input(&mut self, pin: u8, high: bool) {
        self.inputs.insert(pin, high);
    }

    /// Last level written to an output line.
    pub fn output(&self, pin: u8) -> Option<bool> {
        self.outputs.get(&pin).copied()
    }
}

impl GpioPort for SimGpio {
    fn write(&mut self, pin: u8, high: bool) -> Result<(), HwError> {
        self.outputs.insert(pin, high);
        Ok(())
    }

    fn read(&mut self, pin: u8) -> Result<bool, HwError> {
        Ok(self.inputs.get(&pin).copied().unwrap_or(true))
    }
}

#[cfg(feature = "hardware")]
pub use cdev::CdevGpio;

#[cfg(feature = "hardware")]
mod cdev {
    use std::collections::HashMap;

    use embedded_hal::digital::{InputPin, OutputPin, PinState};
    use linux_embedded_hal::gpio_cdev::{Chip, LineRequestFlags};
    use linux_embedded_hal::CdevPin;
    use log::{info, warn};

    use super::GpioPort;
    use crate::error::HwError;

    const CONSUMER: &str = "sprinklerd";

    pub struct CdevGpio {
        chip: Chip,
        outputs: HashMap<u8, CdevPin>,
        inputs: HashMap<u8, CdevPin>,
    }

    impl CdevGpio {
        pub fn open(path: &str) -> Result<Self, HwError> {
            let chip = Chip::new(path).map_err(|e| {
                warn!("GPIO: cannot open {}: {}", path, e);
                HwError::GpioWriteFailed(0)
            })?;
            info!("GPIO: using {}", path);
            Ok(Self {
                chip,
                outputs: HashMap::new(),
                inputs: HashMap::new(),
            })
        }

        fn request(&mut self, pin: u8, flags: LineRequestFlags) -> Option<CdevPin> {
            let handle = self
                .chip
                .get_line(u32::from(pin))
                .and_then(|line| line.request(flags, 0, CONSUMER))
                .map_err(|e| warn!("GPIO {}: request failed: {}", pin, e))
                .ok()?;
            CdevPin::new(handle).ok()
        }

        /// Claim `pin` as an output for exclusive use by a driver.
        pub fn output_pin(&mut self, pin: u8) -> Result<CdevPin, HwError> {
            self.request(pin, LineRequestFlags::OUTPUT)
                .ok_or(HwError::GpioWriteFailed(pin))
        }
    }

    impl GpioPort for CdevGpio {
        fn write(&mut self, pin: u8, high: bool) -> Result<(), HwError> {
            if !self.outputs.contains_key(&pin) {
                let p = self.output_pin(pin)?;
                self.outputs.insert(pin, p);
            }
            let line = self
                .outputs
                .get_mut(&pin)
                .ok_or(HwError::GpioWriteFailed(pin))?;
            line.set_state(PinState::from(high))
                .map_err(|_| HwError::GpioWriteFailed(pin))
        }

        fn read(&mut self, pin: u8) -> Result<bool, HwError> {
            if !self.inputs.contains_key(&pin) {
                let p = self
                    .request(pin, LineRequestFlags::INPUT)
                    .ok_or(HwError::GpioReadFailed(pin))?;
                self.inputs.insert(pin, p);
            }
            let line = self
                .inputs
                .get_mut(&pin)
                .ok_or(HwError::GpioReadFailed(pin))?;
            line.is_high().map_err(|_| HwError::GpioReadFailed(pin))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_inputs_idle_high() {
        let mut g = SimGpio::new();
        assert!(g.read(14).unwrap());
        g.set_input(14, false);
        assert!(!g.read(14).unwrap());
    }

    #[test]
    fn sim_records_outputs() {
        let mut g = SimGpio::new();
        assert_eq!(g.output(5), None);
        g.write(5, true).unwrap();
        assert_eq!(g.output(5), Some(true));
    }
}

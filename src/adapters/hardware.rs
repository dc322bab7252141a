//! Hardware adapter — bridges the station bus, RF line and GPIO lines to
//! the domain port traits.
//!
//! Owns the [`ShiftRegister`], the [`RfTransmitter`] and a [`GpioPort`],
//! exposing them through [`ActuatorPort`] and [`SensorPort`].  This is the
//! only module that touches pins.  Two assemblies are provided:
//!
//! - [`HardwareAdapter::simulated`]: [`SimPin`]s logging into a [`PinLog`],
//!   [`SimGpio`] lines, no RF delays.
//! - `HardwareAdapter::open_cdev` (`hardware` feature): character-device
//!   lines with the spin-wait RF delay.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::info;

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::config::PinMap;
use crate::dispatch::rf::PulseTrain;
use crate::drivers::delay::NoDelay;
use crate::drivers::gpio::{GpioPort, SimGpio};
use crate::drivers::rf_tx::RfTransmitter;
use crate::drivers::shift_register::ShiftRegister;
use crate::drivers::sim::{PinLog, SimPin};
use crate::error::HwError;
use crate::sensors::SensorChannel;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<P: OutputPin, D: DelayNs, G: GpioPort> {
    bus: ShiftRegister<P>,
    rf: RfTransmitter<P, D>,
    gpio: G,
    sensor_pins: [u8; 2],
}

impl<P: OutputPin, D: DelayNs, G: GpioPort> HardwareAdapter<P, D, G> {
    pub fn new(bus: ShiftRegister<P>, rf: RfTransmitter<P, D>, gpio: G, sensor_pins: [u8; 2]) -> Self {
        Self {
            bus,
            rf,
            gpio,
            sensor_pins,
        }
    }

    /// Gate the relays off and idle the latch.
    pub fn init(&mut self) -> Result<(), HwError> {
        self.bus.init()
    }

    pub fn gpio(&self) -> &G {
        &self.gpio
    }

    pub fn gpio_mut(&mut self) -> &mut G {
        &mut self.gpio
    }
}

impl HardwareAdapter<SimPin, NoDelay, SimGpio> {
    /// In-memory assembly; every bus and RF write lands in `log`.
    pub fn simulated(pins: &PinMap, legacy_data_pin: bool, log: &PinLog) -> Self {
        let pin = |gpio| SimPin::new(gpio, log.clone());
        info!("Hardware: simulated GPIO");
        Self::new(
            ShiftRegister::new(
                pin(pins.clock),
                pin(pins.latch),
                pin(pins.data_line(legacy_data_pin)),
                pin(pins.output_enable),
            ),
            RfTransmitter::new(pin(pins.rf_tx), NoDelay::default()),
            SimGpio::new(),
            [pins.sensor1, pins.sensor2],
        )
    }
}

#[cfg(feature = "hardware")]
impl
    HardwareAdapter<
        linux_embedded_hal::CdevPin,
        crate::drivers::delay::SpinDelay,
        crate::drivers::gpio::CdevGpio,
    >
{
    /// Claim the bus and RF lines on `chip` (e.g. `/dev/gpiochip0`).
    pub fn open_cdev(chip: &str, pins: &PinMap, legacy_data_pin: bool) -> Result<Self, HwError> {
        let mut gpio = crate::drivers::gpio::CdevGpio::open(chip)?;
        let bus = ShiftRegister::new(
            gpio.output_pin(pins.clock)?,
            gpio.output_pin(pins.latch)?,
            gpio.output_pin(pins.data_line(legacy_data_pin))?,
            gpio.output_pin(pins.output_enable)?,
        );
        let rf = RfTransmitter::new(
            gpio.output_pin(pins.rf_tx)?,
            crate::drivers::delay::SpinDelay,
        );
        Ok(Self::new(bus, rf, gpio, [pins.sensor1, pins.sensor2]))
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<P: OutputPin, D: DelayNs, G: GpioPort> ActuatorPort for HardwareAdapter<P, D, G> {
    fn shift_out(&mut self, frames: &[u8]) -> Result<(), HwError> {
        self.bus.shift_out(frames)
    }

    fn set_outputs_enabled(&mut self, enabled: bool) -> Result<(), HwError> {
        self.bus.set_outputs_enabled(enabled)
    }

    fn transmit_rf(&mut self, pulses: PulseTrain) -> Result<(), HwError> {
        self.rf.transmit(pulses)
    }

    fn write_gpio(&mut self, pin: u8, high: bool) -> Result<(), HwError> {
        self.gpio.write(pin, high)
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<P: OutputPin, D: DelayNs, G: GpioPort> SensorPort for HardwareAdapter<P, D, G> {
    fn read_level(&mut self, channel: SensorChannel) -> Result<bool, HwError> {
        self.gpio.read(self.sensor_pins[channel.index()])
    }
}

//! GPIO pin assignments for the Raspberry Pi controller board (BCM numbering).
//!
//! Single source of truth for the defaults in
//! [`PinMap`](crate::config::PinMap).  Deployments override them through the
//! host configuration file, never by editing drivers.

// ---------------------------------------------------------------------------
// Station shift-register bus (74HC595 daisy chain)
// ---------------------------------------------------------------------------

/// Shift clock: data is sampled on the rising edge.
pub const SR_CLOCK_GPIO: u8 = 4;
/// Storage latch: rising edge commits the shifted pattern to the outputs.
pub const SR_LATCH_GPIO: u8 = 22;
/// Serial data line.
pub const SR_DATA_GPIO: u8 = 27;
/// Serial data line on revision-1 boards.
pub const SR_DATA_ALT_GPIO: u8 = 21;
/// Output enable, active LOW.  Held HIGH until the first push completes.
pub const SR_OE_GPIO: u8 = 17;

// ---------------------------------------------------------------------------
// Sensor inputs (pull-up biased)
// ---------------------------------------------------------------------------

pub const SENSOR1_GPIO: u8 = 14;
pub const SENSOR2_GPIO: u8 = 23;

// ---------------------------------------------------------------------------
// RF transmitter (433 MHz OOK module)
// ---------------------------------------------------------------------------

pub const RF_TX_GPIO: u8 = 15;

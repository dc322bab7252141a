//! Pin-level drivers for the station bus, RF transmitter and GPIO lines.
//!
//! Everything here is generic over `embedded-hal` traits so the same code
//! drives simulated pins in tests and character-device lines on a Pi.

pub mod delay;
pub mod gpio;
pub mod rf_tx;
pub mod shift_register;
pub mod sim;

//! GPIO-station adapter: drive a relay line directly.

use crate::app::ports::ActuatorPort;
use crate::error::HwError;
use crate::stations::kind::GpioTarget;

/// Drive the target line, inverting for active-low relays.
pub fn switch(target: &GpioTarget, on: bool, hw: &mut impl ActuatorPort) -> Result<(), HwError> {
    hw.write_gpio(target.pin, target.level_for(on))
}

//! Integration test driver for the `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that exercises one subsystem through
//! the public [`Controller`](sprinkler::Controller) API against mock
//! adapters.  Everything runs on the host with no real hardware.

mod bootstrap_tests;
mod controller_tests;
mod dispatch_tests;
mod mock_hw;
mod sensor_tests;

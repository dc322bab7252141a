//! Application core — controller state and the port boundary.
//!
//! The [`service::Controller`] owns the option registry, station tables,
//! live station bitmask, status and sensor state.  All interaction with
//! hardware, storage and the network happens through **port traits**
//! defined in [`ports`], keeping this layer testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;

//! Irrigation controller core.
//!
//! Persistent option and station storage, the station-bit actuation
//! engine, special-station dispatch (RF, GPIO, remote, HTTP) and sensor
//! debounce, built around port traits so the domain logic runs the same
//! against mock adapters and real hardware.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod dispatch;
pub mod drivers;
pub mod error;
pub mod net;
pub mod options;
pub mod pins;
pub mod sensors;
pub mod stations;

pub use app::service::{BitChange, Controller, ControllerStatus};
pub use error::{Error, Result};

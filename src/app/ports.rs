//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller (domain)
//! ```
//!
//! Driven adapters (blob store, shift-register bus, RF line, GPIO, TCP,
//! telemetry) implement these traits.  The
//! [`Controller`](super::service::Controller) consumes them via generics, so
//! the domain core never touches hardware or sockets directly.
//!
//! ## Contract notes
//!
//! - **StoragePort** calls are fallible; the controller propagates every error.
//! - **ActuatorPort::shift_out** must not be interrupted mid-sequence.
//! - **NetworkPort** never returns `Err`: failures are classified outcomes.

use crate::dispatch::rf::PulseTrain;
use crate::error::{HwError, StorageError};
use crate::net::{Deadline, Endpoint, RequestOutcome};
use crate::sensors::SensorChannel;

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ flash / filesystem)
// ───────────────────────────────────────────────────────────────

/// Byte-addressable named blobs.
///
/// Reads past the end of an existing blob yield zero bytes; writes past the
/// end extend it with zeros.  Atomicity and durability are the adapter's
/// responsibility.
pub trait StoragePort {
    /// Fill `buf` from `name` starting at `offset`.
    fn read_block(&self, name: &str, offset: u32, buf: &mut [u8]) -> Result<(), StorageError>;

    /// Write `data` into `name` at `offset`, creating the blob if needed.
    fn write_block(&mut self, name: &str, offset: u32, data: &[u8]) -> Result<(), StorageError>;

    /// `true` when the stored bytes at `offset` equal `data`.
    /// A missing blob compares unequal.
    fn compare_block(&self, name: &str, offset: u32, data: &[u8]) -> Result<bool, StorageError>;

    /// Check whether a blob exists without reading it.
    fn exists(&self, name: &str) -> bool;

    /// Delete a blob.  Returns `Ok(())` even if it didn't exist.
    fn remove(&mut self, name: &str) -> Result<(), StorageError>;

    fn read_byte(&self, name: &str, offset: u32) -> Result<u8, StorageError> {
        let mut b = [0u8; 1];
        self.read_block(name, offset, &mut b)?;
        Ok(b[0])
    }

    fn write_byte(&mut self, name: &str, offset: u32, value: u8) -> Result<(), StorageError> {
        self.write_block(name, offset, &[value])
    }
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to move valves.
pub trait ActuatorPort {
    /// Shift `frames` onto the station bus, first byte first, then latch.
    /// `frames[0]` belongs to the highest-indexed board.
    fn shift_out(&mut self, frames: &[u8]) -> Result<(), HwError>;

    /// Drive the bus output-enable line (`true` = outputs live).
    fn set_outputs_enabled(&mut self, enabled: bool) -> Result<(), HwError>;

    /// Play a pulse train on the RF transmitter line.
    fn transmit_rf(&mut self, pulses: PulseTrain) -> Result<(), HwError>;

    /// Drive an arbitrary GPIO line as an output.
    fn write_gpio(&mut self, pin: u8, high: bool) -> Result<(), HwError>;
}

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: raw digital level of a sensor input.
pub trait SensorPort {
    fn read_level(&mut self, channel: SensorChannel) -> Result<bool, HwError>;
}

// ───────────────────────────────────────────────────────────────
// Network port (driven adapter: domain → TCP peers)
// ───────────────────────────────────────────────────────────────

/// The shared request primitive.
pub trait NetworkPort {
    /// Connect to `endpoint`, write `request`, collect the reply until the
    /// peer closes or `deadline` passes.  A non-empty reply is passed to
    /// `on_response` before returning [`RequestOutcome::Success`].
    fn send_request(
        &mut self,
        endpoint: &Endpoint,
        request: &[u8],
        deadline: Deadline,
        on_response: &mut dyn FnMut(&[u8]),
    ) -> RequestOutcome;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (log, InfluxDB, ...).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

//! Outbound application events.
//!
//! The [`Controller`](super::service::Controller) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log them or ship valve telemetry to
//! InfluxDB.

use crate::options::RebootCause;
use crate::sensors::SensorChannel;

/// Structured events emitted by the controller core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A station's commanded bit actually changed.
    StationSwitched { sid: usize, on: bool },

    /// Aggregate "currently active station": `Some(sid)` on turn-on,
    /// `None` on turn-off.
    ActiveStation(Option<usize>),

    /// A level sensor's debounced state latched.
    SensorChanged { channel: SensorChannel, active: bool },

    /// A program-switch press was detected.
    ProgramSwitchPressed(SensorChannel),

    /// Bootstrap finished; `reset` tells which path ran.
    Bootstrapped { reset: bool, previous_cause: RebootCause },
}

//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing controller events through the `log`
//! facade; the daemon routes them into its tracing subscriber.  Also
//! provides [`FanOut`] for feeding two sinks from one emit.

use log::{debug, info};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::StationSwitched { sid, on } => {
                info!("VALVE | s{:02} {}", sid + 1, if *on { "on" } else { "off" });
            }
            AppEvent::ActiveStation(sid) => {
                debug!("VALVE | active={:?}", sid.map(|s| s + 1));
            }
            AppEvent::SensorChanged { channel, active } => {
                info!("SENSOR | {:?} active={}", channel, active);
            }
            AppEvent::ProgramSwitchPressed(channel) => {
                info!("SENSOR | {:?} program switch", channel);
            }
            AppEvent::Bootstrapped {
                reset,
                previous_cause,
            } => {
                info!(
                    "BOOT | {} | last reboot cause {:?}",
                    if *reset { "factory reset" } else { "loaded" },
                    previous_cause
                );
            }
        }
    }
}

/// Forwards every event to both sinks, `A` first.
pub struct FanOut<A, B> {
    pub first: A,
    pub second: B,
}

impl<A: EventSink, B: EventSink> EventSink for FanOut<A, B> {
    fn emit(&mut self, event: &AppEvent) {
        self.first.emit(event);
        self.second.emit(event);
    }
}

impl<T: EventSink> EventSink for Option<T> {
    fn emit(&mut self, event: &AppEvent) {
        if let Some(sink) = self {
            sink.emit(event);
        }
    }
}

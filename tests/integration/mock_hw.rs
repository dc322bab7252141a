//! Recording mocks for every port.
//!
//! Each mock keeps a full call history so tests can assert on ordering
//! without touching GPIO lines or sockets.

use sprinkler::Controller;
use sprinkler::adapters::store::MemStore;
use sprinkler::app::events::AppEvent;
use sprinkler::app::ports::{ActuatorPort, EventSink, NetworkPort, SensorPort};
use sprinkler::dispatch::rf::PulseTrain;
use sprinkler::error::HwError;
use sprinkler::net::{Deadline, Endpoint, RequestOutcome};
use sprinkler::options::Capacity;
use sprinkler::sensors::SensorChannel;

// ── Hardware ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HwCall {
    ShiftOut(Vec<u8>),
    OutputsEnabled(bool),
    Rf { code: u32, pulses: usize },
    Gpio { pin: u8, high: bool },
}

pub struct MockHardware {
    pub calls: Vec<HwCall>,
    /// Raw line level per sensor channel; idle high.
    pub levels: [bool; 2],
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            levels: [true; 2],
        }
    }

    pub fn last_shift(&self) -> Option<&[u8]> {
        self.calls.iter().rev().find_map(|c| match c {
            HwCall::ShiftOut(f) => Some(f.as_slice()),
            _ => None,
        })
    }

    pub fn rf_codes(&self) -> Vec<u32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HwCall::Rf { code, .. } => Some(*code),
                _ => None,
            })
            .collect()
    }

    pub fn set_level(&mut self, ch: SensorChannel, high: bool) {
        self.levels[ch.index()] = high;
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl ActuatorPort for MockHardware {
    fn shift_out(&mut self, frames: &[u8]) -> Result<(), HwError> {
        self.calls.push(HwCall::ShiftOut(frames.to_vec()));
        Ok(())
    }

    fn set_outputs_enabled(&mut self, enabled: bool) -> Result<(), HwError> {
        self.calls.push(HwCall::OutputsEnabled(enabled));
        Ok(())
    }

    fn transmit_rf(&mut self, pulses: PulseTrain) -> Result<(), HwError> {
        self.calls.push(HwCall::Rf {
            code: pulses.code(),
            pulses: pulses.len(),
        });
        Ok(())
    }

    fn write_gpio(&mut self, pin: u8, high: bool) -> Result<(), HwError> {
        self.calls.push(HwCall::Gpio { pin, high });
        Ok(())
    }
}

impl SensorPort for MockHardware {
    fn read_level(&mut self, channel: SensorChannel) -> Result<bool, HwError> {
        Ok(self.levels[channel.index()])
    }
}

// ── Network ───────────────────────────────────────────────────

pub struct MockNetwork {
    pub requests: Vec<(Endpoint, String)>,
    pub outcome: RequestOutcome,
    pub reply: Vec<u8>,
}

#[allow(dead_code)]
impl MockNetwork {
    pub fn new() -> Self {
        Self::answering(RequestOutcome::Success)
    }

    pub fn answering(outcome: RequestOutcome) -> Self {
        Self {
            requests: Vec::new(),
            outcome,
            reply: b"HTTP/1.0 200 OK\r\n\r\n{\"result\":1}".to_vec(),
        }
    }
}

impl Default for MockNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkPort for MockNetwork {
    fn send_request(
        &mut self,
        endpoint: &Endpoint,
        request: &[u8],
        _deadline: Deadline,
        on_response: &mut dyn FnMut(&[u8]),
    ) -> RequestOutcome {
        self.requests
            .push((endpoint.clone(), String::from_utf8_lossy(request).into_owned()));
        if self.outcome == RequestOutcome::Success {
            on_response(&self.reply);
        }
        self.outcome
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Fixture ───────────────────────────────────────────────────

pub struct Rig {
    pub ctl: Controller<MemStore>,
    pub hw: MockHardware,
    pub net: MockNetwork,
    pub sink: RecordingSink,
}

#[allow(dead_code)]
impl Rig {
    /// Freshly reset controller with `max_stations` capacity.
    pub fn booted(max_stations: usize) -> Self {
        let mut sink = RecordingSink::default();
        let mut ctl = Controller::new(MemStore::new(), Capacity::new(max_stations));
        ctl.bootstrap(&mut sink).expect("bootstrap");
        sink.events.clear();
        Self {
            ctl,
            hw: MockHardware::new(),
            net: MockNetwork::new(),
            sink,
        }
    }

    pub fn set(&mut self, sid: usize, on: bool) -> sprinkler::BitChange {
        self.ctl
            .set_station_bit(sid, on, &mut self.hw, &mut self.net, &mut self.sink)
            .expect("sid in range")
    }

    pub fn apply(&mut self, now: u64) {
        self.ctl
            .apply_all_station_bits(now, &mut self.hw, &mut self.net)
            .expect("apply");
    }

    pub fn poll(&mut self, now: u64) -> Vec<SensorChannel> {
        self.ctl
            .poll_sensors(now, &mut self.hw, &mut self.sink)
            .into_iter()
            .collect()
    }
}

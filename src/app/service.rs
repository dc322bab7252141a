//! Controller — the hexagonal core.
//!
//! [`Controller`] is the single controller context: option registry,
//! station store, live station bitmask, status bits, non-volatile data and
//! sensor state machines all hang off it.  Hardware, network and telemetry
//! flow through port traits injected at call sites, so the whole core runs
//! against mock adapters in tests.
//!
//! ```text
//!    SensorPort ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                   │        Controller         │
//!  ActuatorPort ◀── │ options · stations · bits │ ──▶ NetworkPort
//!                   └────────────┬─────────────┘
//!                           StoragePort
//! ```
//!
//! [`Controller::set_station_bit`] is the only mutator of the live bitmask;
//! [`Controller::apply_all_station_bits`] is the only call that makes it
//! physical.

use std::time::Duration;

use log::{debug, info, warn};

use crate::dispatch::{self, DispatchContext, DispatchOutcome};
use crate::error::{Error, HwError, OptionError, PayloadError, StationError, StorageError};
use crate::net::DEFAULT_TIMEOUT;
use crate::options::bootstrap::{self, BootReport, BootTargets};
use crate::options::{
    string_opts, Capacity, IntOpt, NvData, OptionRegistry, RebootCause, SaveOutcome, StrOpt,
    StrValue,
};
use crate::sensors::{ChannelSettings, SensorBank, SensorChannel};
use crate::stations::{
    AttribCache, StationAttrib, StationBits, StationKind, StationName, StationPayload,
    StationStore, StationType,
};

use super::events::AppEvent;
use super::ports::{ActuatorPort, EventSink, NetworkPort, SensorPort, StoragePort};

/// Live runtime status bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerStatus {
    pub enabled: bool,
    pub safe_reboot: bool,
    pub rain_delayed: bool,
    /// Raw (undebounced) active flag per sensor channel.
    pub sensor1: bool,
    pub sensor2: bool,
    /// Debounced state per sensor channel.
    pub sensor1_active: bool,
    pub sensor2_active: bool,
}

impl ControllerStatus {
    fn set_sensor(&mut self, ch: SensorChannel, raw: bool, active: Option<bool>) {
        let (r, a) = match ch {
            SensorChannel::One => (&mut self.sensor1, &mut self.sensor1_active),
            SensorChannel::Two => (&mut self.sensor2, &mut self.sensor2_active),
        };
        *r = raw;
        if let Some(v) = active {
            *a = v;
        }
    }

    fn clear_sensor_latches(&mut self) {
        self.sensor1_active = false;
        self.sensor2_active = false;
    }
}

/// Result of [`Controller::set_station_bit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitChange {
    Unchanged,
    TurnedOn,
    TurnedOff,
}

pub struct Controller<S: StoragePort> {
    store: S,
    options: OptionRegistry,
    stations: StationStore,
    attribs: AttribCache,
    /// Decoded kind per station, refreshed whenever type or payload changes.
    kinds: Vec<Result<StationKind, PayloadError>>,
    bits: StationBits,
    status: ControllerStatus,
    old_status: ControllerStatus,
    nvdata: NvData,
    last_reboot_cause: RebootCause,
    sensors: SensorBank,
    /// Cached password digest forwarded to remote peers.
    password: StrValue,
    last_refreshed: Option<usize>,
    timeout: Duration,
}

impl<S: StoragePort> Controller<S> {
    /// Build an idle controller over `store`.  Nothing is read until
    /// [`bootstrap`](Self::bootstrap).
    pub fn new(store: S, capacity: Capacity) -> Self {
        let max = capacity.max_stations();
        Self {
            store,
            options: OptionRegistry::new(capacity),
            stations: StationStore::new(max),
            attribs: AttribCache::new(max),
            kinds: vec![Ok(StationKind::Standard); max],
            bits: StationBits::new(capacity.boards()),
            status: ControllerStatus::default(),
            old_status: ControllerStatus::default(),
            nvdata: NvData::default(),
            last_reboot_cause: RebootCause::None,
            sensors: SensorBank::new(),
            password: StrValue::new(),
            last_refreshed: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Bound on every remote / HTTP station request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Reset or load persistent state, then rebuild every in-memory view
    /// of it.  A store failure here is fatal to startup.
    pub fn bootstrap(&mut self, sink: &mut impl EventSink) -> Result<BootReport, Error> {
        let report = bootstrap::run(
            &mut self.store,
            BootTargets {
                options: &mut self.options,
                stations: &self.stations,
                attribs: &mut self.attribs,
                nvdata: &mut self.nvdata,
            },
        )?;
        self.last_reboot_cause = report.previous_cause;

        for sid in 0..self.stations.capacity() {
            self.reload_kind(sid)?;
        }
        self.password = string_opts::load(&self.store, StrOpt::Password)?;

        self.bits.clear();
        self.sensors.reset_all();
        self.last_refreshed = None;
        self.status = ControllerStatus {
            enabled: self.options.device_enabled(),
            rain_delayed: self.nvdata.rd_stop_time != 0,
            ..ControllerStatus::default()
        };
        self.old_status = self.status;

        sink.emit(&AppEvent::Bootstrapped {
            reset: report.reset,
            previous_cause: report.previous_cause,
        });
        Ok(report)
    }

    /// Power-up sequence: outputs held off while every bit is cleared and
    /// pushed, then released.
    pub fn begin(
        &mut self,
        now: u64,
        hw: &mut impl ActuatorPort,
        net: &mut impl NetworkPort,
        sink: &mut impl EventSink,
    ) -> Result<(), HwError> {
        hw.set_outputs_enabled(false)?;
        self.clear_all_station_bits(hw, net, sink);
        self.apply_all_station_bits(now, hw, net)?;
        hw.set_outputs_enabled(true)
    }

    // ── Station actuation ─────────────────────────────────────

    /// Command station `sid`.  A real transition dispatches special
    /// stations and emits telemetry; a repeat is a no-op.
    pub fn set_station_bit(
        &mut self,
        sid: usize,
        on: bool,
        hw: &mut impl ActuatorPort,
        net: &mut impl NetworkPort,
        sink: &mut impl EventSink,
    ) -> Result<BitChange, StationError> {
        let nstations = self.options.nstations();
        if sid >= nstations {
            return Err(StationError::IndexOutOfRange {
                sid,
                capacity: nstations,
            });
        }
        Ok(self.switch_station(sid, on, hw, net, sink))
    }

    fn switch_station(
        &mut self,
        sid: usize,
        on: bool,
        hw: &mut impl ActuatorPort,
        net: &mut impl NetworkPort,
        sink: &mut impl EventSink,
    ) -> BitChange {
        if !self.bits.set(sid, on) {
            return BitChange::Unchanged;
        }
        debug!("station {} -> {}", sid, if on { "on" } else { "off" });
        self.dispatch_station(sid, on, hw, net);
        sink.emit(&AppEvent::StationSwitched { sid, on });
        sink.emit(&AppEvent::ActiveStation(on.then_some(sid)));
        if on {
            BitChange::TurnedOn
        } else {
            BitChange::TurnedOff
        }
    }

    /// Turn every station off through the single mutator.  Call
    /// [`apply_all_station_bits`](Self::apply_all_station_bits) afterwards.
    pub fn clear_all_station_bits(
        &mut self,
        hw: &mut impl ActuatorPort,
        net: &mut impl NetworkPort,
        sink: &mut impl EventSink,
    ) {
        let active: Vec<usize> = self.bits.active().collect();
        for sid in active {
            self.switch_station(sid, false, hw, net, sink);
        }
    }

    /// Push the bitmask onto the shift-register bus, highest board first,
    /// then resend one special station if auto-refresh is on.  A disabled
    /// controller shifts out zeros whatever the bitmask holds, as do boards
    /// beyond the configured extension count.
    pub fn apply_all_station_bits(
        &mut self,
        now: u64,
        hw: &mut impl ActuatorPort,
        net: &mut impl NetworkPort,
    ) -> Result<(), HwError> {
        // Every board the build supports is clocked, so registers past the
        // configured count always hold zeros.
        let nboards = self.options.nboards();
        let frames: Vec<u8> = (0..self.options.capacity().boards())
            .rev()
            .map(|bid| {
                if self.status.enabled && bid < nboards {
                    self.bits.board(bid)
                } else {
                    0
                }
            })
            .collect();
        hw.shift_out(&frames)?;

        if self.options.auto_refresh() {
            self.refresh_one(now, hw, net);
        }
        Ok(())
    }

    fn refresh_one(&mut self, now: u64, hw: &mut impl ActuatorPort, net: &mut impl NetworkPort) {
        let n = self.options.nstations();
        if n == 0 {
            return;
        }
        let target = (now % n as u64) as usize;
        if self.last_refreshed == Some(target) {
            return;
        }
        self.last_refreshed = Some(target);
        let on = self.bits.get(target);
        if let DispatchOutcome::Sent = self.dispatch_station(target, on, hw, net) {
            debug!("refresh: station {} resent ({})", target, on);
        }
    }

    fn dispatch_station(
        &self,
        sid: usize,
        on: bool,
        hw: &mut impl ActuatorPort,
        net: &mut impl NetworkPort,
    ) -> DispatchOutcome {
        let Some(kind) = self.kinds.get(sid) else {
            return DispatchOutcome::Skipped;
        };
        let ctx = DispatchContext {
            password: &self.password,
            nstations: self.options.nstations(),
            auto_refresh: self.options.auto_refresh(),
            timeout: self.timeout,
        };
        dispatch::dispatch(sid, kind, on, &ctx, hw, net)
    }

    // ── Sensors ───────────────────────────────────────────────

    /// Sample both sensor channels.  Returns the channels whose program
    /// switch was pressed during this poll.
    pub fn poll_sensors(
        &mut self,
        now: u64,
        hw: &mut impl SensorPort,
        sink: &mut impl EventSink,
    ) -> heapless::Vec<SensorChannel, 2> {
        let mut pressed = heapless::Vec::new();
        for ch in SensorChannel::ALL {
            let settings = ChannelSettings::from_options(&self.options, ch);
            if !settings.is_polled() {
                continue;
            }
            let level = match hw.read_level(ch) {
                Ok(l) => l,
                Err(e) => {
                    warn!("sensor {:?}: {}", ch, e);
                    continue;
                }
            };
            let update = self.sensors.sample(ch, &settings, level, now);
            self.status.set_sensor(ch, update.raw_active, update.latched);
            if let Some(active) = update.latched {
                info!("sensor {:?} {}", ch, if active { "active" } else { "inactive" });
                sink.emit(&AppEvent::SensorChanged { channel: ch, active });
            }
            if update.pressed {
                info!("sensor {:?}: program switch pressed", ch);
                sink.emit(&AppEvent::ProgramSwitchPressed(ch));
                let _ = pressed.push(ch);
            }
        }
        pressed
    }

    /// Clear every sensor deadline, timestamp and latch.  The latched flags
    /// are cleared in the status snapshot too, so no transition is reported;
    /// raw flags keep following the line.
    pub fn sensor_resetall(&mut self) {
        self.sensors.reset_all();
        self.status.clear_sensor_latches();
        self.old_status.clear_sensor_latches();
    }

    pub fn sensors(&self) -> &SensorBank {
        &self.sensors
    }

    // ── Controller state ──────────────────────────────────────

    pub fn enable(&mut self) -> Result<(), Error> {
        self.set_enabled(true)
    }

    pub fn disable(&mut self) -> Result<(), Error> {
        self.set_enabled(false)
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<(), Error> {
        self.options.set(IntOpt::DeviceEnable, u8::from(enabled))?;
        self.options.save(&mut self.store)?;
        self.status.enabled = enabled;
        info!("controller {}", if enabled { "enabled" } else { "disabled" });
        Ok(())
    }

    /// Start a rain delay ending at `stop_time` (epoch seconds).
    pub fn raindelay_start(&mut self, stop_time: u32) -> Result<(), StorageError> {
        self.status.rain_delayed = true;
        self.nvdata.rd_stop_time = stop_time;
        self.nvdata.save(&mut self.store)
    }

    pub fn raindelay_stop(&mut self) -> Result<(), StorageError> {
        self.status.rain_delayed = false;
        self.nvdata.rd_stop_time = 0;
        self.nvdata.save(&mut self.store)
    }

    pub fn status(&self) -> ControllerStatus {
        self.status
    }

    /// Status as of the last option load.
    pub fn old_status(&self) -> ControllerStatus {
        self.old_status
    }

    pub fn nvdata(&self) -> &NvData {
        &self.nvdata
    }

    /// Reboot cause recorded before this boot.
    pub fn last_reboot_cause(&self) -> RebootCause {
        self.last_reboot_cause
    }

    /// Persist `cause` ahead of an externally driven reboot.
    pub fn set_reboot_cause(&mut self, cause: RebootCause) -> Result<(), StorageError> {
        self.nvdata.reboot_cause = cause;
        self.nvdata.save(&mut self.store)
    }

    // ── Options ───────────────────────────────────────────────

    pub fn options(&self) -> &OptionRegistry {
        &self.options
    }

    /// Validated in-memory write.  Sensor options restart both channels'
    /// state machines.  Call [`save_options`](Self::save_options) to persist.
    pub fn set_option(&mut self, opt: IntOpt, value: u8) -> Result<(), OptionError> {
        self.options.set(opt, value)?;
        if opt.affects_sensors() {
            debug!("option {} changed, resetting sensors", opt.name());
            self.sensor_resetall();
        }
        Ok(())
    }

    pub fn load_options(&mut self) -> Result<(), StorageError> {
        self.options.load(&self.store)?;
        self.status.enabled = self.options.device_enabled();
        self.old_status = self.status;
        Ok(())
    }

    /// Persist the integer block and re-derive the enabled flag from it.
    pub fn save_options(&mut self) -> Result<(), StorageError> {
        self.options.save(&mut self.store)?;
        self.status.enabled = self.options.device_enabled();
        Ok(())
    }

    pub fn string_option(&self, opt: StrOpt) -> Result<StrValue, StorageError> {
        string_opts::load(&self.store, opt)
    }

    pub fn save_string_option(&mut self, opt: StrOpt, value: &str) -> Result<SaveOutcome, StorageError> {
        let outcome = string_opts::save(&mut self.store, opt, value)?;
        if opt == StrOpt::Password && outcome == SaveOutcome::Written {
            self.password = string_opts::load(&self.store, opt)?;
        }
        Ok(outcome)
    }

    pub fn password_verify(&self, candidate: &str) -> Result<bool, StorageError> {
        string_opts::password_verify(&self.store, candidate)
    }

    // ── Stations ──────────────────────────────────────────────

    pub fn station_bits(&self) -> &StationBits {
        &self.bits
    }

    pub fn station_kind(&self, sid: usize) -> Option<&Result<StationKind, PayloadError>> {
        self.kinds.get(sid)
    }

    pub fn station_name(&self, sid: usize) -> Result<StationName, Error> {
        self.stations.name(&self.store, sid)
    }

    pub fn set_station_name(&mut self, sid: usize, name: &str) -> Result<(), Error> {
        self.stations.set_name(&mut self.store, sid, name)
    }

    pub fn station_type(&self, sid: usize) -> Result<StationType, Error> {
        self.stations.station_type(&self.store, sid)
    }

    pub fn station_data(&self, sid: usize) -> Result<StationPayload, Error> {
        Ok(self.stations.read(&self.store, sid)?.payload)
    }

    /// Reassign a station's type and payload.  The payload is decoded
    /// straight away; a malformed one is stored but never dispatched.
    pub fn set_station_data(
        &mut self,
        sid: usize,
        stype: StationType,
        payload: &[u8],
    ) -> Result<(), Error> {
        self.stations.set_data(&mut self.store, sid, stype, payload)?;
        self.reload_kind(sid)?;
        self.load_attribs()
    }

    pub fn set_station_attrib(&mut self, sid: usize, attrib: StationAttrib) -> Result<(), Error> {
        self.stations.set_attrib(&mut self.store, sid, attrib)?;
        self.load_attribs()
    }

    pub fn attribs(&self) -> &AttribCache {
        &self.attribs
    }

    /// Rebuild the attribute cache from the station records.
    pub fn load_attribs(&mut self) -> Result<(), Error> {
        self.attribs = AttribCache::load(&self.store, &self.stations)?;
        Ok(())
    }

    /// Flush the attribute cache back into the station records.
    pub fn save_attribs(&mut self) -> Result<(), Error> {
        self.attribs.save(&mut self.store, &self.stations)?;
        for sid in 0..self.stations.capacity() {
            self.reload_kind(sid)?;
        }
        Ok(())
    }

    fn reload_kind(&mut self, sid: usize) -> Result<(), Error> {
        let record = self.stations.read(&self.store, sid)?;
        let kind = StationKind::decode(record.stype, &record.payload);
        if let Err(e) = &kind {
            warn!("station {}: {}", sid, e);
        }
        if let Some(slot) = self.kinds.get_mut(sid) {
            *slot = kind;
        }
        Ok(())
    }

    // ── Store access ──────────────────────────────────────────

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

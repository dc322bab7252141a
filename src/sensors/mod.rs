//! Sensor inputs — two channels, each a level sensor, a program switch,
//! or unused, depending on its configured type.
//!
//! [`SensorBank`] holds the per-channel state machines; the controller
//! reads raw levels through [`SensorPort`](crate::app::ports::SensorPort)
//! and feeds them in with the channel's current settings.

pub mod binary;
pub mod program_switch;

use binary::LevelSensor;
use program_switch::ProgramSwitch;

use crate::options::{IntOpt, OptionRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorChannel {
    One,
    Two,
}

impl SensorChannel {
    pub const ALL: [SensorChannel; 2] = [SensorChannel::One, SensorChannel::Two];

    pub const fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
}

/// Configured role of a sensor input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorType {
    None,
    Rain,
    Flow,
    Soil,
    ProgramSwitch,
    Other(u8),
}

impl SensorType {
    pub const fn from_code(code: u8) -> Self {
        match code {
            0 => Self::None,
            1 => Self::Rain,
            2 => Self::Flow,
            3 => Self::Soil,
            0xF0 => Self::ProgramSwitch,
            c => Self::Other(c),
        }
    }

    pub const fn code(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Rain => 1,
            Self::Flow => 2,
            Self::Soil => 3,
            Self::ProgramSwitch => 0xF0,
            Self::Other(c) => c,
        }
    }

    /// Rain and soil sensors are debounced levels.
    pub fn is_level(self) -> bool {
        matches!(self, Self::Rain | Self::Soil)
    }
}

/// One channel's settings, read from the option registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSettings {
    pub stype: SensorType,
    /// Line level meaning "idle" (1 = normally open with pull-up).
    pub idle_level: bool,
    pub on_delay_min: u8,
    pub off_delay_min: u8,
}

impl ChannelSettings {
    pub fn from_options(opts: &OptionRegistry, ch: SensorChannel) -> Self {
        let (t, o, on, off) = match ch {
            SensorChannel::One => (
                IntOpt::Sensor1Type,
                IntOpt::Sensor1Option,
                IntOpt::Sensor1OnDelay,
                IntOpt::Sensor1OffDelay,
            ),
            SensorChannel::Two => (
                IntOpt::Sensor2Type,
                IntOpt::Sensor2Option,
                IntOpt::Sensor2OnDelay,
                IntOpt::Sensor2OffDelay,
            ),
        };
        Self {
            stype: SensorType::from_code(opts.get(t)),
            idle_level: opts.get(o) != 0,
            on_delay_min: opts.get(on),
            off_delay_min: opts.get(off),
        }
    }

    /// Whether this channel is sampled at all.
    pub fn is_polled(&self) -> bool {
        self.stype.is_level() || self.stype == SensorType::ProgramSwitch
    }
}

/// What one sample produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelUpdate {
    pub raw_active: bool,
    /// New debounced state, when it changed.
    pub latched: Option<bool>,
    pub pressed: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct ChannelState {
    level: LevelSensor,
    switch: ProgramSwitch,
}

/// State machines for both channels.
#[derive(Debug, Clone, Default)]
pub struct SensorBank {
    channels: [ChannelState; 2],
}

impl SensorBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a raw line level.  Unused channels report nothing.
    pub fn sample(
        &mut self,
        ch: SensorChannel,
        settings: &ChannelSettings,
        level: bool,
        now: u64,
    ) -> ChannelUpdate {
        let raw_active = level != settings.idle_level;
        let state = &mut self.channels[ch.index()];
        match settings.stype {
            t if t.is_level() => ChannelUpdate {
                raw_active,
                latched: state.level.poll(
                    raw_active,
                    now,
                    settings.on_delay_min,
                    settings.off_delay_min,
                ),
                pressed: false,
            },
            SensorType::ProgramSwitch => ChannelUpdate {
                raw_active,
                latched: None,
                pressed: state.switch.poll(raw_active, now),
            },
            _ => ChannelUpdate::default(),
        }
    }

    pub fn level(&self, ch: SensorChannel) -> &LevelSensor {
        &self.channels[ch.index()].level
    }

    pub fn is_active(&self, ch: SensorChannel) -> bool {
        self.channels[ch.index()].level.is_active()
    }

    /// Clear every deadline, timestamp and latch on both channels.
    pub fn reset_all(&mut self) {
        for c in &mut self.channels {
            c.level.reset();
            c.switch.reset();
        }
    }
}

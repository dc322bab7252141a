//! Non-volatile controller data: one fixed 16-byte little-endian record.
//!
//! ```text
//!  0      2      4            8            12  13      16
//!  ┌──────┬──────┬────────────┬────────────┬───┬───────┐
//!  │ rise │ set  │ rd_stop    │ ext_ip     │rc │ pad   │
//!  └──────┴──────┴────────────┴────────────┴───┴───────┘
//! ```

use crate::app::ports::StoragePort;
use crate::error::StorageError;

use super::NVDATA_FILE;

pub const NVDATA_SIZE: usize = 16;

/// Why the controller last restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RebootCause {
    #[default]
    None,
    Reset,
    Button,
    ResetAp,
    Timer,
    Web,
    WifiDone,
    FwUpdate,
    WeatherFail,
    NetworkFail,
    Ntp,
    Program,
    PowerOn,
    /// Code written by a newer firmware.
    Other(u8),
}

impl RebootCause {
    pub const fn code(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Reset => 1,
            Self::Button => 2,
            Self::ResetAp => 3,
            Self::Timer => 4,
            Self::Web => 5,
            Self::WifiDone => 6,
            Self::FwUpdate => 7,
            Self::WeatherFail => 8,
            Self::NetworkFail => 9,
            Self::Ntp => 10,
            Self::Program => 11,
            Self::PowerOn => 99,
            Self::Other(c) => c,
        }
    }

    pub const fn from_code(code: u8) -> Self {
        match code {
            0 => Self::None,
            1 => Self::Reset,
            2 => Self::Button,
            3 => Self::ResetAp,
            4 => Self::Timer,
            5 => Self::Web,
            6 => Self::WifiDone,
            7 => Self::FwUpdate,
            8 => Self::WeatherFail,
            9 => Self::NetworkFail,
            10 => Self::Ntp,
            11 => Self::Program,
            99 => Self::PowerOn,
            c => Self::Other(c),
        }
    }
}

/// Persisted controller data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NvData {
    /// Minutes past midnight.
    pub sunrise_time: u16,
    /// Minutes past midnight.
    pub sunset_time: u16,
    /// Rain delay end, epoch seconds (0 = none).
    pub rd_stop_time: u32,
    pub external_ip: u32,
    pub reboot_cause: RebootCause,
}

impl Default for NvData {
    fn default() -> Self {
        Self {
            sunrise_time: 360,
            sunset_time: 1080,
            rd_stop_time: 0,
            external_ip: 0,
            reboot_cause: RebootCause::PowerOn,
        }
    }
}

impl NvData {
    pub fn encode(&self) -> [u8; NVDATA_SIZE] {
        let mut out = [0u8; NVDATA_SIZE];
        out[0..2].copy_from_slice(&self.sunrise_time.to_le_bytes());
        out[2..4].copy_from_slice(&self.sunset_time.to_le_bytes());
        out[4..8].copy_from_slice(&self.rd_stop_time.to_le_bytes());
        out[8..12].copy_from_slice(&self.external_ip.to_le_bytes());
        out[12] = self.reboot_cause.code();
        out
    }

    pub fn decode(buf: &[u8; NVDATA_SIZE]) -> Self {
        Self {
            sunrise_time: u16::from_le_bytes([buf[0], buf[1]]),
            sunset_time: u16::from_le_bytes([buf[2], buf[3]]),
            rd_stop_time: u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
            external_ip: u32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]),
            reboot_cause: RebootCause::from_code(buf[12]),
        }
    }

    pub fn load(store: &impl StoragePort) -> Result<Self, StorageError> {
        let mut buf = [0u8; NVDATA_SIZE];
        store.read_block(NVDATA_FILE, 0, &mut buf)?;
        Ok(Self::decode(&buf))
    }

    pub fn save(&self, store: &mut impl StoragePort) -> Result<(), StorageError> {
        store.write_block(NVDATA_FILE, 0, &self.encode())
    }
}

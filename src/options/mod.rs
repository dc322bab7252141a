//! Option registry — persisted integer/string options and controller data.
//!
//! Integer options live as one contiguous byte block in [`IOPTS_FILE`],
//! string options as fixed-stride slots in [`SOPTS_FILE`], and the
//! non-volatile controller record in [`NVDATA_FILE`].  The registry keeps
//! the integer block in memory together with the values derived from it
//! (board count, station count, enabled flag); every load and save
//! re-derives them so memory never disagrees with what was persisted.

pub mod bootstrap;
pub mod int_opts;
pub mod nvdata;
pub mod string_opts;

use log::info;

use crate::app::ports::StoragePort;
use crate::error::{OptionError, StorageError};

pub use int_opts::{Bound, IntOpt, FW_MINOR, FW_VERSION, NUM_IOPTS, RESET_REQUEST};
pub use nvdata::{NvData, RebootCause};
pub use string_opts::{SaveOutcome, StrOpt, StrValue};

pub const IOPTS_FILE: &str = "iopts.dat";
pub const SOPTS_FILE: &str = "sopts.dat";
pub const STATIONS_FILE: &str = "stns.dat";
pub const NVDATA_FILE: &str = "nvcon.dat";
pub const PROG_FILE: &str = "prog.dat";
pub const DONE_FILE: &str = "done.dat";

/// Former default NTP server that no longer answers; loads rewrite it to 0.0.0.0.
const RETIRED_NTP: [u8; 4] = [50, 97, 210, 169];

/// Station capacity of this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    max_stations: usize,
}

impl Capacity {
    pub const fn new(max_stations: usize) -> Self {
        Self { max_stations }
    }

    pub const fn max_stations(&self) -> usize {
        self.max_stations
    }

    /// Boards needed to address every station (8 per board).
    pub const fn boards(&self) -> usize {
        self.max_stations.div_ceil(8)
    }

    pub const fn max_ext_boards(&self) -> usize {
        self.boards().saturating_sub(1)
    }
}

/// In-memory integer options plus their derived fields.
#[derive(Debug, Clone)]
pub struct OptionRegistry {
    values: [u8; NUM_IOPTS],
    capacity: Capacity,
    nboards: usize,
    nstations: usize,
}

impl OptionRegistry {
    /// Registry holding factory defaults.
    pub fn new(capacity: Capacity) -> Self {
        let mut reg = Self {
            values: int_opts::defaults(),
            capacity,
            nboards: 1,
            nstations: 8,
        };
        reg.derive();
        reg
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    pub fn get(&self, opt: IntOpt) -> u8 {
        self.values[opt.index()]
    }

    /// Effective maximum of `opt`; 0 means unbounded.
    pub fn max(&self, opt: IntOpt) -> u8 {
        match opt.spec().bound {
            Bound::Unbounded => 0,
            Bound::Max(m) => m,
            Bound::ExtBoards => u8::try_from(self.capacity.max_ext_boards()).unwrap_or(u8::MAX),
            Bound::Stations => u8::try_from(self.capacity.max_stations()).unwrap_or(u8::MAX),
        }
    }

    /// Set an option in memory.  Persist with [`save`](Self::save).
    pub fn set(&mut self, opt: IntOpt, value: u8) -> Result<(), OptionError> {
        let max = self.max(opt);
        if max != 0 && value > max {
            return Err(OptionError::OutOfRange {
                name: opt.name(),
                value,
                max,
            });
        }
        self.values[opt.index()] = value;
        self.derive();
        Ok(())
    }

    /// Same as [`set`](Self::set) but addressed by JSON name.
    pub fn set_by_name(&mut self, name: &str, value: u8) -> Result<IntOpt, OptionError> {
        let opt = IntOpt::from_name(name).ok_or(OptionError::UnknownName)?;
        self.set(opt, value)?;
        Ok(opt)
    }

    pub fn reset_to_defaults(&mut self) {
        self.values = int_opts::defaults();
        self.derive();
    }

    /// Read the whole integer block, then normalise and re-derive.
    pub fn load(&mut self, store: &impl StoragePort) -> Result<(), StorageError> {
        store.read_block(IOPTS_FILE, 0, &mut self.values)?;
        self.values[IntOpt::FwVersion.index()] = FW_VERSION;
        self.values[IntOpt::FwMinor.index()] = FW_MINOR;

        let ntp = [IntOpt::NtpIp1, IntOpt::NtpIp2, IntOpt::NtpIp3, IntOpt::NtpIp4];
        if ntp.iter().map(|o| self.get(*o)).eq(RETIRED_NTP) {
            info!("Options: clearing retired NTP server address");
            for o in ntp {
                self.values[o.index()] = 0;
            }
        }
        self.derive();
        Ok(())
    }

    /// Write the whole integer block and re-derive.
    pub fn save(&mut self, store: &mut impl StoragePort) -> Result<(), StorageError> {
        store.write_block(IOPTS_FILE, 0, &self.values)?;
        self.derive();
        Ok(())
    }

    fn derive(&mut self) {
        let ext = usize::from(self.get(IntOpt::ExtBoardCount)).min(self.capacity.max_ext_boards());
        self.nboards = ext + 1;
        self.nstations = (self.nboards * 8).min(self.capacity.max_stations());
    }

    pub fn nboards(&self) -> usize {
        self.nboards
    }

    pub fn nstations(&self) -> usize {
        self.nstations
    }

    pub fn device_enabled(&self) -> bool {
        self.get(IntOpt::DeviceEnable) != 0
    }

    pub fn auto_refresh(&self) -> bool {
        self.get(IntOpt::SpeAutoRefresh) != 0
    }

    /// Local time: UTC plus the configured zone, in quarter hours from GMT-12.
    pub fn now_tz(&self, utc: i64) -> i64 {
        utc + 900 * (i64::from(self.get(IntOpt::TimeZone)) - 48)
    }

    /// Web port assembled from `hp0` (low byte) and `hp1` (high byte).
    pub fn http_port(&self) -> u16 {
        u16::from_le_bytes([self.get(IntOpt::HttpPort0), self.get(IntOpt::HttpPort1)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::store::MemStore;

    fn reg() -> OptionRegistry {
        OptionRegistry::new(Capacity::new(200))
    }

    #[test]
    fn capacity_math() {
        let c = Capacity::new(100);
        assert_eq!(c.boards(), 13);
        assert_eq!(c.max_ext_boards(), 12);
        assert_eq!(Capacity::new(8).max_ext_boards(), 0);
    }

    #[test]
    fn defaults_derive_one_board() {
        let r = reg();
        assert_eq!(r.nboards(), 1);
        assert_eq!(r.nstations(), 8);
        assert!(r.device_enabled());
        assert_eq!(r.http_port(), 8080);
    }

    #[test]
    fn set_enforces_bounds() {
        let mut r = reg();
        assert!(r.set(IntOpt::UseNtp, 1).is_ok());
        assert_eq!(
            r.set(IntOpt::UseNtp, 2),
            Err(OptionError::OutOfRange { name: "ntp", value: 2, max: 1 })
        );
        // Unbounded options accept anything.
        assert!(r.set(IntOpt::HwVersion, 0xFF).is_ok());
        // Capacity-bound options follow the build.
        assert!(r.set(IntOpt::ExtBoardCount, 24).is_ok());
        assert!(r.set(IntOpt::ExtBoardCount, 25).is_err());
        assert!(r.set(IntOpt::MasterStation, 200).is_ok());
        assert!(r.set(IntOpt::MasterStation, 201).is_err());
    }

    #[test]
    fn set_by_name_rejects_unknown() {
        let mut r = reg();
        assert_eq!(r.set_by_name("sn2of", 10), Ok(IntOpt::Sensor2OffDelay));
        assert_eq!(r.set_by_name("bogus", 1), Err(OptionError::UnknownName));
    }

    #[test]
    fn ext_boards_drive_station_count() {
        let mut r = OptionRegistry::new(Capacity::new(100));
        r.set(IntOpt::ExtBoardCount, 12).unwrap();
        assert_eq!(r.nboards(), 13);
        // 13 boards address 104 stations but the build only has 100.
        assert_eq!(r.nstations(), 100);
    }

    #[test]
    fn load_forces_version_and_normalises_ntp() {
        let mut block = int_opts::defaults();
        block[IntOpt::FwVersion.index()] = 217;
        block[IntOpt::FwMinor.index()] = 0;
        block[IntOpt::NtpIp1.index()..=IntOpt::NtpIp4.index()].copy_from_slice(&RETIRED_NTP);
        block[IntOpt::ExtBoardCount.index()] = 2;
        block[IntOpt::DeviceEnable.index()] = 0;
        let mut s = MemStore::new();
        s.write_block(IOPTS_FILE, 0, &block).unwrap();

        let mut r = reg();
        r.load(&s).unwrap();
        assert_eq!(r.get(IntOpt::FwVersion), FW_VERSION);
        assert_eq!(r.get(IntOpt::FwMinor), FW_MINOR);
        assert_eq!(r.get(IntOpt::NtpIp1), 0);
        assert_eq!(r.get(IntOpt::NtpIp4), 0);
        assert_eq!(r.nstations(), 24);
        assert!(!r.device_enabled());
    }

    #[test]
    fn save_persists_block() {
        let mut s = MemStore::new();
        let mut r = reg();
        r.set(IntOpt::Sensor1Type, 1).unwrap();
        r.save(&mut s).unwrap();
        let mut r2 = reg();
        r2.load(&s).unwrap();
        assert_eq!(r2.get(IntOpt::Sensor1Type), 1);
    }

    #[test]
    fn time_zone_offset() {
        let mut r = reg();
        r.set(IntOpt::TimeZone, 48).unwrap();
        assert_eq!(r.now_tz(1_000), 1_000);
        r.set(IntOpt::TimeZone, 28).unwrap(); // GMT-5
        assert_eq!(r.now_tz(36_000), 36_000 - 5 * 3600);
    }
}

//! Station records, attribute bits and the live station bitmask.
//!
//! Each station owns one fixed-size record in [`STATIONS_FILE`]:
//!
//! ```text
//!  0                32    33    34                               244
//!  ┌────────────────┬─────┬─────┬─────────────────────────────────┐
//!  │ name (NUL pad) │attr │type │ payload (NUL-terminated ASCII)  │
//!  └────────────────┴─────┴─────┴─────────────────────────────────┘
//! ```

pub mod attribs;
pub mod bits;
pub mod kind;

use heapless::{String, Vec};

use crate::app::ports::StoragePort;
use crate::error::{Error, StationError};
use crate::options::STATIONS_FILE;

pub use attribs::AttribCache;
pub use bits::StationBits;
pub use kind::StationKind;

pub const STATION_NAME_SIZE: usize = 32;
pub const STATION_PAYLOAD_SIZE: usize = 210;

const NAME_OFFSET: usize = 0;
const ATTRIB_OFFSET: usize = STATION_NAME_SIZE;
const TYPE_OFFSET: usize = ATTRIB_OFFSET + 1;
const PAYLOAD_OFFSET: usize = TYPE_OFFSET + 1;

/// Bytes per station record.
pub const STATION_RECORD_SIZE: usize = PAYLOAD_OFFSET + STATION_PAYLOAD_SIZE;

pub type StationName = String<STATION_NAME_SIZE>;
pub type StationPayload = Vec<u8, STATION_PAYLOAD_SIZE>;

/// Persisted station type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StationType {
    #[default]
    Standard,
    Rf,
    Remote,
    Gpio,
    Http,
    Other(u8),
}

impl StationType {
    pub const fn code(self) -> u8 {
        match self {
            Self::Standard => 0,
            Self::Rf => 1,
            Self::Remote => 2,
            Self::Gpio => 3,
            Self::Http => 4,
            Self::Other(c) => c,
        }
    }

    pub const fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Standard,
            1 => Self::Rf,
            2 => Self::Remote,
            3 => Self::Gpio,
            4 => Self::Http,
            c => Self::Other(c),
        }
    }

    pub fn is_special(self) -> bool {
        self != Self::Standard
    }
}

/// Per-station attribute bits, packed LSB-first into one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StationAttrib {
    /// Runs with master station 1.
    pub mas: bool,
    /// Ignores sensor 1.
    pub igs: bool,
    pub mas2: bool,
    pub igs2: bool,
    /// Ignores rain delay.
    pub igrd: bool,
    pub dis: bool,
    pub seq: bool,
    /// Group bit; always written as 0.
    pub gid: bool,
}

impl StationAttrib {
    /// Factory attributes: master-associated, sequential.
    pub const FACTORY: Self = Self {
        mas: true,
        igs: false,
        mas2: false,
        igs2: false,
        igrd: false,
        dis: false,
        seq: true,
        gid: false,
    };

    pub fn to_byte(self) -> u8 {
        u8::from(self.mas)
            | u8::from(self.igs) << 1
            | u8::from(self.mas2) << 2
            | u8::from(self.igs2) << 3
            | u8::from(self.igrd) << 4
            | u8::from(self.dis) << 5
            | u8::from(self.seq) << 6
            | u8::from(self.gid) << 7
    }

    pub fn from_byte(b: u8) -> Self {
        Self {
            mas: b & 0x01 != 0,
            igs: b & 0x02 != 0,
            mas2: b & 0x04 != 0,
            igs2: b & 0x08 != 0,
            igrd: b & 0x10 != 0,
            dis: b & 0x20 != 0,
            seq: b & 0x40 != 0,
            gid: b & 0x80 != 0,
        }
    }
}

/// One decoded station record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationRecord {
    pub name: StationName,
    pub attrib: StationAttrib,
    pub stype: StationType,
    /// Type-specific payload, without its terminator.
    pub payload: StationPayload,
}

impl StationRecord {
    /// The record written by a factory reset: `S001`, `S002`, ...
    pub fn factory(sid: usize) -> Self {
        let mut name = StationName::new();
        // "S" + up to three digits always fits.
        let _ = core::fmt::write(&mut name, format_args!("S{:03}", sid + 1));
        let mut payload = StationPayload::new();
        let _ = payload.push(b'0');
        Self {
            name,
            attrib: StationAttrib::FACTORY,
            stype: StationType::Standard,
            payload,
        }
    }

    pub fn encode(&self) -> [u8; STATION_RECORD_SIZE] {
        let mut out = [0u8; STATION_RECORD_SIZE];
        let name = self.name.as_bytes();
        out[NAME_OFFSET..NAME_OFFSET + name.len()].copy_from_slice(name);
        out[ATTRIB_OFFSET] = self.attrib.to_byte();
        out[TYPE_OFFSET] = self.stype.code();
        out[PAYLOAD_OFFSET..PAYLOAD_OFFSET + self.payload.len()].copy_from_slice(&self.payload);
        out
    }

    pub fn decode(buf: &[u8; STATION_RECORD_SIZE]) -> Self {
        Self {
            name: name_from_bytes(&buf[NAME_OFFSET..ATTRIB_OFFSET]),
            attrib: StationAttrib::from_byte(buf[ATTRIB_OFFSET]),
            stype: StationType::from_code(buf[TYPE_OFFSET]),
            payload: until_nul(&buf[PAYLOAD_OFFSET..]).iter().copied().collect(),
        }
    }
}

fn until_nul(bytes: &[u8]) -> &[u8] {
    let len = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    &bytes[..len]
}

fn name_from_bytes(bytes: &[u8]) -> StationName {
    let raw = until_nul(bytes);
    let text = match core::str::from_utf8(raw) {
        Ok(s) => s,
        Err(e) => core::str::from_utf8(&raw[..e.valid_up_to()]).unwrap_or_default(),
    };
    let mut name = StationName::new();
    let _ = name.push_str(text);
    name
}

/// Record-level access to the station blob, bounded by build capacity.
#[derive(Debug, Clone, Copy)]
pub struct StationStore {
    capacity: usize,
}

impl StationStore {
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn offset(&self, sid: usize, field: usize) -> Result<u32, StationError> {
        if sid >= self.capacity {
            return Err(StationError::IndexOutOfRange {
                sid,
                capacity: self.capacity,
            });
        }
        // capacity <= 248 keeps this well inside u32.
        Ok((sid * STATION_RECORD_SIZE + field) as u32)
    }

    pub fn read(&self, store: &impl StoragePort, sid: usize) -> Result<StationRecord, Error> {
        let mut buf = [0u8; STATION_RECORD_SIZE];
        store.read_block(STATIONS_FILE, self.offset(sid, 0)?, &mut buf)?;
        Ok(StationRecord::decode(&buf))
    }

    pub fn write(
        &self,
        store: &mut impl StoragePort,
        sid: usize,
        record: &StationRecord,
    ) -> Result<(), Error> {
        store.write_block(STATIONS_FILE, self.offset(sid, 0)?, &record.encode())?;
        Ok(())
    }

    pub fn name(&self, store: &impl StoragePort, sid: usize) -> Result<StationName, Error> {
        let mut buf = [0u8; STATION_NAME_SIZE];
        store.read_block(STATIONS_FILE, self.offset(sid, NAME_OFFSET)?, &mut buf)?;
        Ok(name_from_bytes(&buf))
    }

    /// Write the name field, zero-padded.
    pub fn set_name(&self, store: &mut impl StoragePort, sid: usize, name: &str) -> Result<(), Error> {
        if name.len() > STATION_NAME_SIZE {
            return Err(StationError::NameTooLong.into());
        }
        let mut buf = [0u8; STATION_NAME_SIZE];
        buf[..name.len()].copy_from_slice(name.as_bytes());
        store.write_block(STATIONS_FILE, self.offset(sid, NAME_OFFSET)?, &buf)?;
        Ok(())
    }

    pub fn station_type(&self, store: &impl StoragePort, sid: usize) -> Result<StationType, Error> {
        let code = store.read_byte(STATIONS_FILE, self.offset(sid, TYPE_OFFSET)?)?;
        Ok(StationType::from_code(code))
    }

    pub(crate) fn set_type(
        &self,
        store: &mut impl StoragePort,
        sid: usize,
        stype: StationType,
    ) -> Result<(), Error> {
        store.write_byte(STATIONS_FILE, self.offset(sid, TYPE_OFFSET)?, stype.code())?;
        Ok(())
    }

    pub fn attrib(&self, store: &impl StoragePort, sid: usize) -> Result<StationAttrib, Error> {
        let b = store.read_byte(STATIONS_FILE, self.offset(sid, ATTRIB_OFFSET)?)?;
        Ok(StationAttrib::from_byte(b))
    }

    pub fn set_attrib(
        &self,
        store: &mut impl StoragePort,
        sid: usize,
        attrib: StationAttrib,
    ) -> Result<(), Error> {
        store.write_byte(STATIONS_FILE, self.offset(sid, ATTRIB_OFFSET)?, attrib.to_byte())?;
        Ok(())
    }

    /// Replace type and payload together, leaving name and attributes alone.
    pub fn set_data(
        &self,
        store: &mut impl StoragePort,
        sid: usize,
        stype: StationType,
        payload: &[u8],
    ) -> Result<(), Error> {
        if payload.len() > STATION_PAYLOAD_SIZE {
            return Err(StationError::PayloadTooLong.into());
        }
        let mut buf = [0u8; 1 + STATION_PAYLOAD_SIZE];
        buf[0] = stype.code();
        buf[1..=payload.len()].copy_from_slice(payload);
        store.write_block(STATIONS_FILE, self.offset(sid, TYPE_OFFSET)?, &buf)?;
        Ok(())
    }
}

//! Decoded station kinds.
//!
//! A station's type tag and raw payload are decoded once into a
//! [`StationKind`] and cached; dispatch matches on the variant instead of
//! re-parsing bytes every time a valve switches.
//!
//! Payload formats (ASCII):
//!
//! | type   | layout                                   |
//! |--------|------------------------------------------|
//! | RF     | `on[6 hex] off[6 hex] timing[4 hex]`     |
//! | Remote | `ip[8 hex] port[4 hex] sid[2 hex]`       |
//! | GPIO   | `pin[2 dec] active[1: 0 low, 1 high]`    |
//! | HTTP   | `server,port,on_path,off_path`           |

use std::net::Ipv4Addr;

use crate::error::PayloadError;
use crate::net::{Endpoint, Host};

use super::StationType;

/// Parse exactly `code.len()` hex digits.  Any non-hex byte yields 0.
pub fn hex_to_u32(code: &[u8]) -> u32 {
    checked_hex(code).unwrap_or(0)
}

fn checked_hex(code: &[u8]) -> Option<u32> {
    code.iter().try_fold(0u32, |acc, &c| {
        let digit = char::from(c).to_digit(16)?;
        Some(acc.wrapping_shl(4) | digit)
    })
}

/// Fixed-width field at `start`, or `None` if the payload is too short.
fn field(payload: &[u8], start: usize, len: usize) -> Option<&[u8]> {
    payload.get(start..start + len)
}

/// RF on/off codes and pulse unit length (microseconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RfCode {
    pub on: u32,
    pub off: u32,
    pub timing: u16,
}

impl RfCode {
    /// Every field must decode to a non-zero value.
    pub fn parse(payload: &[u8]) -> Result<Self, PayloadError> {
        let hex = |start, len| field(payload, start, len).map(hex_to_u32).unwrap_or(0);
        let on = hex(0, 6);
        let off = hex(6, 6);
        let timing = hex(12, 4);
        if on == 0 || off == 0 || timing == 0 {
            return Err(PayloadError::RfCode);
        }
        Ok(Self {
            on,
            off,
            // Four hex digits always fit.
            timing: timing as u16,
        })
    }

    pub fn code_for(&self, on: bool) -> u32 {
        if on { self.on } else { self.off }
    }
}

/// Peer controller and the station index on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteTarget {
    pub ip: Ipv4Addr,
    pub port: u16,
    pub sid: u8,
}

impl RemoteTarget {
    pub fn parse(payload: &[u8]) -> Result<Self, PayloadError> {
        let hex = |start, len| {
            field(payload, start, len)
                .and_then(checked_hex)
                .ok_or(PayloadError::RemoteAddress)
        };
        let ip = hex(0, 8)?;
        let port = hex(8, 4)?;
        let sid = hex(12, 2)?;
        Ok(Self {
            ip: Ipv4Addr::from(ip),
            port: port as u16,
            sid: sid as u8,
        })
    }

    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(Host::Ip(self.ip), self.port)
    }
}

/// Directly driven relay line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioTarget {
    pub pin: u8,
    pub active_high: bool,
}

impl GpioTarget {
    pub fn parse(payload: &[u8]) -> Result<Self, PayloadError> {
        let digit = |i: usize| {
            payload
                .get(i)
                .and_then(|&c| char::from(c).to_digit(10))
                .ok_or(PayloadError::GpioPin)
        };
        let pin = digit(0)? * 10 + digit(1)?;
        let active_high = match digit(2)? {
            0 => false,
            1 => true,
            _ => return Err(PayloadError::GpioPin),
        };
        Ok(Self {
            pin: pin as u8,
            active_high,
        })
    }

    /// Line level that realises the commanded state.
    pub fn level_for(&self, on: bool) -> bool {
        on == self.active_high
    }
}

/// HTTP endpoint with one path per commanded state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpTarget {
    pub endpoint: Endpoint,
    pub on_path: String,
    pub off_path: String,
}

impl HttpTarget {
    pub fn parse(payload: &[u8]) -> Result<Self, PayloadError> {
        let text = core::str::from_utf8(payload).map_err(|_| PayloadError::HttpRecord)?;
        // Empty fields are skipped, so "a,,80,on,off" still parses.
        let mut parts = text.split(',').map(str::trim).filter(|s| !s.is_empty());
        let mut next = || parts.next().ok_or(PayloadError::HttpRecord);
        let server = next()?;
        let port: u16 = next()?.parse().map_err(|_| PayloadError::HttpRecord)?;
        let on_path = next()?.to_string();
        let off_path = next()?.to_string();
        Ok(Self {
            endpoint: Endpoint::new(Host::parse(server), port),
            on_path,
            off_path,
        })
    }

    pub fn path_for(&self, on: bool) -> &str {
        if on { &self.on_path } else { &self.off_path }
    }
}

/// A station's type with its payload decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationKind {
    Standard,
    Rf(RfCode),
    Remote(RemoteTarget),
    Gpio(GpioTarget),
    Http(HttpTarget),
    /// Unknown tag; nothing to dispatch.
    Other(u8),
}

impl StationKind {
    pub fn decode(stype: StationType, payload: &[u8]) -> Result<Self, PayloadError> {
        Ok(match stype {
            StationType::Standard => Self::Standard,
            StationType::Rf => Self::Rf(RfCode::parse(payload)?),
            StationType::Remote => Self::Remote(RemoteTarget::parse(payload)?),
            StationType::Gpio => Self::Gpio(GpioTarget::parse(payload)?),
            StationType::Http => Self::Http(HttpTarget::parse(payload)?),
            StationType::Other(c) => Self::Other(c),
        })
    }

    pub fn is_standard(&self) -> bool {
        matches!(self, Self::Standard)
    }
}

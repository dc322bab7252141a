//! String options: fixed-stride slots in the `sopts` blob.
//!
//! Slot `n` starts at `n * SOPT_CAPACITY`.  A value shorter than the slot is
//! written with its NUL terminator; a value filling the slot is written
//! without one.  Saves compare first and skip the write when nothing changed.

use heapless::String;
use log::debug;

use crate::app::ports::StoragePort;
use crate::error::StorageError;

use super::SOPTS_FILE;

/// Bytes reserved per string option.
pub const SOPT_CAPACITY: usize = 40;

/// MD5 hex digest of the factory password `opendoor`.
pub const DEFAULT_PASSWORD: &str = "a6d82bced638de3def1e9bbb4983225c";
pub const DEFAULT_LOCATION: &str = "42.36,-71.06";
pub const DEFAULT_JAVASCRIPT_URL: &str = "https://ui.opensprinkler.com/js";
pub const DEFAULT_WEATHER_URL: &str = "weather.opensprinkler.com";

/// A string option value as stored.
pub type StrValue = String<SOPT_CAPACITY>;

/// String option ordinals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StrOpt {
    Password,
    Location,
    JavascriptUrl,
    WeatherUrl,
    WeatherOptions,
    IftttKey,
    WifiSsid,
    WifiPass,
    MqttOptions,
    OtcOptions,
    DeviceName,
    Reserved1,
    Reserved2,
}

/// Number of string options.
pub const NUM_SOPTS: usize = 13;

impl StrOpt {
    pub const ALL: [StrOpt; NUM_SOPTS] = [
        StrOpt::Password,
        StrOpt::Location,
        StrOpt::JavascriptUrl,
        StrOpt::WeatherUrl,
        StrOpt::WeatherOptions,
        StrOpt::IftttKey,
        StrOpt::WifiSsid,
        StrOpt::WifiPass,
        StrOpt::MqttOptions,
        StrOpt::OtcOptions,
        StrOpt::DeviceName,
        StrOpt::Reserved1,
        StrOpt::Reserved2,
    ];

    pub fn default_value(self) -> &'static str {
        match self {
            Self::Password => DEFAULT_PASSWORD,
            Self::Location => DEFAULT_LOCATION,
            Self::JavascriptUrl => DEFAULT_JAVASCRIPT_URL,
            Self::WeatherUrl => DEFAULT_WEATHER_URL,
            _ => "",
        }
    }

    fn offset(self) -> u32 {
        (self as u32) * SOPT_CAPACITY as u32
    }
}

/// Result of a smart save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Stored bytes already matched; nothing was written.
    Unchanged,
    Written,
}

/// Bytes a save of `value` would put in the slot: the value truncated to
/// the slot (at a char boundary), plus a terminator when it fits.
fn encode(value: &str) -> heapless::Vec<u8, SOPT_CAPACITY> {
    let mut end = value.len().min(SOPT_CAPACITY);
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = heapless::Vec::new();
    // Both pushes fit: end <= capacity and the NUL is only added below it.
    let _ = out.extend_from_slice(&value.as_bytes()[..end]);
    if end < SOPT_CAPACITY {
        let _ = out.push(0);
    }
    out
}

/// Read a string option, stopping at the first NUL.
pub fn load(store: &impl StoragePort, opt: StrOpt) -> Result<StrValue, StorageError> {
    let mut buf = [0u8; SOPT_CAPACITY];
    store.read_block(SOPTS_FILE, opt.offset(), &mut buf)?;
    let len = buf.iter().position(|&b| b == 0).unwrap_or(SOPT_CAPACITY);
    let text = match core::str::from_utf8(&buf[..len]) {
        Ok(s) => s,
        // Keep the valid prefix of a corrupted slot.
        Err(e) => core::str::from_utf8(&buf[..e.valid_up_to()]).unwrap_or_default(),
    };
    let mut out = StrValue::new();
    let _ = out.push_str(text);
    Ok(out)
}

/// Smart save: compare, then write only when the slot differs.
pub fn save(
    store: &mut impl StoragePort,
    opt: StrOpt,
    value: &str,
) -> Result<SaveOutcome, StorageError> {
    let bytes = encode(value);
    if store.compare_block(SOPTS_FILE, opt.offset(), &bytes)? {
        return Ok(SaveOutcome::Unchanged);
    }
    store.write_block(SOPTS_FILE, opt.offset(), &bytes)?;
    debug!("sopt {:?} written ({} bytes)", opt, bytes.len());
    Ok(SaveOutcome::Written)
}

/// Zero every slot, then store the factory defaults.
pub(crate) fn reset_all(store: &mut impl StoragePort) -> Result<(), StorageError> {
    let zeros = [0u8; SOPT_CAPACITY];
    for opt in StrOpt::ALL {
        store.write_block(SOPTS_FILE, opt.offset(), &zeros)?;
    }
    for opt in StrOpt::ALL {
        save(store, opt, opt.default_value())?;
    }
    Ok(())
}

/// `true` when `candidate` equals the stored password digest.
pub fn password_verify(store: &impl StoragePort, candidate: &str) -> Result<bool, StorageError> {
    store.compare_block(SOPTS_FILE, StrOpt::Password.offset(), &encode(candidate))
}

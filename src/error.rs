//! Unified error types for the controller core.
//!
//! Every fallible store, option, station and hardware operation funnels into
//! [`Error`], keeping the control loop's error handling uniform.  Network and
//! dispatch failures are deliberately *not* here: they are classified results
//! ([`RequestOutcome`](crate::net::RequestOutcome),
//! [`DispatchOutcome`](crate::dispatch::DispatchOutcome)) and never abort the
//! caller.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The persistent blob store failed.
    Storage(StorageError),
    /// An option value or ordinal was rejected.
    Option(OptionError),
    /// A station index or record was rejected.
    Station(StationError),
    /// A station payload could not be decoded.
    Payload(PayloadError),
    /// A GPIO line or bus operation failed.
    Hardware(HwError),
    /// Host configuration is invalid.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Option(e) => write!(f, "option: {e}"),
            Self::Station(e) => write!(f, "station: {e}"),
            Self::Payload(e) => write!(f, "payload: {e}"),
            Self::Hardware(e) => write!(f, "hardware: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Storage errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The named blob does not exist.
    NotFound,
    /// Generic I/O failure from the backing medium.
    Io(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "blob not found"),
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound
        } else {
            Self::Io(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Option errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionError {
    /// Value exceeds the option's maximum.
    OutOfRange { name: &'static str, value: u8, max: u8 },
    /// No option with this JSON name.
    UnknownName,
}

impl fmt::Display for OptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { name, value, max } => {
                write!(f, "{name}={value} exceeds maximum {max}")
            }
            Self::UnknownName => write!(f, "unknown option name"),
        }
    }
}

impl From<OptionError> for Error {
    fn from(e: OptionError) -> Self {
        Self::Option(e)
    }
}

// ---------------------------------------------------------------------------
// Station errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationError {
    /// Station index is beyond the build's capacity.
    IndexOutOfRange { sid: usize, capacity: usize },
    /// Name does not fit the fixed record field.
    NameTooLong,
    /// Payload does not fit the fixed record field.
    PayloadTooLong,
}

impl fmt::Display for StationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { sid, capacity } => {
                write!(f, "station {sid} out of range (capacity {capacity})")
            }
            Self::NameTooLong => write!(f, "station name too long"),
            Self::PayloadTooLong => write!(f, "station payload too long"),
        }
    }
}

impl From<StationError> for Error {
    fn from(e: StationError) -> Self {
        Self::Station(e)
    }
}

// ---------------------------------------------------------------------------
// Payload errors
// ---------------------------------------------------------------------------

/// A persisted special-station payload failed to decode.  The dispatcher
/// treats every variant the same way: skip the transmission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadError {
    /// An RF on/off/timing field is non-hex or decodes to zero.
    RfCode,
    /// Remote station IP/port/index field is not hex.
    RemoteAddress,
    /// GPIO pin or active-level field is not a decimal digit.
    GpioPin,
    /// HTTP record is missing one of server, port, on-path, off-path.
    HttpRecord,
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RfCode => write!(f, "malformed RF code"),
            Self::RemoteAddress => write!(f, "malformed remote station address"),
            Self::GpioPin => write!(f, "malformed GPIO pin spec"),
            Self::HttpRecord => write!(f, "malformed HTTP station record"),
        }
    }
}

impl From<PayloadError> for Error {
    fn from(e: PayloadError) -> Self {
        Self::Payload(e)
    }
}

// ---------------------------------------------------------------------------
// Hardware errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwError {
    /// Writing an output line failed.
    GpioWriteFailed(u8),
    /// Reading an input line failed.
    GpioReadFailed(u8),
    /// The shift-register bus could not be driven.
    ShiftOutFailed,
    /// The RF transmitter line could not be driven.
    RfTransmitFailed,
}

impl fmt::Display for HwError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed(pin) => write!(f, "GPIO {pin} write failed"),
            Self::GpioReadFailed(pin) => write!(f, "GPIO {pin} read failed"),
            Self::ShiftOutFailed => write!(f, "shift register write failed"),
            Self::RfTransmitFailed => write!(f, "RF transmit failed"),
        }
    }
}

impl From<HwError> for Error {
    fn from(e: HwError) -> Self {
        Self::Hardware(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The config file could not be read.
    Io(String),
    /// The config file is not valid JSON for [`ControllerConfig`](crate::config::ControllerConfig).
    Parse(String),
    /// A field failed range validation.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "read failed: {msg}"),
            Self::Parse(msg) => write!(f, "parse failed: {msg}"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

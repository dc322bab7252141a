//! Host runtime configuration.
//!
//! Persistent controller settings live in the option registry
//! ([`crate::options`]); this struct covers what the registry cannot know
//! about: where the blob store lives, how many stations the build supports,
//! which GPIO lines the board uses and how fast the control loop polls.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pins;

/// Core runtime configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    // --- Storage ---
    /// Directory holding the option, station and nvdata blobs.
    pub data_dir: PathBuf,

    // --- Capacity ---
    /// Number of station records this build supports (boards = ceil / 8).
    pub max_stations: usize,

    // --- Hardware ---
    pub pins: PinMap,
    /// Revision-1 boards route serial data through the alternate line.
    pub legacy_data_pin: bool,
    /// GPIO character device (`hardware` feature only).
    pub gpio_chip: String,

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub poll_interval_ms: u64,
    /// Deadline for remote/HTTP station requests (milliseconds)
    pub http_timeout_ms: u64,

    // --- Telemetry ---
    pub telemetry: Option<InfluxConfig>,
}

/// GPIO assignments for the bus, sensors and RF transmitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinMap {
    pub clock: u8,
    pub latch: u8,
    pub data: u8,
    pub data_alt: u8,
    pub output_enable: u8,
    pub sensor1: u8,
    pub sensor2: u8,
    pub rf_tx: u8,
}

/// InfluxDB endpoint receiving valve telemetry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfluxConfig {
    pub host: String,
    #[serde(default = "default_influx_port")]
    pub port: u16,
    #[serde(default = "default_influx_db")]
    pub database: String,
}

fn default_influx_port() -> u16 {
    8086
}

fn default_influx_db() -> String {
    "ospi".into()
}

impl Default for PinMap {
    fn default() -> Self {
        Self {
            clock: pins::SR_CLOCK_GPIO,
            latch: pins::SR_LATCH_GPIO,
            data: pins::SR_DATA_GPIO,
            data_alt: pins::SR_DATA_ALT_GPIO,
            output_enable: pins::SR_OE_GPIO,
            sensor1: pins::SENSOR1_GPIO,
            sensor2: pins::SENSOR2_GPIO,
            rf_tx: pins::RF_TX_GPIO,
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            max_stations: 200, // 1 main + 24 extension boards
            pins: PinMap::default(),
            legacy_data_pin: false,
            gpio_chip: "/dev/gpiochip0".into(),
            poll_interval_ms: 1000, // 1 Hz
            http_timeout_ms: 3000,
            telemetry: None,
        }
    }
}

impl PinMap {
    /// Serial data line actually wired on this board revision.
    pub fn data_line(&self, legacy: bool) -> u8 {
        if legacy { self.data_alt } else { self.data }
    }
}

impl ControllerConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let cfg: Self = serde_json::from_str(&text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Range-check every field.  Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(8..=248).contains(&self.max_stations) {
            return Err(ConfigError::ValidationFailed("max_stations must be 8–248"));
        }
        if !(100..=10_000).contains(&self.poll_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "poll_interval_ms must be 100–10000",
            ));
        }
        if !(100..=60_000).contains(&self.http_timeout_ms) {
            return Err(ConfigError::ValidationFailed(
                "http_timeout_ms must be 100–60000",
            ));
        }
        let p = &self.pins;
        let bus = [p.clock, p.latch, p.data_line(self.legacy_data_pin), p.output_enable];
        for (i, a) in bus.iter().enumerate() {
            if bus[i + 1..].contains(a) {
                return Err(ConfigError::ValidationFailed(
                    "shift register pins must be distinct",
                ));
            }
        }
        if let Some(t) = &self.telemetry {
            if t.host.is_empty() {
                return Err(ConfigError::ValidationFailed("telemetry.host is empty"));
            }
        }
        Ok(())
    }
}

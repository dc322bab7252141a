//! Shared vocabulary for the outbound request primitive.
//!
//! Remote stations, HTTP stations and the telemetry sink all talk to peers
//! through one [`NetworkPort`](crate::app::ports::NetworkPort) call:
//! resolve, connect, write, poll for a reply until a [`Deadline`], classify.
//! The deadline is explicit so a concurrent host can run requests on worker
//! tasks without changing the contract.

use core::fmt;
use std::net::Ipv4Addr;
use std::time::{Duration, Instant};

/// Upper bound on the reply bytes retained for the completion callback.
pub const RESPONSE_BUFFER_SIZE: usize = 2048;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);

/// Where a request goes: a literal dotted IP or a name to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Host {
    Ip(Ipv4Addr),
    Name(String),
}

impl Host {
    /// Literal dotted quads become [`Host::Ip`]; everything else is a name.
    pub fn parse(s: &str) -> Self {
        match s.parse::<Ipv4Addr>() {
            Ok(ip) => Self::Ip(ip),
            Err(_) => Self::Name(s.to_string()),
        }
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ip(ip) => write!(f, "{ip}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: Host,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: Host, port: u16) -> Self {
        Self { host, port }
    }

    /// Parse `server[:port]`, defaulting to port 80.
    pub fn parse_with_default_port(s: &str) -> Option<Self> {
        let (host, port) = match s.split_once(':') {
            Some((h, p)) => (h, p.trim().parse().ok()?),
            None => (s, 80),
        };
        let host = host.trim();
        if host.is_empty() {
            return None;
        }
        Some(Self::new(Host::parse(host), port))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Absolute point on the monotonic clock after which a request is abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Deadline(Instant);

impl Deadline {
    pub fn after(timeout: Duration) -> Self {
        Self(Instant::now() + timeout)
    }

    pub fn at(instant: Instant) -> Self {
        Self(instant)
    }

    /// Time left, zero once expired.
    pub fn remaining(&self) -> Duration {
        self.0.saturating_duration_since(Instant::now())
    }

    pub fn expired(&self) -> bool {
        Instant::now() >= self.0
    }
}

/// Classified result of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Non-empty reply received and handed to the callback.
    Success,
    /// Name resolution or TCP connect failed.
    ConnectError,
    /// Connected, but nothing came back before close or deadline.
    EmptyResponse,
}

impl RequestOutcome {
    /// Wire-compatible result code used by diagnostics.
    pub const fn code(self) -> i8 {
        match self {
            Self::Success => 0,
            Self::ConnectError => -2,
            Self::EmptyResponse => -3,
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

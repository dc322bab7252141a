//! Station type dispatcher.
//!
//! Standard stations are handled entirely by the shift-register push, so
//! dispatch is a no-op for them.  Special stations get an active signal:
//!
//! | kind   | adapter     | channel                          |
//! |--------|-------------|----------------------------------|
//! | RF     | [`rf`]      | pulse train on the RF line       |
//! | GPIO   | [`gpio`]    | direct relay line                |
//! | Remote | [`remote`]  | `GET /cm` on a peer controller   |
//! | HTTP   | [`http`]    | `GET /<path>` on any server      |
//!
//! Failures never propagate: they come back as a [`DispatchOutcome`] and
//! the commanded bit stays as set.  The refresh cycle resends later.

pub mod gpio;
pub mod http;
pub mod remote;
pub mod rf;

use std::time::Duration;

use log::{debug, warn};

use crate::app::ports::{ActuatorPort, NetworkPort};
use crate::error::{HwError, PayloadError};
use crate::net::{Deadline, Endpoint, RequestOutcome};
use crate::stations::kind::StationKind;

use rf::PulseTrain;

/// Controller state a dispatch needs.
#[derive(Debug, Clone, Copy)]
pub struct DispatchContext<'a> {
    /// Stored password digest, forwarded to remote peers.
    pub password: &'a str,
    pub nstations: usize,
    pub auto_refresh: bool,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchFailure {
    Hardware(HwError),
    Network(RequestOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Standard or unknown type: nothing to send.
    Skipped,
    Sent,
    /// Payload could not be decoded; nothing was sent.
    Malformed(PayloadError),
    Failed(DispatchFailure),
}

impl DispatchOutcome {
    fn from_hw(r: Result<(), HwError>) -> Self {
        match r {
            Ok(()) => Self::Sent,
            Err(e) => Self::Failed(DispatchFailure::Hardware(e)),
        }
    }

    fn from_request(r: RequestOutcome) -> Self {
        match r {
            RequestOutcome::Success => Self::Sent,
            other => Self::Failed(DispatchFailure::Network(other)),
        }
    }
}

fn send(
    net: &mut impl NetworkPort,
    endpoint: &Endpoint,
    request: &str,
    timeout: Duration,
) -> RequestOutcome {
    let outcome = net.send_request(
        endpoint,
        request.as_bytes(),
        Deadline::after(timeout),
        &mut |reply| debug!("{} replied {} bytes", endpoint, reply.len()),
    );
    debug!("request to {} -> {:?}", endpoint, outcome);
    outcome
}

/// Send `on` to the station described by `kind`.
pub fn dispatch(
    sid: usize,
    kind: &Result<StationKind, PayloadError>,
    on: bool,
    ctx: &DispatchContext<'_>,
    hw: &mut impl ActuatorPort,
    net: &mut impl NetworkPort,
) -> DispatchOutcome {
    let kind = match kind {
        Ok(k) => k,
        Err(e) => {
            warn!("station {}: {}, not dispatching", sid, e);
            return DispatchOutcome::Malformed(*e);
        }
    };
    let outcome = match kind {
        StationKind::Standard | StationKind::Other(_) => return DispatchOutcome::Skipped,
        StationKind::Rf(code) => DispatchOutcome::from_hw(
            hw.transmit_rf(PulseTrain::new(code.code_for(on), code.timing)),
        ),
        StationKind::Gpio(target) => DispatchOutcome::from_hw(gpio::switch(target, on, hw)),
        StationKind::Remote(target) => {
            let timer = remote::refresh_timer(ctx.auto_refresh, ctx.nstations);
            let req = remote::build_request(target, ctx.password, on, timer);
            DispatchOutcome::from_request(send(net, &target.endpoint(), &req, ctx.timeout))
        }
        StationKind::Http(target) => {
            let req = http::build_request(target, on);
            DispatchOutcome::from_request(send(net, &target.endpoint, &req, ctx.timeout))
        }
    };
    if let DispatchOutcome::Failed(f) = outcome {
        warn!("station {}: dispatch failed: {:?}", sid, f);
    }
    outcome
}

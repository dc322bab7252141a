//! TCP request adapter.
//!
//! Implements [`NetworkPort`] with blocking `std::net` sockets bounded by
//! the caller's [`Deadline`]:
//!
//! 1. Resolve: literal IPs are used as-is, names go through the system
//!    resolver (first IPv4 answer wins).
//! 2. Connect with whatever time the deadline leaves.
//! 3. Write the request.
//! 4. Read until the peer closes, the deadline passes, or
//!    [`RESPONSE_BUFFER_SIZE`] bytes are buffered.
//!
//! Resolution and connect failures classify as
//! [`RequestOutcome::ConnectError`]; anything that connects but yields no
//! bytes is [`RequestOutcome::EmptyResponse`].

use std::io::{ErrorKind, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};

use log::{debug, warn};

use crate::app::ports::NetworkPort;
use crate::net::{Deadline, Endpoint, Host, RequestOutcome, RESPONSE_BUFFER_SIZE};

#[derive(Debug, Default, Clone, Copy)]
pub struct TcpHttpClient;

impl TcpHttpClient {
    pub fn new() -> Self {
        Self
    }
}

fn resolve(endpoint: &Endpoint) -> Option<SocketAddr> {
    match &endpoint.host {
        Host::Ip(ip) => Some(SocketAddr::from((*ip, endpoint.port))),
        Host::Name(name) => (name.as_str(), endpoint.port)
            .to_socket_addrs()
            .ok()?
            .find(SocketAddr::is_ipv4),
    }
}

/// Read into `buf` until close, deadline or full.  Returns bytes read.
fn read_reply(stream: &mut TcpStream, buf: &mut [u8], deadline: Deadline) -> usize {
    let mut len = 0;
    while len < buf.len() {
        let left = deadline.remaining();
        if left.is_zero() || stream.set_read_timeout(Some(left)).is_err() {
            break;
        }
        match stream.read(&mut buf[len..]) {
            Ok(0) => break,
            Ok(n) => len += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                debug!("read stopped: {}", e);
                break;
            }
        }
    }
    len
}

impl NetworkPort for TcpHttpClient {
    fn send_request(
        &mut self,
        endpoint: &Endpoint,
        request: &[u8],
        deadline: Deadline,
        on_response: &mut dyn FnMut(&[u8]),
    ) -> RequestOutcome {
        let Some(addr) = resolve(endpoint) else {
            warn!("{}: cannot resolve host", endpoint);
            return RequestOutcome::ConnectError;
        };
        let budget = deadline.remaining();
        if budget.is_zero() {
            return RequestOutcome::ConnectError;
        }
        let mut stream = match TcpStream::connect_timeout(&addr, budget) {
            Ok(s) => s,
            Err(e) => {
                warn!("{}: connect failed: {}", endpoint, e);
                return RequestOutcome::ConnectError;
            }
        };

        let left = deadline.remaining();
        let written = !left.is_zero()
            && stream.set_write_timeout(Some(left)).is_ok()
            && stream.write_all(request).is_ok();
        if !written {
            warn!("{}: request write failed", endpoint);
            return RequestOutcome::EmptyResponse;
        }

        let mut buf = [0u8; RESPONSE_BUFFER_SIZE];
        let len = read_reply(&mut stream, &mut buf, deadline);
        if len == 0 {
            debug!("{}: empty response", endpoint);
            return RequestOutcome::EmptyResponse;
        }
        on_response(&buf[..len]);
        RequestOutcome::Success
    }
}

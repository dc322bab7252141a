//! Remote-station adapter: forward a command to a peer controller.
//!
//! The peer is assumed to share this controller's password.

use crate::stations::kind::RemoteTarget;

/// Seconds a peer keeps a station on when no refresh will follow.  This is
/// 18 h, the value peer controllers expect on the wire for an open-ended run.
pub const FALLBACK_TIMER_SECS: u32 = 64_800;

/// Station run time sent to the peer.  With auto-refresh on, the next
/// refresh arrives within one cycle, so two cycles is enough.
pub fn refresh_timer(auto_refresh: bool, nstations: usize) -> u32 {
    if auto_refresh {
        2 * nstations as u32
    } else {
        FALLBACK_TIMER_SECS
    }
}

pub fn build_request(target: &RemoteTarget, password: &str, on: bool, timer: u32) -> String {
    format!(
        "GET /cm?pw={}&sid={}&en={}&t={} HTTP/1.0\r\nHOST: {}\r\n\r\n",
        password,
        target.sid,
        u8::from(on),
        timer,
        target.ip,
    )
}

//! Fuzz target: `StationKind::decode`
//!
//! The first byte picks the station type, the rest is the payload.  No
//! payload may panic the decoder, and whatever decodes must produce a
//! request or pulse train without panicking either.
//!
//! cargo fuzz run fuzz_station_payload

#![no_main]

use libfuzzer_sys::fuzz_target;
use sprinkler::dispatch::rf::PulseTrain;
use sprinkler::dispatch::{http, remote};
use sprinkler::stations::{StationKind, StationType};

fuzz_target!(|data: &[u8]| {
    let Some((&tag, payload)) = data.split_first() else {
        return;
    };
    let stype = StationType::from_code(tag % 6);
    let Ok(kind) = StationKind::decode(stype, payload) else {
        return;
    };
    match kind {
        StationKind::Rf(rf) => {
            assert!(rf.on != 0 && rf.off != 0 && rf.timing != 0);
            assert_eq!(PulseTrain::new(rf.on, rf.timing).count(), PulseTrain::total_pulses());
        }
        StationKind::Remote(target) => {
            let req = remote::build_request(&target, "opendoor", true, 16);
            assert!(req.starts_with("GET /cm?"));
        }
        StationKind::Gpio(g) => assert!(g.pin < 100),
        StationKind::Http(target) => {
            assert!(http::build_request(&target, false).starts_with("GET /"));
        }
        StationKind::Standard | StationKind::Other(_) => {}
    }
});

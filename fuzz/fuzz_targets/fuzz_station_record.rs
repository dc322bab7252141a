//! Fuzz target: `StationRecord::decode`
//!
//! Arbitrary record bytes (as left by a corrupted or foreign data file)
//! must decode without panicking, and a decoded record must survive
//! encode/decode unchanged.
//!
//! cargo fuzz run fuzz_station_record

#![no_main]

use libfuzzer_sys::fuzz_target;
use sprinkler::stations::{STATION_RECORD_SIZE, StationRecord};

fuzz_target!(|data: &[u8]| {
    let mut buf = [0u8; STATION_RECORD_SIZE];
    let n = data.len().min(STATION_RECORD_SIZE);
    buf[..n].copy_from_slice(&data[..n]);

    let record = StationRecord::decode(&buf);
    assert!(record.name.len() <= 32);
    assert!(!record.payload.contains(&0));

    let again = StationRecord::decode(&record.encode());
    assert_eq!(again, record);
});

//! Station actuation: the single bit mutator, the shift-register push and
//! the power-up sequence.

use sprinkler::BitChange;
use sprinkler::app::events::AppEvent;
use sprinkler::error::StationError;
use sprinkler::options::IntOpt;

use crate::mock_hw::{HwCall, Rig};

#[test]
fn set_bit_reports_transitions_and_emits_telemetry() {
    let mut rig = Rig::booted(16);
    assert_eq!(rig.set(3, true), BitChange::TurnedOn);
    assert_eq!(rig.set(3, false), BitChange::TurnedOff);
    assert_eq!(
        rig.sink.events,
        vec![
            AppEvent::StationSwitched { sid: 3, on: true },
            AppEvent::ActiveStation(Some(3)),
            AppEvent::StationSwitched { sid: 3, on: false },
            AppEvent::ActiveStation(None),
        ]
    );
}

#[test]
fn repeated_set_bit_is_silent() {
    let mut rig = Rig::booted(16);
    rig.set(5, true);
    let events = rig.sink.events.len();
    assert_eq!(rig.set(5, true), BitChange::Unchanged);
    assert_eq!(rig.set(6, false), BitChange::Unchanged);
    assert_eq!(rig.sink.events.len(), events);
    assert!(rig.hw.calls.is_empty());
}

#[test]
fn set_bit_rejects_stations_beyond_configured_boards() {
    let mut rig = Rig::booted(16);
    // One board configured: stations 0..8.
    let err = rig
        .ctl
        .set_station_bit(8, true, &mut rig.hw, &mut rig.net, &mut rig.sink)
        .unwrap_err();
    assert_eq!(err, StationError::IndexOutOfRange { sid: 8, capacity: 8 });

    rig.ctl.set_option(IntOpt::ExtBoardCount, 1).unwrap();
    assert_eq!(rig.set(8, true), BitChange::TurnedOn);
}

#[test]
fn apply_shifts_highest_board_first() {
    let mut rig = Rig::booted(24);
    rig.ctl.set_option(IntOpt::ExtBoardCount, 2).unwrap();
    rig.set(0, true);
    rig.set(9, true);
    rig.set(23, true);
    rig.apply(0);
    assert_eq!(rig.hw.last_shift(), Some(&[0x80, 0x02, 0x01][..]));
}

#[test]
fn disabled_controller_shifts_zeros_and_recovers() {
    let mut rig = Rig::booted(16);
    rig.ctl.set_option(IntOpt::ExtBoardCount, 1).unwrap();
    rig.set(1, true);
    rig.set(15, true);

    rig.ctl.disable().unwrap();
    rig.apply(0);
    assert_eq!(rig.hw.last_shift(), Some(&[0, 0][..]));
    assert!(rig.ctl.station_bits().get(15), "bitmask is untouched");

    rig.ctl.enable().unwrap();
    rig.apply(0);
    assert_eq!(rig.hw.last_shift(), Some(&[0x80, 0x02][..]));
}

#[test]
fn saving_a_cleared_enable_option_disables_output() {
    let mut rig = Rig::booted(16);
    rig.set(1, true);
    rig.ctl.set_option(IntOpt::DeviceEnable, 0).unwrap();
    rig.ctl.save_options().unwrap();
    assert!(!rig.ctl.status().enabled);

    rig.apply(0);
    assert_eq!(rig.hw.last_shift(), Some(&[0, 0][..]));

    rig.ctl.set_option(IntOpt::DeviceEnable, 1).unwrap();
    rig.ctl.save_options().unwrap();
    rig.apply(0);
    assert_eq!(rig.hw.last_shift(), Some(&[0, 0x02][..]));
}

#[test]
fn shrinking_boards_still_clocks_the_whole_chain() {
    let mut rig = Rig::booted(24);
    rig.ctl.set_option(IntOpt::ExtBoardCount, 2).unwrap();
    rig.set(20, true);
    rig.apply(0);
    assert_eq!(rig.hw.last_shift(), Some(&[0x10, 0, 0][..]));

    rig.ctl.set_option(IntOpt::ExtBoardCount, 0).unwrap();
    rig.apply(1);
    assert_eq!(rig.hw.last_shift(), Some(&[0, 0, 0][..]));
    assert!(rig.ctl.station_bits().get(20), "bit stays in memory");

    rig.ctl.set_option(IntOpt::ExtBoardCount, 2).unwrap();
    rig.apply(2);
    assert_eq!(rig.hw.last_shift(), Some(&[0x10, 0, 0][..]));
}

#[test]
fn disable_persists_device_enable_option() {
    let mut rig = Rig::booted(16);
    rig.ctl.disable().unwrap();
    assert!(!rig.ctl.status().enabled);
    rig.ctl.load_options().unwrap();
    assert!(!rig.ctl.options().device_enabled());
    assert!(!rig.ctl.old_status().enabled);
}

#[test]
fn clear_all_turns_off_only_active_stations() {
    let mut rig = Rig::booted(16);
    rig.set(2, true);
    rig.set(4, true);
    rig.sink.events.clear();

    rig.ctl
        .clear_all_station_bits(&mut rig.hw, &mut rig.net, &mut rig.sink);
    assert!(!rig.ctl.station_bits().any());
    let offs: Vec<_> = rig
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::StationSwitched { sid, on: false } => Some(*sid),
            _ => None,
        })
        .collect();
    assert_eq!(offs, vec![2, 4]);
}

#[test]
fn begin_holds_outputs_off_until_cleared_bits_are_pushed() {
    let mut rig = Rig::booted(16);
    rig.set(7, true);
    rig.hw.calls.clear();

    rig.ctl
        .begin(0, &mut rig.hw, &mut rig.net, &mut rig.sink)
        .unwrap();
    assert_eq!(
        rig.hw.calls,
        vec![
            HwCall::OutputsEnabled(false),
            HwCall::ShiftOut(vec![0, 0]),
            HwCall::OutputsEnabled(true),
        ]
    );
}

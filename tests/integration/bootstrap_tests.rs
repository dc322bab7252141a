//! Bootstrap: factory-reset triggers, what a reset writes, and the
//! normal-load path that follows it.

use sprinkler::Controller;
use sprinkler::adapters::store::MemStore;
use sprinkler::app::events::AppEvent;
use sprinkler::app::ports::StoragePort;
use sprinkler::options::int_opts::defaults;
use sprinkler::options::string_opts::DEFAULT_PASSWORD;
use sprinkler::options::{
    Capacity, DONE_FILE, FW_VERSION, IOPTS_FILE, IntOpt, NUM_IOPTS, PROG_FILE, RESET_REQUEST,
    RebootCause, StrOpt,
};
use sprinkler::stations::{StationAttrib, StationStore, StationType};

use crate::mock_hw::RecordingSink;

fn boot(store: MemStore, max: usize) -> (Controller<MemStore>, RecordingSink) {
    let mut sink = RecordingSink::default();
    let mut ctl = Controller::new(store, Capacity::new(max));
    ctl.bootstrap(&mut sink).expect("bootstrap");
    (ctl, sink)
}

#[test]
fn stale_firmware_byte_resets_everything() {
    let mut store = MemStore::new();
    store
        .write_byte(IOPTS_FILE, IntOpt::FwVersion.index() as u32, 0)
        .unwrap();

    let (ctl, sink) = boot(store, 100);
    assert_eq!(
        sink.events,
        vec![AppEvent::Bootstrapped {
            reset: true,
            previous_cause: RebootCause::Reset
        }]
    );

    let s = ctl.store();
    let mut block = [0u8; NUM_IOPTS];
    s.read_block(IOPTS_FILE, 0, &mut block).unwrap();
    assert_eq!(block, defaults());
    assert_eq!(block[IntOpt::FwVersion.index()], FW_VERSION);

    let stations = StationStore::new(100);
    for sid in 0..100 {
        let rec = stations.read(s, sid).unwrap();
        assert_eq!(rec.name.as_str(), format!("S{:03}", sid + 1));
        assert_eq!(rec.stype, StationType::Standard);
        assert_eq!(rec.attrib, StationAttrib::FACTORY);
        assert!(rec.attrib.mas && rec.attrib.seq);
    }
    assert_eq!(ctl.station_name(99).unwrap().as_str(), "S100");

    assert_eq!(s.read_byte(PROG_FILE, 0).unwrap(), 0);
    assert_eq!(s.read_byte(DONE_FILE, 0).unwrap(), 1);
    assert_eq!(ctl.string_option(StrOpt::Password).unwrap().as_str(), DEFAULT_PASSWORD);
    assert_eq!(ctl.nvdata().reboot_cause, RebootCause::Reset);
}

#[test]
fn second_bootstrap_takes_load_path() {
    let (first, _) = boot(MemStore::new(), 100);
    let store = first.store().clone();
    let writes_before = store.write_count();

    let (second, sink) = boot(store, 100);
    assert_eq!(
        sink.events,
        vec![AppEvent::Bootstrapped {
            reset: false,
            previous_cause: RebootCause::Reset
        }]
    );
    assert_eq!(second.last_reboot_cause(), RebootCause::Reset);
    assert_eq!(second.nvdata().reboot_cause, RebootCause::PowerOn);
    // Only the nvdata record is rewritten on a normal load.
    assert_eq!(second.store().write_count(), writes_before + 1);
}

#[test]
fn missing_done_marker_forces_reset() {
    let (first, _) = boot(MemStore::new(), 16);
    let mut store = first.store().clone();
    store.remove(DONE_FILE).unwrap();

    let (_, sink) = boot(store, 16);
    assert!(matches!(sink.events[0], AppEvent::Bootstrapped { reset: true, .. }));
}

#[test]
fn reset_request_flag_forces_reset() {
    let (mut first, _) = boot(MemStore::new(), 16);
    first.set_option(IntOpt::ExtBoardCount, 1).unwrap();
    first.save_options().unwrap();
    first
        .store_mut()
        .write_byte(IOPTS_FILE, IntOpt::Reset.index() as u32, RESET_REQUEST)
        .unwrap();

    let (second, sink) = boot(first.store().clone(), 16);
    assert!(matches!(sink.events[0], AppEvent::Bootstrapped { reset: true, .. }));
    assert_eq!(second.options().get(IntOpt::ExtBoardCount), 0);
    assert_eq!(second.options().get(IntOpt::Reset), 0);
}

#[test]
fn load_restores_saved_options() {
    let (mut first, _) = boot(MemStore::new(), 16);
    first.set_option(IntOpt::ExtBoardCount, 1).unwrap();
    first.set_option(IntOpt::SpeAutoRefresh, 1).unwrap();
    first.save_options().unwrap();

    let (second, _) = boot(first.store().clone(), 16);
    assert_eq!(second.options().nstations(), 16);
    assert!(second.options().auto_refresh());
    assert!(second.status().enabled);
}

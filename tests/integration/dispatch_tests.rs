//! Special-station dispatch through the controller: RF, GPIO, remote and
//! HTTP stations, malformed payloads, network failures and the refresh
//! cycle.

use sprinkler::BitChange;
use sprinkler::adapters::hardware::HardwareAdapter;
use sprinkler::config::PinMap;
use sprinkler::drivers::sim::PinLog;
use sprinkler::error::PayloadError;
use sprinkler::net::{Host, RequestOutcome};
use sprinkler::options::string_opts::DEFAULT_PASSWORD;
use sprinkler::options::{IntOpt, StrOpt};
use sprinkler::stations::StationType;
use sprinkler::stations::kind::StationKind;

use crate::mock_hw::{HwCall, MockNetwork, Rig};

const RF_PAYLOAD: &[u8] = b"0A0B0C0D0E0F0190";

#[test]
fn rf_station_sends_code_for_state() {
    let mut rig = Rig::booted(16);
    rig.ctl.set_station_data(3, StationType::Rf, RF_PAYLOAD).unwrap();
    rig.set(3, true);
    rig.set(3, false);
    assert_eq!(rig.hw.rf_codes(), vec![0x0A0B0C, 0x0D0E0F]);
    assert!(rig.hw.calls.contains(&HwCall::Rf {
        code: 0x0A0B0C,
        pulses: 750
    }));
}

#[test]
fn malformed_rf_code_never_touches_rf_line() {
    let log = PinLog::default();
    let pins = PinMap::default();
    let mut hw = HardwareAdapter::simulated(&pins, false, &log);
    let mut rig = Rig::booted(16);
    rig.ctl
        .set_station_data(2, StationType::Rf, b"0A0B0G0D0E0F0190")
        .unwrap();
    assert_eq!(rig.ctl.station_kind(2), Some(&Err(PayloadError::RfCode)));

    let change = rig
        .ctl
        .set_station_bit(2, true, &mut hw, &mut rig.net, &mut rig.sink)
        .unwrap();
    assert_eq!(change, BitChange::TurnedOn);
    assert_eq!(log.level(pins.rf_tx), None);
    assert!(rig.ctl.station_bits().get(2));
}

#[test]
fn gpio_station_honours_active_level() {
    let mut rig = Rig::booted(16);
    rig.ctl.set_station_data(0, StationType::Gpio, b"051").unwrap();
    rig.ctl.set_station_data(1, StationType::Gpio, b"120").unwrap();
    rig.set(0, true);
    rig.set(1, true);
    rig.set(1, false);
    assert_eq!(
        rig.hw.calls,
        vec![
            HwCall::Gpio { pin: 5, high: true },
            HwCall::Gpio { pin: 12, high: false },
            HwCall::Gpio { pin: 12, high: true },
        ]
    );
}

#[test]
fn remote_station_forwards_local_password() {
    let mut rig = Rig::booted(16);
    // 192.168.1.10 port 80, remote station 5.
    rig.ctl
        .set_station_data(4, StationType::Remote, b"C0A8010A005005")
        .unwrap();
    rig.set(4, true);

    let (endpoint, request) = &rig.net.requests[0];
    assert_eq!(endpoint.to_string(), "192.168.1.10:80");
    assert_eq!(
        request,
        &format!(
            "GET /cm?pw={}&sid=5&en=1&t=64800 HTTP/1.0\r\nHOST: 192.168.1.10\r\n\r\n",
            DEFAULT_PASSWORD
        )
    );
}

#[test]
fn remote_timer_follows_auto_refresh() {
    let mut rig = Rig::booted(16);
    rig.ctl.set_option(IntOpt::SpeAutoRefresh, 1).unwrap();
    rig.ctl.save_string_option(StrOpt::Password, "0123abcd").unwrap();
    rig.ctl
        .set_station_data(4, StationType::Remote, b"0A000007005001")
        .unwrap();
    rig.set(4, true);
    assert!(rig.net.requests[0].1.starts_with("GET /cm?pw=0123abcd&sid=1&en=1&t=16 "));
}

#[test]
fn http_station_picks_path_by_state() {
    let mut rig = Rig::booted(16);
    rig.ctl
        .set_station_data(6, StationType::Http, b"relay.lan,8080,on/1,off/1")
        .unwrap();
    rig.set(6, true);
    rig.set(6, false);

    let (endpoint, _) = &rig.net.requests[0];
    assert_eq!(endpoint.host, Host::Name("relay.lan".into()));
    assert_eq!(endpoint.port, 8080);
    let reqs: Vec<&str> = rig.net.requests.iter().map(|(_, r)| r.as_str()).collect();
    assert_eq!(
        reqs,
        vec![
            "GET /on/1 HTTP/1.0\r\nHOST: relay.lan\r\n\r\n",
            "GET /off/1 HTTP/1.0\r\nHOST: relay.lan\r\n\r\n",
        ]
    );
}

#[test]
fn failed_request_leaves_bit_commanded() {
    let mut rig = Rig::booted(16);
    rig.net = MockNetwork::answering(RequestOutcome::ConnectError);
    rig.ctl
        .set_station_data(6, StationType::Http, b"10.0.0.9,80,a,b")
        .unwrap();
    assert_eq!(rig.set(6, true), BitChange::TurnedOn);
    assert!(rig.ctl.station_bits().get(6));
    assert_eq!(rig.net.requests.len(), 1);
}

#[test]
fn reassigning_station_redecodes_kind() {
    let mut rig = Rig::booted(16);
    rig.ctl.set_station_data(3, StationType::Rf, RF_PAYLOAD).unwrap();
    assert!(matches!(rig.ctl.station_kind(3), Some(Ok(StationKind::Rf(_)))));
    assert!(rig.ctl.attribs().get(sprinkler::stations::attribs::AttribKind::Spe, 3));

    rig.ctl.set_station_data(3, StationType::Standard, b"0").unwrap();
    assert_eq!(rig.ctl.station_kind(3), Some(&Ok(StationKind::Standard)));
    assert!(!rig.ctl.attribs().get(sprinkler::stations::attribs::AttribKind::Spe, 3));
    assert_eq!(rig.ctl.station_data(3).unwrap().as_slice(), b"0");
}

#[test]
fn refresh_resends_one_station_per_new_slot() {
    let mut rig = Rig::booted(16);
    rig.ctl.set_option(IntOpt::SpeAutoRefresh, 1).unwrap();
    rig.ctl.set_station_data(3, StationType::Rf, RF_PAYLOAD).unwrap();

    // 8 stations: now % 8 picks the target.
    rig.apply(3);
    assert_eq!(rig.hw.rf_codes(), vec![0x0D0E0F]);

    rig.apply(3);
    rig.apply(11);
    assert_eq!(rig.hw.rf_codes().len(), 1, "same slot is not resent");

    rig.set(3, true);
    rig.apply(4);
    rig.apply(11);
    assert_eq!(rig.hw.rf_codes(), vec![0x0D0E0F, 0x0A0B0C, 0x0A0B0C]);
}

#[test]
fn refresh_is_off_by_default() {
    let mut rig = Rig::booted(16);
    rig.ctl.set_station_data(3, StationType::Rf, RF_PAYLOAD).unwrap();
    rig.apply(3);
    assert!(rig.hw.rf_codes().is_empty());
}

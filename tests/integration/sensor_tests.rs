//! Sensor channels driven through the controller: rain debounce timing,
//! program-switch presses and resets on reconfiguration.

use sprinkler::app::events::AppEvent;
use sprinkler::options::IntOpt;
use sprinkler::sensors::SensorChannel;
use sprinkler::sensors::binary::MIN_DELAY_SECS;

use crate::mock_hw::Rig;

/// Channel 1 as a normally-open rain sensor with zero delays.
fn rain_rig() -> Rig {
    let mut rig = Rig::booted(16);
    rig.ctl.set_option(IntOpt::Sensor1Type, 1).unwrap();
    rig.ctl.set_option(IntOpt::Sensor1Option, 1).unwrap();
    rig
}

#[test]
fn rain_sensor_latches_after_minimum_delay() {
    let mut rig = rain_rig();
    let t0 = 10_000;
    rig.poll(t0);
    rig.hw.set_level(SensorChannel::One, false);

    rig.poll(t0 + 1);
    assert!(rig.ctl.status().sensor1, "raw flag follows the line at once");
    for t in t0 + 2..=t0 + 1 + MIN_DELAY_SECS {
        rig.poll(t);
        assert!(!rig.ctl.status().sensor1_active, "latched early at {}", t);
    }
    // One poll interval past the floor.
    rig.poll(t0 + 2 + MIN_DELAY_SECS);
    assert!(rig.ctl.status().sensor1_active);
    assert!(rig.sink.events.contains(&AppEvent::SensorChanged {
        channel: SensorChannel::One,
        active: true
    }));
    assert_eq!(
        rig.ctl.sensors().level(SensorChannel::One).last_active(),
        Some(t0 + 2 + MIN_DELAY_SECS)
    );
}

#[test]
fn rain_sensor_releases_after_off_delay() {
    let mut rig = rain_rig();
    rig.ctl.set_option(IntOpt::Sensor1OffDelay, 1).unwrap();
    rig.hw.set_level(SensorChannel::One, false);
    rig.poll(0);
    rig.poll(6);
    assert!(rig.ctl.status().sensor1_active);

    rig.hw.set_level(SensorChannel::One, true);
    rig.poll(100);
    rig.poll(160);
    assert!(rig.ctl.status().sensor1_active);
    rig.poll(161);
    assert!(!rig.ctl.status().sensor1_active);
}

#[test]
fn unconfigured_channel_is_not_sampled() {
    let mut rig = Rig::booted(16);
    rig.hw.set_level(SensorChannel::Two, false);
    rig.poll(0);
    rig.poll(100);
    assert!(!rig.ctl.status().sensor2);
    assert!(rig.sink.events.is_empty());
}

#[test]
fn program_switch_reports_one_press_per_release() {
    let mut rig = Rig::booted(16);
    rig.ctl.set_option(IntOpt::Sensor2Type, 0xF0).unwrap();
    rig.ctl.set_option(IntOpt::Sensor2Option, 1).unwrap();

    rig.hw.set_level(SensorChannel::Two, false);
    assert!(rig.poll(50).is_empty());
    assert!(rig.poll(51).is_empty(), "holding is not a press");
    rig.hw.set_level(SensorChannel::Two, true);
    assert_eq!(rig.poll(52), vec![SensorChannel::Two]);
    assert!(rig.poll(53).is_empty());
    assert_eq!(
        rig.sink.events,
        vec![AppEvent::ProgramSwitchPressed(SensorChannel::Two)]
    );
}

#[test]
fn changing_sensor_options_resets_timers() {
    let mut rig = rain_rig();
    rig.hw.set_level(SensorChannel::One, false);
    rig.poll(0);
    assert!(rig.ctl.sensors().level(SensorChannel::One).on_deadline().is_some());

    rig.ctl.set_option(IntOpt::Sensor1OnDelay, 2).unwrap();
    assert_eq!(rig.ctl.sensors().level(SensorChannel::One).on_deadline(), None);

    rig.poll(1);
    assert_eq!(
        rig.ctl.sensors().level(SensorChannel::One).on_deadline(),
        Some(121)
    );
}

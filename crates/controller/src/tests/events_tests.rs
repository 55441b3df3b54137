use super::*;
use crate::ControllerState;

#[test]
fn battery_scales_reading_before_threshold() {
    let monitor = BatteryMonitor::default();
    // 400 mV at the pin is about 9.3 V at the pack
    assert!(monitor.is_low(Some(400.0)));
    assert!(!monitor.is_low(Some(500.0)));
    assert!(!monitor.is_low(None));
    assert!(!monitor.is_low(Some(f32::NAN)));
}

#[test]
fn fire_bearing_wraps_into_compass_range() {
    assert_eq!(fire_bearing(315.0, 90.0, 0.0), 45.0);
    assert_eq!(fire_bearing(0.0, 0.0, -23.5), 336.5);
    assert_eq!(fire_bearing(45.0, 0.0, 23.5), 68.5);
}

#[test]
fn fire_bearing_never_reaches_full_turn() {
    let bearing = fire_bearing(0.0, -1e-6, 0.0);
    assert!((0.0..360.0).contains(&bearing), "bearing = {bearing}");

    let site = SiteInfo {
        latitude: 0,
        longitude: 0,
        compass_offset_deg: -1e-6,
    };
    let state = ControllerState::starting_at(Mode::FireAlert, 0);
    let event = event_record(&site, Mode::FireAlert, &state, false, 0.0);
    assert!(event.fire_bearing < 360);
    assert_eq!(event.to_string(), "0x0000 0000 02 0000");
}

#[test]
fn event_reports_fire_only_for_fire_alert_ticks() {
    let site = SiteInfo {
        latitude: 43,
        longitude: 87,
        compass_offset_deg: 10.0,
    };
    let state = ControllerState::starting_at(Mode::FireAlert, 2);

    let fire = event_record(&site, Mode::FireAlert, &state, false, 0.0);
    assert_eq!(fire.status, EventStatus::Fire);
    assert_eq!(fire.fire_bearing, 100);

    let calm = event_record(&site, Mode::Search, &state, true, 23.5);
    assert_eq!(calm.status, EventStatus::LowVoltage);
    assert_eq!(calm.fire_bearing, 0);
    assert_eq!(calm.to_string(), "0x002B 0057 01 0000");
}

#[test]
fn thermal_offset_shifts_fire_bearing() {
    let site = SiteInfo {
        latitude: 43,
        longitude: 87,
        compass_offset_deg: 10.0,
    };
    let state = ControllerState::starting_at(Mode::FireAlert, 0);

    let right = event_record(&site, Mode::FireAlert, &state, false, 23.5);
    assert_eq!(right.fire_bearing, 33);

    // hot spot left of center wraps back past north
    let left = event_record(&site, Mode::FireAlert, &state, false, -23.5);
    assert_eq!(left.fire_bearing, 346);
}

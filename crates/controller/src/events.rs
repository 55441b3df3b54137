//! Event records sent to the base station alongside each display frame.
//!
//! Battery voltage and the thermal hot-spot offset arrive as plain readings
//! from the peripheral boards; this module only interprets them.

use shared::{
    domain::Mode,
    protocol::{EventRecord, EventStatus},
};

use crate::ControllerState;

pub const DEFAULT_DIVIDER_SCALE: f32 = 23.14;
pub const DEFAULT_LOW_BATTERY_MV: f32 = 10_000.0;

/// Flags a low battery from the divided-down millivolt reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryMonitor {
    /// Ratio between the pack voltage and the voltage seen at the ADC pin.
    pub divider_scale: f32,
    /// Pack voltage below which the battery counts as low.
    pub low_threshold_mv: f32,
}

impl Default for BatteryMonitor {
    fn default() -> Self {
        Self {
            divider_scale: DEFAULT_DIVIDER_SCALE,
            low_threshold_mv: DEFAULT_LOW_BATTERY_MV,
        }
    }
}

impl BatteryMonitor {
    pub fn pack_millivolts(&self, measured_mv: f32) -> f32 {
        measured_mv * self.divider_scale
    }

    /// A missing or non-finite reading is never reported as low.
    pub fn is_low(&self, measured_mv: Option<f32>) -> bool {
        match measured_mv {
            Some(mv) if mv.is_finite() => self.pack_millivolts(mv) < self.low_threshold_mv,
            _ => false,
        }
    }
}

/// Bearing of a fire clockwise from north, in `[0, 360)`.
///
/// `camera_deg` is the turret angle, `compass_offset_deg` the angle between
/// the turret zero and north, `thermal_offset_deg` where the hot spot sits in
/// the thermal frame (negative is left of center).
pub fn fire_bearing(camera_deg: f32, compass_offset_deg: f32, thermal_offset_deg: f32) -> f32 {
    let bearing = (camera_deg + compass_offset_deg + thermal_offset_deg).rem_euclid(360.0);
    // rem_euclid rounds tiny negative sums up to exactly 360.0
    if bearing >= 360.0 {
        0.0
    } else {
        bearing
    }
}

/// Fixed per-site inputs for [`event_record`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SiteInfo {
    pub latitude: u16,
    pub longitude: u16,
    pub compass_offset_deg: f32,
}

/// Builds the event for a tick that executed `executed`. `thermal_offset_deg`
/// is the hot spot's angle within the thermal frame for this tick.
pub fn event_record(
    site: &SiteInfo,
    executed: Mode,
    state: &ControllerState,
    low_battery: bool,
    thermal_offset_deg: f32,
) -> EventRecord {
    let fire = executed == Mode::FireAlert;
    let fire_bearing = if fire {
        fire_bearing(
            f32::from(state.camera_bearing_deg()),
            site.compass_offset_deg,
            thermal_offset_deg,
        ) as u16
    } else {
        0
    };

    EventRecord {
        latitude: site.latitude,
        longitude: site.longitude,
        status: EventStatus::from_flags(low_battery, fire),
        fire_bearing,
    }
}

#[cfg(test)]
#[path = "tests/events_tests.rs"]
mod tests;

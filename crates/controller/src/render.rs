use shared::protocol::DisplayFrame;

use crate::ControllerState;

pub const GPS_PRIMARY: &str = "12.3456";
pub const GPS_SECONDARY: &str = "13.5791";
pub const CONNECTION_GOOD: &str = "good connection";
pub const CONNECTION_LOST: &str = "connection lost";
pub const INTERNAL_ERROR_TEXT: &str = "internal error";
pub const FIRE_ALERT_TEXT: &str = "fire_alert";
pub const NO_FIRE_TEXT: &str = "nothing detected";

/// Display text for a sweep index. The last step is a fixed literal.
pub fn bearing_text(sweep_index: u8) -> String {
    match sweep_index {
        7 => "315 degrees".to_string(),
        index => format!("{} degrees", u16::from(index) * 45),
    }
}

/// Projects the latched state into a display frame. Pure; calling it twice on
/// the same state yields identical frames.
pub fn render(state: &ControllerState) -> DisplayFrame {
    let suppressed = state.internal_error_active();
    let blanked = suppressed || state.clear_display();

    let camera = if blanked {
        String::new()
    } else {
        bearing_text(state.camera_sweep_index)
    };

    let gps = match (blanked, state.gps_selected) {
        (true, _) => "",
        (false, true) => GPS_PRIMARY,
        (false, false) => GPS_SECONDARY,
    };

    let connection = match (suppressed, state.comm_error_active()) {
        (true, _) => "",
        (false, true) => CONNECTION_LOST,
        (false, false) => CONNECTION_GOOD,
    };

    let internal = if suppressed { INTERNAL_ERROR_TEXT } else { "" };

    let fire = match (blanked, state.fire_alert_active()) {
        (true, _) => "",
        (false, true) => FIRE_ALERT_TEXT,
        (false, false) => NO_FIRE_TEXT,
    };

    DisplayFrame {
        lines: [
            camera,
            gps.to_string(),
            connection.to_string(),
            internal.to_string(),
            fire.to_string(),
        ],
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;

use shared::{
    domain::{InputSample, Mode},
    protocol::DisplayFrame,
};
use tracing::{debug, info};

pub mod events;
mod render;

pub use render::{bearing_text, render};

/// Number of discrete camera bearings in one sweep (45° apart).
pub const SWEEP_STEPS: u8 = 8;

/// State carried from one tick to the next.
///
/// `mode`, `camera_sweep_index` and `gps_selected` persist across ticks. The
/// display flags are rewritten by [`apply_mode_effects`] every tick and are
/// read-only to everything else.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ControllerState {
    pub mode: Mode,
    pub camera_sweep_index: u8,
    pub gps_selected: bool,
    fire_alert_active: bool,
    comm_error_active: bool,
    internal_error_active: bool,
    clear_display: bool,
}

impl ControllerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts in `mode` with the camera parked at `camera_sweep_index`.
    pub fn starting_at(mode: Mode, camera_sweep_index: u8) -> Self {
        Self {
            mode,
            camera_sweep_index: camera_sweep_index % SWEEP_STEPS,
            ..Self::default()
        }
    }

    pub fn fire_alert_active(&self) -> bool {
        self.fire_alert_active
    }

    pub fn comm_error_active(&self) -> bool {
        self.comm_error_active
    }

    pub fn internal_error_active(&self) -> bool {
        self.internal_error_active
    }

    pub fn clear_display(&self) -> bool {
        self.clear_display
    }

    /// Camera bearing in degrees for the current sweep index.
    pub fn camera_bearing_deg(&self) -> u16 {
        u16::from(self.camera_sweep_index) * 45
    }
}

/// Priority table. The first matching rule wins:
///
/// 1. reset pressed: `Reset`, from anywhere.
/// 2. leaving `Reset`: always `GpsDisplay` for exactly one tick.
/// 3. internal error pressed, or already in `InternalError`: `InternalError`.
/// 4. comm error pressed: `CommError`.
/// 5. fire alert pressed: `FireAlert`.
/// 6. otherwise `Search`.
pub fn next_mode(current: Mode, input: InputSample) -> Mode {
    if input.reset_pressed {
        return Mode::Reset;
    }

    match current {
        Mode::Reset => Mode::GpsDisplay,
        Mode::InternalError => Mode::InternalError,
        _ if input.internal_error_pressed => Mode::InternalError,
        _ if input.comm_error_pressed => Mode::CommError,
        _ if input.fire_alert_pressed => Mode::FireAlert,
        _ => Mode::Search,
    }
}

/// Runs the side effects of `mode` against `state`. Called with the mode that
/// was active when the tick started, before the next mode is committed.
pub fn apply_mode_effects(mode: Mode, state: &mut ControllerState, input: InputSample) {
    match mode {
        Mode::Reset => {
            state.gps_selected = input.gps_requested;
            state.fire_alert_active = false;
            state.comm_error_active = false;
            state.internal_error_active = false;
            state.clear_display = true;
        }
        Mode::GpsDisplay => {
            state.fire_alert_active = false;
            state.comm_error_active = false;
            state.internal_error_active = false;
            state.clear_display = false;
        }
        Mode::Search => {
            state.fire_alert_active = false;
            state.comm_error_active = false;
            state.internal_error_active = false;
            state.clear_display = false;
            state.camera_sweep_index = (state.camera_sweep_index + 1) % SWEEP_STEPS;
        }
        Mode::FireAlert => {
            state.fire_alert_active = true;
            state.comm_error_active = false;
            state.internal_error_active = false;
            state.clear_display = false;
        }
        Mode::CommError => {
            // fire_alert_active keeps its last value and is shown as stale
            state.comm_error_active = true;
            state.internal_error_active = false;
            state.clear_display = false;
        }
        Mode::InternalError => {
            state.fire_alert_active = false;
            state.comm_error_active = false;
            state.internal_error_active = true;
            state.clear_display = false;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    pub executed: Mode,
    pub next: Mode,
    pub frame: DisplayFrame,
}

/// Owns the controller state and evaluates one tick at a time.
#[derive(Debug, Default)]
pub struct Controller {
    state: ControllerState,
    ticks: u64,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: ControllerState) -> Self {
        Self { state, ticks: 0 }
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// transition, effects, commit, render
    pub fn tick(&mut self, input: InputSample) -> TickOutcome {
        let executed = self.state.mode;
        let next = next_mode(executed, input);
        apply_mode_effects(executed, &mut self.state, input);
        self.state.mode = next;
        self.ticks += 1;

        debug!(
            tick = self.ticks,
            ?input,
            sweep = self.state.camera_sweep_index,
            "tick evaluated"
        );
        if next != executed {
            info!(tick = self.ticks, from = %executed, to = %next, "mode transition");
        }

        TickOutcome {
            executed,
            next,
            frame: render(&self.state),
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Mode;

pub const FRAME_LINES: usize = 5;

/// One full refresh of the 5-line status display.
///
/// Lines, top to bottom: camera bearing, GPS readout, connection status,
/// internal error, fire status. A suppressed line is an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplayFrame {
    pub lines: [String; FRAME_LINES],
}

impl DisplayFrame {
    pub fn camera(&self) -> &str {
        &self.lines[0]
    }

    pub fn gps(&self) -> &str {
        &self.lines[1]
    }

    pub fn connection(&self) -> &str {
        &self.lines[2]
    }

    pub fn internal_error(&self) -> &str {
        &self.lines[3]
    }

    pub fn fire(&self) -> &str {
        &self.lines[4]
    }
}

impl fmt::Display for DisplayFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, line) in self.lines.iter().enumerate() {
            if index > 0 {
                f.write_str("\n")?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    #[default]
    Nominal,
    LowVoltage,
    Fire,
    LowVoltageFire,
}

impl EventStatus {
    pub fn from_flags(low_voltage: bool, fire: bool) -> Self {
        match (low_voltage, fire) {
            (false, false) => Self::Nominal,
            (true, false) => Self::LowVoltage,
            (false, true) => Self::Fire,
            (true, true) => Self::LowVoltageFire,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Nominal => 0,
            Self::LowVoltage => 1,
            Self::Fire => 2,
            Self::LowVoltageFire => 3,
        }
    }
}

/// Status line emitted every tick for the base station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventRecord {
    pub latitude: u16,
    pub longitude: u16,
    pub status: EventStatus,
    pub fire_bearing: u16,
}

impl fmt::Display for EventRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0x{:04X} {:04X} {:02X} {:04X}",
            self.latitude,
            self.longitude,
            self.status.code(),
            self.fire_bearing
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    pub at: DateTime<Utc>,
    /// Mode whose effects ran during this tick.
    pub executed: Mode,
    /// Mode committed for the following tick.
    pub next: Mode,
    pub frame: DisplayFrame,
    pub event: EventRecord,
}

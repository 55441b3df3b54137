use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

macro_rules! text_enum {
    ($name:ident, $what:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let wanted = raw.trim().replace('-', "_").to_ascii_lowercase();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.as_str() == wanted)
                    .ok_or_else(|| ParseError::Unknown {
                        kind: $what,
                        value: raw.to_string(),
                    })
            }
        }
    };
}

/// Operating mode of the spotter. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Reset,
    GpsDisplay,
    Search,
    FireAlert,
    CommError,
    InternalError,
}

text_enum!(Mode, "mode", {
    Reset => "reset",
    GpsDisplay => "gps_display",
    Search => "search",
    FireAlert => "fire_alert",
    CommError => "comm_error",
    InternalError => "internal_error",
});

/// The five discrete inputs polled once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Reset,
    InternalError,
    CommError,
    FireAlert,
    Gps,
}

text_enum!(Signal, "signal", {
    Reset => "reset",
    InternalError => "internal_error",
    CommError => "comm_error",
    FireAlert => "fire_alert",
    Gps => "gps",
});

/// Electrical level of an input pin. Inputs are pulled up, so a pressed
/// switch reads `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinLevel {
    Low,
    #[default]
    High,
}

impl PinLevel {
    pub fn from_raw(raw: u8) -> Self {
        if raw == 0 {
            Self::Low
        } else {
            Self::High
        }
    }

    pub fn is_asserted(self) -> bool {
        self == Self::Low
    }
}

impl FromStr for PinLevel {
    type Err = ParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "0" => Ok(Self::Low),
            "1" => Ok(Self::High),
            other => match other.to_ascii_lowercase().as_str() {
                "low" => Ok(Self::Low),
                "high" => Ok(Self::High),
                _ => Err(ParseError::Unknown {
                    kind: "pin level",
                    value: raw.to_string(),
                }),
            },
        }
    }
}

/// Logical (already active-low decoded) view of one tick's inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct InputSample {
    pub reset_pressed: bool,
    pub internal_error_pressed: bool,
    pub comm_error_pressed: bool,
    pub fire_alert_pressed: bool,
    pub gps_requested: bool,
}

impl InputSample {
    /// Builds a sample from raw pin levels in `Signal` order:
    /// reset, internal error, comm error, fire alert, gps.
    pub fn from_levels(levels: [PinLevel; 5]) -> Self {
        let [reset, internal, comm, fire, gps] = levels;
        Self {
            reset_pressed: reset.is_asserted(),
            internal_error_pressed: internal.is_asserted(),
            comm_error_pressed: comm.is_asserted(),
            fire_alert_pressed: fire.is_asserted(),
            gps_requested: gps.is_asserted(),
        }
    }

    /// Parses five raw levels written as digits, e.g. `"11011"`.
    pub fn parse_levels(raw: &str) -> Result<Self, ParseError> {
        let raw = raw.trim();
        let levels = raw
            .chars()
            .map(|digit| digit.to_string().parse::<PinLevel>())
            .collect::<Result<Vec<_>, _>>()?;
        let levels: [PinLevel; 5] =
            levels
                .try_into()
                .map_err(|levels: Vec<PinLevel>| ParseError::PinCount {
                    expected: 5,
                    actual: levels.len(),
                })?;
        Ok(Self::from_levels(levels))
    }

    pub fn is_asserted(&self, signal: Signal) -> bool {
        match signal {
            Signal::Reset => self.reset_pressed,
            Signal::InternalError => self.internal_error_pressed,
            Signal::CommError => self.comm_error_pressed,
            Signal::FireAlert => self.fire_alert_pressed,
            Signal::Gps => self.gps_requested,
        }
    }

    pub fn set(&mut self, signal: Signal, asserted: bool) {
        match signal {
            Signal::Reset => self.reset_pressed = asserted,
            Signal::InternalError => self.internal_error_pressed = asserted,
            Signal::CommError => self.comm_error_pressed = asserted,
            Signal::FireAlert => self.fire_alert_pressed = asserted,
            Signal::Gps => self.gps_requested = asserted,
        }
    }

    /// Every one of the 32 possible samples.
    pub fn all() -> impl Iterator<Item = InputSample> {
        (0u8..32).map(|bits| {
            let mut sample = InputSample::default();
            for (index, signal) in Signal::ALL.iter().enumerate() {
                sample.set(*signal, bits & (1 << index) != 0);
            }
            sample
        })
    }
}

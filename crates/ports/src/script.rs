use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::domain::{InputSample, PinLevel};
use tokio::sync::Mutex;

use crate::{InputPort, PortError};

fn released() -> u8 {
    1
}

/// One tick of raw pin levels. Omitted pins are released (high).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptRow {
    #[serde(default = "released")]
    pub reset: u8,
    #[serde(default = "released")]
    pub internal_error: u8,
    #[serde(default = "released")]
    pub comm_error: u8,
    #[serde(default = "released")]
    pub fire_alert: u8,
    #[serde(default = "released")]
    pub gps: u8,
}

impl ScriptRow {
    pub fn sample(&self) -> InputSample {
        InputSample::from_levels(
            [
                self.reset,
                self.internal_error,
                self.comm_error,
                self.fire_alert,
                self.gps,
            ]
            .map(PinLevel::from_raw),
        )
    }
}

/// A recorded or hand-written pin sequence:
///
/// ```toml
/// [[tick]]
/// fire_alert = 0
///
/// [[tick]]
/// reset = 0
/// gps = 0
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputScript {
    #[serde(rename = "tick", default)]
    pub ticks: Vec<ScriptRow>,
}

impl InputScript {
    pub fn parse(raw: &str) -> Result<Self, PortError> {
        let script: Self = toml::from_str(raw)?;
        if script.ticks.is_empty() {
            return Err(PortError::EmptyScript);
        }
        Ok(script)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, PortError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| PortError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse(&raw)
    }

    pub fn samples(&self) -> Vec<InputSample> {
        self.ticks.iter().map(ScriptRow::sample).collect()
    }
}

/// Plays an [`InputScript`] back one row per sample, starting over at the end.
pub struct ScriptedInputs {
    samples: Vec<InputSample>,
    cursor: Mutex<usize>,
}

impl ScriptedInputs {
    pub fn new(script: &InputScript) -> Self {
        Self {
            samples: script.samples(),
            cursor: Mutex::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[async_trait]
impl InputPort for ScriptedInputs {
    async fn sample(&self) -> anyhow::Result<InputSample> {
        if self.samples.is_empty() {
            return Ok(InputSample::default());
        }
        let mut cursor = self.cursor.lock().await;
        let sample = self.samples[*cursor % self.samples.len()];
        *cursor = (*cursor + 1) % self.samples.len();
        Ok(sample)
    }
}

#[cfg(test)]
#[path = "tests/script_tests.rs"]
mod tests;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::{read_number, BatteryGauge};

/// Reads the divider tap voltage in millivolts from a text file, as exported
/// by the ADC sampling board.
#[derive(Debug, Clone)]
pub struct FileBatteryGauge {
    path: PathBuf,
}

impl FileBatteryGauge {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl BatteryGauge for FileBatteryGauge {
    async fn millivolts(&self) -> anyhow::Result<Option<f32>> {
        Ok(read_number(&self.path, "battery").await?)
    }
}

/// Used when no battery reading is wired up.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBatteryGauge;

#[async_trait]
impl BatteryGauge for NoBatteryGauge {
    async fn millivolts(&self) -> anyhow::Result<Option<f32>> {
        Ok(None)
    }
}

#[cfg(test)]
#[path = "tests/battery_tests.rs"]
mod tests;

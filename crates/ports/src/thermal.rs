use std::path::PathBuf;

use async_trait::async_trait;

use crate::{read_number, ThermalSensor};

/// Widest hot-spot offset the thermal camera can see on either side.
pub const HALF_FIELD_OF_VIEW_DEG: f32 = 23.5;

/// Reads the hot-spot offset in degrees from a text file written by the
/// thermal camera bridge. Values outside the field of view are clamped.
#[derive(Debug, Clone)]
pub struct FileThermalSensor {
    path: PathBuf,
}

impl FileThermalSensor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ThermalSensor for FileThermalSensor {
    async fn hotspot_offset_deg(&self) -> anyhow::Result<Option<f32>> {
        let offset = read_number(&self.path, "thermal").await?;
        Ok(offset.map(|deg| deg.clamp(-HALF_FIELD_OF_VIEW_DEG, HALF_FIELD_OF_VIEW_DEG)))
    }
}

/// No thermal camera: fires are taken to be dead ahead of the turret.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoThermalSensor;

#[async_trait]
impl ThermalSensor for NoThermalSensor {
    async fn hotspot_offset_deg(&self) -> anyhow::Result<Option<f32>> {
        Ok(None)
    }
}

#[cfg(test)]
#[path = "tests/thermal_tests.rs"]
mod tests;

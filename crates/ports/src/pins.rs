use std::path::{Path, PathBuf};

use async_trait::async_trait;
use shared::domain::{InputSample, PinLevel, Signal};
use tracing::warn;

use crate::{InputPort, PortError};

/// Reads each signal from a GPIO value file (`/sys/class/gpio/gpioN/value`
/// style) holding `0` or `1`.
///
/// A pin that cannot be read or holds garbage reads as released.
#[derive(Debug, Clone)]
pub struct SysfsInputs {
    pins: [(Signal, PathBuf); 5],
}

impl SysfsInputs {
    /// `paths` follow `Signal::ALL` order.
    pub fn new(paths: [PathBuf; 5]) -> Self {
        let [reset, internal, comm, fire, gps] = paths;
        Self {
            pins: [
                (Signal::Reset, reset),
                (Signal::InternalError, internal),
                (Signal::CommError, comm),
                (Signal::FireAlert, fire),
                (Signal::Gps, gps),
            ],
        }
    }

    pub fn pins(&self) -> impl Iterator<Item = (Signal, &Path)> {
        self.pins
            .iter()
            .map(|(signal, path)| (*signal, path.as_path()))
    }

    async fn read_level(path: &Path) -> Result<PinLevel, PortError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| PortError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(raw.parse().unwrap_or_else(|error| {
            warn!(path = %path.display(), %error, "unreadable pin level, treating as released");
            PinLevel::High
        }))
    }
}

#[async_trait]
impl InputPort for SysfsInputs {
    async fn sample(&self) -> anyhow::Result<InputSample> {
        let mut sample = InputSample::default();
        for (signal, path) in &self.pins {
            let level = match Self::read_level(path).await {
                Ok(level) => level,
                Err(error) => {
                    warn!(%signal, %error, "pin read failed, treating as released");
                    PinLevel::High
                }
            };
            sample.set(*signal, level.is_asserted());
        }
        Ok(sample)
    }
}

#[cfg(test)]
#[path = "tests/pins_tests.rs"]
mod tests;

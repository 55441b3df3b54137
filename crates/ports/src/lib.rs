//! Collaborator seams for the supervisor: where input samples come from,
//! where frames go, and where the battery and thermal readings are taken.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use shared::{domain::InputSample, protocol::TickReport};
use thiserror::Error;
use tracing::warn;

pub mod battery;
pub mod display;
pub mod pins;
pub mod script;
pub mod thermal;

pub use battery::{FileBatteryGauge, NoBatteryGauge};
pub use display::LogDisplay;
pub use pins::SysfsInputs;
pub use script::{InputScript, ScriptedInputs};
pub use thermal::{FileThermalSensor, NoThermalSensor};

#[derive(Debug, Error)]
pub enum PortError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid input script: {0}")]
    Script(#[from] toml::de::Error),
    #[error("input script has no ticks")]
    EmptyScript,
}

#[async_trait]
pub trait InputPort: Send + Sync {
    /// Reads all five signals once.
    async fn sample(&self) -> anyhow::Result<InputSample>;
}

#[async_trait]
pub trait DisplaySink: Send + Sync {
    async fn show(&self, report: &TickReport) -> anyhow::Result<()>;
}

#[async_trait]
pub trait BatteryGauge: Send + Sync {
    /// Millivolts at the divider tap, `None` when no reading is available.
    async fn millivolts(&self) -> anyhow::Result<Option<f32>>;
}

#[async_trait]
pub trait ThermalSensor: Send + Sync {
    /// Angle of the hottest spot from the center of the thermal frame, in
    /// degrees (negative is left). `None` when the camera reports nothing.
    async fn hotspot_offset_deg(&self) -> anyhow::Result<Option<f32>>;
}

/// Reads one number from a text file exported by a peripheral board.
///
/// A missing file is no reading. Garbage or non-finite values are logged and
/// also count as no reading; any other I/O failure is an error.
pub(crate) async fn read_number(path: &Path, what: &str) -> Result<Option<f32>, PortError> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(PortError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    match raw.trim().parse::<f32>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        Ok(value) => {
            warn!(path = %path.display(), value, "ignoring non-finite {what} reading");
            Ok(None)
        }
        Err(error) => {
            warn!(path = %path.display(), %error, "ignoring malformed {what} reading");
            Ok(None)
        }
    }
}

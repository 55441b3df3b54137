use async_trait::async_trait;
use shared::protocol::TickReport;
use tracing::info;

use crate::DisplaySink;

/// Writes each frame to the log, one event per tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDisplay;

#[async_trait]
impl DisplaySink for LogDisplay {
    async fn show(&self, report: &TickReport) -> anyhow::Result<()> {
        let frame = &report.frame;
        info!(
            tick = report.tick,
            mode = %report.executed,
            event = %report.event,
            camera = frame.camera(),
            gps = frame.gps(),
            connection = frame.connection(),
            internal = frame.internal_error(),
            fire = frame.fire(),
            "display frame"
        );
        Ok(())
    }
}

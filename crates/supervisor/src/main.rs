use std::{net::SocketAddr, sync::Arc};

use anyhow::{anyhow, Context};
use ports::{
    BatteryGauge, DisplaySink, FileBatteryGauge, FileThermalSensor, InputPort, InputScript,
    LogDisplay, NoBatteryGauge, NoThermalSensor, ScriptedInputs, SysfsInputs, ThermalSensor,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod runner;

use api::{build_router, StatusBoard};
use config::{load_settings, InputSource, Settings};
use runner::Supervisor;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings();
    info!(?settings, "supervisor starting");

    let inputs = open_inputs(&settings).await.map_err(|error| {
        error!(%error, "failed to open input source");
        error
    })?;
    let battery: Arc<dyn BatteryGauge> = match &settings.battery_path {
        Some(path) => Arc::new(FileBatteryGauge::new(path)),
        None => Arc::new(NoBatteryGauge),
    };
    let thermal: Arc<dyn ThermalSensor> = match &settings.thermal_path {
        Some(path) => Arc::new(FileThermalSensor::new(path)),
        None => Arc::new(NoThermalSensor),
    };

    let board = StatusBoard::default();
    let addr: SocketAddr = settings
        .status_bind
        .parse()
        .with_context(|| format!("invalid status_bind '{}'", settings.status_bind))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "status surface listening");
    let app = build_router(board.clone());
    let status_server = tokio::spawn(async move { axum::serve(listener, app).await });

    let sinks: Vec<Arc<dyn DisplaySink>> = vec![Arc::new(LogDisplay), Arc::new(board)];
    let supervisor = Supervisor {
        inputs,
        battery,
        thermal,
        sinks,
        site: settings.site(),
        monitor: settings.battery_monitor(),
        tick_interval: settings.tick_interval(),
        max_ticks: settings.max_ticks,
    };

    tokio::select! {
        result = supervisor.run() => {
            let ticks = result?;
            info!(ticks, "tick loop finished");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown requested");
        }
    }

    status_server.abort();
    Ok(())
}

async fn open_inputs(settings: &Settings) -> anyhow::Result<Arc<dyn InputPort>> {
    match settings.input_source {
        InputSource::Sysfs => {
            let inputs = SysfsInputs::new(settings.pin_paths());
            for (signal, path) in inputs.pins() {
                info!(%signal, path = %path.display(), "input pin");
            }
            Ok(Arc::new(inputs))
        }
        InputSource::Script => {
            let path = settings
                .script_path
                .as_ref()
                .ok_or_else(|| anyhow!("input_source = script requires script_path"))?;
            let script = InputScript::load(path)
                .await
                .with_context(|| format!("failed to load input script {}", path.display()))?;
            info!(path = %path.display(), ticks = script.ticks.len(), "replaying input script");
            Ok(Arc::new(ScriptedInputs::new(&script)))
        }
    }
}

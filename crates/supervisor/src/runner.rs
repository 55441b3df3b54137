use std::{sync::Arc, time::Duration};

use anyhow::Context;
use chrono::Utc;
use controller::{
    events::{event_record, BatteryMonitor, SiteInfo},
    Controller,
};
use ports::{BatteryGauge, DisplaySink, InputPort, ThermalSensor};
use shared::{domain::InputSample, protocol::TickReport};
use tokio::{
    sync::mpsc,
    time::{interval, MissedTickBehavior},
};
use tracing::{info, warn};

/// What the sampling task hands to the controller once per tick.
#[derive(Debug, Clone, Copy)]
struct Reading {
    sample: InputSample,
    battery_mv: Option<f32>,
    thermal_offset_deg: Option<f32>,
}

/// Drives the controller at a fixed period.
///
/// Sampling and display output run in their own tasks and talk to the
/// control loop over capacity-1 channels, so each tick sees exactly one
/// sample and produces exactly one report. The controller state never leaves
/// the control loop.
pub struct Supervisor {
    pub inputs: Arc<dyn InputPort>,
    pub battery: Arc<dyn BatteryGauge>,
    pub thermal: Arc<dyn ThermalSensor>,
    pub sinks: Vec<Arc<dyn DisplaySink>>,
    pub site: SiteInfo,
    pub monitor: BatteryMonitor,
    pub tick_interval: Duration,
    pub max_ticks: Option<u64>,
}

impl Supervisor {
    /// Runs until `max_ticks` is reached, or forever. Returns the tick count.
    pub async fn run(self) -> anyhow::Result<u64> {
        let (reading_tx, mut reading_rx) = mpsc::channel::<Reading>(1);
        let (report_tx, report_rx) = mpsc::channel::<TickReport>(1);

        let sampler = tokio::spawn(sample_inputs(
            self.inputs.clone(),
            self.battery.clone(),
            self.thermal.clone(),
            self.tick_interval,
            reading_tx,
        ));
        let output = tokio::spawn(publish_reports(self.sinks.clone(), report_rx));

        info!(
            interval_ms = self.tick_interval.as_millis() as u64,
            max_ticks = ?self.max_ticks,
            "tick loop started"
        );

        let mut controller = Controller::new();
        while self.max_ticks.map_or(true, |max| controller.ticks() < max) {
            let Some(reading) = reading_rx.recv().await else {
                break;
            };
            let outcome = controller.tick(reading.sample);

            let low_battery = self.monitor.is_low(reading.battery_mv);
            if low_battery {
                warn!(battery_mv = ?reading.battery_mv, "low battery");
            }
            let event = event_record(
                &self.site,
                outcome.executed,
                controller.state(),
                low_battery,
                reading.thermal_offset_deg.unwrap_or(0.0),
            );

            let report = TickReport {
                tick: controller.ticks(),
                at: Utc::now(),
                executed: outcome.executed,
                next: outcome.next,
                frame: outcome.frame,
                event,
            };
            if report_tx.send(report).await.is_err() {
                warn!("display task stopped, ending tick loop");
                break;
            }
        }

        drop(reading_rx);
        drop(report_tx);
        sampler.abort();
        output.await.context("display task panicked")?;

        Ok(controller.ticks())
    }
}

async fn sample_inputs(
    inputs: Arc<dyn InputPort>,
    battery: Arc<dyn BatteryGauge>,
    thermal: Arc<dyn ThermalSensor>,
    period: Duration,
    tx: mpsc::Sender<Reading>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let sample = inputs.sample().await.unwrap_or_else(|error| {
            warn!(%error, "input sampling failed, treating all signals as released");
            InputSample::default()
        });
        let battery_mv = battery.millivolts().await.unwrap_or_else(|error| {
            warn!(%error, "battery reading failed");
            None
        });
        let thermal_offset_deg = thermal.hotspot_offset_deg().await.unwrap_or_else(|error| {
            warn!(%error, "thermal reading failed, assuming hot spot at center");
            None
        });

        let reading = Reading {
            sample,
            battery_mv,
            thermal_offset_deg,
        };
        if tx.send(reading).await.is_err() {
            break;
        }
    }
}

async fn publish_reports(sinks: Vec<Arc<dyn DisplaySink>>, mut rx: mpsc::Receiver<TickReport>) {
    while let Some(report) = rx.recv().await {
        for sink in &sinks {
            if let Err(error) = sink.show(&report).await {
                warn!(tick = report.tick, %error, "display sink failed");
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/runner_tests.rs"]
mod tests;

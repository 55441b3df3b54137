use super::*;
use anyhow::anyhow;
use async_trait::async_trait;
use ports::{InputScript, NoBatteryGauge, NoThermalSensor, ScriptedInputs};
use shared::{domain::Mode, protocol::EventStatus};
use tokio::sync::Mutex;

#[derive(Clone, Default)]
struct RecordingSink {
    reports: Arc<Mutex<Vec<TickReport>>>,
}

#[async_trait]
impl DisplaySink for RecordingSink {
    async fn show(&self, report: &TickReport) -> anyhow::Result<()> {
        self.reports.lock().await.push(report.clone());
        Ok(())
    }
}

struct FailingSink;

#[async_trait]
impl DisplaySink for FailingSink {
    async fn show(&self, _report: &TickReport) -> anyhow::Result<()> {
        Err(anyhow!("display unplugged"))
    }
}

struct BrokenInputs;

#[async_trait]
impl InputPort for BrokenInputs {
    async fn sample(&self) -> anyhow::Result<InputSample> {
        Err(anyhow!("gpio bank offline"))
    }
}

struct FixedBattery(f32);

#[async_trait]
impl BatteryGauge for FixedBattery {
    async fn millivolts(&self) -> anyhow::Result<Option<f32>> {
        Ok(Some(self.0))
    }
}

struct FixedThermal(f32);

#[async_trait]
impl ThermalSensor for FixedThermal {
    async fn hotspot_offset_deg(&self) -> anyhow::Result<Option<f32>> {
        Ok(Some(self.0))
    }
}

struct BrokenThermal;

#[async_trait]
impl ThermalSensor for BrokenThermal {
    async fn hotspot_offset_deg(&self) -> anyhow::Result<Option<f32>> {
        Err(anyhow!("lepton not responding"))
    }
}

fn supervisor(
    inputs: Arc<dyn InputPort>,
    battery: Arc<dyn BatteryGauge>,
    sinks: Vec<Arc<dyn DisplaySink>>,
    max_ticks: u64,
) -> Supervisor {
    Supervisor {
        inputs,
        battery,
        thermal: Arc::new(NoThermalSensor),
        sinks,
        site: SiteInfo {
            latitude: 43,
            longitude: 87,
            compass_offset_deg: 0.0,
        },
        monitor: BatteryMonitor::default(),
        tick_interval: Duration::from_millis(1),
        max_ticks: Some(max_ticks),
    }
}

fn script(raw: &str) -> Arc<dyn InputPort> {
    Arc::new(ScriptedInputs::new(&InputScript::parse(raw).expect("script")))
}

#[tokio::test]
async fn runs_scripted_ticks_in_order() {
    let inputs = script(
        r#"
[[tick]]
gps = 0

[[tick]]

[[tick]]

[[tick]]
fire_alert = 0

[[tick]]
fire_alert = 0
"#,
    );
    let sink = RecordingSink::default();

    let ticks = supervisor(inputs, Arc::new(NoBatteryGauge), vec![Arc::new(sink.clone())], 5)
        .run()
        .await
        .expect("run");
    assert_eq!(ticks, 5);

    let reports = sink.reports.lock().await;
    let executed: Vec<_> = reports.iter().map(|report| report.executed).collect();
    assert_eq!(
        executed,
        vec![
            Mode::Reset,
            Mode::GpsDisplay,
            Mode::Search,
            Mode::Search,
            Mode::FireAlert,
        ]
    );
    let numbers: Vec<_> = reports.iter().map(|report| report.tick).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4, 5]);

    let last = reports.last().expect("last report");
    assert_eq!(last.frame.fire(), "fire_alert");
    assert_eq!(last.frame.gps(), "12.3456");
    assert_eq!(last.event.status, EventStatus::Fire);
    assert_eq!(last.event.fire_bearing, 90);
}

#[tokio::test]
async fn failed_samples_count_as_released() {
    let sink = RecordingSink::default();
    supervisor(
        Arc::new(BrokenInputs),
        Arc::new(NoBatteryGauge),
        vec![Arc::new(FailingSink), Arc::new(sink.clone())],
        3,
    )
    .run()
    .await
    .expect("run");

    let reports = sink.reports.lock().await;
    assert_eq!(reports.len(), 3);
    assert_eq!(reports[2].executed, Mode::Search);
    assert_eq!(reports[2].next, Mode::Search);
}

#[tokio::test]
async fn low_battery_is_reported_in_events() {
    let sink = RecordingSink::default();
    supervisor(
        script("[[tick]]"),
        Arc::new(FixedBattery(300.0)),
        vec![Arc::new(sink.clone())],
        2,
    )
    .run()
    .await
    .expect("run");

    let reports = sink.reports.lock().await;
    assert!(reports
        .iter()
        .all(|report| report.event.status == EventStatus::LowVoltage));
    assert_eq!(reports[0].event.to_string(), "0x002B 0057 01 0000");
}

#[tokio::test]
async fn zero_tick_budget_runs_nothing() {
    let sink = RecordingSink::default();
    let ticks = supervisor(
        script("[[tick]]"),
        Arc::new(NoBatteryGauge),
        vec![Arc::new(sink.clone())],
        0,
    )
    .run()
    .await
    .expect("run");

    assert_eq!(ticks, 0);
    assert!(sink.reports.lock().await.is_empty());
}

const FIRE_AFTER_HOP: &str = r#"
[[tick]]

[[tick]]

[[tick]]
fire_alert = 0

[[tick]]
fire_alert = 0
"#;

#[tokio::test]
async fn thermal_offset_reaches_fire_bearing() {
    let sink = RecordingSink::default();
    let mut runner = supervisor(
        script(FIRE_AFTER_HOP),
        Arc::new(NoBatteryGauge),
        vec![Arc::new(sink.clone())],
        4,
    );
    runner.thermal = Arc::new(FixedThermal(-23.5));
    runner.site.compass_offset_deg = 10.0;
    runner.run().await.expect("run");

    let reports = sink.reports.lock().await;
    let fire = reports.last().expect("last report");
    assert_eq!(fire.executed, Mode::FireAlert);
    // sweep stopped at 45 degrees, plus compass, minus the left-of-center hot spot
    assert_eq!(fire.event.fire_bearing, 31);
    assert_eq!(fire.event.to_string(), "0x002B 0057 02 001F");
}

#[tokio::test]
async fn failed_thermal_reading_assumes_center() {
    let sink = RecordingSink::default();
    let mut runner = supervisor(
        script(FIRE_AFTER_HOP),
        Arc::new(NoBatteryGauge),
        vec![Arc::new(sink.clone())],
        4,
    );
    runner.thermal = Arc::new(BrokenThermal);
    runner.run().await.expect("run");

    let reports = sink.reports.lock().await;
    let fire = reports.last().expect("last report");
    assert_eq!(fire.executed, Mode::FireAlert);
    assert_eq!(fire.event.fire_bearing, 45);
}

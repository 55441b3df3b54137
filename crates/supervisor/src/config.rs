use std::{fs, path::PathBuf, time::Duration};

use controller::events::{
    BatteryMonitor, SiteInfo, DEFAULT_DIVIDER_SCALE, DEFAULT_LOW_BATTERY_MV,
};
use tracing::warn;

const CONFIG_FILE: &str = "supervisor.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Sysfs,
    Script,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub tick_interval_ms: u64,
    pub status_bind: String,
    pub input_source: InputSource,
    pub reset_pin: PathBuf,
    pub internal_error_pin: PathBuf,
    pub comm_error_pin: PathBuf,
    pub fire_alert_pin: PathBuf,
    pub gps_pin: PathBuf,
    pub script_path: Option<PathBuf>,
    pub battery_path: Option<PathBuf>,
    pub thermal_path: Option<PathBuf>,
    pub battery_scale: f32,
    pub low_battery_mv: f32,
    pub site_latitude: u16,
    pub site_longitude: u16,
    pub compass_offset_deg: f32,
    pub max_ticks: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 2000,
            status_bind: "127.0.0.1:8088".into(),
            input_source: InputSource::Sysfs,
            reset_pin: "/sys/class/gpio/gpio16/value".into(),
            internal_error_pin: "/sys/class/gpio/gpio17/value".into(),
            comm_error_pin: "/sys/class/gpio/gpio25/value".into(),
            fire_alert_pin: "/sys/class/gpio/gpio26/value".into(),
            gps_pin: "/sys/class/gpio/gpio27/value".into(),
            script_path: None,
            battery_path: None,
            thermal_path: None,
            battery_scale: DEFAULT_DIVIDER_SCALE,
            low_battery_mv: DEFAULT_LOW_BATTERY_MV,
            site_latitude: 0,
            site_longitude: 0,
            compass_offset_deg: 0.0,
            max_ticks: None,
        }
    }
}

impl Settings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Pin files in `Signal::ALL` order.
    pub fn pin_paths(&self) -> [PathBuf; 5] {
        [
            self.reset_pin.clone(),
            self.internal_error_pin.clone(),
            self.comm_error_pin.clone(),
            self.fire_alert_pin.clone(),
            self.gps_pin.clone(),
        ]
    }

    pub fn site(&self) -> SiteInfo {
        SiteInfo {
            latitude: self.site_latitude,
            longitude: self.site_longitude,
            compass_offset_deg: self.compass_offset_deg,
        }
    }

    pub fn battery_monitor(&self) -> BatteryMonitor {
        BatteryMonitor {
            divider_scale: self.battery_scale,
            low_threshold_mv: self.low_battery_mv,
        }
    }

    /// Applies one `key = value` setting. Returns `false` for unknown keys or
    /// values that do not parse, leaving the previous value in place.
    fn apply(&mut self, key: &str, value: &str) -> bool {
        let value = value.trim();
        match key {
            "tick_interval_ms" => set_parsed(&mut self.tick_interval_ms, value, |ms| *ms > 0),
            "status_bind" => {
                self.status_bind = value.to_string();
                true
            }
            "input_source" => match value.to_ascii_lowercase().as_str() {
                "sysfs" => {
                    self.input_source = InputSource::Sysfs;
                    true
                }
                "script" => {
                    self.input_source = InputSource::Script;
                    true
                }
                _ => false,
            },
            "reset_pin" => set_path(&mut self.reset_pin, value),
            "internal_error_pin" => set_path(&mut self.internal_error_pin, value),
            "comm_error_pin" => set_path(&mut self.comm_error_pin, value),
            "fire_alert_pin" => set_path(&mut self.fire_alert_pin, value),
            "gps_pin" => set_path(&mut self.gps_pin, value),
            "script_path" => set_optional_path(&mut self.script_path, value),
            "battery_path" => set_optional_path(&mut self.battery_path, value),
            "thermal_path" => set_optional_path(&mut self.thermal_path, value),
            "battery_scale" => set_parsed(&mut self.battery_scale, value, |v| {
                v.is_finite() && *v > 0.0
            }),
            "low_battery_mv" => set_parsed(&mut self.low_battery_mv, value, |v| v.is_finite()),
            "site_latitude" => set_parsed(&mut self.site_latitude, value, |_| true),
            "site_longitude" => set_parsed(&mut self.site_longitude, value, |_| true),
            "compass_offset_deg" => {
                set_parsed(&mut self.compass_offset_deg, value, |v| v.is_finite())
            }
            "max_ticks" => {
                if value.is_empty() {
                    self.max_ticks = None;
                    return true;
                }
                match value.parse::<u64>() {
                    Ok(max) => {
                        self.max_ticks = Some(max);
                        true
                    }
                    Err(_) => false,
                }
            }
            _ => false,
        }
    }
}

const KEYS: &[&str] = &[
    "tick_interval_ms",
    "status_bind",
    "input_source",
    "reset_pin",
    "internal_error_pin",
    "comm_error_pin",
    "fire_alert_pin",
    "gps_pin",
    "script_path",
    "battery_path",
    "thermal_path",
    "battery_scale",
    "low_battery_mv",
    "site_latitude",
    "site_longitude",
    "compass_offset_deg",
    "max_ticks",
];

fn set_parsed<T: std::str::FromStr>(
    slot: &mut T,
    value: &str,
    accept: impl Fn(&T) -> bool,
) -> bool {
    match value.parse::<T>() {
        Ok(parsed) if accept(&parsed) => {
            *slot = parsed;
            true
        }
        _ => false,
    }
}

fn set_path(slot: &mut PathBuf, value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    *slot = PathBuf::from(value);
    true
}

fn set_optional_path(slot: &mut Option<PathBuf>, value: &str) -> bool {
    *slot = (!value.is_empty()).then(|| PathBuf::from(value));
    true
}

/// Reads `supervisor.toml` from the working directory (or the file named by
/// `SUPERVISOR_CONFIG`), then applies `SUPERVISOR_*` and `APP__*` overrides.
pub fn load_settings() -> Settings {
    let path = std::env::var("SUPERVISOR_CONFIG").unwrap_or_else(|_| CONFIG_FILE.to_string());
    let raw = fs::read_to_string(&path).ok();
    load_settings_from(raw.as_deref(), |name| std::env::var(name).ok())
}

pub fn load_settings_from(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        match raw.parse::<toml::Table>() {
            Ok(table) => {
                for (key, value) in table {
                    let value = match value {
                        toml::Value::String(text) => text,
                        other => other.to_string(),
                    };
                    if !settings.apply(&key, &value) {
                        warn!(%key, %value, "ignoring config entry");
                    }
                }
            }
            Err(error) => warn!(%error, "config file is not valid TOML, using defaults"),
        }
    }

    for key in KEYS {
        let upper = key.to_ascii_uppercase();
        for name in [format!("SUPERVISOR_{upper}"), format!("APP__{upper}")] {
            if let Some(value) = env(&name) {
                if !settings.apply(key, &value) {
                    warn!(%name, %value, "ignoring environment override");
                }
            }
        }
    }

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

//! Monitor settings, read from the environment.
//!
//! * `RADAR_PORT` – serial device, required.
//! * `RADAR_BAUD` – defaults to 115200.
//! * `RADAR_SCENARIO` – `living_room`, `bedroom`, `bathroom`, `area_detection` or a raw number.
//! * `RADAR_SENSITIVITY` – 1-3.
//! * `RADAR_POLL_MS` – pause between empty polls, defaults to 20.

use std::str::FromStr;
use std::time::Duration;

use lite_radar::constants::{AREA_DETECTION, BATHROOM, BEDROOM, DEFAULT_BAUD_RATE, LIVING_ROOM};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSettings {
    pub port: String,
    pub baud: u32,
    /// Applied once at start, if set.
    pub scenario: Option<u8>,
    pub sensitivity: Option<u8>,
    pub poll_interval: Duration,
}

impl MonitorSettings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("RADAR_PORT").ok_or(SettingsError::Missing("RADAR_PORT"))?;
        let baud = parse_or(&lookup, "RADAR_BAUD", DEFAULT_BAUD_RATE)?;
        let scenario = match lookup("RADAR_SCENARIO") {
            Some(value) => Some(parse_scenario(&value)?),
            None => None,
        };
        let sensitivity = match lookup("RADAR_SENSITIVITY") {
            Some(value) => Some(parse("RADAR_SENSITIVITY", &value)?),
            None => None,
        };
        let poll_ms = parse_or(&lookup, "RADAR_POLL_MS", DEFAULT_POLL_INTERVAL.as_millis() as u64)?;

        Ok(Self {
            port,
            baud,
            scenario,
            sensitivity,
            poll_interval: Duration::from_millis(poll_ms),
        })
    }
}

fn parse<T: FromStr>(key: &'static str, value: &str) -> Result<T, SettingsError> {
    value.trim().parse().map_err(|_| SettingsError::Invalid { key, value: value.to_string() })
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, SettingsError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key).map_or(Ok(default), |value| parse(key, &value))
}

fn parse_scenario(value: &str) -> Result<u8, SettingsError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "living_room" => Ok(LIVING_ROOM),
        "bedroom" => Ok(BEDROOM),
        "bathroom" => Ok(BATHROOM),
        "area_detection" => Ok(AREA_DETECTION),
        _ => parse("RADAR_SCENARIO", value),
    }
}

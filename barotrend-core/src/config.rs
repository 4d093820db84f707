//! Device Configuration
//!
//! ## Overview
//!
//! Everything the device needs to know about its deployment lives in one
//! [`DeviceConfig`], grouped by the component that consumes it:
//!
//! ```text
//! DeviceConfig
//! ├── client_id                device identity (see below)
//! ├── link      LinkConfig     network name and key
//! ├── update    UpdateConfig   update listener port and password
//! ├── broker    BrokerConfig   broker host/port, topic prefix
//! ├── sensor    SensorConfig   device key, site altitude, read cadence
//! └── timing    TimingConfig   link/broker/sensor deadlines, status cadence
//! ```
//!
//! The client id is a single field. It is the host name announced to the
//! network, the name the update listener advertises, the broker session id and
//! the second topic level, so the device cannot announce one identity while
//! publishing under another.
//!
//! Strings are fixed-capacity `heapless::String`s so the configuration can sit
//! in static memory on the device. Setters that take text return
//! [`ConfigError::FieldTooLong`] instead of truncating.
//!
//! ## Defaults
//!
//! Defaults match the reference firmware: client id `sketch`, topic prefix `home`, broker port
//! 1883, update port 8266, site altitude 338 m. Network credentials have no
//! sensible default and must be supplied; [`DeviceConfig::validate`] rejects
//! an empty network name.
//!
//! ## Loading (std)
//!
//! With the `std` feature a configuration can be read from JSON. Every field is
//! optional and falls back to its default. Unknown keys are a parse error:
//!
//! ```rust
//! # #[cfg(feature = "std")]
//! # {
//! use barotrend_core::config::DeviceConfig;
//!
//! let config = DeviceConfig::from_json(r#"{
//!     "link":   { "ssid": "HomeNet", "psk": "secret" },
//!     "broker": { "host": "10.0.0.2" }
//! }"#).unwrap();
//!
//! assert_eq!(config.broker.host.as_str(), "10.0.0.2");
//! assert_eq!(config.broker.port, 1883);
//! # }
//! ```

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::buffers::{
    MAX_CLIENT_ID_LEN, MAX_DEVICE_KEY_LEN, MAX_HOST_LEN, MAX_PASSWORD_LEN, MAX_PREFIX_LEN,
    MAX_PSK_LEN, MAX_SSID_LEN,
};
use crate::constants::physics::DEFAULT_SITE_ALTITUDE_M;
use crate::constants::time::{
    BROKER_SESSION_TIMEOUT_MS, LINK_START_TIMEOUT_MS, SENSOR_READ_TIMEOUT_MS,
    SENSOR_SCAN_INTERVAL_MS, SENSOR_STABILISATION_MS, STATUS_REPORT_INTERVAL_MS,
};
use crate::errors::ConfigError;
use crate::time::Duration;

const DEFAULT_CLIENT_ID: &str = "sketch";
const DEFAULT_BROKER_HOST: &str = "raspberrypi.local";
const DEFAULT_BROKER_PORT: u16 = 1883;
const DEFAULT_TOPIC_PREFIX: &str = "home";
const DEFAULT_UPDATE_PORT: u16 = 8266;
const DEFAULT_DEVICE_KEY: &str = "bmp280";

/// Network link settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct LinkConfig {
    /// Network name
    pub ssid: String<MAX_SSID_LEN>,
    /// Pre-shared key
    pub psk: String<MAX_PSK_LEN>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            ssid: String::new(),
            psk: String::new(),
        }
    }
}

/// Remote update listener settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct UpdateConfig {
    /// Empty means no password
    pub password: String<MAX_PASSWORD_LEN>,
    /// Listening port
    pub port: u16,
}

impl UpdateConfig {
    /// Password, if one is set
    pub fn password(&self) -> Option<&str> {
        if self.password.is_empty() {
            None
        } else {
            Some(self.password.as_str())
        }
    }
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            password: String::new(),
            port: DEFAULT_UPDATE_PORT,
        }
    }
}

/// Message broker settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct BrokerConfig {
    /// Host name or address of the broker
    pub host: String<MAX_HOST_LEN>,
    /// Broker port
    pub port: u16,
    /// First topic level
    pub topic_prefix: String<MAX_PREFIX_LEN>,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            host: fixed(DEFAULT_BROKER_HOST),
            port: DEFAULT_BROKER_PORT,
            topic_prefix: fixed(DEFAULT_TOPIC_PREFIX),
        }
    }
}

/// Sensor settings
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct SensorConfig {
    /// Third topic level for sensor readings
    pub device_key: String<MAX_DEVICE_KEY_LEN>,
    /// Site altitude above sea level in metres
    pub altitude_m: f32,
    /// Warm-up after start (ms)
    pub stabilisation_ms: u64,
    /// Interval between reads (ms)
    pub scan_interval_ms: u64,
}

impl SensorConfig {
    /// Warm-up after start
    pub fn stabilisation(&self) -> Duration {
        Duration::from_ticks(self.stabilisation_ms)
    }

    /// Interval between reads
    pub fn scan_interval(&self) -> Duration {
        Duration::from_ticks(self.scan_interval_ms)
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            device_key: fixed(DEFAULT_DEVICE_KEY),
            altitude_m: DEFAULT_SITE_ALTITUDE_M,
            stabilisation_ms: SENSOR_STABILISATION_MS,
            scan_interval_ms: SENSOR_SCAN_INTERVAL_MS,
        }
    }
}

/// Deadlines and periodic intervals
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct TimingConfig {
    /// Deadline for the link to report connected (ms)
    pub link_start_timeout_ms: u64,
    /// Deadline for a broker session to open or close (ms)
    pub broker_session_timeout_ms: u64,
    /// Deadline for a sensor conversion to finish once a read starts (ms)
    pub sensor_read_timeout_ms: u64,
    /// Interval between status reports (ms)
    pub status_interval_ms: u64,
}

impl TimingConfig {
    /// Link start deadline
    pub fn link_start_timeout(&self) -> Duration {
        Duration::from_ticks(self.link_start_timeout_ms)
    }

    /// Broker session deadline
    pub fn broker_session_timeout(&self) -> Duration {
        Duration::from_ticks(self.broker_session_timeout_ms)
    }

    /// Sensor read deadline
    pub fn sensor_read_timeout(&self) -> Duration {
        Duration::from_ticks(self.sensor_read_timeout_ms)
    }

    /// Status report interval
    pub fn status_interval(&self) -> Duration {
        Duration::from_ticks(self.status_interval_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            link_start_timeout_ms: LINK_START_TIMEOUT_MS,
            broker_session_timeout_ms: BROKER_SESSION_TIMEOUT_MS,
            sensor_read_timeout_ms: SENSOR_READ_TIMEOUT_MS,
            status_interval_ms: STATUS_REPORT_INTERVAL_MS,
        }
    }
}

/// Complete device configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct DeviceConfig {
    /// Device identity on the network, the update channel and the broker
    pub client_id: String<MAX_CLIENT_ID_LEN>,
    /// Network link settings
    pub link: LinkConfig,
    /// Remote update settings
    pub update: UpdateConfig,
    /// Broker settings
    pub broker: BrokerConfig,
    /// Sensor settings
    pub sensor: SensorConfig,
    /// Deadlines and intervals
    pub timing: TimingConfig,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            client_id: fixed(DEFAULT_CLIENT_ID),
            link: LinkConfig::default(),
            update: UpdateConfig::default(),
            broker: BrokerConfig::default(),
            sensor: SensorConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl DeviceConfig {
    /// Defaults, with credentials still to be supplied
    pub fn new() -> Self {
        Self::default()
    }

    /// Set network credentials
    pub fn with_network(mut self, ssid: &str, psk: &str) -> Result<Self, ConfigError> {
        self.link.ssid = bounded("link.ssid", ssid)?;
        self.link.psk = bounded("link.psk", psk)?;
        Ok(self)
    }

    /// Set the device identity
    pub fn with_client_id(mut self, client_id: &str) -> Result<Self, ConfigError> {
        self.client_id = bounded("client_id", client_id)?;
        Ok(self)
    }

    /// Broker host and port
    pub fn with_broker(mut self, host: &str, port: u16) -> Result<Self, ConfigError> {
        self.broker.host = bounded("broker.host", host)?;
        self.broker.port = port;
        Ok(self)
    }

    /// First topic level
    pub fn with_topic_prefix(mut self, prefix: &str) -> Result<Self, ConfigError> {
        self.broker.topic_prefix = bounded("broker.topic_prefix", prefix)?;
        Ok(self)
    }

    /// Password the update listener requires
    pub fn with_update_password(mut self, password: &str) -> Result<Self, ConfigError> {
        self.update.password = bounded("update.password", password)?;
        Ok(self)
    }

    /// Port the update listener binds
    pub fn with_update_port(mut self, port: u16) -> Self {
        self.update.port = port;
        self
    }

    /// Third topic level for sensor readings
    pub fn with_device_key(mut self, key: &str) -> Result<Self, ConfigError> {
        self.sensor.device_key = bounded("sensor.device_key", key)?;
        Ok(self)
    }

    /// Site altitude in metres above sea level
    pub fn with_altitude(mut self, altitude_m: f32) -> Self {
        self.sensor.altitude_m = altitude_m;
        self
    }

    /// Interval between sensor reads
    pub fn with_scan_interval(mut self, interval: Duration) -> Self {
        self.sensor.scan_interval_ms = interval.ticks();
        self
    }

    /// Sensor warm-up after start
    pub fn with_stabilisation(mut self, warm_up: Duration) -> Self {
        self.sensor.stabilisation_ms = warm_up.ticks();
        self
    }

    /// Interval between status reports
    pub fn with_status_interval(mut self, interval: Duration) -> Self {
        self.timing.status_interval_ms = interval.ticks();
        self
    }

    /// Deadline for the link to come up
    pub fn with_link_timeout(mut self, timeout: Duration) -> Self {
        self.timing.link_start_timeout_ms = timeout.ticks();
        self
    }

    /// Deadline for a broker session to open or close
    pub fn with_broker_timeout(mut self, timeout: Duration) -> Self {
        self.timing.broker_session_timeout_ms = timeout.ticks();
        self
    }

    /// Deadline for a sensor conversion to finish
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.timing.sensor_read_timeout_ms = timeout.ticks();
        self
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        require("link.ssid", &self.link.ssid)?;
        require("client_id", &self.client_id)?;
        require("broker.host", &self.broker.host)?;
        require("broker.topic_prefix", &self.broker.topic_prefix)?;
        require("sensor.device_key", &self.sensor.device_key)?;

        if self.broker.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "broker.port",
                reason: "port must be non-zero",
            });
        }
        if self.update.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "update.port",
                reason: "port must be non-zero",
            });
        }
        if !self.sensor.altitude_m.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "sensor.altitude_m",
                reason: "altitude must be finite",
            });
        }

        let intervals = [
            ("sensor.scan_interval_ms", self.sensor.scan_interval_ms),
            ("timing.link_start_timeout_ms", self.timing.link_start_timeout_ms),
            ("timing.broker_session_timeout_ms", self.timing.broker_session_timeout_ms),
            ("timing.sensor_read_timeout_ms", self.timing.sensor_read_timeout_ms),
            ("timing.status_interval_ms", self.timing.status_interval_ms),
        ];
        for (field, value) in intervals {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "interval must be non-zero",
                });
            }
        }

        Ok(())
    }
}

#[cfg(feature = "std")]
impl DeviceConfig {
    /// Parse and validate a JSON document
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|e| ConfigError::Parse {
            line: e.line(),
            column: e.column(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|_| ConfigError::Unreadable)?;
        Self::from_json(&text)
    }
}

fn bounded<const N: usize>(field: &'static str, value: &str) -> Result<String<N>, ConfigError> {
    let mut text = String::new();
    text.push_str(value)
        .map_err(|_| ConfigError::FieldTooLong { field, max: N })?;
    Ok(text)
}

// Default literals are all shorter than their fields; truncation cannot occur.
fn fixed<const N: usize>(value: &str) -> String<N> {
    let mut text = String::new();
    for c in value.chars() {
        if text.push(c).is_err() {
            break;
        }
    }
    text
}

fn require(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        Err(ConfigError::MissingField { field })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> DeviceConfig {
        DeviceConfig::new().with_network("HomeNet", "secret").unwrap()
    }

    #[test]
    fn defaults_match_reference_device() {
        let config = DeviceConfig::default();
        assert_eq!(config.client_id.as_str(), "sketch");
        assert_eq!(config.update.port, 8266);
        assert!(config.update.password().is_none());
        assert_eq!(config.broker.port, 1883);
        assert_eq!(config.broker.topic_prefix.as_str(), "home");
        assert_eq!(config.sensor.device_key.as_str(), "bmp280");
        assert_eq!(config.sensor.altitude_m, 338.0);
        assert_eq!(config.sensor.scan_interval(), Duration::from_ticks(600_000));
        assert_eq!(config.timing.status_interval(), Duration::from_ticks(300_000));
        assert_eq!(config.timing.sensor_read_timeout(), Duration::from_ticks(2_000));
    }

    #[test]
    fn credentials_are_required() {
        assert_eq!(
            DeviceConfig::default().validate(),
            Err(ConfigError::MissingField { field: "link.ssid" })
        );
        assert!(configured().validate().is_ok());
    }

    #[test]
    fn overlong_text_is_rejected() {
        let long = "x".repeat(MAX_SSID_LEN + 1);
        assert_eq!(
            DeviceConfig::new().with_network(&long, "psk"),
            Err(ConfigError::FieldTooLong {
                field: "link.ssid",
                max: MAX_SSID_LEN
            })
        );
    }

    #[test]
    fn empty_client_id_is_rejected() {
        let config = configured().with_client_id("").unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigError::MissingField { field: "client_id" })
        );
    }

    #[test]
    fn zero_interval_is_invalid() {
        let config = configured().with_scan_interval(Duration::from_ticks(0));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "sensor.scan_interval_ms",
                ..
            })
        ));
    }

    #[test]
    fn zero_read_timeout_is_invalid() {
        let config = configured().with_read_timeout(Duration::from_ticks(0));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "timing.sensor_read_timeout_ms",
                ..
            })
        ));
    }

    #[test]
    fn password_is_optional() {
        let config = configured().with_update_password("hunter2").unwrap();
        assert_eq!(config.update.password(), Some("hunter2"));
    }

    #[cfg(feature = "std")]
    #[test]
    fn json_fills_defaults() {
        let config = DeviceConfig::from_json(
            r#"{ "link": { "ssid": "HomeNet" }, "sensor": { "altitude_m": 12.5 } }"#,
        )
        .unwrap();
        assert_eq!(config.link.ssid.as_str(), "HomeNet");
        assert_eq!(config.sensor.altitude_m, 12.5);
        assert_eq!(config.sensor.device_key.as_str(), "bmp280");
    }

    #[cfg(feature = "std")]
    #[test]
    fn json_client_id_is_shared() {
        let config = DeviceConfig::from_json(
            r#"{ "client_id": "attic", "link": { "ssid": "HomeNet" } }"#,
        )
        .unwrap();
        assert_eq!(config.client_id.as_str(), "attic");
    }

    #[cfg(feature = "std")]
    #[test]
    fn unknown_keys_are_rejected() {
        let result = DeviceConfig::from_json(
            r#"{ "link": { "ssid": "HomeNet", "client_id": "attic" } }"#,
        );
        assert!(matches!(result, Err(ConfigError::Parse { line: 1, .. })));
    }

    #[cfg(feature = "std")]
    #[test]
    fn malformed_json_reports_position() {
        let result = DeviceConfig::from_json("{\n  \"link\": ");
        assert!(matches!(result, Err(ConfigError::Parse { line: 2, .. })));
    }
}

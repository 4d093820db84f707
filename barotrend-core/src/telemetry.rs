//! Telemetry Messages and Wire Formatting
//!
//! ## Overview
//!
//! A [`TelemetryMessage`] is an immutable `(topic, payload, retain)` triple.
//! Producers (sensor sampler, status reporter) build one, push it onto the
//! telemetry queue, and the transport publishes it exactly once.
//!
//! ## Topic Convention
//!
//! Downstream consumers subscribe by topic, so the layout is fixed:
//!
//! ```text
//! <prefix>/<client id>/<device>/<measurement>    home/sketch/bmp280/temperature
//! <prefix>/<client id>/status                    home/sketch/status
//! ```
//!
//! ## Payloads
//!
//! Flat JSON objects, formatted directly into fixed-capacity buffers:
//!
//! ```text
//! temperature  {"temp_C":21.5,"temp_F":70.7}
//! pressure     {"local_hPa":975.32,"sea_hPa":1013.21,"trend":"steady"}
//! status       {"ssid":"net","mac":"AA:BB:CC:DD:EE:FF","ip":"10.0.0.5","heap":23456,"upTime":300}
//! ```
//!
//! Temperatures carry one decimal place, pressures two. Nothing here allocates;
//! a topic or payload that does not fit its buffer is a [`MessageError`].
//!
//! ```rust
//! use barotrend_core::telemetry::{TopicScheme, temperature_payload, TelemetryMessage};
//!
//! let scheme = TopicScheme::new("home", "sketch");
//! let topic = scheme.measurement("bmp280", "temperature").unwrap();
//! let payload = temperature_payload(21.5).unwrap();
//! let message = TelemetryMessage::from_parts(topic, payload, false);
//!
//! assert_eq!(message.topic(), "home/sketch/bmp280/temperature");
//! assert_eq!(message.payload(), "{\"temp_C\":21.5,\"temp_F\":70.7}");
//! ```

use core::fmt::{self, Write};

use heapless::String;

use crate::constants::buffers::{MAX_PAYLOAD_LEN, MAX_TOPIC_LEN};
use crate::errors::MessageError;
use crate::physics::celsius_to_fahrenheit;
use crate::trend::Trend;

/// Bounded topic string
pub type Topic = String<MAX_TOPIC_LEN>;

/// Bounded payload string
pub type Payload = String<MAX_PAYLOAD_LEN>;

/// Topic leaf for temperature readings
pub const TOPIC_TEMPERATURE_KEY: &str = "temperature";

/// Topic leaf for pressure readings
pub const TOPIC_PRESSURE_KEY: &str = "pressure";

/// Topic leaf for device status reports
pub const TOPIC_STATUS_KEY: &str = "status";

/// Broker delivery guarantee
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum QoS {
    /// Fire and forget: may be lost, never duplicated
    AtMostOnce = 0,
    /// Acknowledged: never lost, may be duplicated
    AtLeastOnce = 1,
    /// Four-way handshake: delivered exactly once
    ExactlyOnce = 2,
}

/// Immutable telemetry message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryMessage {
    topic: Topic,
    payload: Payload,
    retain: bool,
}

impl TelemetryMessage {
    /// Build a message from borrowed strings, copying into bounded buffers
    pub fn new(topic: &str, payload: &str, retain: bool) -> Result<Self, MessageError> {
        let mut bounded_topic = Topic::new();
        bounded_topic
            .push_str(topic)
            .map_err(|_| MessageError::TopicTooLong { max: MAX_TOPIC_LEN })?;

        let mut bounded_payload = Payload::new();
        bounded_payload
            .push_str(payload)
            .map_err(|_| MessageError::PayloadTooLong { max: MAX_PAYLOAD_LEN })?;

        Ok(Self::from_parts(bounded_topic, bounded_payload, retain))
    }

    /// Assemble a message from already-bounded parts
    pub fn from_parts(topic: Topic, payload: Payload, retain: bool) -> Self {
        Self {
            topic,
            payload,
            retain,
        }
    }

    /// Full topic
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Payload text
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Whether the broker should keep this as the topic's last known value
    pub fn retain(&self) -> bool {
        self.retain
    }
}

/// Builds topics under `<prefix>/<client id>`
#[derive(Debug, Clone, Copy)]
pub struct TopicScheme<'a> {
    prefix: &'a str,
    client_id: &'a str,
}

impl<'a> TopicScheme<'a> {
    /// Topics under `prefix/client_id`
    pub fn new(prefix: &'a str, client_id: &'a str) -> Self {
        Self { prefix, client_id }
    }

    /// `<prefix>/<client id>/<device>/<measurement>`
    pub fn measurement(&self, device: &str, measurement: &str) -> Result<Topic, MessageError> {
        let mut topic = Topic::new();
        write!(
            topic,
            "{}/{}/{}/{}",
            self.prefix, self.client_id, device, measurement
        )
        .map_err(|_| MessageError::TopicTooLong { max: MAX_TOPIC_LEN })?;
        Ok(topic)
    }

    /// `<prefix>/<client id>/status`
    pub fn status(&self) -> Result<Topic, MessageError> {
        let mut topic = Topic::new();
        write!(topic, "{}/{}/{}", self.prefix, self.client_id, TOPIC_STATUS_KEY)
            .map_err(|_| MessageError::TopicTooLong { max: MAX_TOPIC_LEN })?;
        Ok(topic)
    }
}

/// Device health figures carried by the status message
#[derive(Debug, Clone, Copy)]
pub struct StatusReport<'a> {
    /// Network name the link is associated with
    pub ssid: &'a str,
    /// Hardware address of the link interface
    pub mac: &'a str,
    /// Current network address
    pub ip: &'a str,
    /// Free heap in bytes
    pub free_heap: u32,
    /// Seconds since boot
    pub uptime_secs: u64,
}

/// `{"temp_C":<c>,"temp_F":<f>}` with one decimal place
pub fn temperature_payload(celsius: f32) -> Result<Payload, MessageError> {
    let fahrenheit = celsius_to_fahrenheit(celsius);
    let mut payload = Payload::new();
    write!(
        payload,
        "{{\"temp_C\":{:.1},\"temp_F\":{:.1}}}",
        celsius, fahrenheit
    )
    .map_err(|_| payload_overflow())?;
    Ok(payload)
}

/// `{"local_hPa":<p>,"sea_hPa":<p>,"trend":"<trend>"}` with two decimal places
pub fn pressure_payload(local_hpa: f32, sea_level_hpa: f32, trend: Trend) -> Result<Payload, MessageError> {
    let mut payload = Payload::new();
    write!(
        payload,
        "{{\"local_hPa\":{:.2},\"sea_hPa\":{:.2},\"trend\":\"{}\"}}",
        local_hpa,
        sea_level_hpa,
        trend.as_str()
    )
    .map_err(|_| payload_overflow())?;
    Ok(payload)
}

/// `{"ssid":"..","mac":"..","ip":"..","heap":<n>,"upTime":<s>}`
pub fn status_payload(report: &StatusReport<'_>) -> Result<Payload, MessageError> {
    let mut payload = Payload::new();
    write!(
        payload,
        "{{\"ssid\":\"{}\",\"mac\":\"{}\",\"ip\":\"{}\",\"heap\":{},\"upTime\":{}}}",
        JsonStr(report.ssid),
        JsonStr(report.mac),
        JsonStr(report.ip),
        report.free_heap,
        report.uptime_secs
    )
    .map_err(|_| payload_overflow())?;
    Ok(payload)
}

fn payload_overflow() -> MessageError {
    MessageError::PayloadTooLong { max: MAX_PAYLOAD_LEN }
}

/// Writes a string with JSON escaping, without the surrounding quotes
struct JsonStr<'a>(&'a str);

impl fmt::Display for JsonStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                '\n' => f.write_str("\\n")?,
                '\r' => f.write_str("\\r")?,
                '\t' => f.write_str("\\t")?,
                c if (c as u32) < 0x20 => write!(f, "\\u{:04x}", c as u32)?,
                c => f.write_char(c)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measurement_topic_layout() {
        let scheme = TopicScheme::new("home", "sketch");
        let topic = scheme.measurement("bmp280", TOPIC_PRESSURE_KEY).unwrap();
        assert_eq!(topic.as_str(), "home/sketch/bmp280/pressure");
        assert_eq!(scheme.status().unwrap().as_str(), "home/sketch/status");
    }

    #[test]
    fn temperature_one_decimal() {
        let payload = temperature_payload(21.5).unwrap();
        assert_eq!(payload.as_str(), "{\"temp_C\":21.5,\"temp_F\":70.7}");

        let payload = temperature_payload(-5.0).unwrap();
        assert_eq!(payload.as_str(), "{\"temp_C\":-5.0,\"temp_F\":23.0}");
    }

    #[test]
    fn pressure_two_decimals_with_trend() {
        let payload = pressure_payload(975.5, 1013.25, Trend::Steady).unwrap();
        assert_eq!(
            payload.as_str(),
            "{\"local_hPa\":975.50,\"sea_hPa\":1013.25,\"trend\":\"steady\"}"
        );

        let payload = pressure_payload(1000.0, 1000.0, Trend::Training).unwrap();
        assert!(payload.ends_with("\"trend\":\"training\"}"));
    }

    #[test]
    fn status_payload_layout() {
        let report = StatusReport {
            ssid: "HomeNet",
            mac: "AA:BB:CC:DD:EE:FF",
            ip: "192.168.1.20",
            free_heap: 23456,
            uptime_secs: 300,
        };
        let payload = status_payload(&report).unwrap();
        assert_eq!(
            payload.as_str(),
            "{\"ssid\":\"HomeNet\",\"mac\":\"AA:BB:CC:DD:EE:FF\",\"ip\":\"192.168.1.20\",\"heap\":23456,\"upTime\":300}"
        );
    }

    #[test]
    fn status_escapes_quotes() {
        let report = StatusReport {
            ssid: "Bob's \"fast\" net",
            mac: "",
            ip: "",
            free_heap: 0,
            uptime_secs: 0,
        };
        let payload = status_payload(&report).unwrap();
        assert!(payload.starts_with("{\"ssid\":\"Bob's \\\"fast\\\" net\""));
    }

    #[test]
    fn oversized_topic_is_rejected() {
        let long = "x".repeat(MAX_TOPIC_LEN);
        let scheme = TopicScheme::new("home", &long);
        assert_eq!(
            scheme.status(),
            Err(MessageError::TopicTooLong { max: MAX_TOPIC_LEN })
        );
        assert!(TelemetryMessage::new(&long, "{}", false).is_ok());
        assert!(TelemetryMessage::new(&format!("{}x", long), "{}", false).is_err());
    }

    #[test]
    fn message_is_immutable_value() {
        let message = TelemetryMessage::new("a/b", "{}", true).unwrap();
        let copy = message.clone();
        assert_eq!(message, copy);
        assert!(copy.retain());
    }
}

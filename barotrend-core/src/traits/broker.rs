//! Message broker client

use crate::telemetry::QoS;

/// Publish/subscribe broker session (MQTT or similar)
///
/// `connect` and `disconnect` are requests; the outcome is observed through
/// [`connected`](BrokerClient::connected) on later ticks.
pub trait BrokerClient {
    /// Request a session with the broker
    fn connect(&mut self, host: &str, port: u16, client_id: &str);

    /// Whether a session is currently established
    fn connected(&self) -> bool;

    /// Request the session be closed
    fn disconnect(&mut self);

    /// Hand one message to the session, `false` if it was refused
    fn publish(&mut self, topic: &str, payload: &str, retain: bool, qos: QoS) -> bool;

    /// Service keep-alives and incoming traffic
    fn poll(&mut self);
}

//! Mock platform for integration tests
//!
//! Every collaborator is a plain struct with public fields so tests can script
//! behaviour before a tick and inspect side effects after it through
//! `Scheduler::hardware` / `Scheduler::hardware_mut`.

#![allow(dead_code)]

use std::collections::VecDeque;

use barotrend_core::{
    config::DeviceConfig,
    scheduler::{Hardware, Scheduler},
    supervisor::RecordingSupervisor,
    telemetry::QoS,
    time::ManualClock,
    traits::{
        BarometricSensor, BrokerClient, Credentials, LinkStatus, NetworkLink, Platform,
        SensorFault, SystemInfo, UpdateError, UpdateProvider,
    },
};

/// Network link that comes up as soon as it is asked to
pub struct MockLink {
    pub up: bool,
    /// Whether `connect` brings the link up
    pub comes_up: bool,
    pub connects: u32,
    pub disconnects: u32,
    pub persistent: Option<bool>,
    pub identifier: Option<String>,
    pub ssid: String,
    pub mac: String,
    pub address: String,
}

impl Default for MockLink {
    fn default() -> Self {
        Self {
            up: false,
            comes_up: true,
            connects: 0,
            disconnects: 0,
            persistent: None,
            identifier: None,
            ssid: "HomeNet".to_string(),
            mac: "AA:BB:CC:DD:EE:FF".to_string(),
            address: "192.168.1.20".to_string(),
        }
    }
}

impl NetworkLink for MockLink {
    fn connect(&mut self, credentials: &Credentials<'_>) {
        assert_eq!(credentials.ssid, self.ssid);
        self.connects += 1;
        if self.comes_up {
            self.up = true;
        }
    }

    fn status(&self) -> LinkStatus {
        if self.up {
            LinkStatus::Connected
        } else {
            LinkStatus::Down
        }
    }

    fn disconnect(&mut self) {
        self.disconnects += 1;
        self.up = false;
    }

    fn set_persistence(&mut self, persistent: bool) {
        self.persistent = Some(persistent);
    }

    fn set_client_identifier(&mut self, name: &str) -> bool {
        self.identifier = Some(name.to_string());
        true
    }

    fn current_address(&self) -> &str {
        &self.address
    }

    fn ssid(&self) -> &str {
        &self.ssid
    }

    fn mac_address(&self) -> &str {
        &self.mac
    }
}

/// Update listener that counts activations
#[derive(Default)]
pub struct MockUpdater {
    pub configured_port: Option<u16>,
    pub host_name: Option<String>,
    pub activations: u32,
    pub polls: u32,
    /// Reported on the next poll, then cleared
    pub next_error: Option<UpdateError>,
}

impl UpdateProvider for MockUpdater {
    fn configure(&mut self, port: u16, host_name: &str, _password: Option<&str>) {
        self.configured_port = Some(port);
        self.host_name = Some(host_name.to_string());
    }

    fn activate(&mut self) {
        self.activations += 1;
    }

    fn poll(&mut self) -> Result<(), UpdateError> {
        self.polls += 1;
        match self.next_error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// How the mock broker answers session requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerBehaviour {
    /// Sessions open and close immediately
    AlwaysAvailable,
    /// Session requests are ignored
    NeverConnects,
}

/// Message published through the mock broker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub topic: String,
    pub payload: String,
    pub retain: bool,
}

pub struct MockBroker {
    pub behaviour: BrokerBehaviour,
    pub session: bool,
    pub connects: u32,
    pub disconnects: u32,
    pub polls: u32,
    /// Client id of every session request
    pub client_ids: Vec<String>,
    pub published: Vec<Published>,
}

impl MockBroker {
    pub fn new(behaviour: BrokerBehaviour) -> Self {
        Self {
            behaviour,
            session: false,
            connects: 0,
            disconnects: 0,
            polls: 0,
            client_ids: Vec::new(),
            published: Vec::new(),
        }
    }

    /// Published payloads for topics ending in `leaf`
    pub fn payloads_for(&self, leaf: &str) -> Vec<&str> {
        self.published
            .iter()
            .filter(|p| p.topic.ends_with(leaf))
            .map(|p| p.payload.as_str())
            .collect()
    }
}

impl BrokerClient for MockBroker {
    fn connect(&mut self, _host: &str, _port: u16, client_id: &str) {
        self.connects += 1;
        self.client_ids.push(client_id.to_string());
        if self.behaviour == BrokerBehaviour::AlwaysAvailable {
            self.session = true;
        }
    }

    fn connected(&self) -> bool {
        self.session
    }

    fn disconnect(&mut self) {
        self.disconnects += 1;
        self.session = false;
    }

    fn publish(&mut self, topic: &str, payload: &str, retain: bool, qos: QoS) -> bool {
        assert_eq!(qos, QoS::AtMostOnce);
        self.published.push(Published {
            topic: topic.to_string(),
            payload: payload.to_string(),
            retain,
        });
        true
    }

    fn poll(&mut self) {
        self.polls += 1;
    }
}

/// Sensor replaying scripted pressures at a fixed temperature
pub struct MockSensor {
    pub starts: bool,
    pub temperature: f32,
    /// Consumed front first; the last value repeats
    pub pressures: VecDeque<f32>,
    pub fault: Option<SensorFault>,
}

impl Default for MockSensor {
    fn default() -> Self {
        Self {
            starts: true,
            temperature: 20.0,
            pressures: VecDeque::from(vec![975.0]),
            fault: None,
        }
    }
}

impl BarometricSensor for MockSensor {
    fn start(&mut self) -> bool {
        self.starts
    }

    fn read_temperature(&mut self) -> nb::Result<f32, SensorFault> {
        match self.fault {
            Some(fault) => Err(nb::Error::Other(fault)),
            None => Ok(self.temperature),
        }
    }

    fn read_pressure(&mut self) -> nb::Result<f32, SensorFault> {
        let value = if self.pressures.len() > 1 {
            self.pressures.pop_front()
        } else {
            self.pressures.front().copied()
        };
        value.ok_or(nb::Error::WouldBlock)
    }
}

pub struct MockSystem {
    pub free_heap: u32,
}

impl SystemInfo for MockSystem {
    fn free_memory(&self) -> u32 {
        self.free_heap
    }
}

pub struct MockPlatform;

impl Platform for MockPlatform {
    type Link = MockLink;
    type Updater = MockUpdater;
    type Broker = MockBroker;
    type Sensor = MockSensor;
    type System = MockSystem;
    type Clock = ManualClock;
    type Supervisor = RecordingSupervisor;
}

pub fn hardware(broker: BrokerBehaviour) -> Hardware<MockPlatform> {
    Hardware {
        link: MockLink::default(),
        updater: MockUpdater::default(),
        broker: MockBroker::new(broker),
        sensor: MockSensor::default(),
        system: MockSystem { free_heap: 23456 },
        clock: ManualClock::new(0),
        supervisor: RecordingSupervisor::new(),
    }
}

pub fn config() -> DeviceConfig {
    DeviceConfig::new()
        .with_network("HomeNet", "secret")
        .expect("valid test credentials")
}

pub fn scheduler(hardware: Hardware<MockPlatform>) -> Scheduler<MockPlatform> {
    Scheduler::new(hardware, config()).expect("valid test configuration")
}

/// Advance the clock by `step_ms` and tick, `ticks` times; stops at the first error
pub fn run(scheduler: &mut Scheduler<MockPlatform>, ticks: usize, step_ms: u64) {
    for _ in 0..ticks {
        scheduler.hardware_mut().clock.advance(step_ms);
        if scheduler.tick().is_err() {
            return;
        }
    }
}

/// Tick until the simulated clock reaches `until_ms`
pub fn run_until(scheduler: &mut Scheduler<MockPlatform>, until_ms: u64, step_ms: u64) {
    use barotrend_core::time::TimeSource;

    while scheduler.hardware().clock.now().ticks() < until_ms {
        scheduler.hardware_mut().clock.advance(step_ms);
        if scheduler.tick().is_err() {
            return;
        }
    }
}

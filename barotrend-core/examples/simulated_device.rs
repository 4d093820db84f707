//! Simulated Device Example
//!
//! Runs the full scheduler against an in-process platform for one simulated
//! hour and prints everything the device would publish.
//!
//! ## What You'll Learn
//!
//! - Implementing the collaborator traits for a platform
//! - Building and validating a `DeviceConfig`
//! - Driving `Scheduler::tick` from a host loop
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example simulated_device
//! ```

use barotrend_core::{
    config::DeviceConfig,
    scheduler::{Hardware, Scheduler},
    supervisor::RecordingSupervisor,
    telemetry::QoS,
    time::{ManualClock, TimeSource},
    traits::{
        BarometricSensor, BrokerClient, Credentials, LinkStatus, NetworkLink, Platform,
        SensorFault, SystemInfo, UpdateError, UpdateProvider,
    },
};

/// Station interface that associates instantly
struct SimLink {
    up: bool,
}

impl NetworkLink for SimLink {
    fn connect(&mut self, credentials: &Credentials<'_>) {
        println!("  [link] associating with {}", credentials.ssid);
        self.up = true;
    }

    fn status(&self) -> LinkStatus {
        if self.up {
            LinkStatus::Connected
        } else {
            LinkStatus::Down
        }
    }

    fn disconnect(&mut self) {
        self.up = false;
    }

    fn set_persistence(&mut self, _persistent: bool) {}

    fn set_client_identifier(&mut self, name: &str) -> bool {
        println!("  [link] host name {}", name);
        true
    }

    fn current_address(&self) -> &str {
        "192.168.1.42"
    }

    fn ssid(&self) -> &str {
        "HomeNet"
    }

    fn mac_address(&self) -> &str {
        "5C:CF:7F:01:02:03"
    }
}

struct SimUpdater;

impl UpdateProvider for SimUpdater {
    fn configure(&mut self, port: u16, host_name: &str, _password: Option<&str>) {
        println!("  [update] listening as {} on port {}", host_name, port);
    }

    fn activate(&mut self) {}

    fn poll(&mut self) -> Result<(), UpdateError> {
        Ok(())
    }
}

/// Broker that prints every publish
struct SimBroker {
    session: bool,
}

impl BrokerClient for SimBroker {
    fn connect(&mut self, host: &str, port: u16, _client_id: &str) {
        println!("  [broker] session with {}:{}", host, port);
        self.session = true;
    }

    fn connected(&self) -> bool {
        self.session
    }

    fn disconnect(&mut self) {
        self.session = false;
    }

    fn publish(&mut self, topic: &str, payload: &str, _retain: bool, _qos: QoS) -> bool {
        println!("  {} {}", topic, payload);
        true
    }

    fn poll(&mut self) {}
}

/// Pressure rising 1.5 hPa per reading, as ahead of a high
struct SimSensor {
    pressure: f32,
}

impl BarometricSensor for SimSensor {
    fn start(&mut self) -> bool {
        true
    }

    fn read_temperature(&mut self) -> nb::Result<f32, SensorFault> {
        Ok(17.5)
    }

    fn read_pressure(&mut self) -> nb::Result<f32, SensorFault> {
        self.pressure += 1.5;
        Ok(self.pressure)
    }
}

struct SimSystem;

impl SystemInfo for SimSystem {
    fn free_memory(&self) -> u32 {
        41_000
    }
}

struct Simulator;

impl Platform for Simulator {
    type Link = SimLink;
    type Updater = SimUpdater;
    type Broker = SimBroker;
    type Sensor = SimSensor;
    type System = SimSystem;
    type Clock = ManualClock;
    type Supervisor = RecordingSupervisor;
}

const TICK_MS: u64 = 250;
const RUN_MS: u64 = 61 * 60 * 1_000;

fn main() {
    println!("=== Barotrend Simulated Device ===\n");

    let config = match DeviceConfig::new()
        .with_network("HomeNet", "correct horse")
        .and_then(|config| config.with_client_id("garden"))
    {
        Ok(config) => config,
        Err(e) => {
            eprintln!("invalid configuration: {}", e);
            return;
        }
    };

    let hardware = Hardware::<Simulator> {
        link: SimLink { up: false },
        updater: SimUpdater,
        broker: SimBroker { session: false },
        sensor: SimSensor { pressure: 970.0 },
        system: SimSystem,
        clock: ManualClock::new(0),
        supervisor: RecordingSupervisor::new(),
    };

    let mut scheduler = match Scheduler::new(hardware, config) {
        Ok(scheduler) => scheduler,
        Err(e) => {
            eprintln!("configuration rejected: {}", e);
            return;
        }
    };

    while scheduler.hardware().clock.now().ticks() < RUN_MS {
        scheduler.hardware_mut().clock.advance(TICK_MS);
        if let Err(e) = scheduler.tick() {
            println!("\nhalted: {}", e);
            break;
        }
    }

    let snapshot = scheduler.snapshot();
    println!("\n=== Summary ===");
    println!("  sensor readings : {}", snapshot.sensor_readings);
    println!("  status reports  : {}", snapshot.status_reports);
    println!("  published       : {}", snapshot.transport_stats.published);
    println!("  broker sessions : {}", snapshot.transport_stats.sessions);
    println!("  queue high-water: {}", snapshot.queue_stats.max_depth);
}

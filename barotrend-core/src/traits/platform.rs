//! Platform bundle

use super::{BarometricSensor, BrokerClient, NetworkLink, UpdateProvider};
use crate::supervisor::Supervisor;
use crate::time::TimeSource;

/// Runtime facts about the host system
pub trait SystemInfo {
    /// Free heap in bytes
    fn free_memory(&self) -> u32;
}

/// Everything a device build provides to the scheduler
///
/// ```rust,ignore
/// struct Esp8266;
///
/// impl Platform for Esp8266 {
///     type Link = WifiStation;
///     type Updater = ArduinoOta;
///     type Broker = PubSubClient;
///     type Sensor = Bmp280;
///     type System = EspSystem;
///     type Clock = Millis;
///     type Supervisor = RebootingSupervisor;
/// }
/// ```
pub trait Platform {
    /// Network interface
    type Link: NetworkLink;
    /// Over-the-air update listener
    type Updater: UpdateProvider;
    /// Broker session
    type Broker: BrokerClient;
    /// Pressure/temperature sensor
    type Sensor: BarometricSensor;
    /// Heap and other host figures for status reports
    type System: SystemInfo;
    /// Millisecond clock driving every deadline
    type Clock: TimeSource;
    /// Receiver of the fatal condition that ends the run
    type Supervisor: Supervisor;
}
